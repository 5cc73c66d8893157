use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{BufRead, BufReader, Write},
    net::TcpListener,
    path::{Path, PathBuf},
    rc::Rc,
    sync::{Arc, Mutex},
    thread,
};

use chrono::{DateTime, TimeZone, Utc};

use flex_support_cli::{
    api::{
        AddressRecord, ClientFactory, ClientSettings, Credentials, PlatformClient, QueueRecord,
        RecordStream, WorkerRecord,
    },
    cli::{CommandRequest, ProfileSelection},
    config::ProfileStore,
    lib::errors::{ApiError, CliError},
    runtime::{DispatchSettings, Dispatcher, Outcome, Prompter},
};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_flex-support-cli");
pub const SERVICE_SID: &str = "IS0000000000000000000000000000000";
pub const WORKSPACE_SID: &str = "WS0000000000000000000000000000000";

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// One recently active worker and one idle since 2020.
pub fn sample_workers() -> Vec<WorkerRecord> {
    vec![
        WorkerRecord {
            sid: "WK001".into(),
            friendly_name: "Ada".into(),
            activity_name: Some("Available".into()),
            date_created: at(2023, 1, 5),
            date_status_changed: Some(Utc::now()),
        },
        WorkerRecord {
            sid: "WK002".into(),
            friendly_name: "Grace, Hopper".into(),
            activity_name: None,
            date_created: at(2023, 2, 6),
            date_status_changed: Some(at(2020, 1, 1)),
        },
    ]
}

pub fn sample_queues() -> Vec<QueueRecord> {
    vec![QueueRecord {
        sid: "WQ001".into(),
        friendly_name: "Everyone".into(),
        target_workers: Some("1==1".into()),
        date_created: at(2023, 3, 7),
    }]
}

pub fn sample_addresses() -> Vec<AddressRecord> {
    vec![AddressRecord {
        sid: "IG001".into(),
        friendly_name: None,
        address_type: "sms".into(),
        address: "+15550100".into(),
        date_created: at(2023, 4, 8),
    }]
}

/// In-memory platform with fixed data. Credentials in `rejected` get HTTP 401.
#[derive(Default)]
pub struct MockFactory {
    pub connects: Rc<RefCell<Vec<Credentials>>>,
    pub rejected: Vec<Credentials>,
}

impl MockFactory {
    pub fn rejecting(credentials: Credentials) -> Self {
        Self {
            rejected: vec![credentials],
            ..Self::default()
        }
    }

    pub fn connected_with(&self) -> Vec<Credentials> {
        self.connects.borrow().clone()
    }
}

impl ClientFactory for MockFactory {
    fn connect(
        &self,
        credentials: &Credentials,
        _settings: &ClientSettings,
    ) -> Result<Box<dyn PlatformClient>, ApiError> {
        self.connects.borrow_mut().push(credentials.clone());
        Ok(Box::new(MockClient {
            reject: self.rejected.contains(credentials),
        }))
    }
}

struct MockClient {
    reject: bool,
}

impl MockClient {
    fn unauthorized() -> ApiError {
        ApiError::Status {
            url: "mock://platform".into(),
            status: 401,
            message: "Authenticate".into(),
        }
    }

    fn stream<'a, T: 'a>(&'a self, records: Vec<T>) -> RecordStream<'a, T> {
        if self.reject {
            Box::new(std::iter::once(Err(Self::unauthorized())))
        } else {
            Box::new(records.into_iter().map(Ok))
        }
    }
}

impl PlatformClient for MockClient {
    fn default_conversation_service(&self) -> Result<String, ApiError> {
        if self.reject {
            return Err(Self::unauthorized());
        }
        Ok(SERVICE_SID.to_string())
    }

    fn workers<'a>(&'a self, _workspace_sid: &str) -> RecordStream<'a, WorkerRecord> {
        self.stream(sample_workers())
    }

    fn task_queues<'a>(&'a self, _workspace_sid: &str) -> RecordStream<'a, QueueRecord> {
        self.stream(sample_queues())
    }

    fn address_configurations(&self) -> RecordStream<'_, AddressRecord> {
        self.stream(sample_addresses())
    }
}

/// Answers prompts from a fixed script, in order.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, prompt: &str) -> Result<String, CliError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| CliError::Prompt {
            message: format!("no scripted answer for '{prompt}'"),
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String, CliError> {
        self.next(prompt)
    }

    fn secret(&mut self, prompt: &str) -> Result<String, CliError> {
        self.next(prompt)
    }
}

pub fn store_in(dir: &Path) -> ProfileStore {
    ProfileStore::new(dir.join("profiles.toml"))
}

/// Everything one dispatched command produced.
pub struct Run {
    pub result: Result<Outcome, CliError>,
    pub lines: Vec<String>,
    pub asked: Vec<String>,
}

pub fn dispatch(
    store: &ProfileStore,
    factory: &MockFactory,
    answers: &[&str],
    output_dir: PathBuf,
    selection: &ProfileSelection,
    command: &CommandRequest,
) -> Run {
    let mut prompter = ScriptedPrompter::new(answers);
    let mut lines: Vec<String> = Vec::new();
    let result = {
        let mut dispatcher = Dispatcher::new(
            store,
            factory,
            &mut prompter,
            &mut lines,
            DispatchSettings {
                output_dir,
                page_size: 50,
            },
        );
        dispatcher.dispatch(selection, command)
    };
    Run {
        result,
        lines,
        asked: prompter.asked,
    }
}

/// One request received by [`CannedServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub target: String,
    pub authorization: Option<String>,
}

/// Plain HTTP/1.1 server on 127.0.0.1 answering every request from `respond`.
///
/// `respond` gets the request target and the server base URL and returns a
/// status code and JSON body. Each connection serves one request.
pub struct CannedServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl CannedServer {
    pub fn start<F>(respond: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, String) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("can bind a local port");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("listener has an address")
        );
        let seen = Arc::new(Mutex::new(Vec::new()));

        let thread_seen = Arc::clone(&seen);
        let thread_base = base_url.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(request) = read_request(&mut BufReader::new(&stream)) else {
                    continue;
                };
                let (status, body) = respond(&request.target, &thread_base);
                thread_seen.lock().expect("lock").push(request);
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { base_url, seen }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

fn read_request(reader: &mut impl BufRead) -> Option<SeenRequest> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let target = request_line.split_whitespace().nth(1)?.to_string();

    let mut authorization = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    Some(SeenRequest {
        target,
        authorization,
    })
}

/// JSON worker as returned by the TaskRouter list endpoint.
pub fn worker_json(sid: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "sid": sid,
        "friendly_name": name,
        "activity_name": "Offline",
        "date_created": "2024-01-02T03:04:05Z",
        "date_status_changed": "Tue, 02 Jan 2024 03:04:05 +0000",
    })
}
