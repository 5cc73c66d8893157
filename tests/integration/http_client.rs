use std::time::Duration;

use serde_json::json;

use flex_support_cli::{
    api::{http::Endpoints, ClientFactory, ClientSettings, Credentials, HttpClientFactory},
    lib::errors::ApiError,
};

use crate::common::{worker_json, CannedServer, WORKSPACE_SID};

fn settings(page_size: u32) -> ClientSettings {
    ClientSettings {
        timeout: Duration::from_secs(10),
        page_size,
    }
}

fn endpoints(server: &CannedServer) -> Endpoints {
    Endpoints {
        taskrouter: server.base_url.clone(),
        conversations: server.base_url.clone(),
    }
}

/// Two worker pages; the first links to the second by absolute URL.
pub fn two_worker_pages(target: &str, base: &str) -> (u16, String) {
    if !target.contains("/Workers") {
        return (404, json!({"message": "Not Found", "status": 404}).to_string());
    }
    let body = if target.contains("Page=1") {
        json!({
            "workers": [worker_json("WK003", "Linus")],
            "meta": {"next_page_url": null},
        })
    } else {
        json!({
            "workers": [worker_json("WK001", "Ada"), worker_json("WK002", "Grace")],
            "meta": {
                "next_page_url": format!(
                    "{base}/v1/Workspaces/{WORKSPACE_SID}/Workers?PageSize=2&Page=1"
                ),
            },
        })
    };
    (200, body.to_string())
}

#[test]
fn workers_follow_next_page_links_with_token_auth() {
    let server = CannedServer::start(two_worker_pages);
    let client = HttpClientFactory::new(endpoints(&server))
        .connect(&Credentials::Token("support-token".into()), &settings(2))
        .expect("client builds");

    let sids: Vec<String> = client
        .workers(WORKSPACE_SID)
        .map(|worker| worker.expect("worker decodes").sid)
        .collect();
    assert_eq!(sids, ["WK001", "WK002", "WK003"]);

    let seen = server.seen();
    assert_eq!(seen.len(), 2, "{seen:?}");
    assert_eq!(
        seen[0].target,
        format!("/v1/Workspaces/{WORKSPACE_SID}/Workers?PageSize=2")
    );
    assert!(seen[1].target.ends_with("Page=1"), "{seen:?}");
    for request in &seen {
        assert_eq!(
            request.authorization.as_deref(),
            Some("Basic dG9rZW46c3VwcG9ydC10b2tlbg==")
        );
    }
}

#[test]
fn rejected_credentials_map_to_status_error_with_platform_message() {
    let server = CannedServer::start(|_, _| {
        (
            401,
            json!({"code": 20003, "message": "Authenticate", "status": 401}).to_string(),
        )
    });
    let client = HttpClientFactory::new(endpoints(&server))
        .connect(
            &Credentials::Basic {
                username: "AC123".into(),
                password: "secret".into(),
            },
            &settings(50),
        )
        .expect("client builds");

    let err = client
        .default_conversation_service()
        .expect_err("401 must fail");
    assert!(err.is_unauthorized(), "{err:?}");
    match err {
        ApiError::Status {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authenticate");
        }
        other => panic!("Unexpected error: {other:?}"),
    }

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target, "/v1/Configuration");
    assert_eq!(seen[0].authorization.as_deref(), Some("Basic QUMxMjM6c2VjcmV0"));
}

#[test]
fn conversation_service_is_read_from_configuration() {
    let server = CannedServer::start(|target, _| {
        if target == "/v1/Configuration" {
            (200, json!({"default_chat_service_sid": "IS42"}).to_string())
        } else {
            (404, json!({"message": "Not Found"}).to_string())
        }
    });
    let client = HttpClientFactory::new(endpoints(&server))
        .connect(&Credentials::Token("t".into()), &settings(50))
        .expect("client builds");

    assert_eq!(
        client.default_conversation_service().expect("service sid"),
        "IS42"
    );
}
