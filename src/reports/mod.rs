//! CSV report kinds, file naming, and row layout.
use crate::{
    api::{AddressRecord, QueueRecord, WorkerRecord},
    config::ReportTimezone,
};

pub mod writer;

pub use writer::{write_report, ReportSummary};

/// Report types produced by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Worker,
    Queue,
    Address,
}

impl ReportKind {
    /// Tag used as the file name prefix.
    pub const fn tag(&self) -> &'static str {
        match self {
            ReportKind::Worker => "worker",
            ReportKind::Queue => "queue",
            ReportKind::Address => "address",
        }
    }

    pub const fn header(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Worker => &[
                "Date Created",
                "Worker SID",
                "Friendly Name",
                "Activity Name",
                "Date Status Changed",
            ],
            ReportKind::Queue => &[
                "Date Created",
                "Queue SID",
                "Friendly Name",
                "Target Workers",
            ],
            ReportKind::Address => &[
                "Date Created",
                "Address SID",
                "Friendly Name",
                "Type",
                "Address",
            ],
        }
    }
}

/// `<kind>-<key>-report.csv`, with path separators in `key` replaced.
pub fn report_file_name(kind: ReportKind, key: &str) -> String {
    let key: String = key
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}-{}-report.csv", kind.tag(), key)
}

/// A record that renders as one report row.
pub trait ReportRow {
    const KIND: ReportKind;

    /// SID shown in progress output.
    fn sid(&self) -> &str;

    /// Cells in [`ReportKind::header`] order.
    fn cells(&self, timezone: &ReportTimezone) -> Vec<String>;
}

impl ReportRow for WorkerRecord {
    const KIND: ReportKind = ReportKind::Worker;

    fn sid(&self) -> &str {
        &self.sid
    }

    fn cells(&self, timezone: &ReportTimezone) -> Vec<String> {
        vec![
            timezone.format(&self.date_created),
            self.sid.clone(),
            self.friendly_name.clone(),
            self.activity_name.clone().unwrap_or_default(),
            self.date_status_changed
                .as_ref()
                .map(|changed| timezone.format(changed))
                .unwrap_or_default(),
        ]
    }
}

impl ReportRow for QueueRecord {
    const KIND: ReportKind = ReportKind::Queue;

    fn sid(&self) -> &str {
        &self.sid
    }

    fn cells(&self, timezone: &ReportTimezone) -> Vec<String> {
        vec![
            timezone.format(&self.date_created),
            self.sid.clone(),
            self.friendly_name.clone(),
            self.target_workers.clone().unwrap_or_default(),
        ]
    }
}

impl ReportRow for AddressRecord {
    const KIND: ReportKind = ReportKind::Address;

    fn sid(&self) -> &str {
        &self.sid
    }

    fn cells(&self, timezone: &ReportTimezone) -> Vec<String> {
        vec![
            timezone.format(&self.date_created),
            self.sid.clone(),
            self.friendly_name.clone().unwrap_or_default(),
            self.address_type.clone(),
            self.address.clone(),
        ]
    }
}
