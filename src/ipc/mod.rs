//! # IPC Status/Command Plane
//!
//! File-backed rendezvous between the processor and its control front.
//! The processor publishes `status.json` on a cadence and polls
//! `command.json` for lifecycle commands. Both sides rely on atomic
//! rename semantics; no file locks. A single processor instance owns the
//! directory (single-writer invariant).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::errors::IpcError;

/// Well-known file names inside the communication directory
pub const STATUS_FILE: &str = "status.json";
pub const COMMAND_FILE: &str = "command.json";

/// Staleness factor: healthy iff the status is younger than
/// `factor × statusUpdateIntervalSeconds`
pub const LIVENESS_FACTOR: i64 = 3;

/// Snapshot published by the processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatus {
    pub is_running: bool,
    pub is_processing: bool,
    pub messages_processed: u64,
    pub messages_failed: u64,
    pub messages_pending: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_processed_at: Option<DateTime<Utc>>,
    pub status_updated_at: DateTime<Utc>,
    /// Free-text label: Running | Stopped | Processing | Restarting
    pub status: String,
    pub test_mode_enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Lifecycle commands accepted from the control front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessCommand {
    Start,
    Stop,
    Restart,
    GetStatus,
    EnableTestMode,
    DisableTestMode,
    Reset,
}

impl ProcessCommand {
    /// Case-insensitive parse; `None` for unknown commands
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start" => Some(ProcessCommand::Start),
            "stop" => Some(ProcessCommand::Stop),
            "restart" => Some(ProcessCommand::Restart),
            "getstatus" => Some(ProcessCommand::GetStatus),
            "enabletestmode" => Some(ProcessCommand::EnableTestMode),
            "disabletestmode" => Some(ProcessCommand::DisableTestMode),
            "reset" => Some(ProcessCommand::Reset),
            _ => None,
        }
    }
}

/// On-disk command payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDocument {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

/// Health verdict derived from status freshness, consumed by the control
/// front's health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub is_healthy: bool,
    pub status: String,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn status_path(dir: &Path) -> PathBuf {
    dir.join(STATUS_FILE)
}

fn command_path(dir: &Path) -> PathBuf {
    dir.join(COMMAND_FILE)
}

async fn write_atomic(path: &Path, content: &str) -> Result<(), IpcError> {
    // Temp sibling + rename keeps readers from ever seeing a partial file
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content)
        .await
        .map_err(|e| IpcError::io(&tmp, &e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| IpcError::io(path, &e))
}

/// Publish the status document atomically
pub async fn write_status(dir: &Path, status: &ProcessStatus) -> Result<(), IpcError> {
    let content = serde_json::to_string_pretty(status)?;
    write_atomic(&status_path(dir), &content).await
}

/// Read the last published status; `None` when no file exists yet
pub async fn read_status(dir: &Path) -> Result<Option<ProcessStatus>, IpcError> {
    let path = status_path(dir);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(IpcError::io(&path, &e)),
    }
}

/// Write a command document for the processor (control-front side)
pub async fn write_command(dir: &Path, command: ProcessCommand) -> Result<(), IpcError> {
    let document = CommandDocument {
        command: format!("{:?}", command),
        issued_at: Some(Utc::now()),
    };
    let content = serde_json::to_string_pretty(&document)?;
    write_atomic(&command_path(dir), &content).await
}

/// Consume a pending command, if any (processor side)
///
/// The file is renamed to its `.processed` sibling before parsing, which
/// guarantees at-most-once application even if parsing fails. Unknown
/// commands are logged and discarded.
pub async fn poll_command(dir: &Path) -> Result<Option<ProcessCommand>, IpcError> {
    let path = command_path(dir);
    let processed = dir.join(format!("{COMMAND_FILE}.processed"));

    match tokio::fs::rename(&path, &processed).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(IpcError::io(&path, &e)),
    }

    let content = tokio::fs::read_to_string(&processed)
        .await
        .map_err(|e| IpcError::io(&processed, &e))?;
    let document: CommandDocument = match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "discarding malformed command document");
            return Ok(None);
        }
    };

    match ProcessCommand::parse(&document.command) {
        Some(command) => Ok(Some(command)),
        None => {
            warn!(command = %document.command, "discarding unknown command");
            Ok(None)
        }
    }
}

/// Freshness rule: healthy iff the status was updated within
/// `LIVENESS_FACTOR × interval`
pub fn is_fresh(status: &ProcessStatus, interval_seconds: u64, now: DateTime<Utc>) -> bool {
    let window = Duration::seconds(LIVENESS_FACTOR * interval_seconds as i64);
    now - status.status_updated_at <= window
}

/// Full health check as exposed by the control front
pub async fn check_health(dir: &Path, interval_seconds: u64) -> HealthReport {
    let checked_at = Utc::now();
    match read_status(dir).await {
        Ok(Some(status)) if is_fresh(&status, interval_seconds, checked_at) => HealthReport {
            is_healthy: true,
            status: status.status,
            checked_at,
            error_message: None,
        },
        Ok(Some(status)) => HealthReport {
            is_healthy: false,
            status: status.status,
            checked_at,
            error_message: Some("status file is stale".to_string()),
        },
        Ok(None) => HealthReport {
            is_healthy: false,
            status: "Unknown".to_string(),
            checked_at,
            error_message: Some("status file missing".to_string()),
        },
        Err(e) => HealthReport {
            is_healthy: false,
            status: "Unknown".to_string(),
            checked_at,
            error_message: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_status() -> ProcessStatus {
        ProcessStatus {
            is_running: true,
            is_processing: false,
            messages_processed: 12,
            messages_failed: 3,
            messages_pending: 1,
            last_processed_at: Some(Utc::now()),
            status_updated_at: Utc::now(),
            status: "Running".to_string(),
            test_mode_enabled: false,
            metadata: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_status_write_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let status = sample_status();
        write_status(dir.path(), &status).await.unwrap();

        let read = read_status(dir.path()).await.unwrap().unwrap();
        assert_eq!(read, status);
        // No temp sibling left behind
        assert!(!dir.path().join("status.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_status_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_status(dir.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_command_consumed_at_most_once() {
        let dir = tempfile::tempdir().unwrap();
        write_command(dir.path(), ProcessCommand::Restart)
            .await
            .unwrap();

        let first = poll_command(dir.path()).await.unwrap();
        assert_eq!(first, Some(ProcessCommand::Restart));

        // Consumed: renamed to the .processed sibling
        let second = poll_command(dir.path()).await.unwrap();
        assert_eq!(second, None);
        assert!(dir.path().join("command.json.processed").exists());
    }

    #[tokio::test]
    async fn test_unknown_command_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let document = CommandDocument {
            command: "SelfDestruct".to_string(),
            issued_at: None,
        };
        tokio::fs::write(
            dir.path().join(COMMAND_FILE),
            serde_json::to_string(&document).unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(poll_command(dir.path()).await.unwrap(), None);
    }

    #[test]
    fn test_command_parse_case_insensitive() {
        assert_eq!(ProcessCommand::parse("start"), Some(ProcessCommand::Start));
        assert_eq!(
            ProcessCommand::parse("EnableTestMode"),
            Some(ProcessCommand::EnableTestMode)
        );
        assert_eq!(ProcessCommand::parse("bogus"), None);
    }

    #[test]
    fn test_freshness_window() {
        let mut status = sample_status();
        let now = Utc::now();

        status.status_updated_at = now - Duration::seconds(10);
        assert!(is_fresh(&status, 5, now));

        status.status_updated_at = now - Duration::seconds(16);
        assert!(!is_fresh(&status, 5, now));
    }

    #[tokio::test]
    async fn test_check_health_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut status = sample_status();
        status.status_updated_at = Utc::now() - Duration::seconds(120);
        write_status(dir.path(), &status).await.unwrap();

        let report = check_health(dir.path(), 5).await;
        assert!(!report.is_healthy);
        assert_eq!(report.error_message.as_deref(), Some("status file is stale"));
    }
}
