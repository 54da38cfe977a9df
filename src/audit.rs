//! Audit log
//!
//! Appends one JSON line per connect, sign and verify operation. Entries carry
//! the address and outcome only; message bodies and signatures are never
//! written.

use crate::Result;
use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Operation recorded in the audit log
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Connect,
    Sign,
    Verify,
}

/// Entry in the audit log
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: DateTime<Utc>,
    operation: Operation,
    address: Option<String>,
    status: &'a str,
    error: Option<String>,
}

/// Writer for audit log entries
struct AuditLogWriter {
    path: PathBuf,
}

impl AuditLogWriter {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn write(&self, entry: &AuditEntry<'_>) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Append-only JSONL record of wallet operations
#[derive(Clone)]
pub struct AuditLog {
    writer: Arc<Mutex<AuditLogWriter>>,
}

impl AuditLog {
    /// Create a new audit log
    ///
    /// # Arguments
    /// * `log_path` - Path to the audit log file (JSONL format)
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(AuditLogWriter::new(log_path.into()))),
        }
    }

    /// Record the outcome of an operation
    ///
    /// `status` names a successful outcome ("success", "valid", "mismatch");
    /// failures are recorded with status "error" and the error text.
    pub async fn record<T>(
        &self,
        operation: Operation,
        address: Option<Address>,
        outcome: &Result<T>,
        status: &str,
    ) {
        let (status, error) = match outcome {
            Ok(_) => (status, None),
            Err(e) => ("error", Some(e.to_string())),
        };

        let entry = AuditEntry {
            timestamp: Utc::now(),
            operation,
            address: address.map(|a| a.to_checksum(None)),
            status,
            error,
        };

        let writer = self.writer.lock().await;
        // Audit logging never fails the operation
        if let Err(e) = writer.write(&entry) {
            tracing::warn!(error = %e, "Failed to write audit log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_logs_operations() {
        let temp_file = NamedTempFile::new().unwrap();
        let log = AuditLog::new(temp_file.path());
        let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();

        log.record(Operation::Connect, Some(address), &Ok(()), "success")
            .await;
        log.record::<()>(Operation::Sign, None, &Err(Error::NotConnected), "success")
            .await;

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["operation"], "connect");
        assert_eq!(lines[0]["status"], "success");
        assert_eq!(
            lines[0]["address"],
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(lines[1]["operation"], "sign");
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["error"], "Wallet is not connected");
    }

    #[tokio::test]
    async fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path());

        log.record(Operation::Verify, None, &Ok(()), "valid").await;
    }
}
