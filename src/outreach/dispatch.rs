use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Handed to the channel
    Sent,
    /// Stored for a separate sender to pick up
    Queued,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub recipient: String,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
}

/// A message channel. Backends decide what "sending" means; the scoring side
/// never depends on which one is plugged in.
pub trait Dispatcher {
    /// Short backend name, recorded in the contacted ledger
    fn backend(&self) -> &'static str;

    fn send(&mut self, recipient: &str, text: &str) -> Result<DeliveryResult>;
}

/// Accepts every message without sending or storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunDispatcher;

impl Dispatcher for DryRunDispatcher {
    fn backend(&self) -> &'static str {
        "dry-run"
    }

    fn send(&mut self, recipient: &str, _text: &str) -> Result<DeliveryResult> {
        Ok(DeliveryResult {
            recipient: recipient.to_string(),
            status: DeliveryStatus::Sent,
            detail: Some("dry run".to_string()),
        })
    }
}

/// One line of the outbox file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboxEntry {
    pub recipient: String,
    pub text: String,
    pub queued_at: DateTime<Utc>,
}

/// Appends messages as JSON lines to an outbox file for an external sender.
#[derive(Debug)]
pub struct OutboxDispatcher {
    path: PathBuf,
    file: File,
}

impl OutboxDispatcher {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open outbox at {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }
}

impl Dispatcher for OutboxDispatcher {
    fn backend(&self) -> &'static str {
        "outbox"
    }

    fn send(&mut self, recipient: &str, text: &str) -> Result<DeliveryResult> {
        let entry = OutboxEntry {
            recipient: recipient.to_string(),
            text: text.to_string(),
            queued_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&entry).context("Failed to serialize outbox entry")?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to outbox at {}", self.path.display()))?;

        tracing::debug!(recipient, outbox = %self.path.display(), "queued message");
        Ok(DeliveryResult {
            recipient: recipient.to_string(),
            status: DeliveryStatus::Queued,
            detail: None,
        })
    }
}

/// Read every entry of an outbox file
pub fn read_outbox(path: &Path) -> Result<Vec<OutboxEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read outbox at {}", path.display()))?;
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid outbox entry on line {}", i + 1))
        })
        .collect()
}
