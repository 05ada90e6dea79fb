//! Append-only JSONL writer for engine events.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use focusguard_common::config::EngineConfig;
use focusguard_common::error::{FocusError, FocusResult};
use focusguard_session_model::event::EngineEvent;

pub const EVENT_LOG_SCHEMA_VERSION: &str = "1.0";

/// First line of an event log, written as a `#` comment so the rest of the
/// file stays plain JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogHeader {
    pub schema_version: String,
    pub epoch_wall: String,
    pub source: String,
    pub engine: EngineConfig,
}

impl EventLogHeader {
    pub fn new(epoch_wall: impl Into<String>, source: &Path, engine: &EngineConfig) -> Self {
        Self {
            schema_version: EVENT_LOG_SCHEMA_VERSION.to_string(),
            epoch_wall: epoch_wall.into(),
            source: source.display().to_string(),
            engine: engine.clone(),
        }
    }
}

/// Writes engine events to a JSONL file.
pub struct JsonlEventWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    events_written: u64,
}

impl JsonlEventWriter {
    /// Create the file (truncating it) and write the header line.
    pub fn create(path: PathBuf, header: &EventLogHeader) -> FocusResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);
        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")?;

        Ok(Self {
            writer,
            path,
            events_written: 0,
        })
    }

    pub fn write_event(&mut self, event: &EngineEvent) -> FocusResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")?;
        self.events_written += 1;

        if self.events_written % 256 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> FocusResult<()> {
        self.writer.flush().map_err(FocusError::from)
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for JsonlEventWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
