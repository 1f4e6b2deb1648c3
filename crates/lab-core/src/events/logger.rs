//! Event Logger
//!
//! Per-tick collection of turn events and append-only JSONL logging.

use bevy_ecs::prelude::*;
use lab_events::TurnEvent;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Resource storing the turn events produced since the last drain
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    events: Vec<TurnEvent>,
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TurnEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Appends turn events to a JSON Lines file, one object per line.
///
/// The null logger keeps counting but writes nowhere, so a run without
/// `--events` takes the same code path.
pub struct EventLogger {
    sink: Option<BufWriter<File>>,
    written: u64,
}

impl EventLogger {
    /// Truncate or create `path` and log into it
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let sink = BufWriter::new(File::create(path)?);
        Ok(Self {
            sink: Some(sink),
            written: 0,
        })
    }

    pub fn null() -> Self {
        Self {
            sink: None,
            written: 0,
        }
    }

    /// Events seen so far, including those a null logger dropped
    pub fn event_count(&self) -> u64 {
        self.written
    }

    pub fn log(&mut self, event: &TurnEvent) -> std::io::Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            serde_json::to_writer(&mut *sink, event)?;
            sink.write_all(b"\n")?;
        }
        self.written += 1;
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[TurnEvent]) -> std::io::Result<()> {
        events.iter().try_for_each(|event| self.log(event))
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Event log lost buffered lines: {}", e);
        }
    }
}
