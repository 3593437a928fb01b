// src/logging.rs
//
// Telemetry sinks for the simulator.
// - TrialSink: trait the simulator drives once per trial
// - NoopSink:  discards all records
// - FileSink:  writes one JSON line per trial for offline analysis

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Everything that happened in a single trial.
///
/// `opened` is the set of doors the host revealed, in the order they
/// were drawn; the draw order carries no meaning beyond reproducibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub trial: u64,
    pub prize_door: usize,
    pub initial_choice: usize,
    pub opened: Vec<usize>,
    pub final_choice: usize,
    pub win: bool,
}

/// Abstract sink for per-trial telemetry.
pub trait TrialSink {
    fn log_trial(&mut self, record: &TrialRecord);
}

/// Sink that discards all records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TrialSink for NoopSink {
    fn log_trial(&mut self, _record: &TrialRecord) {
        // intentionally no-op
    }
}

/// JSONL file sink.
///
/// Each trial is written as a single JSON object on its own line.
/// The payload is small and encoded by hand; the fields are all
/// integers and booleans so there is nothing to escape.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a new sink writing to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TrialSink for FileSink {
    fn log_trial(&mut self, record: &TrialRecord) {
        let opened: Vec<String> = record.opened.iter().map(|d| d.to_string()).collect();

        let line = format!(
            "{{\
                \"trial\":{},\
                \"prize_door\":{},\
                \"initial_choice\":{},\
                \"opened\":[{}],\
                \"final_choice\":{},\
                \"win\":{}\
            }}\n",
            record.trial,
            record.prize_door,
            record.initial_choice,
            opened.join(","),
            record.final_choice,
            record.win,
        );

        // A failed telemetry write should not abort the simulation,
        // so I/O errors are deliberately ignored here.
        let _ = self.writer.write_all(line.as_bytes());
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
