//! Run journal written at stage transitions.
//!
//! One line per checkpoint, `YYYY-MMM-DD-HH:MM:SS : message`, echoed to
//! stdout and appended to the journal file. The file is opened in append
//! mode for each write, so every checkpoint is durable on its own.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

pub struct RunJournal {
    path: PathBuf,
}

impl RunJournal {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        RunJournal {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn checkpoint(&self, message: &str) -> Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let line = format!("{timestamp} : {message}");
        println!("{line}");

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open journal file: {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to write to journal file: {}", self.path.display()))?;

        Ok(())
    }
}
