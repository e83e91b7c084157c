//! Daily trace files for device switching and temperatures.
//!
//! Two append-only files per day, `state_YYYYMMDD` and `temp_YYYYMMDD`, live
//! in the trace folder. Every line is prefixed with `YYYY-MM-DD HH:MM:SS`.
//! When a new day-file is created and the folder already holds `max_days`
//! files of that kind, the oldest one is deleted first.
//!
//! Write failures are logged and swallowed; tracing must never take the
//! control loop down.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use terra_domain::error::TerraError;
use terra_domain::time;

pub const DEFAULT_MAX_TRACE_DAYS: usize = 30;

/// A trace session covers at most one day before it is rotated.
const ROTATE_AFTER_SECONDS: i64 = 1440 * 60;

const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// The two kinds of trace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    State,
    Temperature,
}

impl TraceKind {
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::State => "state_",
            Self::Temperature => "temp_",
        }
    }
}

/// Writer for the daily trace files.
#[derive(Debug)]
pub struct TraceRecorder {
    folder: PathBuf,
    max_days: usize,
    enabled: bool,
    started_at: i64,
    state_file: Option<PathBuf>,
    temp_file: Option<PathBuf>,
}

impl TraceRecorder {
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, max_days: usize) -> Self {
        Self {
            folder: folder.into(),
            max_days,
            enabled: false,
            started_at: 0,
            state_file: None,
            temp_file: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open today's files and begin recording.
    ///
    /// Writes the `start` marker to both files, then one line per device
    /// with its current on/off bit.
    pub fn start(&mut self, now: NaiveDateTime, device_bits: &[(String, bool)]) {
        if let Err(err) = self.open_files(now) {
            tracing::warn!(folder = %self.folder.display(), %err, "cannot open trace files");
            return;
        }
        self.enabled = true;
        self.started_at = time::epoch_seconds(now);
        self.state(now, "start");
        self.temperature(now, "start");
        for (device, on) in device_bits {
            self.state(now, &format!("{device} {}", u8::from(*on)));
        }
    }

    /// Write the `stop` markers and end the session.
    pub fn stop(&mut self, now: NaiveDateTime) {
        if self.enabled {
            self.state(now, "stop");
            self.temperature(now, "stop");
            self.enabled = false;
        }
    }

    /// Whether the running session has covered a full day.
    #[must_use]
    pub fn rotation_due(&self, now: NaiveDateTime) -> bool {
        self.enabled && time::epoch_seconds(now) >= self.started_at + ROTATE_AFTER_SECONDS
    }

    /// Append a line to the state trace. No-op while recording is off.
    pub fn state(&self, now: NaiveDateTime, payload: &str) {
        if self.enabled {
            append(self.state_file.as_deref(), now, payload);
        }
    }

    /// Append a line to the temperature trace. No-op while recording is off.
    pub fn temperature(&self, now: NaiveDateTime, payload: &str) {
        if self.enabled {
            append(self.temp_file.as_deref(), now, payload);
        }
    }

    /// Names of the recorded files of one kind, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] when the folder cannot be read.
    pub fn list(&self, kind: TraceKind) -> Result<Vec<String>, TerraError> {
        match list_files(&self.folder, kind.prefix()) {
            Ok(files) => Ok(files),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Content of one recorded file.
    ///
    /// # Errors
    ///
    /// Returns [`TerraError::Storage`] with `NotFound` for names that do not
    /// look like a file of the given kind, or when the file is missing.
    pub fn read_file(&self, kind: TraceKind, name: &str) -> Result<String, TerraError> {
        // The name comes from the API; never let it escape the folder.
        if !name.starts_with(kind.prefix()) || name.contains(['/', '\\']) || name.contains("..") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no trace file named {name}"),
            )
            .into());
        }
        Ok(std::fs::read_to_string(self.folder.join(name))?)
    }

    fn open_files(&mut self, now: NaiveDateTime) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.folder)?;
        self.state_file = Some(self.create_day_file(TraceKind::State, now)?);
        self.temp_file = Some(self.create_day_file(TraceKind::Temperature, now)?);
        Ok(())
    }

    /// Create today's file of one kind, dropping the oldest when the
    /// retention limit is reached.
    fn create_day_file(&self, kind: TraceKind, now: NaiveDateTime) -> std::io::Result<PathBuf> {
        let files = list_files(&self.folder, kind.prefix())?;
        if self.max_days > 0 && files.len() == self.max_days {
            std::fs::remove_file(self.folder.join(&files[0]))?;
        }
        let name = format!("{}{}", kind.prefix(), now.format(FILE_DATE_FORMAT));
        let path = self.folder.join(name);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        std::fs::File::create(&path)?;
        Ok(path)
    }
}

/// File names with the given prefix, sorted so the oldest comes first.
fn list_files(folder: &Path, prefix: &str) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_file() && name.starts_with(prefix) {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

fn append(path: Option<&Path>, now: NaiveDateTime, payload: &str) {
    let Some(path) = path else { return };
    let result = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{} {payload}", now.format(LINE_TIME_FORMAT)));
    if let Err(err) = result {
        tracing::warn!(path = %path.display(), %err, "trace write failed");
    }
}
