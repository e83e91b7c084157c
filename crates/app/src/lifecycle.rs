//! Lifecycle counter persistence.
//!
//! `lifecycle.txt` keeps one `device=hours` line per lifetime-tracked device
//! and is rewritten in full on every change. It is advisory data; a missing
//! file means no counters have been recorded yet, and unreadable lines are
//! skipped rather than taking the controller down.

use std::io::ErrorKind;
use std::path::Path;

use terra_domain::error::TerraError;

/// Rewrite the counter file.
///
/// # Errors
///
/// Returns [`TerraError::Storage`] on IO failure.
pub fn save(path: &Path, counters: &[(String, i32)]) -> Result<(), TerraError> {
    let mut body = String::new();
    for (device, hours) in counters {
        body.push_str(device);
        body.push('=');
        body.push_str(&hours.to_string());
        body.push('\n');
    }
    std::fs::write(path, body)?;
    Ok(())
}

/// Read the counter file. A missing file yields no counters.
///
/// # Errors
///
/// Returns [`TerraError::Storage`] on IO failure other than a missing file.
pub fn load(path: &Path) -> Result<Vec<(String, i32)>, TerraError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let mut counters = Vec::new();
    for line in raw.lines() {
        let Some((device, hours)) = line.split_once('=') else {
            continue;
        };
        match hours.trim().parse::<i32>() {
            Ok(hours) => counters.push((device.to_string(), hours)),
            Err(_) => tracing::warn!(line, "skipping unreadable lifecycle entry"),
        }
    }
    Ok(counters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_counters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifecycle.txt");
        save(&path, &[("uvlight".to_string(), 4400)]).unwrap();
        assert_eq!(load(&path).unwrap(), vec![("uvlight".to_string(), 4400)]);
    }

    #[test]
    fn should_yield_nothing_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("lifecycle.txt")).unwrap().is_empty());
    }

    #[test]
    fn should_skip_unreadable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifecycle.txt");
        std::fs::write(&path, "uvlight=4400\ngarbage\nlight1=oops\n").unwrap();
        assert_eq!(load(&path).unwrap(), vec![("uvlight".to_string(), 4400)]);
    }

    #[test]
    fn should_rewrite_file_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifecycle.txt");
        save(&path, &[("uvlight".to_string(), 10), ("other".to_string(), 3)]).unwrap();
        save(&path, &[("uvlight".to_string(), 9)]).unwrap();
        assert_eq!(load(&path).unwrap(), vec![("uvlight".to_string(), 9)]);
    }
}
