use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- jot recovery log: append-only
     Item lists that jot could not save are copied here.
     Safe to delete once you have what you need. -->

---
";

/// A list snapshot that failed to persist.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub body: String,
}

impl RecoveryEntry {
    pub fn failed_save(error: &str, blob: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            description: format!("save failed: {}", error),
            body: blob,
        }
    }

    /// The latest list, still unsaved when jot exits
    pub fn unsaved_at_exit(blob: String) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            description: "still unsaved at exit".to_string(),
            body: blob,
        }
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} write: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.description,
        );
        if !self.body.is_empty() {
            out.push_str("```json\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        out.push_str("---\n");
        out
    }
}

/// Path of the recovery log inside a data directory
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append an entry to the recovery log. Failures are logged, never raised:
/// this runs on paths that are already handling an error.
pub fn log_recovery(data_dir: &Path, entry: &RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, entry) {
        tracing::error!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Number of entries in the recovery log (0 if there is no log)
pub fn recovery_entry_count(data_dir: &Path) -> usize {
    std::fs::read_to_string(recovery_log_path(data_dir))
        .map(|content| content.lines().filter(|l| l.starts_with("## ")).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_formatting() {
        let entry = RecoveryEntry {
            timestamp: DateTime::parse_from_rfc3339("2025-05-14T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            description: "save failed: disk full".into(),
            body: "[]".into(),
        };
        assert_eq!(
            entry.to_markdown(),
            "## 2025-05-14T10:00:00Z write: save failed: disk full\n\n```json\n[]\n```\n\n---\n"
        );
    }

    #[test]
    fn header_written_once() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), &RecoveryEntry::failed_save("a", "[1]".into()));
        log_recovery(dir.path(), &RecoveryEntry::failed_save("b", "[2]".into()));
        let content = std::fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert_eq!(content.matches("jot recovery log").count(), 1);
        assert_eq!(recovery_entry_count(dir.path()), 2);
        assert!(content.contains("[2]"));
    }

    #[test]
    fn count_without_log_is_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(recovery_entry_count(dir.path()), 0);
    }

    #[test]
    fn atomic_write_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.json");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }
}
