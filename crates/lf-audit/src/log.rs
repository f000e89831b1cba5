// log.rs — Append-only JSONL audit log.
//
// One JSON object per line; append-friendly and greppable. Each entry is
// linked to the previous one via `previous_hash`, so any tampering
// (inserting, deleting, or modifying lines) breaks the chain.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::entry::AuditEntry;
use crate::error::AuditError;
use crate::hasher;

/// An append-only audit log backed by a JSONL file.
///
/// Writes are flushed after each entry for durability.
pub struct AuditLog {
    writer: BufWriter<File>,
    path: PathBuf,
    /// Hash of the last entry written — sets `previous_hash` on the next one.
    last_hash: Option<String>,
}

impl AuditLog {
    /// Open (or create) an audit log at the given path.
    ///
    /// If the file already exists, the last line is read back to recover the
    /// hash chain state so new entries link correctly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();

        let last_hash = if path.exists() {
            Self::read_last_hash(&path)?
        } else {
            None
        };

        // Append mode — existing data is never overwritten.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            last_hash,
        })
    }

    /// Append an entry, linking it to the previous one, and flush.
    pub fn append(&mut self, entry: &mut AuditEntry) -> Result<(), AuditError> {
        entry.previous_hash = self.last_hash.clone();

        let json = serde_json::to_string(entry)?;
        self.last_hash = Some(hasher::hash_str(&json));

        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;

        Ok(())
    }

    /// Read all entries from a log file, oldest first.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<AuditEntry>, AuditError> {
        let file = File::open(path.as_ref()).map_err(|source| AuditError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }

        Ok(entries)
    }

    /// Read the transition history of a single laudo, oldest first.
    pub fn read_for_laudo(
        path: impl AsRef<Path>,
        laudo_id: Uuid,
    ) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = Self::read_all(path)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.laudo_id == laudo_id)
            .collect())
    }

    /// Verify the integrity of a log file's hash chain.
    ///
    /// Checks that each entry's `previous_hash` matches the hash of the
    /// preceding line. Returns `Ok(true)` if valid, or an
    /// `IntegrityViolation` error if tampered.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<bool, AuditError> {
        let file = File::open(path.as_ref()).map_err(|source| AuditError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut previous_hash: Option<String> = None;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line)?;

            if entry.previous_hash != previous_hash {
                return Err(AuditError::IntegrityViolation {
                    line: line_num + 1,
                    expected: previous_hash.unwrap_or_else(|| "None".to_string()),
                    actual: entry.previous_hash.unwrap_or_else(|| "None".to_string()),
                });
            }

            // Hash the raw line, not a re-serialized entry — re-serialization
            // could change field order.
            previous_hash = Some(hasher::hash_str(&line));
        }

        Ok(true)
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_last_hash(path: &Path) -> Result<Option<String>, AuditError> {
        let file = File::open(path).map_err(|source| AuditError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut last_line: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last_line = Some(line);
            }
        }

        Ok(last_line.map(|line| hasher::hash_str(&line)))
    }
}
