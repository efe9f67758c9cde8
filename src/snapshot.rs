// src/snapshot.rs

//! Snapshot comparison store
//!
//! First run for a key records the normalized value as the baseline;
//! subsequent runs diff against it. The default store keeps one
//! pretty-printed JSON file per key so baselines are reviewable and
//! committable alongside the tests that produce them.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Result of comparing a normalized value against its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No baseline existed; this value is now the baseline.
    Recorded,
    /// Value matches the recorded baseline.
    Matched,
    /// Value diverged; carries a structural diff.
    Mismatch(String),
}

/// Persists and compares normalized expected values.
pub trait SnapshotStore {
    fn compare_or_record(&mut self, key: &str, value: &Value) -> Result<Outcome>;
}

/// File-backed store: one `<key>.snap.json` per key under a base directory.
#[derive(Debug)]
pub struct DirSnapshots {
    dir: PathBuf,
}

impl DirSnapshots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are hierarchical ("a.asar/header"); mirror them as
        // directories so distinct keys never share a baseline file.
        self.dir.join(format!("{key}.snap.json"))
    }
}

impl SnapshotStore for DirSnapshots {
    fn compare_or_record(&mut self, key: &str, value: &Value) -> Result<Outcome> {
        let path = self.path_for(key);
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, serde_json::to_string_pretty(value)?)?;
            return Ok(Outcome::Recorded);
        }

        let recorded_text = fs::read_to_string(&path)?;
        let recorded: Value =
            serde_json::from_str(&recorded_text).map_err(|e| Error::Snapshot {
                key: key.to_string(),
                reason: format!("corrupt baseline {}: {}", path.display(), e),
            })?;

        if &recorded == value {
            Ok(Outcome::Matched)
        } else {
            Ok(Outcome::Mismatch(diff_values(&recorded, value)))
        }
    }
}

/// Structural diff of two JSON values, one line per diverging path.
pub fn diff_values(expected: &Value, actual: &Value) -> String {
    let mut lines = Vec::new();
    diff_at("$", expected, actual, &mut lines);
    lines.join("\n")
}

fn diff_at(path: &str, expected: &Value, actual: &Value, lines: &mut Vec<String>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            for (key, exp_value) in exp {
                match act.get(key) {
                    Some(act_value) => {
                        diff_at(&format!("{path}.{key}"), exp_value, act_value, lines);
                    }
                    None => lines.push(format!("{path}.{key}: missing (expected {exp_value})")),
                }
            }
            for (key, act_value) in act {
                if !exp.contains_key(key) {
                    lines.push(format!("{path}.{key}: unexpected (actual {act_value})"));
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            if exp.len() != act.len() {
                lines.push(format!(
                    "{path}: length {} != {}",
                    exp.len(),
                    act.len()
                ));
            }
            for (i, (e, a)) in exp.iter().zip(act.iter()).enumerate() {
                diff_at(&format!("{path}[{i}]"), e, a, lines);
            }
        }
        (e, a) if e != a => lines.push(format!("{path}: expected {e}, actual {a}")),
        _ => {}
    }
}
