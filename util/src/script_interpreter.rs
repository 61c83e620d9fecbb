//! # Timed script interpreter module
//!
//! This module provides an interpreter for timed scripts. A script is a text
//! file made of entries of the form:
//!
//! ```text
//! <time_s>: <JSON payload>;
//! ```
//!
//! Each payload is released once the current time passes its timestamp. The
//! rover executable uses this to replay perception data through the decision
//! core.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A payload which is scripted to occur at a specific time.
struct Entry<T> {
    /// The time the payload is released at
    exec_time_s: f64,

    payload: T,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending` to acquire a list of payloads that are due.
pub struct ScriptInterpreter<T> {
    script_path: Option<PathBuf>,
    entries: VecDeque<Entry<T>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid entry at {0} s: {1}")]
    InvalidPayload(f64, serde_json::Error),

    #[error("Script entry at {0} s is earlier than the one before it")]
    OutOfOrder(f64),
}

/// Payloads released by a call to [`ScriptInterpreter::get_pending`].
#[derive(Debug, PartialEq)]
pub enum Pending<T> {
    None,
    Some(Vec<T>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> ScriptInterpreter<T>
where
    T: DeserializeOwned,
{
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path).map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script_str(&script)?;
        si.script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        let mut entries: VecDeque<Entry<T>> = VecDeque::new();

        // The pattern is a literal, so building it cannot fail
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(|e| ScriptError::InvalidTimestamp(e.to_string()))?;

        for cap in re.captures_iter(script) {
            let (time_str, payload_str) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue,
            };

            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(last) = entries.back() {
                if exec_time_s < last.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s));
                }
            }

            let payload = serde_json::from_str(payload_str)
                .map_err(|e| ScriptError::InvalidPayload(exec_time_s, e))?;

            entries.push_back(Entry {
                exec_time_s,
                payload,
            });
        }

        if entries.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(Self {
            script_path: None,
            entries,
        })
    }
}

impl<T> ScriptInterpreter<T> {
    /// Return the payloads whose time is before `current_time_s`.
    pub fn get_pending(&mut self, current_time_s: f64) -> Pending<T> {
        // If the queue is empty the script is over
        if self.entries.is_empty() {
            return Pending::EndOfScript;
        }

        let mut due = vec![];

        while self
            .entries
            .front()
            .map(|e| e.exec_time_s < current_time_s)
            .unwrap_or(false)
        {
            if let Some(e) = self.entries.pop_front() {
                due.push(e.payload);
            }
        }

        if due.is_empty() {
            Pending::None
        } else {
            Pending::Some(due)
        }
    }

    /// Get the number of entries remaining in the script
    pub fn get_num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.entries.back() {
            Some(e) => e.exec_time_s,
            None => 0f64,
        }
    }

    /// Get the path the script was loaded from, if it was loaded from a file
    pub fn get_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}
