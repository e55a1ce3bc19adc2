//! Best-effort prefill echo of the last submitted booking.
//!
//! After a successful submission the host may echo the collected field
//! values into session-scoped storage so the next booking attempt starts
//! prefilled. The echo is cosmetic and never authoritative: it may be
//! absent, stale, or unreadable, and every failure mode is swallowed
//! silently. Nothing here blocks initialization or surfaces to the user.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::surface::FormSurface;
use crate::wizard::BookingRecord;

/// A JSON-file echo of the last submitted field values.
#[derive(Debug, Clone)]
pub struct PrefillEcho {
    path: PathBuf,
}

impl PrefillEcho {
    /// Create an echo backed by the given file path.
    ///
    /// The file need not exist; it is created on the first
    /// [`store`](Self::store).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store a completed booking's field values. Best effort: failures are
    /// logged at debug level and otherwise ignored.
    pub fn store(&self, record: &BookingRecord) {
        let map: HashMap<&str, &str> = record
            .fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let result = serde_json::to_string_pretty(&map)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(reason) = result {
            tracing::debug!(path = %self.path.display(), %reason, "prefill echo not written");
        }
    }

    /// Load the last echoed field values.
    ///
    /// Returns `None` for a missing, unreadable, or malformed file; stale
    /// data is the caller's risk and correctness must never depend on it.
    pub fn load(&self) -> Option<HashMap<String, String>> {
        let text = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&text) {
            Ok(map) => Some(map),
            Err(reason) => {
                tracing::debug!(path = %self.path.display(), %reason, "prefill echo ignored");
                None
            }
        }
    }

    /// Write the echoed values into the named fields of a surface.
    ///
    /// Only the requested fields are touched; anything missing from the
    /// echo or from the surface is skipped.
    pub fn apply<S: FormSurface + ?Sized>(&self, surface: &mut S, fields: &[&str]) {
        let Some(values) = self.load() else {
            return;
        };
        for &name in fields {
            if let Some(value) = values.get(name) {
                surface.set_field_value(name, value);
            }
        }
    }
}
