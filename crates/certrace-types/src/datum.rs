use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fieldpath;
use crate::{Error, Result};

/// One normalized telemetry record from a test operation.
///
/// Maps 1:1 to a line in a device report file. A suite holds several
/// operation kinds, e.g. a worker operation plus a background monitor
/// operation, distinguished by `operation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datum {
    /// Logical suite/test name this event belongs to
    pub suite_id: String,

    /// The specific probe/operation that produced it
    pub operation_id: String,

    /// Reporting thread; absent for events not tied to a thread
    #[serde(default)]
    pub thread_id: Option<i64>,

    /// CPU the event was captured on; absent when not applicable
    #[serde(default)]
    pub cpu_id: Option<i64>,

    /// Monotonic capture time in nanoseconds; not guaranteed to start at zero
    pub timestamp: i64,

    /// Operation-specific payload. Lookup keys may be dotted paths into
    /// nested objects (e.g. "sys_mem_info.available_memory").
    #[serde(default)]
    pub custom: Value,
}

impl Datum {
    /// Decode one report record. Used by the loader after it has split a
    /// report file into lines; decode failures are per-record, so one
    /// malformed line never poisons the rest of the file.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Raw custom-field lookup, no coercion. `None` means the field is
    /// absent for this record.
    pub fn custom_field(&self, path: &str) -> Option<&Value> {
        fieldpath::lookup(&self.custom, path)
    }

    /// Numeric custom-field lookup with best-effort coercion of booleans
    /// and numeric strings. `None` (absent) means "skip this record for
    /// this metric", never zero.
    pub fn custom_field_numeric(&self, path: &str) -> Option<f64> {
        self.custom_field(path).and_then(fieldpath::coerce_numeric)
    }

    /// Custom-field string lookup, for event/message discriminators.
    pub fn custom_field_str(&self, path: &str) -> Option<&str> {
        self.custom_field(path).and_then(Value::as_str)
    }
}
