use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Datum;

/// Device identity attached to every suite loaded from one report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub os_version: String,
}

impl DeviceInfo {
    pub fn new(
        model: impl Into<String>,
        manufacturer: impl Into<String>,
        os_version: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            manufacturer: manufacturer.into(),
            os_version: os_version.into(),
        }
    }

    /// Placeholder for report files that carry no device header.
    pub fn unknown() -> Self {
        Self::new("unknown", "unknown", "unknown")
    }

    /// Human-readable label used next to per-device chart images.
    pub fn label(&self) -> String {
        format!("{} ({}, {})", self.model, self.manufacturer, self.os_version)
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// All Datum from one test run on one device, in arrival order.
///
/// Immutable after construction. The per-operation index is built once
/// here so handlers that only care about one operation kind don't
/// re-scan the whole sequence.
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    device: DeviceInfo,
    data: Vec<Datum>,
    by_operation: BTreeMap<String, Vec<usize>>,
}

impl Suite {
    pub fn new(name: impl Into<String>, device: DeviceInfo, data: Vec<Datum>) -> Self {
        let mut by_operation: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, datum) in data.iter().enumerate() {
            by_operation
                .entry(datum.operation_id.clone())
                .or_default()
                .push(index);
        }
        Self {
            name: name.into(),
            device,
            data,
            by_operation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn data(&self) -> &[Datum] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Operation kinds present in this suite, in lexical order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.by_operation.keys().map(String::as_str)
    }

    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.by_operation.contains_key(operation_id)
    }

    /// Ordered subsequence of data produced by one operation kind.
    pub fn data_for_operation(&self, operation_id: &str) -> impl Iterator<Item = &Datum> {
        self.by_operation
            .get(operation_id)
            .into_iter()
            .flatten()
            .map(|&index| &self.data[index])
    }

    /// First capture timestamp in arrival order, the zero point for
    /// relative-seconds normalization.
    pub fn first_timestamp(&self) -> Option<i64> {
        self.data.first().map(|d| d.timestamp)
    }
}
