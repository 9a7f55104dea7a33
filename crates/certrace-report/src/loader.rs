use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use certrace_types::{Datum, DeviceInfo, Suite};

#[derive(Debug, Deserialize)]
struct Header {
    device_info: DeviceInfo,
}

/// Load one device's report file into suites.
///
/// Report files are JSON lines: an optional device header object
/// (`{"device_info": {...}}`) plus one datum record per line. Fails
/// only on I/O; unparseable lines are logged and skipped so one bad
/// record never costs the rest of the file.
pub fn load_report(path: &Path) -> Result<Vec<Suite>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading report file {}", path.display()))?;
    Ok(parse_report(&content))
}

/// Parse report contents: group records by `suite_id` in arrival order
/// and attach device metadata to every resulting suite.
pub fn parse_report(content: &str) -> Vec<Suite> {
    let mut device: Option<DeviceInfo> = None;
    let mut grouped: Vec<(String, Vec<Datum>)> = Vec::new();

    for (line_number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("skipping unparseable line {}: {}", line_number + 1, err);
                continue;
            }
        };

        if value.get("device_info").is_some() {
            match serde_json::from_value::<Header>(value) {
                Ok(header) => {
                    if device.is_none() {
                        device = Some(header.device_info);
                    }
                }
                Err(err) => {
                    log::warn!("skipping bad device header on line {}: {}", line_number + 1, err)
                }
            }
            continue;
        }

        match Datum::from_value(value) {
            Ok(datum) => {
                match grouped.iter().position(|(name, _)| *name == datum.suite_id) {
                    Some(position) => grouped[position].1.push(datum),
                    None => grouped.push((datum.suite_id.clone(), vec![datum])),
                }
            }
            Err(err) => {
                log::warn!("skipping malformed record on line {}: {}", line_number + 1, err)
            }
        }
    }

    let device = device.unwrap_or_else(DeviceInfo::unknown);
    grouped
        .into_iter()
        .map(|(name, data)| Suite::new(name, device.clone(), data))
        .collect()
}
