use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use certrace_types::{Datum, DeviceInfo, Suite};

use crate::fake::{FAKE_EVENTS, FAKE_OPERATION};

const DEVICES: [(&str, &str, &str); 3] = [
    ("Pixel 4", "Google", "11"),
    ("Galaxy S10", "Samsung", "10"),
    ("Mi 9", "Xiaomi", "9"),
];

/// Deterministic device identity for device index `n`.
pub fn device(n: usize) -> DeviceInfo {
    let (model, manufacturer, os_version) = DEVICES[n % DEVICES.len()];
    DeviceInfo::new(model, manufacturer, os_version)
}

pub fn datum(
    suite_id: &str,
    operation_id: &str,
    timestamp: i64,
    custom: Value,
) -> Datum {
    Datum {
        suite_id: suite_id.to_string(),
        operation_id: operation_id.to_string(),
        thread_id: None,
        cpu_id: None,
        timestamp,
        custom,
    }
}

/// The five FakeOperation lifecycle records, one event each, starting
/// at a non-zero timestamp one second apart.
pub fn fake_operation_records() -> Vec<Datum> {
    FAKE_EVENTS
        .iter()
        .enumerate()
        .map(|(i, event)| {
            datum(
                FAKE_OPERATION,
                FAKE_OPERATION,
                5_000_000_000 + i as i64 * 1_000_000_000,
                json!({
                    "event": event,
                    "duration_value": 123,
                    "int_value": 32768,
                    "string_value": "Hello World",
                    "bool_value": true
                }),
            )
        })
        .collect()
}

pub fn fake_operation_suite(device: DeviceInfo) -> Suite {
    Suite::new(FAKE_OPERATION, device, fake_operation_records())
}

/// A small calculate-pi run: one params record, two worker spans on
/// separate threads, one monitor temperature sample.
pub fn wait_pi_records() -> Vec<Datum> {
    let suite_id = "WaitForPI";
    let mut records = vec![datum(
        suite_id,
        "CalculateWaitPIOperation",
        1_000_000_000,
        json!({"wait_method": "sleep", "affinity": false}),
    )];
    for (thread, t0, t1, iterations) in [
        (1_i64, 1_000_000_000_i64, 2_000_000_000_i64, 3_000_000.0),
        (2, 1_000_000_000, 3_000_000_000, 5_000_000.0),
    ] {
        let mut record = datum(
            suite_id,
            "CalculateWaitPIOperation",
            t1,
            json!({"t0": t0, "t1": t1, "iterations": iterations}),
        );
        record.thread_id = Some(thread);
        records.push(record);
    }
    records.push(datum(
        suite_id,
        "MonitorOperation",
        2_500_000_000,
        json!({"temperature_info": {"max_cpu_temperature": 39_000.0}}),
    ));
    records
}

/// Serialize a device report file the way test devices emit them: a
/// device header line followed by one record per line.
pub fn report_file_contents(device: &DeviceInfo, records: &[Datum]) -> String {
    let mut out = String::new();
    out.push_str(&json!({"device_info": device}).to_string());
    out.push('\n');
    for record in records {
        out.push_str(&serde_json::to_string(record).expect("record serializes"));
        out.push('\n');
    }
    out
}

/// Write a report file into `dir` and return its path.
pub fn write_report_file(
    dir: &Path,
    name: &str,
    device: &DeviceInfo,
    records: &[Datum],
) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, report_file_contents(device, records)).expect("report file written");
    path
}
