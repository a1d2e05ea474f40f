/// Utility helpers shared by configuration, providers and `main`.
///
/// IMPORTANT:
/// - No provider-specific logic should live here.
/// - Everything except `setup_logging` is pure.
///
use std::io::Write;

use chrono::Local;
use log::LevelFilter;
use serde_json::Value;

/// Splits a comma-separated setting into trimmed, non-empty items.
///
/// Examples:
/// - "Python, Go"   -> ["Python", "Go"]
/// - "429,,503 "    -> ["429", "503"]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a salary bound from a JSON field.
///
/// Integers pass through, floats are truncated, and `null`, negative or
/// non-numeric values are treated as "not specified".
pub fn json_bound(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
}

/// Initializes the global logger.
///
/// Format: `2024-01-31 12:00:00 [WARN] target: message`.
/// `RUST_LOG`, when set, refines the configured level.
pub fn setup_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
