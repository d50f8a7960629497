//! Human-readable formatting for network telemetry.
//!
//! Rates are expressed in bits with decimal (base-1000) unit steps, while
//! cumulative totals are expressed in bytes with binary (base-1024) steps.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

const BIT_UNITS: [&str; 5] = ["b", "Kb", "Mb", "Gb", "Tb"];
const BIT_RATE_UNITS: [&str; 5] = ["bps", "Kbps", "Mbps", "Gbps", "Tbps"];
const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a bit count, or a bit rate when `per_second` is set.
#[must_use]
pub fn format_bits(bits: f64, per_second: bool) -> String {
    let units = if per_second { &BIT_RATE_UNITS } else { &BIT_UNITS };
    scale(bits, 1000.0, units)
}

/// Format a byte count using binary unit steps.
#[must_use]
pub fn format_bytes(bytes: f64) -> String {
    scale(bytes, 1024.0, &BYTE_UNITS)
}

fn scale(value: f64, base: f64, units: &[&str]) -> String {
    if !value.is_finite() || value <= 0.0 {
        return format!("0 {}", units[0]);
    }

    let mut magnitude = value;
    let mut index = 0;
    while magnitude >= base && index + 1 < units.len() {
        magnitude /= base;
        index += 1;
    }

    let rounded = (magnitude * 100.0).round() / 100.0;
    format!("{rounded} {}", units[index])
}
