//! Duration strings for command-line flags
//!
//! Accepts the compact `<number><unit>` form (`10s`, `250ms`, `1m30s`,
//! `1.5s`). A bare `0` is accepted and means zero.

use std::time::Duration;

/// Parse a compact duration string such as `10s`, `500ms` or `1h2m3s`.
///
/// Supported units: `ns`, `us`, `ms`, `s`, `m`, `h`. Fractions are allowed
/// on every component. Negative values are rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.starts_with('-') {
        return Err(format!("negative duration: {input}"));
    }
    let s = s.strip_prefix('+').unwrap_or(s);

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration: {input}"))?;
        if number_end == 0 {
            return Err(format!("invalid duration: {input}"));
        }
        let value: f64 = rest[..number_end]
            .parse()
            .map_err(|_| format!("invalid number in duration: {input}"))?;
        rest = &rest[number_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_end] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            other => return Err(format!("unknown unit {other:?} in duration: {input}")),
        };
        total_nanos += value * scale;
        rest = &rest[unit_end..];
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(format!("duration out of range: {input}"));
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
