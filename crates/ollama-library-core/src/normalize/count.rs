//! Pull/tag count normalization (`"1,234"`, `"2.5k"`, `"3M"`).

/// Parse a human-readable count into an integer.
///
/// Thousands separators are stripped and a trailing `k` or `m` scales the
/// (possibly fractional) prefix. Anything unparsable yields `0`.
pub fn parse_count(raw: &str) -> u64 {
    let cleaned = raw.trim().to_lowercase().replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0;
    }

    let (magnitude, multiplier) = if let Some(prefix) = cleaned.strip_suffix('m') {
        (prefix, 1_000_000.0)
    } else if let Some(prefix) = cleaned.strip_suffix('k') {
        (prefix, 1_000.0)
    } else {
        return cleaned.parse().unwrap_or(0);
    };

    match magnitude.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => (value * multiplier).round() as u64,
        _ => 0,
    }
}
