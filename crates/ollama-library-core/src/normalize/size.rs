//! Size string normalization (`"4.7 GB"`, `"512MB"`, `"120B"`).

const KIB: f64 = 1024.0;

/// Parse a size string into a byte count using binary (1024) multiples.
///
/// The magnitude is every digit and dot in the input; the unit is looked up
/// case-insensitively. No unit means plain bytes. Unparsable input is `0`.
pub fn parse_size_bytes(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let magnitude: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = match magnitude.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return 0,
    };

    let upper = trimmed.to_uppercase();
    let scale = if upper.contains("KB") || upper.contains("KIB") {
        KIB
    } else if upper.contains("MB") || upper.contains("MIB") {
        KIB.powi(2)
    } else if upper.contains("GB") || upper.contains("GIB") {
        KIB.powi(3)
    } else if upper.contains("TB") || upper.contains("TIB") {
        KIB.powi(4)
    } else {
        1.0
    };

    (value * scale) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_units() {
        assert_eq!(parse_size_bytes("1.5 GB"), 1_610_612_736);
        assert_eq!(parse_size_bytes("512MB"), 536_870_912);
        assert_eq!(parse_size_bytes("2KiB"), 2048);
        assert_eq!(parse_size_bytes("1tb"), 1_099_511_627_776);
    }

    #[test]
    fn test_bare_bytes() {
        assert_eq!(parse_size_bytes("120B"), 120);
        assert_eq!(parse_size_bytes("77"), 77);
    }

    #[test]
    fn test_unparsable_sizes_are_zero() {
        assert_eq!(parse_size_bytes(""), 0);
        assert_eq!(parse_size_bytes("N/A"), 0);
        assert_eq!(parse_size_bytes("1.2.3 GB"), 0);
    }
}
