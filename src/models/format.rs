//! Human-readable byte sizes

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render a byte count with 1024-based units
///
/// Two decimal places at most, trailing zeros dropped: `1536` -> "1.5 KB",
/// `1073741824` -> "1 GB". Anything past TB stays in TB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    // floor(log1024(bytes)), in integers so exact powers of 1024 land on the unit
    let mut i = 0;
    while i < UNITS.len() - 1 && bytes >= 1u64 << (10 * (i + 1)) {
        i += 1;
    }

    let scaled = bytes as f64 / (1u64 << (10 * i)) as f64;
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(format_bytes(1), "1 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(1073741824), "1 GB");
        assert_eq!(format_bytes(1024u64.pow(4)), "1 TB");
    }

    #[test]
    fn test_two_decimal_rounding() {
        // 10 MiB + 1 KiB
        assert_eq!(format_bytes(10_486_784), "10 MB");
        // 1.2345 KB
        assert_eq!(format_bytes(1264), "1.23 KB");
        assert_eq!(format_bytes(4 * 1024u64.pow(3) + 512 * 1024u64.pow(2)), "4.5 GB");
    }

    #[test]
    fn test_clamps_past_terabytes() {
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048 TB");
    }
}
