/// Format a fraction as a percentage (0.0213 -> "2.13%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a count with thousands separators (20000 -> "20,000")
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a ratio to four decimals, spelling out the infinite cases
pub fn format_ratio(value: f64) -> String {
    if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.02), "2.00%");
        assert_eq!(format_percentage(-0.1234), "-12.34%");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(20_000), "20,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(1.23456), "1.2346");
        assert_eq!(format_ratio(f64::INFINITY), "inf");
        assert_eq!(format_ratio(f64::NEG_INFINITY), "-inf");
    }
}
