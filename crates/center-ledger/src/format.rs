//! Number formatting for labels and metric cards

/// Round to whole units (ties to even) and group thousands with commas:
/// `-1234.6` → `"-1,235"`, `1234.5` → `"1,234"`.
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round_ties_even();
    // Avoid "-0" for small negatives
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 { format!("-{}", grouped) } else { grouped }
}

/// Bar label in 만원: `"1,235만"`
pub fn format_manwon(value: f64) -> String {
    format!("{}만", format_thousands(value))
}

/// Annotation on the final cumulative point of a center chart: `"1,235만원"`
pub fn format_manwon_won(value: f64) -> String {
    format!("{}만원", format_thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(7.0), "7");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.0), "1,234,567");
        assert_eq!(format_thousands(-1234.6), "-1,235");
        assert_eq!(format_thousands(123.45), "123");
    }

    #[test]
    fn test_half_values_round_to_even() {
        assert_eq!(format_thousands(1234.5), "1,234");
        assert_eq!(format_thousands(1235.5), "1,236");
        assert_eq!(format_thousands(2.5), "2");
        assert_eq!(format_thousands(3.5), "4");
        assert_eq!(format_thousands(-2.5), "-2");
        assert_eq!(format_manwon(0.5), "0만");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(format_thousands(-0.4), "0");
        assert_eq!(format_thousands(-0.0), "0");
    }

    #[test]
    fn test_manwon_suffixes() {
        assert_eq!(format_manwon(5.0), "5만");
        assert_eq!(format_manwon(-12345.0), "-12,345만");
        assert_eq!(format_manwon_won(7.0), "7만원");
    }
}
