// Library module for testable functions

pub mod features;
pub mod predictor;

/// Format a dollar amount the way the prediction API reports it
/// e.g. 418000.0 → "$418,000.00"
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let dollars = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::new();
    let digits = dollars.as_bytes();
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_thousands() {
        assert_eq!(format_usd(418_000.0), "$418,000.00");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
    }

    #[test]
    fn test_format_usd_small_values() {
        assert_eq!(format_usd(950.5), "$950.50");
        assert_eq!(format_usd(0.0), "$0.00");
    }

    #[test]
    fn test_format_usd_negative() {
        assert_eq!(format_usd(-12_500.0), "-$12,500.00");
    }
}
