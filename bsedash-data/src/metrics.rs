use crate::error::MetricError;

/// `(current - base) / base * 100`. A zero base is rejected.
pub fn percent_change(base: f64, current: f64) -> Result<f64, MetricError> {
    if !base.is_finite() {
        return Err(MetricError::NonFinite(base));
    }
    if !current.is_finite() {
        return Err(MetricError::NonFinite(current));
    }
    if base == 0.0 {
        return Err(MetricError::ZeroBase);
    }
    Ok((current - base) / base * 100.0)
}

/// Live-quote variant: missing or zero previous close reads as no change.
pub fn percent_change_or_zero(previous_close: Option<f64>, current: f64) -> f64 {
    match previous_close {
        Some(prev) => percent_change(prev, current).unwrap_or(0.0),
        None => 0.0,
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_signed_percent(value: f64) -> String {
    format!("{:+.2}%", value)
}

pub fn format_price(value: f64) -> String {
    format!("₹ {:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_rise() {
        let change = percent_change(100.0, 110.0).unwrap();
        assert_eq!(format_percent(change), "10.00%");
        assert_eq!(format_signed_percent(change), "+10.00%");
    }

    #[test]
    fn fall_is_negative() {
        let change = percent_change(200.0, 150.0).unwrap();
        assert_eq!(change, -25.0);
        assert_eq!(format_signed_percent(change), "-25.00%");
    }

    #[test]
    fn zero_base_is_an_error() {
        assert_eq!(percent_change(0.0, 5.0), Err(MetricError::ZeroBase));
        assert!(matches!(
            percent_change(f64::NAN, 5.0),
            Err(MetricError::NonFinite(_))
        ));
    }

    #[test]
    fn live_change_defaults_to_zero() {
        assert_eq!(percent_change_or_zero(None, 123.0), 0.0);
        assert_eq!(percent_change_or_zero(Some(0.0), 123.0), 0.0);
        assert!((percent_change_or_zero(Some(100.0), 105.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn price_has_rupee_prefix() {
        assert_eq!(format_price(2950.456), "₹ 2950.46");
    }
}
