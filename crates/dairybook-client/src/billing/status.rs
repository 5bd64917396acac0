use crate::billing::types::DayStatus;

/// A shift counts as delivered only when its quantity is strictly positive, so
/// zero, negative and NaN readings are all "missing".
pub fn is_present(quantity: f64) -> bool {
    quantity > 0.0
}

pub fn classify_day(morning_qty: f64, evening_qty: f64) -> DayStatus {
    match (is_present(morning_qty), is_present(evening_qty)) {
        (true, true) => DayStatus::BothPresent,
        (false, true) => DayStatus::MorningMissing,
        (true, false) => DayStatus::EveningMissing,
        (false, false) => DayStatus::BothMissing,
    }
}

#[cfg(test)]
mod tests {
    use super::classify_day;
    use crate::billing::types::DayStatus;

    #[test]
    fn every_pair_gets_exactly_one_label() {
        assert_eq!(classify_day(2.0, 1.0), DayStatus::BothPresent);
        assert_eq!(classify_day(0.0, 1.0), DayStatus::MorningMissing);
        assert_eq!(classify_day(1.0, 0.0), DayStatus::EveningMissing);
        assert_eq!(classify_day(0.0, 0.0), DayStatus::BothMissing);
    }

    #[test]
    fn negative_and_nan_are_missing() {
        assert_eq!(classify_day(-1.0, f64::NAN), DayStatus::BothMissing);
        assert_eq!(classify_day(f64::NAN, 0.25), DayStatus::MorningMissing);
        assert_eq!(classify_day(0.25, -0.5), DayStatus::EveningMissing);
    }
}
