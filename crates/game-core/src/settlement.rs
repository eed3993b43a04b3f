use serde::Serialize;

/// The terminal result of a session: the only value handed to the ranking
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Settlement {
    pub final_value: u64,
    pub return_rate: f64,
}

impl Settlement {
    pub fn from_final_value(final_value: u64, starting_capital: u64) -> Self {
        let return_rate = if starting_capital == 0 {
            0.0
        } else {
            (final_value as f64 - starting_capital as f64) / starting_capital as f64 * 100.0
        };

        Self {
            final_value,
            return_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settlement;

    #[test]
    fn twenty_percent_gain_reports_twenty() {
        let settlement = Settlement::from_final_value(24_000_000, 20_000_000);

        assert_eq!(settlement.final_value, 24_000_000);
        assert_eq!(settlement.return_rate, 20.0);
    }

    #[test]
    fn losses_report_negative_rates() {
        let settlement = Settlement::from_final_value(8_000_000, 10_000_000);

        assert_eq!(settlement.return_rate, -20.0);
    }

    #[test]
    fn zero_starting_capital_reports_flat_rate() {
        let settlement = Settlement::from_final_value(1_000_000, 0);

        assert_eq!(settlement.return_rate, 0.0);
    }
}
