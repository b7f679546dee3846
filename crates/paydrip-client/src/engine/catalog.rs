use chrono::NaiveDate;

use crate::engine::ScheduleError;
use crate::engine::frequency::Frequency;

/// One selectable plan duration for a frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationOption {
    pub installment_count: usize,
    pub label: String,
    pub description: String,
}

const DAILY_PRESETS: &[(usize, &str, &str)] = &[
    (7, "1 week", "One payout per day for a week"),
    (14, "2 weeks", "One payout per day for two weeks"),
    (30, "1 month", "One payout per day for a month"),
    (90, "3 months", "One payout per day for three months"),
];

const WEEKLY_PRESETS: &[(usize, &str, &str)] = &[
    (4, "1 month", "Four weekly payouts"),
    (12, "3 months", "Twelve weekly payouts"),
    (24, "6 months", "Twenty-four weekly payouts"),
    (52, "1 year", "A full year of weekly payouts"),
];

const BIWEEKLY_PRESETS: &[(usize, &str, &str)] = &[
    (2, "1 month", "Two payouts, two weeks apart"),
    (6, "3 months", "Six biweekly payouts"),
    (13, "6 months", "Thirteen biweekly payouts"),
    (26, "1 year", "A full year of biweekly payouts"),
];

const MONTHLY_PRESETS: &[(usize, &str, &str)] = &[
    (1, "1 month", "A single monthly payout"),
    (3, "3 months", "Three monthly payouts"),
    (6, "6 months", "Six monthly payouts"),
    (12, "1 year", "Twelve monthly payouts"),
];

const END_OF_MONTH_PRESETS: &[(usize, &str, &str)] = &[
    (3, "3 months", "Three payouts on month-end"),
    (6, "6 months", "Six payouts on month-end"),
    (12, "1 year", "Twelve payouts on month-end"),
];

const QUARTERLY_PRESETS: &[(usize, &str, &str)] = &[
    (2, "6 months", "Two quarterly payouts"),
    (4, "1 year", "Four quarterly payouts"),
    (8, "2 years", "Eight quarterly payouts"),
];

const BIANNUAL_PRESETS: &[(usize, &str, &str)] = &[
    (2, "1 year", "Two payouts, six months apart"),
    (4, "2 years", "Four payouts, six months apart"),
];

const ANNUAL_PRESETS: &[(usize, &str, &str)] = &[
    (1, "1 year", "A single annual payout"),
    (2, "2 years", "Two annual payouts"),
    (5, "5 years", "Five annual payouts"),
];

/// Valid duration presets for a frequency, in ascending installment order.
///
/// A custom schedule has exactly one valid duration: the number of supplied
/// dates (empty input yields no options; validation rejects it separately).
pub fn duration_options(frequency: Frequency, custom_date_count: usize) -> Vec<DurationOption> {
    if frequency.is_custom() {
        if custom_date_count == 0 {
            return Vec::new();
        }
        let noun = if custom_date_count == 1 { "date" } else { "dates" };
        return vec![DurationOption {
            installment_count: custom_date_count,
            label: format!("{custom_date_count} {noun}"),
            description: "One payout per supplied date".to_string(),
        }];
    }

    presets_for(frequency)
        .iter()
        .map(|(count, label, description)| DurationOption {
            installment_count: *count,
            label: (*label).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

/// Average installments per calendar month, used to convert a
/// calendar-duration label into an installment count. Custom schedules
/// have no cadence and return `None`.
pub fn installments_per_month(frequency: Frequency) -> Option<f64> {
    let per_month = match frequency {
        Frequency::Daily => 365.25 / 12.0,
        Frequency::Weekly | Frequency::WeeklySpecific => 52.0 / 12.0,
        Frequency::Biweekly => 26.0 / 12.0,
        Frequency::Monthly | Frequency::EndOfMonth => 1.0,
        Frequency::Quarterly => 1.0 / 3.0,
        Frequency::Biannual => 1.0 / 6.0,
        Frequency::Annually => 1.0 / 12.0,
        Frequency::Custom => return None,
    };
    Some(per_month)
}

/// Reject malformed frequency/auxiliary combinations before any amounts
/// are allocated or dates generated.
pub fn validate_config(
    frequency: Frequency,
    day_of_week: Option<u8>,
    custom_dates: &[NaiveDate],
) -> Result<(), ScheduleError> {
    if let Some(day) = day_of_week {
        if day > 6 {
            return Err(ScheduleError::InvalidFrequencyConfig {
                reason: format!("day_of_week must be 0-6 (Sunday-Saturday), got {day}"),
            });
        }
        if !frequency.requires_day_of_week() {
            return Err(ScheduleError::InvalidFrequencyConfig {
                reason: "day_of_week only applies to the weekly_specific frequency".to_string(),
            });
        }
    }
    if frequency.requires_day_of_week() && day_of_week.is_none() {
        return Err(ScheduleError::InvalidFrequencyConfig {
            reason: "weekly_specific requires a day_of_week".to_string(),
        });
    }

    if frequency.is_custom() {
        if custom_dates.is_empty() {
            return Err(ScheduleError::InvalidFrequencyConfig {
                reason: "custom frequency requires at least one date".to_string(),
            });
        }
    } else if !custom_dates.is_empty() {
        return Err(ScheduleError::InvalidFrequencyConfig {
            reason: "explicit dates only apply to the custom frequency".to_string(),
        });
    }

    Ok(())
}

fn presets_for(frequency: Frequency) -> &'static [(usize, &'static str, &'static str)] {
    match frequency {
        Frequency::Daily => DAILY_PRESETS,
        Frequency::Weekly | Frequency::WeeklySpecific => WEEKLY_PRESETS,
        Frequency::Biweekly => BIWEEKLY_PRESETS,
        Frequency::Monthly => MONTHLY_PRESETS,
        Frequency::EndOfMonth => END_OF_MONTH_PRESETS,
        Frequency::Quarterly => QUARTERLY_PRESETS,
        Frequency::Biannual => BIANNUAL_PRESETS,
        Frequency::Annually => ANNUAL_PRESETS,
        Frequency::Custom => &[],
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::engine::frequency::Frequency;

    use super::{duration_options, installments_per_month, validate_config};

    #[test]
    fn every_generated_frequency_offers_ascending_presets() {
        for frequency in Frequency::ALL {
            if frequency.is_custom() {
                continue;
            }
            let options = duration_options(frequency, 0);
            assert!(!options.is_empty(), "{frequency:?} has no presets");
            for pair in options.windows(2) {
                assert!(pair[0].installment_count < pair[1].installment_count);
            }
            for option in &options {
                assert!(option.installment_count >= 1);
            }
        }
    }

    #[test]
    fn custom_offers_exactly_the_supplied_date_count() {
        let options = duration_options(Frequency::Custom, 5);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].installment_count, 5);
        assert_eq!(options[0].label, "5 dates");

        assert!(duration_options(Frequency::Custom, 0).is_empty());
    }

    #[test]
    fn monthly_presets_match_the_product_catalog() {
        let counts: Vec<usize> = duration_options(Frequency::Monthly, 0)
            .iter()
            .map(|option| option.installment_count)
            .collect();
        assert_eq!(counts, vec![1, 3, 6, 12]);

        let weekly: Vec<usize> = duration_options(Frequency::Weekly, 0)
            .iter()
            .map(|option| option.installment_count)
            .collect();
        assert_eq!(weekly, vec![4, 12, 24, 52]);
    }

    #[test]
    fn per_month_rates_cover_every_cadence() {
        let weekly = installments_per_month(Frequency::Weekly);
        assert!(weekly.is_some());
        if let Some(rate) = weekly {
            assert!((rate - 4.333).abs() < 0.01);
        }
        assert_eq!(installments_per_month(Frequency::Monthly), Some(1.0));
        assert_eq!(installments_per_month(Frequency::Custom), None);
    }

    #[test]
    fn weekly_specific_requires_a_weekday() {
        let missing = validate_config(Frequency::WeeklySpecific, None, &[]);
        assert!(missing.is_err());

        let present = validate_config(Frequency::WeeklySpecific, Some(3), &[]);
        assert!(present.is_ok());
    }

    #[test]
    fn weekday_out_of_range_is_rejected() {
        let result = validate_config(Frequency::WeeklySpecific, Some(7), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn weekday_on_other_frequencies_is_rejected() {
        let result = validate_config(Frequency::Monthly, Some(3), &[]);
        assert!(result.is_err());
    }

    #[test]
    fn custom_requires_dates_and_others_reject_them() {
        assert!(validate_config(Frequency::Custom, None, &[]).is_err());

        let date = NaiveDate::from_ymd_opt(2026, 1, 15);
        assert!(date.is_some());
        if let Some(value) = date {
            assert!(validate_config(Frequency::Custom, None, &[value]).is_ok());
            assert!(validate_config(Frequency::Weekly, None, &[value]).is_err());
        }
    }
}
