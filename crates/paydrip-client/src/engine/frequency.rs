use crate::engine::ScheduleError;

/// Supported payout cadences.
///
/// `WeeklySpecific` carries an auxiliary weekday (0 = Sunday) supplied
/// alongside the frequency; `Custom` carries an explicit date list and has
/// no generated cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Frequency {
    Daily,
    Weekly,
    WeeklySpecific,
    Biweekly,
    Monthly,
    EndOfMonth,
    Quarterly,
    Biannual,
    Annually,
    Custom,
}

impl Frequency {
    pub const ALL: [Frequency; 10] = [
        Self::Daily,
        Self::Weekly,
        Self::WeeklySpecific,
        Self::Biweekly,
        Self::Monthly,
        Self::EndOfMonth,
        Self::Quarterly,
        Self::Biannual,
        Self::Annually,
        Self::Custom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::WeeklySpecific => "weekly_specific",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::EndOfMonth => "end_of_month",
            Self::Quarterly => "quarterly",
            Self::Biannual => "biannual",
            Self::Annually => "annually",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        for frequency in Self::ALL {
            if frequency.as_str() == value {
                return Ok(frequency);
            }
        }
        Err(ScheduleError::InvalidFrequencyConfig {
            reason: format!("unknown frequency `{value}`"),
        })
    }

    pub const fn requires_day_of_week(self) -> bool {
        matches!(self, Self::WeeklySpecific)
    }

    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Frequency;

    #[test]
    fn parse_round_trips_every_frequency() {
        for frequency in Frequency::ALL {
            let parsed = Frequency::parse(frequency.as_str());
            assert_eq!(parsed, Ok(frequency));
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let parsed = Frequency::parse("fortnightly");
        assert!(parsed.is_err());
    }

    #[test]
    fn only_weekly_specific_requires_a_weekday() {
        for frequency in Frequency::ALL {
            assert_eq!(
                frequency.requires_day_of_week(),
                frequency == Frequency::WeeklySpecific
            );
        }
    }
}
