//! Splitting cumulative minutes into whole hours/minutes/seconds.

/// A duration broken into display/storage components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl DurationParts {
    /// Total length in whole seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> i64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Splits a fractional-minute total into hours, minutes, and seconds.
///
/// `hours = floor(total / 60)`, `minutes = floor(total mod 60)`,
/// `seconds = round(fractional minute × 60)`. A rounded 60 seconds
/// carries into minutes, and a carried 60 minutes into hours. Negative
/// inputs are treated as zero.
#[expect(
    clippy::cast_possible_truncation,
    reason = "values are floored/rounded into range before the cast"
)]
#[must_use]
pub fn split_minutes(total_minutes: f64) -> DurationParts {
    if !total_minutes.is_finite() || total_minutes <= 0.0 {
        return DurationParts {
            hours: 0,
            minutes: 0,
            seconds: 0,
        };
    }

    let mut hours = (total_minutes / 60.0).floor() as i64;
    let mut minutes = (total_minutes % 60.0).floor() as i64;
    let mut seconds = (total_minutes.fract() * 60.0).round() as i64;

    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        hours += 1;
    }

    DurationParts {
        hours,
        minutes,
        seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(hours: i64, minutes: i64, seconds: i64) -> DurationParts {
        DurationParts {
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn ninety_seconds_is_one_minute_thirty() {
        assert_eq!(split_minutes(1.5), parts(0, 1, 30));
    }

    #[test]
    fn two_whole_minutes() {
        assert_eq!(split_minutes(2.0), parts(0, 2, 0));
    }

    #[test]
    fn hours_split_out() {
        assert_eq!(split_minutes(125.25), parts(2, 5, 15));
    }

    #[test]
    fn zero_is_zero() {
        assert_eq!(split_minutes(0.0), parts(0, 0, 0));
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(split_minutes(-3.0), parts(0, 0, 0));
    }

    #[test]
    fn rounding_to_sixty_seconds_carries() {
        // 59.995 s of fractional minute rounds to 60 and must carry.
        assert_eq!(split_minutes(0.999_95), parts(0, 1, 0));
    }

    #[test]
    fn carry_chains_into_hours() {
        assert_eq!(split_minutes(59.999_95), parts(1, 0, 0));
    }

    #[test]
    fn total_seconds_matches_components() {
        let p = split_minutes(125.25);
        assert_eq!(p.total_seconds(), 2 * 3600 + 5 * 60 + 15);
    }
}
