//! Departure times derived from a periodic schedule.
//!
//! A schedule is a daily anchor ("06:30") plus a repeat interval. All
//! arithmetic is done on local date-times rather than on a 24-hour clock,
//! so repetitions that run past midnight simply land on the next date.

use chrono::{Duration, NaiveDateTime};

use crate::domain::{DepartureAnchor, Schedule};

use super::error::ForecastError;

/// A validated schedule: anchor time of day and a positive interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headway {
    anchor: DepartureAnchor,
    frequency_min: i64,
    interval: Duration,
}

impl Headway {
    /// Validate a raw departure string and frequency.
    ///
    /// The frequency is checked first: a schedule with a non-positive
    /// frequency is rejected even if its departure also fails to parse.
    pub fn new(departure: &str, frequency_min: i64) -> Result<Self, ForecastError> {
        if frequency_min <= 0 {
            return Err(ForecastError::InvalidFrequency(frequency_min));
        }
        let interval = Duration::try_minutes(frequency_min)
            .ok_or(ForecastError::InvalidFrequency(frequency_min))?;

        let anchor = DepartureAnchor::parse_hhmm(departure).map_err(|source| {
            ForecastError::MalformedSchedule {
                departure: departure.to_string(),
                source,
            }
        })?;

        Ok(Self {
            anchor,
            frequency_min,
            interval,
        })
    }

    /// Validate a stored schedule.
    pub fn from_schedule(schedule: &Schedule) -> Result<Self, ForecastError> {
        Self::new(&schedule.departure, schedule.frequency_min)
    }

    pub fn anchor(&self) -> DepartureAnchor {
        self.anchor
    }

    pub fn frequency_min(&self) -> i64 {
        self.frequency_min
    }

    /// The anchor's occurrence on `now`'s calendar date.
    ///
    /// This may be earlier than `now`.
    pub fn first_bus_today(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.anchor.on(now.date())
    }

    /// The earliest repetition of the anchor that is at or after `now`.
    ///
    /// Counting starts from today's anchor occurrence. If `now` is before it,
    /// that occurrence is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::forecast::Headway;
    /// use chrono::NaiveDate;
    ///
    /// let headway = Headway::new("06:30", 30).unwrap();
    /// let now = NaiveDate::from_ymd_opt(2024, 3, 15)
    ///     .unwrap()
    ///     .and_hms_opt(6, 45, 0)
    ///     .unwrap();
    ///
    /// let next = headway.next_departure(now).unwrap();
    /// assert_eq!(next.format("%H:%M").to_string(), "07:00");
    /// ```
    pub fn next_departure(&self, now: NaiveDateTime) -> Result<NaiveDateTime, ForecastError> {
        let first = self.first_bus_today(now);
        if first >= now {
            return Ok(first);
        }

        // Jump over the whole intervals already elapsed, then step until we
        // reach `now`. The gap is under a day, so the jump is bounded by
        // 24h / frequency and the stepping by two iterations.
        let elapsed = now.signed_duration_since(first).num_seconds();
        let periods = elapsed / (self.frequency_min * 60);
        let mut next = self.nth_after(first, periods)?;
        while next < now {
            next = self.step(next)?;
        }
        Ok(next)
    }

    /// `count` departures spaced one interval apart, starting at today's
    /// first anchor occurrence.
    ///
    /// The window is not shifted to the next departure: when `now` is past
    /// the anchor, the leading entries are buses that have already left.
    pub fn forecast_departures(
        &self,
        now: NaiveDateTime,
        count: usize,
    ) -> Result<Vec<NaiveDateTime>, ForecastError> {
        let first = self.first_bus_today(now);
        let mut departures = Vec::with_capacity(count);
        let mut departure = first;
        for i in 0..count {
            if i > 0 {
                departure = self.step(departure)?;
            }
            departures.push(departure);
        }
        Ok(departures)
    }

    fn step(&self, from: NaiveDateTime) -> Result<NaiveDateTime, ForecastError> {
        from.checked_add_signed(self.interval)
            .ok_or(ForecastError::InvalidFrequency(self.frequency_min))
    }

    fn nth_after(&self, start: NaiveDateTime, n: i64) -> Result<NaiveDateTime, ForecastError> {
        let offset = self
            .frequency_min
            .checked_mul(n)
            .and_then(Duration::try_minutes)
            .ok_or(ForecastError::InvalidFrequency(self.frequency_min))?;
        start
            .checked_add_signed(offset)
            .ok_or(ForecastError::InvalidFrequency(self.frequency_min))
    }
}

/// The next scheduled departure at or after `now`.
pub fn next_departure(
    departure: &str,
    frequency_min: i64,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ForecastError> {
    Headway::new(departure, frequency_min)?.next_departure(now)
}

/// A window of `count` departures starting at today's first anchor occurrence.
pub fn forecast_departures(
    departure: &str,
    frequency_min: i64,
    now: NaiveDateTime,
    count: usize,
) -> Result<Vec<NaiveDateTime>, ForecastError> {
    Headway::new(departure, frequency_min)?.forecast_departures(now, count)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_anchor()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    prop_compose! {
        fn valid_now()(
            day in 1u32..29,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60
        ) -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 2, day)
                .unwrap()
                .and_hms_opt(hour, minute, second)
                .unwrap()
        }
    }

    proptest! {
        /// The next bus has not left yet and is less than one interval away
        #[test]
        fn next_is_soonest_not_departed(
            anchor in valid_anchor(),
            frequency in 1i64..=720,
            now in valid_now()
        ) {
            let headway = Headway::new(&anchor, frequency).unwrap();
            let next = headway.next_departure(now).unwrap();
            prop_assert!(next >= now);

            let first = headway.first_bus_today(now);
            if first < now {
                prop_assert!(next.signed_duration_since(now) < Duration::minutes(frequency));
            } else {
                prop_assert_eq!(next, first);
            }
        }

        /// The next bus is always an exact repetition of the anchor
        #[test]
        fn next_is_on_the_grid(
            anchor in valid_anchor(),
            frequency in 1i64..=720,
            now in valid_now()
        ) {
            let headway = Headway::new(&anchor, frequency).unwrap();
            let next = headway.next_departure(now).unwrap();
            let offset = next.signed_duration_since(headway.first_bus_today(now));
            prop_assert_eq!(offset.num_seconds() % (frequency * 60), 0);
        }

        /// Window entries are consecutive intervals from today's anchor
        #[test]
        fn window_evenly_spaced(
            anchor in valid_anchor(),
            frequency in 1i64..=720,
            now in valid_now(),
            count in 1usize..12
        ) {
            let headway = Headway::new(&anchor, frequency).unwrap();
            let window = headway.forecast_departures(now, count).unwrap();
            prop_assert_eq!(window.len(), count);
            prop_assert_eq!(window[0], headway.first_bus_today(now));
            for pair in window.windows(2) {
                prop_assert_eq!(pair[1].signed_duration_since(pair[0]), Duration::minutes(frequency));
            }
        }

        #[test]
        fn non_positive_frequency_rejected(
            anchor in valid_anchor(),
            frequency in -1000i64..=0,
            now in valid_now()
        ) {
            prop_assert_eq!(
                next_departure(&anchor, frequency, now),
                Err(ForecastError::InvalidFrequency(frequency))
            );
        }
    }
}
