use super::domain::{normalize_token, DateField, ReportError, Timestamped};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reporting window selected on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeToken {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl RangeToken {
    pub const fn ordered() -> [Self; 5] {
        [Self::All, Self::Week, Self::Month, Self::Quarter, Self::Year]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Week => "Last 7 Days",
            Self::Month => "Last Month",
            Self::Quarter => "Last Quarter",
            Self::Year => "Last Year",
        }
    }

    /// Inclusive window ending at `now`, or `None` for [`RangeToken::All`].
    ///
    /// The start is midnight of `now`'s day moved back by the range length. Month
    /// arithmetic is calendar-aware and clamps to the end of shorter months
    /// (March 31 minus one month is the last day of February).
    pub fn window(self, now: NaiveDateTime) -> Option<DateWindow> {
        let today = now.date();
        let start_day = match self {
            Self::All => return None,
            Self::Week => today.checked_sub_signed(Duration::days(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::Quarter => today.checked_sub_months(Months::new(3)),
            Self::Year => today.checked_sub_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MIN);

        Some(DateWindow {
            start: start_day.and_time(NaiveTime::MIN),
            end: now,
        })
    }
}

impl FromStr for RangeToken {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "all" => Ok(Self::All),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(ReportError::InvalidRangeToken(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn contains(&self, value: NaiveDateTime) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Narrows `records` to those whose `field` falls inside the window of `range`.
///
/// `RangeToken::All` keeps every record, including undated ones. For every other
/// token a record without the field never matches.
pub fn filter_by_range<'a, R>(
    records: &'a [R],
    range: RangeToken,
    field: DateField,
    now: NaiveDateTime,
) -> Vec<&'a R>
where
    R: Timestamped,
{
    let Some(window) = range.window(now) else {
        return records.iter().collect();
    };

    let kept: Vec<&R> = records
        .iter()
        .filter(|record| {
            record
                .timestamp(field)
                .map(|value| window.contains(value))
                .unwrap_or(false)
        })
        .collect();

    tracing::debug!(
        range = range.label(),
        field = field.label(),
        kept = kept.len(),
        dropped = records.len() - kept.len(),
        "applied date range filter"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stamp(Option<NaiveDateTime>);

    impl Timestamped for Stamp {
        fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
            match field {
                DateField::CreatedAt => self.0,
                _ => None,
            }
        }
    }

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn sample() -> Vec<Stamp> {
        vec![
            Stamp(Some(at(2025, 3, 30, 8))),
            Stamp(Some(at(2025, 3, 20, 8))),
            Stamp(Some(at(2025, 2, 28, 0))),
            Stamp(Some(at(2025, 1, 5, 12))),
            Stamp(Some(at(2024, 4, 1, 12))),
            Stamp(Some(at(2023, 12, 31, 12))),
            Stamp(Some(at(2025, 4, 2, 9))),
            Stamp(None),
        ]
    }

    #[test]
    fn all_returns_every_record_including_undated() {
        let records = sample();
        let now = at(2025, 3, 31, 15);
        assert_eq!(
            filter_by_range(&records, RangeToken::All, DateField::CreatedAt, now).len(),
            records.len()
        );
    }

    #[test]
    fn month_window_clamps_to_end_of_february() {
        let now = at(2025, 3, 31, 15);
        let window = RangeToken::Month.window(now).expect("bounded window");
        assert_eq!(window.start, at(2025, 2, 28, 0));
        assert_eq!(window.end, now);

        let records = sample();
        let kept = filter_by_range(&records, RangeToken::Month, DateField::CreatedAt, now);
        assert_eq!(kept.len(), 3, "boundary start is inclusive, future excluded");
    }

    #[test]
    fn week_window_starts_at_midnight_seven_days_back() {
        let now = at(2025, 3, 31, 15);
        let window = RangeToken::Week.window(now).expect("bounded window");
        assert_eq!(window.start, at(2025, 3, 24, 0));
    }

    #[test]
    fn records_without_the_field_never_match() {
        let records = sample();
        let now = at(2025, 3, 31, 15);
        let kept = filter_by_range(&records, RangeToken::Year, DateField::CreatedAt, now);
        assert!(kept.iter().all(|record| record.0.is_some()));

        let by_other_field =
            filter_by_range(&records, RangeToken::Year, DateField::ResolvedAt, now);
        assert!(by_other_field.is_empty());
    }

    #[test]
    fn longer_windows_never_keep_fewer_records() {
        let records = sample();
        let now = at(2025, 3, 31, 15);
        let sizes: Vec<usize> = [
            RangeToken::Week,
            RangeToken::Month,
            RangeToken::Quarter,
            RangeToken::Year,
        ]
        .into_iter()
        .map(|range| filter_by_range(&records, range, DateField::CreatedAt, now).len())
        .collect();

        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]), "{sizes:?}");
        assert_eq!(sizes, vec![1, 3, 4, 5]);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!("Quarter".parse::<RangeToken>(), Ok(RangeToken::Quarter));
        assert_eq!(
            "fortnight".parse::<RangeToken>(),
            Err(ReportError::InvalidRangeToken("fortnight".to_string()))
        );
    }
}
