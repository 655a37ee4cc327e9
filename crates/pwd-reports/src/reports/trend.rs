use super::domain::{DateField, Timestamped};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Count of records falling in one calendar period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBucket {
    pub period_label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    fn label(self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Monthly counts for the `periods` calendar months ending with the month of `now`.
///
/// Buckets are ordered oldest first and zero-filled. Records without `field` are
/// left out of every bucket.
pub fn monthly_trend<I>(
    records: I,
    field: DateField,
    periods: usize,
    now: NaiveDateTime,
) -> Vec<TimeBucket>
where
    I: IntoIterator,
    I::Item: Timestamped,
{
    month_buckets(records, field, MonthKey::of(now.date()), periods)
}

/// January through December of `year`, one bucket per month.
pub fn calendar_year_trend<I>(records: I, field: DateField, year: i32) -> Vec<TimeBucket>
where
    I: IntoIterator,
    I::Item: Timestamped,
{
    month_buckets(records, field, MonthKey { year, month: 12 }, 12)
}

/// Folds a January-first run of monthly buckets into Q1..Q4 sums.
pub fn quarterly_sums(months: &[TimeBucket]) -> [usize; 4] {
    let mut quarters = [0usize; 4];
    for (index, bucket) in months.iter().take(12).enumerate() {
        quarters[index / 3] += bucket.count;
    }
    quarters
}

fn month_buckets<I>(
    records: I,
    field: DateField,
    last: MonthKey,
    periods: usize,
) -> Vec<TimeBucket>
where
    I: IntoIterator,
    I::Item: Timestamped,
{
    if periods == 0 {
        return Vec::new();
    }

    let first = last.ordinal() - (periods as i64 - 1);
    let mut counts = vec![0usize; periods];
    let mut undated = 0usize;

    for record in records {
        let Some(value) = record.timestamp(field) else {
            undated += 1;
            continue;
        };
        let offset = MonthKey::of(value.date()).ordinal() - first;
        if (0..periods as i64).contains(&offset) {
            counts[offset as usize] += 1;
        }
    }

    if undated > 0 {
        tracing::debug!(
            field = field.label(),
            undated,
            "records without timestamp left out of trend"
        );
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| TimeBucket {
            period_label: MonthKey::from_ordinal(first + index as i64).label(),
            count,
        })
        .collect()
}
