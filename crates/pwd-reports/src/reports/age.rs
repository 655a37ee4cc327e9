use super::distribution::{fixed_order_counts, CategoryCount};
use super::domain::{MemberRecord, ReportError};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    Under18,
    From18To25,
    From26To35,
    From36To45,
    From46To55,
    From56To65,
    Over65,
}

impl AgeBracket {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Under18,
            Self::From18To25,
            Self::From26To35,
            Self::From36To45,
            Self::From46To55,
            Self::From56To65,
            Self::Over65,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under18 => "Under 18",
            Self::From18To25 => "18-25",
            Self::From26To35 => "26-35",
            Self::From36To45 => "36-45",
            Self::From46To55 => "46-55",
            Self::From56To65 => "56-65",
            Self::Over65 => "Over 65",
        }
    }

    pub const fn of(age: i32) -> Self {
        match age {
            i32::MIN..=17 => Self::Under18,
            18..=25 => Self::From18To25,
            26..=35 => Self::From26To35,
            36..=45 => Self::From36To45,
            46..=55 => Self::From46To55,
            56..=65 => Self::From56To65,
            _ => Self::Over65,
        }
    }
}

/// Completed years between `birth_date` and `today`.
///
/// The year difference drops by one while this year's birthday is still ahead;
/// a birthday falling on `today` counts as reached.
pub fn age_of(birth_date: Option<NaiveDate>, today: NaiveDate) -> Result<i32, ReportError> {
    let birth_date =
        birth_date.ok_or_else(|| ReportError::InvalidDate("birth date is missing".to_string()))?;

    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    Ok(years)
}

pub fn age_of_raw(raw: &str, today: NaiveDate) -> Result<i32, ReportError> {
    age_of(Some(parse_birth_date(raw)?), today)
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, and RFC 3339 timestamps.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, ReportError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReportError::InvalidDate("birth date is missing".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }

    Err(ReportError::InvalidDate(format!(
        "'{trimmed}' is not a recognized birth date"
    )))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeProfile {
    pub brackets: Vec<CategoryCount>,
    pub average_age: Option<f64>,
    pub excluded: usize,
}

/// Bracket counts in bracket order. Members without a usable birth date are
/// excluded and counted in `excluded`.
pub fn age_profile<'a, I>(members: I, today: NaiveDate) -> AgeProfile
where
    I: IntoIterator<Item = &'a MemberRecord>,
{
    let mut ages = Vec::new();
    let mut excluded = 0usize;

    for member in members {
        match age_of(member.birth_date, today) {
            Ok(age) => ages.push(age),
            Err(err) => {
                tracing::debug!(member = %member.id, error = %err, "excluded from age profile");
                excluded += 1;
            }
        }
    }

    let labels = AgeBracket::ordered().map(AgeBracket::label);
    let brackets = fixed_order_counts(
        &labels,
        ages.iter().map(|age| AgeBracket::of(*age).label()),
    );
    let average_age = if ages.is_empty() {
        None
    } else {
        Some(ages.iter().map(|age| f64::from(*age)).sum::<f64>() / ages.len() as f64)
    };

    AgeProfile {
        brackets,
        average_age,
        excluded,
    }
}
