mod annual;
mod sections;
pub mod views;

use super::domain::{
    ApplicationRecord, BenefitRecord, ComplaintRecord, DateField, MemberRecord, ReportError,
    ReportKind,
};
use super::performance::{ActivitySources, BarangayRegistry};
use super::range::{filter_by_range, RangeToken};
use chrono::NaiveDateTime;

pub use views::{
    AnnualReport, AnnualSeries, AnnualTotals, BenefitReport, BenefitSummary, CardReport,
    CardSummary, ComplaintReport, ComplaintSummary, PerformanceReport, PerformanceSummary,
    QuarterSummary, RegistrationReport, RegistrationSummary, ReportBody, ReportResult,
    YearOverYear,
};

pub const DEFAULT_TREND_PERIODS: usize = 6;
pub const DEFAULT_TOP_BARANGAYS: usize = 5;

/// Normalized collections handed over by the data-access collaborator.
///
/// Missing collections are simply empty; every report then shows zeros.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub members: Vec<MemberRecord>,
    pub applications: Vec<ApplicationRecord>,
    pub benefits: Vec<BenefitRecord>,
    pub complaints: Vec<ComplaintRecord>,
    pub registry: BarangayRegistry,
    pub prior_year: Option<AnnualTotals>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Number of monthly buckets in rolling trends.
    pub trend_periods: usize,
    /// Length of the top-barangay slice in the performance report.
    pub top_barangays: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            trend_periods: DEFAULT_TREND_PERIODS,
            top_barangays: DEFAULT_TOP_BARANGAYS,
        }
    }
}

/// Builds one report with the default trend length and top-N size.
pub fn build_report(
    kind: ReportKind,
    inputs: &ReportInputs,
    range: RangeToken,
    now: NaiveDateTime,
) -> ReportResult {
    build_report_with(kind, inputs, range, now, &ReportOptions::default())
}

/// Builds one report. Pure: identical arguments always yield identical output.
pub fn build_report_with(
    kind: ReportKind,
    inputs: &ReportInputs,
    range: RangeToken,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> ReportResult {
    let scoped = || Scoped::within(kind, inputs, range, now);
    let body = match kind {
        ReportKind::Registration => {
            ReportBody::Registration(sections::registration(&scoped(), now, options))
        }
        ReportKind::Cards => ReportBody::Cards(sections::cards(&scoped(), now, options)),
        ReportKind::Benefits => ReportBody::Benefits(sections::benefits(&scoped(), now, options)),
        ReportKind::Complaints => {
            ReportBody::Complaints(sections::complaints(&scoped(), now, options))
        }
        ReportKind::Performance => ReportBody::Performance(sections::performance(
            &scoped(),
            &inputs.registry,
            now,
            options,
        )),
        ReportKind::Annual => ReportBody::Annual(annual::annual(inputs, now)),
    };
    let window = match kind {
        ReportKind::Annual => None,
        _ => range.window(now),
    };

    ReportResult {
        kind,
        title: kind.label(),
        range,
        range_label: range.label(),
        generated_at: now,
        window,
        body,
    }
}

/// Parses the kind and range tokens, then builds the report.
pub fn build_report_from_tokens(
    kind: &str,
    range: &str,
    inputs: &ReportInputs,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> Result<ReportResult, ReportError> {
    let kind: ReportKind = kind.parse()?;
    let range: RangeToken = range.parse()?;
    Ok(build_report_with(kind, inputs, range, now, options))
}

/// Range-filtered views over the inputs, keyed on each record's creation time.
struct Scoped<'a> {
    members: Vec<&'a MemberRecord>,
    applications: Vec<&'a ApplicationRecord>,
    benefits: Vec<&'a BenefitRecord>,
    complaints: Vec<&'a ComplaintRecord>,
}

impl<'a> Scoped<'a> {
    fn within(
        kind: ReportKind,
        inputs: &'a ReportInputs,
        range: RangeToken,
        now: NaiveDateTime,
    ) -> Self {
        let scoped = Self {
            members: filter_by_range(&inputs.members, range, DateField::CreatedAt, now),
            applications: filter_by_range(&inputs.applications, range, DateField::CreatedAt, now),
            benefits: filter_by_range(&inputs.benefits, range, DateField::CreatedAt, now),
            complaints: filter_by_range(&inputs.complaints, range, DateField::CreatedAt, now),
        };
        tracing::info!(
            report = kind.label(),
            range = range.label(),
            members = scoped.members.len(),
            applications = scoped.applications.len(),
            benefits = scoped.benefits.len(),
            complaints = scoped.complaints.len(),
            "assembling report"
        );
        scoped
    }

    fn sources(&self) -> ActivitySources<'_> {
        ActivitySources {
            members: &self.members,
            card_holders: &self.members,
            applications: &self.applications,
            benefits: &self.benefits,
            complaints: &self.complaints,
        }
    }
}

fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Fractional days from `start` to `end`; `None` if either is missing or the order is reversed.
fn elapsed_days(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<f64> {
    let elapsed = end? - start?;
    let seconds = elapsed.num_seconds();
    (seconds >= 0).then(|| seconds as f64 / 86_400.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn mean_of_nothing_is_unmeasured() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean([2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn elapsed_days_needs_both_ends_in_order() {
        assert_eq!(
            elapsed_days(Some(at(2025, 1, 1, 0)), Some(at(2025, 1, 3, 12))),
            Some(2.5)
        );
        assert_eq!(elapsed_days(None, Some(at(2025, 1, 3, 12))), None);
        assert_eq!(
            elapsed_days(Some(at(2025, 1, 3, 0)), Some(at(2025, 1, 1, 0))),
            None
        );
    }

    #[test]
    fn empty_inputs_build_every_kind() {
        let inputs = ReportInputs::default();
        let now = at(2025, 6, 15, 9);
        for kind in ReportKind::ordered() {
            let report = build_report(kind, &inputs, RangeToken::Month, now);
            assert_eq!(report.kind, kind);
            assert_eq!(report.title, kind.label());
            assert_eq!(report.generated_at, now);
        }
    }

    #[test]
    fn token_entry_point_rejects_unknown_tokens() {
        let inputs = ReportInputs::default();
        let now = at(2025, 6, 15, 9);
        let options = ReportOptions::default();

        assert_eq!(
            build_report_from_tokens("registration", "fortnight", &inputs, now, &options),
            Err(ReportError::InvalidRangeToken("fortnight".to_string()))
        );
        assert_eq!(
            build_report_from_tokens("payroll", "week", &inputs, now, &options),
            Err(ReportError::InvalidReportKind("payroll".to_string()))
        );
        assert!(build_report_from_tokens("Cards", "Quarter", &inputs, now, &options).is_ok());
    }
}
