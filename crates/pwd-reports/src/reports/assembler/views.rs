use super::super::distribution::CategoryCount;
use super::super::domain::ReportKind;
use super::super::performance::BarangayScore;
use super::super::range::{DateWindow, RangeToken};
use super::super::trend::TimeBucket;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One assembled report, ready for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResult {
    pub kind: ReportKind,
    pub title: &'static str,
    pub range: RangeToken,
    pub range_label: &'static str,
    pub generated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    pub body: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportBody {
    Registration(RegistrationReport),
    Cards(CardReport),
    Benefits(BenefitReport),
    Complaints(ComplaintReport),
    Performance(PerformanceReport),
    Annual(AnnualReport),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationSummary {
    pub total_members: usize,
    pub total_applications: usize,
    pub approved_applications: usize,
    pub rejected_applications: usize,
    pub pending_applications: usize,
    pub approval_rate: f64,
    /// `None` until decided applications carry a decision timestamp.
    pub average_processing_days: Option<f64>,
    pub average_age: Option<f64>,
    pub members_without_birth_date: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationReport {
    pub summary: RegistrationSummary,
    pub monthly_registrations: Vec<TimeBucket>,
    pub monthly_applications: Vec<TimeBucket>,
    pub by_barangay: Vec<CategoryCount>,
    pub by_disability_type: Vec<CategoryCount>,
    pub by_age_bracket: Vec<CategoryCount>,
    pub by_application_status: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardSummary {
    pub total_members: usize,
    pub cards_issued: usize,
    pub awaiting_card: usize,
    pub issuance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardReport {
    pub summary: CardSummary,
    pub monthly_issuance: Vec<TimeBucket>,
    pub by_barangay: Vec<CategoryCount>,
    pub by_card_status: Vec<CategoryCount>,
    pub by_disability_type: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitSummary {
    pub total_benefits: usize,
    pub approved_benefits: usize,
    pub pending_benefits: usize,
    pub approval_rate: f64,
    pub barangays_reached: usize,
    /// Mean over approved benefits that record an amount; `None` when none do.
    pub average_amount: Option<f64>,
    pub total_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitReport {
    pub summary: BenefitSummary,
    pub monthly_benefits: Vec<TimeBucket>,
    pub by_type: Vec<CategoryCount>,
    pub by_status: Vec<CategoryCount>,
    pub by_barangay: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintSummary {
    pub total_complaints: usize,
    pub resolved_complaints: usize,
    pub pending_complaints: usize,
    pub resolution_rate: f64,
    pub average_resolution_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintReport {
    pub summary: ComplaintSummary,
    pub monthly_complaints: Vec<TimeBucket>,
    pub by_category: Vec<CategoryCount>,
    pub by_status: Vec<CategoryCount>,
    pub by_barangay: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub barangays_ranked: usize,
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_barangay: Option<String>,
    pub inactive_barangays: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub summary: PerformanceSummary,
    pub ranking: Vec<BarangayScore>,
    pub top_barangays: Vec<BarangayScore>,
    pub monthly_registrations: Vec<TimeBucket>,
    pub registrations_by_barangay: Vec<CategoryCount>,
}

/// Yearly totals; also the shape callers use to supply the prior year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTotals {
    #[serde(default)]
    pub registrations: usize,
    #[serde(default)]
    pub applications: usize,
    #[serde(default, alias = "cardsIssued")]
    pub cards_issued: usize,
    #[serde(default, alias = "benefitsDistributed")]
    pub benefits_distributed: usize,
    #[serde(default)]
    pub complaints: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualSeries {
    pub registrations: Vec<TimeBucket>,
    pub applications: Vec<TimeBucket>,
    pub cards_issued: Vec<TimeBucket>,
    pub benefits_distributed: Vec<TimeBucket>,
    pub complaints: Vec<TimeBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterSummary {
    pub quarter: &'static str,
    pub registrations: usize,
    pub applications: usize,
    pub cards_issued: usize,
    pub benefits_distributed: usize,
    pub complaints: usize,
}

/// Percentage change per metric; `None` where the prior year recorded zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    pub registrations: Option<f64>,
    pub applications: Option<f64>,
    pub cards_issued: Option<f64>,
    pub benefits_distributed: Option<f64>,
    pub complaints: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualReport {
    pub year: i32,
    pub totals: AnnualTotals,
    pub monthly: AnnualSeries,
    pub quarters: Vec<QuarterSummary>,
    pub year_over_year: Option<YearOverYear>,
    /// Members registered during the year.
    pub registrations_by_barangay: Vec<CategoryCount>,
    pub registrations_by_disability_type: Vec<CategoryCount>,
    pub registrations_by_age_bracket: Vec<CategoryCount>,
    /// Benefits approved during the year, by program type.
    pub benefits_by_type: Vec<CategoryCount>,
    pub ranking: Vec<BarangayScore>,
}
