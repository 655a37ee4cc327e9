use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Failures raised by the individual report engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("unrecognized range token '{0}' (expected all, week, month, quarter or year)")]
    InvalidRangeToken(String),
    #[error("unrecognized report kind '{0}'")]
    InvalidReportKind(String),
    #[error("unrecognized date field '{0}'")]
    InvalidDateField(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Named timestamp carried by one or more record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    CreatedAt,
    BirthDate,
    CardIssuedAt,
    DecidedAt,
    ResolvedAt,
}

impl DateField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::BirthDate => "birth_date",
            Self::CardIssuedAt => "card_issued_at",
            Self::DecidedAt => "decided_at",
            Self::ResolvedAt => "resolved_at",
        }
    }
}

impl FromStr for DateField {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "created_at" | "createdat" => Ok(Self::CreatedAt),
            "birth_date" | "birthdate" => Ok(Self::BirthDate),
            "card_issued_at" | "cardissuedat" => Ok(Self::CardIssuedAt),
            "decided_at" | "decidedat" => Ok(Self::DecidedAt),
            "resolved_at" | "resolvedat" => Ok(Self::ResolvedAt),
            _ => Err(ReportError::InvalidDateField(value.to_string())),
        }
    }
}

/// Records that expose one or more timestamps to the range filter and bucketer.
///
/// A record that does not carry the requested field returns `None` and is treated
/// the same as a record whose field is missing.
pub trait Timestamped {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime>;
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        (**self).timestamp(field)
    }
}

/// Approved and active PWD roster entry (masterlist).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub barangay: Option<String>,
    pub disability_type: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub card_id: Option<String>,
    pub card_issued_at: Option<NaiveDateTime>,
}

impl MemberRecord {
    pub fn has_card(&self) -> bool {
        self.card_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

impl Timestamped for MemberRecord {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::CreatedAt => self.created_at,
            DateField::BirthDate => self.birth_date.map(|date| date.and_time(NaiveTime::MIN)),
            // Sources that only store the card id are dated by registration.
            DateField::CardIssuedAt if self.has_card() => self.card_issued_at.or(self.created_at),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    PendingBarangay,
    PendingAdmin,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Submitted,
            Self::PendingBarangay,
            Self::PendingAdmin,
            Self::Approved,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::PendingBarangay => "Pending Barangay Approval",
            Self::PendingAdmin => "Pending Admin Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::Submitted | Self::PendingBarangay | Self::PendingAdmin
        )
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "submitted" | "new" => Some(Self::Submitted),
            "pending_barangay" | "pending_barangay_approval" => Some(Self::PendingBarangay),
            "pending_admin" | "pending_admin_approval" | "pending" => Some(Self::PendingAdmin),
            "approved" => Some(Self::Approved),
            "rejected" | "denied" | "declined" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Intake application, tracked from submission through the approval chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub barangay: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: Option<NaiveDateTime>,
    pub disability_type: Option<String>,
    pub decided_at: Option<NaiveDateTime>,
}

impl Timestamped for ApplicationRecord {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::CreatedAt => self.created_at,
            DateField::DecidedAt => self.decided_at,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitType {
    FinancialAssistance,
    BirthdayCashGift,
    Other(String),
}

impl BenefitType {
    pub fn label(&self) -> &str {
        match self {
            Self::FinancialAssistance => "Financial Assistance",
            Self::BirthdayCashGift => "Birthday Cash Gift",
            Self::Other(name) => name.trim(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "financial_assistance" => Self::FinancialAssistance,
            "birthday_cash_gift" | "birthday_gift" => Self::BirthdayCashGift,
            _ => Self::Other(value.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitStatus {
    Pending,
    Approved,
}

impl BenefitStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "pending" | "for_approval" => Some(Self::Pending),
            "approved" | "released" | "distributed" => Some(Self::Approved),
            _ => None,
        }
    }
}

/// Which barangays a benefit program reaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "barangays")]
pub enum BenefitScope {
    Single(String),
    Multiple(Vec<String>),
    Unassigned,
}

impl BenefitScope {
    pub fn barangays(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Multiple(names) => names,
            Self::Unassigned => &[],
        }
    }
}

/// Ayuda entry: a benefit program instance or a single release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenefitRecord {
    pub id: String,
    pub kind: BenefitType,
    pub status: BenefitStatus,
    pub scope: BenefitScope,
    pub created_at: Option<NaiveDateTime>,
    pub amount: Option<f64>,
}

impl Timestamped for BenefitRecord {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::CreatedAt => self.created_at,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    Resolved,
}

impl ComplaintStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Resolved => "Resolved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "pending" | "open" | "in_progress" | "under_review" => Some(Self::Pending),
            "resolved" | "closed" => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintRecord {
    pub id: String,
    pub category: Option<String>,
    /// Barangay the complaint concerns, or the free-text location when no barangay was given.
    pub barangay: Option<String>,
    pub status: ComplaintStatus,
    pub created_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
}

impl Timestamped for ComplaintRecord {
    fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::CreatedAt => self.created_at,
            DateField::ResolvedAt => self.resolved_at,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Registration,
    Cards,
    Benefits,
    Complaints,
    Performance,
    Annual,
}

impl ReportKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Registration,
            Self::Cards,
            Self::Benefits,
            Self::Complaints,
            Self::Performance,
            Self::Annual,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Registration => "Registration Report",
            Self::Cards => "Card Distribution Report",
            Self::Benefits => "Benefits Distribution Report",
            Self::Complaints => "Complaints Analysis Report",
            Self::Performance => "Barangay Performance Report",
            Self::Annual => "Annual Summary Report",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize_token(value).as_str() {
            "registration" => Ok(Self::Registration),
            "cards" | "card" | "card_distribution" => Ok(Self::Cards),
            "benefits" | "benefit" | "benefits_distribution" => Ok(Self::Benefits),
            "complaints" | "complaint" | "complaints_analysis" => Ok(Self::Complaints),
            "performance" | "barangay_performance" => Ok(Self::Performance),
            "annual" | "annual_summary" => Ok(Self::Annual),
            _ => Err(ReportError::InvalidReportKind(value.to_string())),
        }
    }
}

pub(crate) fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}
