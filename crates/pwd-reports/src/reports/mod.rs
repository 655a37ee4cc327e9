pub mod age;
pub mod assembler;
pub mod distribution;
pub mod domain;
pub mod performance;
pub mod range;
pub mod trend;

pub use age::{age_of, age_of_raw, age_profile, AgeBracket, AgeProfile};
pub use assembler::{
    build_report, build_report_from_tokens, build_report_with, AnnualTotals, ReportBody,
    ReportInputs, ReportOptions, ReportResult,
};
pub use distribution::{distribution, percentage_of, shares, CategoryCount, CategoryShare};
pub use domain::{
    ApplicationRecord, ApplicationStatus, BenefitRecord, BenefitScope, BenefitStatus,
    BenefitType, ComplaintRecord, ComplaintStatus, DateField, MemberRecord, ReportError,
    ReportKind, Timestamped,
};
pub use performance::{
    rank, score, score_hundredths, tally, top_n, BarangayRegistry, BarangayScore,
};
pub use range::{filter_by_range, DateWindow, RangeToken};
pub use trend::{calendar_year_trend, monthly_trend, quarterly_sums, TimeBucket};
