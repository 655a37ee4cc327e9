use crate::render::print_report;
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use clap::Args;
use pwd_reports::config::AppConfig;
use pwd_reports::error::AppError;
use pwd_reports::intake::{CsvSources, RawDataset};
use pwd_reports::reports::{
    build_report_with, AnnualTotals, ApplicationRecord, ApplicationStatus, BarangayRegistry,
    BenefitRecord, BenefitScope, BenefitStatus, BenefitType, ComplaintRecord, ComplaintStatus,
    MemberRecord, RangeToken, ReportInputs, ReportKind, ReportResult,
};
use pwd_reports::telemetry;
use std::path::PathBuf;

const DEMO_BARANGAYS: [&str; 8] = [
    "Poblacion",
    "San Isidro",
    "Mabini",
    "Quiling",
    "Bagumbayan",
    "San Jose",
    "Santo Niño",
    "Malanday",
];

const DEMO_DISABILITIES: [&str; 6] = [
    "Visual",
    "Hearing",
    "Orthopedic",
    "Psychosocial",
    "Intellectual",
    "Speech and Language",
];

const DEMO_COMPLAINT_CATEGORIES: [&str; 4] = [
    "Accessibility",
    "Benefit delay",
    "Discrimination",
    "ID services",
];

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Report kind: registration, cards, benefits, complaints, performance or annual
    #[arg(value_parser = crate::infra::parse_kind)]
    pub(crate) kind: ReportKind,
    /// Dashboard range: all, week, month, quarter or year
    #[arg(long, default_value = "all", value_parser = crate::infra::parse_range)]
    pub(crate) range: RangeToken,
    /// Reference instant for the range window and trends (defaults to now)
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<NaiveDateTime>,
    /// JSON dataset bundling every source
    #[arg(
        long,
        conflicts_with_all = ["members", "applications", "benefits", "complaints"]
    )]
    pub(crate) dataset: Option<PathBuf>,
    /// Masterlist CSV export
    #[arg(long)]
    pub(crate) members: Option<PathBuf>,
    /// Applications CSV export
    #[arg(long)]
    pub(crate) applications: Option<PathBuf>,
    /// Benefits (ayuda) CSV export
    #[arg(long)]
    pub(crate) benefits: Option<PathBuf>,
    /// Complaints CSV export
    #[arg(long)]
    pub(crate) complaints: Option<PathBuf>,
    /// Print the full report as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference instant for the synthetic data (defaults to now)
    #[arg(long, value_parser = crate::infra::parse_instant)]
    pub(crate) now: Option<NaiveDateTime>,
    /// Dashboard range applied to every report except the annual summary
    #[arg(long, default_value = "all", value_parser = crate::infra::parse_range)]
    pub(crate) range: RangeToken,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        kind,
        range,
        now,
        dataset,
        members,
        applications,
        benefits,
        complaints,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let raw = match dataset {
        Some(path) => RawDataset::from_json_path(path)?,
        None => CsvSources {
            members: members.as_deref(),
            applications: applications.as_deref(),
            benefits: benefits.as_deref(),
            complaints: complaints.as_deref(),
        }
        .load()?,
    };

    let inputs = raw.into_inputs(&config.reporting.registry);
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let report = build_report_with(kind, &inputs, range, now, &config.reporting.options());

    if json {
        print_json(&report);
    } else {
        print_report(&report);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { now, range } = args;
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let inputs = synthetic_inputs(now);
    let options = config.reporting.options();

    println!(
        "PWD reporting demo: {} members, {} applications, {} benefits, {} complaints across {} barangays",
        inputs.members.len(),
        inputs.applications.len(),
        inputs.benefits.len(),
        inputs.complaints.len(),
        inputs.registry.len()
    );

    for kind in ReportKind::ordered() {
        println!();
        let report = build_report_with(kind, &inputs, range, now, &options);
        print_report(&report);
    }

    Ok(())
}

fn print_json(report: &ReportResult) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Report payload unavailable: {}", err),
    }
}

fn days_before(now: NaiveDateTime, days: usize) -> NaiveDateTime {
    now.checked_sub_signed(Duration::days(days as i64))
        .unwrap_or(now)
}

fn days_after(start: NaiveDateTime, days: usize, now: NaiveDateTime) -> NaiveDateTime {
    start
        .checked_add_signed(Duration::days(days as i64))
        .unwrap_or(start)
        .min(now)
}

/// Deterministic municipality used by the demo: same `now`, same records.
pub(crate) fn synthetic_inputs(now: NaiveDateTime) -> ReportInputs {
    let barangay = |seed: usize| DEMO_BARANGAYS[seed % DEMO_BARANGAYS.len()].to_string();

    let members = (0..160usize)
        .map(|i| {
            let created_at = days_before(now, (i * 41 + 13) % 600);
            let birth_date = (i % 17 != 0)
                .then(|| {
                    NaiveDate::from_ymd_opt(
                        now.year() - (8 + (i * 13) % 70) as i32,
                        1 + (i % 12) as u32,
                        1 + ((i * 7) % 28) as u32,
                    )
                })
                .flatten();
            let card_id = (i % 4 != 0).then(|| format!("PWD-{:05}", i + 1));
            let card_issued_at = card_id
                .as_ref()
                .map(|_| days_after(created_at, 5 + i % 30, now));

            MemberRecord {
                id: format!("member-{:04}", i + 1),
                first_name: format!("Resident {}", i + 1),
                middle_name: None,
                last_name: "Demo".to_string(),
                suffix: None,
                birth_date,
                barangay: (i % 23 != 0).then(|| barangay(i * 5 + i / 7)),
                disability_type: (i % 11 != 0)
                    .then(|| DEMO_DISABILITIES[(i * 3) % DEMO_DISABILITIES.len()].to_string()),
                created_at: Some(created_at),
                card_id,
                card_issued_at,
            }
        })
        .collect();

    let applications = (0..90usize)
        .map(|i| {
            let status = match i % 10 {
                0..=5 => ApplicationStatus::Approved,
                6 => ApplicationStatus::Rejected,
                7 => ApplicationStatus::Submitted,
                8 => ApplicationStatus::PendingBarangay,
                _ => ApplicationStatus::PendingAdmin,
            };
            let created_at = days_before(now, (i * 23 + 5) % 420);
            let decided_at = matches!(
                status,
                ApplicationStatus::Approved | ApplicationStatus::Rejected
            )
            .then(|| days_after(created_at, 3 + i % 12, now));

            ApplicationRecord {
                id: format!("app-{:04}", i + 1),
                barangay: Some(barangay(i * 3 + 1)),
                status,
                created_at: Some(created_at),
                disability_type: Some(DEMO_DISABILITIES[i % DEMO_DISABILITIES.len()].to_string()),
                decided_at,
            }
        })
        .collect();

    let benefits = (0..24usize)
        .map(|i| {
            let (kind, scope, amount) = match i % 3 {
                0 => (
                    BenefitType::FinancialAssistance,
                    BenefitScope::Multiple(vec![barangay(i), barangay(i + 1), barangay(i + 2)]),
                    Some(1000.0 * (1 + i % 5) as f64),
                ),
                1 => (
                    BenefitType::BirthdayCashGift,
                    BenefitScope::Single(barangay(i * 3)),
                    Some(500.0),
                ),
                _ => (
                    BenefitType::Other("Rice Subsidy".to_string()),
                    if i % 7 == 0 {
                        BenefitScope::Unassigned
                    } else {
                        BenefitScope::Single(barangay(i))
                    },
                    None,
                ),
            };

            BenefitRecord {
                id: format!("benefit-{:03}", i + 1),
                kind,
                status: if i % 5 == 0 {
                    BenefitStatus::Pending
                } else {
                    BenefitStatus::Approved
                },
                scope,
                created_at: Some(days_before(now, (i * 29) % 380)),
                amount,
            }
        })
        .collect();

    let complaints = (0..30usize)
        .map(|i| {
            let created_at = days_before(now, (i * 17 + 2) % 300);
            let resolved = i % 3 != 0;
            ComplaintRecord {
                id: format!("complaint-{:03}", i + 1),
                category: Some(
                    DEMO_COMPLAINT_CATEGORIES[i % DEMO_COMPLAINT_CATEGORIES.len()].to_string(),
                ),
                barangay: if i % 10 == 9 {
                    Some("Municipal Hall".to_string())
                } else {
                    Some(barangay(i * 7))
                },
                status: if resolved {
                    ComplaintStatus::Resolved
                } else {
                    ComplaintStatus::Pending
                },
                created_at: Some(created_at),
                resolved_at: resolved.then(|| days_after(created_at, 1 + i % 9, now)),
            }
        })
        .collect();

    ReportInputs {
        members,
        applications,
        benefits,
        complaints,
        registry: BarangayRegistry::new(DEMO_BARANGAYS),
        prior_year: Some(AnnualTotals {
            registrations: 70,
            applications: 55,
            cards_issued: 48,
            benefits_distributed: 12,
            complaints: 0,
        }),
    }
}
