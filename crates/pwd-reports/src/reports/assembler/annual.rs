use super::super::age::age_profile;
use super::super::distribution::{distribution, NOT_SPECIFIED, UNKNOWN};
use super::super::domain::{BenefitStatus, DateField, Timestamped};
use super::super::performance::{rank, tally, ActivitySources};
use super::super::trend::{calendar_year_trend, quarterly_sums, TimeBucket};
use super::views::{AnnualReport, AnnualSeries, AnnualTotals, QuarterSummary, YearOverYear};
use super::ReportInputs;
use chrono::{Datelike, NaiveDateTime};

const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Calendar-year summary for the year containing `now`. The dashboard range token
/// does not apply here.
///
/// Registrations, applications, benefits and complaints are dated by creation. Cards
/// are dated by issue (registration when no issue date was recorded), in the totals
/// and in the ranking alike.
pub(super) fn annual(inputs: &ReportInputs, now: NaiveDateTime) -> AnnualReport {
    let year = now.year();

    let approved_benefits: Vec<_> = inputs
        .benefits
        .iter()
        .filter(|benefit| benefit.status == BenefitStatus::Approved)
        .collect();

    let monthly = AnnualSeries {
        registrations: calendar_year_trend(&inputs.members, DateField::CreatedAt, year),
        applications: calendar_year_trend(&inputs.applications, DateField::CreatedAt, year),
        cards_issued: calendar_year_trend(&inputs.members, DateField::CardIssuedAt, year),
        benefits_distributed: calendar_year_trend(
            approved_benefits.iter().copied(),
            DateField::CreatedAt,
            year,
        ),
        complaints: calendar_year_trend(&inputs.complaints, DateField::CreatedAt, year),
    };

    let totals = AnnualTotals {
        registrations: total(&monthly.registrations),
        applications: total(&monthly.applications),
        cards_issued: total(&monthly.cards_issued),
        benefits_distributed: total(&monthly.benefits_distributed),
        complaints: total(&monthly.complaints),
    };

    let registrations = quarterly_sums(&monthly.registrations);
    let applications = quarterly_sums(&monthly.applications);
    let cards_issued = quarterly_sums(&monthly.cards_issued);
    let benefits_distributed = quarterly_sums(&monthly.benefits_distributed);
    let complaints = quarterly_sums(&monthly.complaints);
    let quarters = QUARTER_LABELS
        .into_iter()
        .enumerate()
        .map(|(index, quarter)| QuarterSummary {
            quarter,
            registrations: registrations[index],
            applications: applications[index],
            cards_issued: cards_issued[index],
            benefits_distributed: benefits_distributed[index],
            complaints: complaints[index],
        })
        .collect();

    let year_over_year = inputs.prior_year.map(|prior| YearOverYear {
        registrations: change(totals.registrations, prior.registrations),
        applications: change(totals.applications, prior.applications),
        cards_issued: change(totals.cards_issued, prior.cards_issued),
        benefits_distributed: change(totals.benefits_distributed, prior.benefits_distributed),
        complaints: change(totals.complaints, prior.complaints),
    });

    let year_members = in_year(&inputs.members, DateField::CreatedAt, year);
    let year_card_holders = in_year(&inputs.members, DateField::CardIssuedAt, year);
    let year_applications = in_year(&inputs.applications, DateField::CreatedAt, year);
    let year_benefits = in_year(&inputs.benefits, DateField::CreatedAt, year);
    let year_complaints = in_year(&inputs.complaints, DateField::CreatedAt, year);
    let ranking = rank(tally(
        ActivitySources {
            members: &year_members,
            card_holders: &year_card_holders,
            applications: &year_applications,
            benefits: &year_benefits,
            complaints: &year_complaints,
        },
        &inputs.registry,
    ));

    let profile = age_profile(year_members.iter().copied(), now.date());
    let registrations_by_barangay = distribution(
        year_members.iter().copied(),
        |member| member.barangay.as_deref(),
        UNKNOWN,
    );
    let registrations_by_disability_type = distribution(
        year_members.iter().copied(),
        |member| member.disability_type.as_deref(),
        NOT_SPECIFIED,
    );
    let benefits_by_type = distribution(
        year_benefits
            .iter()
            .copied()
            .filter(|benefit| benefit.status == BenefitStatus::Approved),
        |benefit| Some(benefit.kind.label()),
        NOT_SPECIFIED,
    );

    tracing::info!(
        report = "annual",
        year,
        registrations = totals.registrations,
        applications = totals.applications,
        benefits = totals.benefits_distributed,
        complaints = totals.complaints,
        "assembling report"
    );

    AnnualReport {
        year,
        totals,
        monthly,
        quarters,
        year_over_year,
        registrations_by_barangay,
        registrations_by_disability_type,
        registrations_by_age_bracket: profile.brackets,
        benefits_by_type,
        ranking,
    }
}

fn total(buckets: &[TimeBucket]) -> usize {
    buckets.iter().map(|bucket| bucket.count).sum()
}

/// Percentage change from `prior` to `current`, undefined when `prior` is zero.
fn change(current: usize, prior: usize) -> Option<f64> {
    (prior > 0).then(|| (current as f64 - prior as f64) / prior as f64 * 100.0)
}

fn in_year<R: Timestamped>(records: &[R], field: DateField, year: i32) -> Vec<&R> {
    records
        .iter()
        .filter(|record| {
            record
                .timestamp(field)
                .is_some_and(|stamp| stamp.year() == year)
        })
        .collect()
}
