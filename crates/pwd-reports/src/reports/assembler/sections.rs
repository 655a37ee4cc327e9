use super::super::age::age_profile;
use super::super::distribution::{
    distribution, distribution_of_labels, fixed_order_counts, percentage_of, NOT_SPECIFIED,
    UNKNOWN,
};
use super::super::domain::{
    ApplicationStatus, BenefitStatus, ComplaintStatus, DateField, MemberRecord,
};
use super::super::performance::{rank, tally, top_n, BarangayRegistry};
use super::super::trend::monthly_trend;
use super::views::{
    BenefitReport, BenefitSummary, CardReport, CardSummary, ComplaintReport, ComplaintSummary,
    PerformanceReport, PerformanceSummary, RegistrationReport, RegistrationSummary,
};
use super::{elapsed_days, mean, ReportOptions, Scoped};
use chrono::NaiveDateTime;
use std::collections::HashSet;

const CARD_ISSUED: &str = "Issued";
const CARD_AWAITING: &str = "Awaiting card";

pub(super) fn registration(
    scoped: &Scoped<'_>,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> RegistrationReport {
    let members = &scoped.members;
    let applications = &scoped.applications;

    let count_status = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|application| application.status == status)
            .count()
    };
    let approved = count_status(ApplicationStatus::Approved);
    let rejected = count_status(ApplicationStatus::Rejected);
    let pending = applications
        .iter()
        .filter(|application| application.status.is_pending())
        .count();

    let average_processing_days = mean(
        applications
            .iter()
            .filter(|application| {
                matches!(
                    application.status,
                    ApplicationStatus::Approved | ApplicationStatus::Rejected
                )
            })
            .filter_map(|application| {
                elapsed_days(application.created_at, application.decided_at)
            }),
    );

    let profile = age_profile(members.iter().copied(), now.date());
    let status_labels = ApplicationStatus::ordered().map(ApplicationStatus::label);

    RegistrationReport {
        summary: RegistrationSummary {
            total_members: members.len(),
            total_applications: applications.len(),
            approved_applications: approved,
            rejected_applications: rejected,
            pending_applications: pending,
            approval_rate: percentage_of(approved, applications.len()),
            average_processing_days,
            average_age: profile.average_age,
            members_without_birth_date: profile.excluded,
        },
        monthly_registrations: monthly_trend(
            members.iter().copied(),
            DateField::CreatedAt,
            options.trend_periods,
            now,
        ),
        monthly_applications: monthly_trend(
            applications.iter().copied(),
            DateField::CreatedAt,
            options.trend_periods,
            now,
        ),
        by_barangay: distribution(
            members.iter().copied(),
            |member| member.barangay.as_deref(),
            UNKNOWN,
        ),
        by_disability_type: distribution(
            members.iter().copied(),
            |member| member.disability_type.as_deref(),
            NOT_SPECIFIED,
        ),
        by_age_bracket: profile.brackets,
        by_application_status: fixed_order_counts(
            &status_labels,
            applications
                .iter()
                .map(|application| application.status.label()),
        ),
    }
}

pub(super) fn cards(
    scoped: &Scoped<'_>,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> CardReport {
    let members = &scoped.members;
    let carded: Vec<&MemberRecord> = members
        .iter()
        .copied()
        .filter(|member| member.has_card())
        .collect();
    let issued = carded.len();

    CardReport {
        summary: CardSummary {
            total_members: members.len(),
            cards_issued: issued,
            awaiting_card: members.len() - issued,
            issuance_rate: percentage_of(issued, members.len()),
        },
        monthly_issuance: monthly_trend(
            carded.iter().copied(),
            DateField::CardIssuedAt,
            options.trend_periods,
            now,
        ),
        by_barangay: distribution(
            carded.iter().copied(),
            |member| member.barangay.as_deref(),
            UNKNOWN,
        ),
        by_card_status: fixed_order_counts(
            &[CARD_ISSUED, CARD_AWAITING],
            members.iter().map(|member| {
                if member.has_card() {
                    CARD_ISSUED
                } else {
                    CARD_AWAITING
                }
            }),
        ),
        by_disability_type: distribution(
            carded.iter().copied(),
            |member| member.disability_type.as_deref(),
            NOT_SPECIFIED,
        ),
    }
}

pub(super) fn benefits(
    scoped: &Scoped<'_>,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> BenefitReport {
    let benefits = &scoped.benefits;
    let approved: Vec<_> = benefits
        .iter()
        .copied()
        .filter(|benefit| benefit.status == BenefitStatus::Approved)
        .collect();

    let reached: HashSet<&str> = approved
        .iter()
        .flat_map(|benefit| benefit.scope.barangays())
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    let amounts: Vec<f64> = approved.iter().filter_map(|benefit| benefit.amount).collect();
    let total_amount = (!amounts.is_empty()).then(|| amounts.iter().sum::<f64>());
    let status_labels = [BenefitStatus::Pending, BenefitStatus::Approved].map(BenefitStatus::label);

    BenefitReport {
        summary: BenefitSummary {
            total_benefits: benefits.len(),
            approved_benefits: approved.len(),
            pending_benefits: benefits.len() - approved.len(),
            approval_rate: percentage_of(approved.len(), benefits.len()),
            barangays_reached: reached.len(),
            average_amount: mean(amounts.iter().copied()),
            total_amount,
        },
        monthly_benefits: monthly_trend(
            benefits.iter().copied(),
            DateField::CreatedAt,
            options.trend_periods,
            now,
        ),
        by_type: distribution(
            benefits.iter().copied(),
            |benefit| Some(benefit.kind.label()),
            NOT_SPECIFIED,
        ),
        by_status: fixed_order_counts(
            &status_labels,
            benefits.iter().map(|benefit| benefit.status.label()),
        ),
        by_barangay: distribution_of_labels(
            benefits.iter().copied().flat_map(|benefit| {
                let reached = benefit.scope.barangays();
                if reached.is_empty() {
                    vec![None]
                } else {
                    reached.iter().map(|name| Some(name.trim())).collect()
                }
            }),
            UNKNOWN,
        ),
    }
}

pub(super) fn complaints(
    scoped: &Scoped<'_>,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> ComplaintReport {
    let complaints = &scoped.complaints;
    let resolved = complaints
        .iter()
        .filter(|complaint| complaint.status == ComplaintStatus::Resolved)
        .count();

    let average_resolution_days = mean(
        complaints
            .iter()
            .filter(|complaint| complaint.status == ComplaintStatus::Resolved)
            .filter_map(|complaint| elapsed_days(complaint.created_at, complaint.resolved_at)),
    );
    let status_labels =
        [ComplaintStatus::Pending, ComplaintStatus::Resolved].map(ComplaintStatus::label);

    ComplaintReport {
        summary: ComplaintSummary {
            total_complaints: complaints.len(),
            resolved_complaints: resolved,
            pending_complaints: complaints.len() - resolved,
            resolution_rate: percentage_of(resolved, complaints.len()),
            average_resolution_days,
        },
        monthly_complaints: monthly_trend(
            complaints.iter().copied(),
            DateField::CreatedAt,
            options.trend_periods,
            now,
        ),
        by_category: distribution(
            complaints.iter().copied(),
            |complaint| complaint.category.as_deref(),
            NOT_SPECIFIED,
        ),
        by_status: fixed_order_counts(
            &status_labels,
            complaints.iter().map(|complaint| complaint.status.label()),
        ),
        by_barangay: distribution(
            complaints.iter().copied(),
            |complaint| complaint.barangay.as_deref(),
            UNKNOWN,
        ),
    }
}

pub(super) fn performance(
    scoped: &Scoped<'_>,
    registry: &BarangayRegistry,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> PerformanceReport {
    let ranking = rank(tally(scoped.sources(), registry));
    let top_barangays = top_n(ranking.clone(), options.top_barangays);

    let inactive = ranking
        .iter()
        .filter(|entry| {
            entry.registrations
                + entry.cards_issued
                + entry.benefits_distributed
                + entry.applications_submitted
                + entry.complaints_received
                == 0
        })
        .count();

    PerformanceReport {
        summary: PerformanceSummary {
            barangays_ranked: ranking.len(),
            average_score: mean(ranking.iter().map(|entry| entry.performance_score))
                .unwrap_or(0.0),
            top_barangay: ranking.first().map(|entry| entry.barangay.clone()),
            inactive_barangays: inactive,
        },
        monthly_registrations: monthly_trend(
            scoped.members.iter().copied(),
            DateField::CreatedAt,
            options.trend_periods,
            now,
        ),
        registrations_by_barangay: distribution(
            scoped.members.iter().copied(),
            |member| member.barangay.as_deref(),
            UNKNOWN,
        ),
        ranking,
        top_barangays,
    }
}
