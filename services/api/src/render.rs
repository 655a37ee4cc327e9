use pwd_reports::reports::{
    shares, BarangayScore, CategoryCount, ReportBody, ReportResult, TimeBucket,
};

const TOP_CATEGORIES: usize = 5;

pub(crate) fn print_report(report: &ReportResult) {
    for line in report_lines(report) {
        println!("{line}");
    }
}

/// Plain-text summary of a report, one console line per entry.
pub(crate) fn report_lines(report: &ReportResult) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", report.title, report.range_label)];
    if let Some(window) = report.window {
        lines.push(format!(
            "Window: {} to {}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d %H:%M")
        ));
    }

    match &report.body {
        ReportBody::Registration(body) => {
            let summary = &body.summary;
            lines.push(format!(
                "- {} members registered | {} applications ({} approved, {} rejected, {} pending)",
                summary.total_members,
                summary.total_applications,
                summary.approved_applications,
                summary.rejected_applications,
                summary.pending_applications
            ));
            lines.push(format!(
                "- Approval rate {:.1}% | avg processing {} | avg age {}",
                summary.approval_rate,
                optional(summary.average_processing_days, " days"),
                optional(summary.average_age, " yrs")
            ));
            if summary.members_without_birth_date > 0 {
                lines.push(format!(
                    "- {} members left out of the age profile (no usable birth date)",
                    summary.members_without_birth_date
                ));
            }
            lines.push(trend_line("Registrations", &body.monthly_registrations));
            lines.push(trend_line("Applications", &body.monthly_applications));
            push_distribution(&mut lines, "By barangay", &body.by_barangay);
            push_distribution(&mut lines, "By disability type", &body.by_disability_type);
            push_distribution(&mut lines, "By age bracket", &body.by_age_bracket);
        }
        ReportBody::Cards(body) => {
            let summary = &body.summary;
            lines.push(format!(
                "- {} of {} members hold a PWD ID ({:.1}%) | {} awaiting a card",
                summary.cards_issued,
                summary.total_members,
                summary.issuance_rate,
                summary.awaiting_card
            ));
            lines.push(trend_line("Cards issued", &body.monthly_issuance));
            push_distribution(&mut lines, "Issued by barangay", &body.by_barangay);
        }
        ReportBody::Benefits(body) => {
            let summary = &body.summary;
            lines.push(format!(
                "- {} benefits | {} approved ({:.1}%) | {} pending | {} barangays reached",
                summary.total_benefits,
                summary.approved_benefits,
                summary.approval_rate,
                summary.pending_benefits,
                summary.barangays_reached
            ));
            lines.push(format!(
                "- Average released amount {}",
                optional(summary.average_amount, " PHP")
            ));
            lines.push(trend_line("Benefits", &body.monthly_benefits));
            push_distribution(&mut lines, "By type", &body.by_type);
            push_distribution(&mut lines, "By barangay", &body.by_barangay);
        }
        ReportBody::Complaints(body) => {
            let summary = &body.summary;
            lines.push(format!(
                "- {} complaints | {} resolved ({:.1}%) | {} pending | avg resolution {}",
                summary.total_complaints,
                summary.resolved_complaints,
                summary.resolution_rate,
                summary.pending_complaints,
                optional(summary.average_resolution_days, " days")
            ));
            lines.push(trend_line("Complaints", &body.monthly_complaints));
            push_distribution(&mut lines, "By category", &body.by_category);
            push_distribution(&mut lines, "By barangay", &body.by_barangay);
        }
        ReportBody::Performance(body) => {
            let summary = &body.summary;
            lines.push(format!(
                "- {} barangays ranked | average score {:.2} | {} without activity",
                summary.barangays_ranked, summary.average_score, summary.inactive_barangays
            ));
            lines.push("Top barangays:".to_string());
            push_ranking(&mut lines, &body.top_barangays);
        }
        ReportBody::Annual(body) => {
            let totals = &body.totals;
            lines.push(format!(
                "- {}: {} registrations | {} applications | {} cards | {} benefits | {} complaints",
                body.year,
                totals.registrations,
                totals.applications,
                totals.cards_issued,
                totals.benefits_distributed,
                totals.complaints
            ));
            for quarter in &body.quarters {
                lines.push(format!(
                    "  - {}: {} registrations | {} applications | {} cards | {} benefits | {} complaints",
                    quarter.quarter,
                    quarter.registrations,
                    quarter.applications,
                    quarter.cards_issued,
                    quarter.benefits_distributed,
                    quarter.complaints
                ));
            }
            match &body.year_over_year {
                Some(change) => lines.push(format!(
                    "- Year over year: registrations {} | applications {} | cards {} | benefits {} | complaints {}",
                    signed(change.registrations),
                    signed(change.applications),
                    signed(change.cards_issued),
                    signed(change.benefits_distributed),
                    signed(change.complaints)
                )),
                None => lines.push("- Year over year: no prior-year totals supplied".to_string()),
            }
            push_distribution(
                &mut lines,
                "Registered by barangay",
                &body.registrations_by_barangay,
            );
            push_distribution(
                &mut lines,
                "Registered by disability type",
                &body.registrations_by_disability_type,
            );
            push_distribution(&mut lines, "Approved benefits by type", &body.benefits_by_type);
            lines.push("Barangay ranking:".to_string());
            push_ranking(&mut lines, &body.ranking);
        }
    }

    lines
}

fn optional(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value:.1}{unit}"),
        None => "n/a".to_string(),
    }
}

fn signed(change: Option<f64>) -> String {
    match change {
        Some(value) => format!("{value:+.1}%"),
        None => "n/a".to_string(),
    }
}

fn trend_line(label: &str, buckets: &[TimeBucket]) -> String {
    let cells: Vec<String> = buckets
        .iter()
        .map(|bucket| format!("{} {}", bucket.period_label, bucket.count))
        .collect();
    format!("{label}: {}", cells.join(" | "))
}

fn push_distribution(lines: &mut Vec<String>, label: &str, counts: &[CategoryCount]) {
    lines.push(format!("{label}:"));
    if counts.is_empty() {
        lines.push("  - none".to_string());
        return;
    }
    for share in shares(counts).into_iter().take(TOP_CATEGORIES) {
        lines.push(format!(
            "  - {}: {} ({:.0}%)",
            share.category, share.count, share.percentage
        ));
    }
}

fn push_ranking(lines: &mut Vec<String>, scores: &[BarangayScore]) {
    for (position, entry) in scores.iter().enumerate() {
        lines.push(format!(
            "  {}. {} score {:.2} ({} reg, {} cards, {} benefits, {} apps, {} complaints)",
            position + 1,
            entry.barangay,
            entry.performance_score,
            entry.registrations,
            entry.cards_issued,
            entry.benefits_distributed,
            entry.applications_submitted,
            entry.complaints_received
        ));
    }
}
