use super::domain::{
    ApplicationRecord, BenefitRecord, BenefitStatus, ComplaintRecord, MemberRecord,
};
use serde::Serialize;
use std::collections::HashMap;

/// Score weights in hundredths of a point. Scores are summed and compared in these
/// integer units so equal weighted sums always tie exactly.
pub const HUNDREDTHS_REGISTRATIONS: i64 = 30;
pub const HUNDREDTHS_CARDS_ISSUED: i64 = 25;
pub const HUNDREDTHS_BENEFITS_DISTRIBUTED: i64 = 25;
pub const HUNDREDTHS_APPLICATIONS_SUBMITTED: i64 = 15;
pub const HUNDREDTHS_COMPLAINTS_RECEIVED: i64 = -5;

pub const WEIGHT_REGISTRATIONS: f64 = HUNDREDTHS_REGISTRATIONS as f64 / 100.0;
pub const WEIGHT_CARDS_ISSUED: f64 = HUNDREDTHS_CARDS_ISSUED as f64 / 100.0;
pub const WEIGHT_BENEFITS_DISTRIBUTED: f64 = HUNDREDTHS_BENEFITS_DISTRIBUTED as f64 / 100.0;
pub const WEIGHT_APPLICATIONS_SUBMITTED: f64 = HUNDREDTHS_APPLICATIONS_SUBMITTED as f64 / 100.0;
pub const WEIGHT_COMPLAINTS_RECEIVED: f64 = HUNDREDTHS_COMPLAINTS_RECEIVED as f64 / 100.0;

/// Activity counts and weighted score for one barangay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarangayScore {
    pub barangay: String,
    pub registrations: usize,
    pub cards_issued: usize,
    pub benefits_distributed: usize,
    pub complaints_received: usize,
    pub applications_submitted: usize,
    pub performance_score: f64,
}

impl BarangayScore {
    pub fn empty(barangay: impl Into<String>) -> Self {
        Self {
            barangay: barangay.into(),
            registrations: 0,
            cards_issued: 0,
            benefits_distributed: 0,
            complaints_received: 0,
            applications_submitted: 0,
            performance_score: 0.0,
        }
    }

    fn rescored(mut self) -> Self {
        self.performance_score = score(&self);
        self
    }
}

/// Weighted activity score in hundredths of a point, clamped at zero.
pub fn score_hundredths(metrics: &BarangayScore) -> i64 {
    let weighted = |count: usize, weight: i64| {
        i64::try_from(count)
            .unwrap_or(i64::MAX)
            .saturating_mul(weight)
    };
    [
        weighted(metrics.registrations, HUNDREDTHS_REGISTRATIONS),
        weighted(metrics.cards_issued, HUNDREDTHS_CARDS_ISSUED),
        weighted(metrics.benefits_distributed, HUNDREDTHS_BENEFITS_DISTRIBUTED),
        weighted(metrics.applications_submitted, HUNDREDTHS_APPLICATIONS_SUBMITTED),
        weighted(metrics.complaints_received, HUNDREDTHS_COMPLAINTS_RECEIVED),
    ]
    .into_iter()
    .fold(0i64, i64::saturating_add)
    .max(0)
}

/// Weighted activity score, clamped at zero. Display value of [`score_hundredths`].
pub fn score(metrics: &BarangayScore) -> f64 {
    score_hundredths(metrics) as f64 / 100.0
}

/// Highest score first; equal scores fall back to barangay name, ascending.
///
/// Ordering uses the integer score recomputed from the counts, never the float.
pub fn rank(mut scores: Vec<BarangayScore>) -> Vec<BarangayScore> {
    scores.sort_by(|a, b| {
        score_hundredths(b)
            .cmp(&score_hundredths(a))
            .then_with(|| a.barangay.cmp(&b.barangay))
    });
    scores
}

pub fn top_n(scores: Vec<BarangayScore>, n: usize) -> Vec<BarangayScore> {
    let mut ranked = rank(scores);
    ranked.truncate(n);
    ranked
}

/// Externally maintained list of valid barangay names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BarangayRegistry {
    names: Vec<String>,
}

impl BarangayRegistry {
    /// Trims names and drops blanks and repeats, keeping first-seen order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !unique.iter().any(|existing| existing == name) {
                unique.push(name.to_string());
            }
        }
        Self { names: unique }
    }

    /// Parses a comma-separated list such as `PWD_BARANGAYS`.
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Collections feeding the per-barangay tally.
///
/// `members` drive registrations. `card_holders` drive cards issued; range reports
/// pass the same members, the annual report passes members whose card was issued
/// that year.
#[derive(Debug, Clone, Copy)]
pub struct ActivitySources<'a> {
    pub members: &'a [&'a MemberRecord],
    pub card_holders: &'a [&'a MemberRecord],
    pub applications: &'a [&'a ApplicationRecord],
    pub benefits: &'a [&'a BenefitRecord],
    pub complaints: &'a [&'a ComplaintRecord],
}

/// Per-barangay counts and scores, unranked.
///
/// Every registry barangay appears, with zeros when it had no activity. Barangays
/// found only in the records are appended after the registry in first-seen order.
/// Records without a barangay are not attributed anywhere. Benefits count once per
/// reached barangay and only once approved.
pub fn tally(sources: ActivitySources<'_>, registry: &BarangayRegistry) -> Vec<BarangayScore> {
    let mut board = Scoreboard::seeded(registry);
    let mut unattributed = 0usize;

    for member in sources.members {
        match board.slot(member.barangay.as_deref()) {
            Some(entry) => entry.registrations += 1,
            None => unattributed += 1,
        }
    }

    for member in sources.card_holders.iter().filter(|member| member.has_card()) {
        if let Some(entry) = board.slot(member.barangay.as_deref()) {
            entry.cards_issued += 1;
        }
    }

    for application in sources.applications {
        match board.slot(application.barangay.as_deref()) {
            Some(entry) => entry.applications_submitted += 1,
            None => unattributed += 1,
        }
    }

    for benefit in sources
        .benefits
        .iter()
        .filter(|benefit| benefit.status == BenefitStatus::Approved)
    {
        let reached = benefit.scope.barangays();
        if reached.is_empty() {
            unattributed += 1;
        }
        for barangay in reached {
            if let Some(entry) = board.slot(Some(barangay.as_str())) {
                entry.benefits_distributed += 1;
            }
        }
    }

    for complaint in sources.complaints {
        match board.slot(complaint.barangay.as_deref()) {
            Some(entry) => entry.complaints_received += 1,
            None => unattributed += 1,
        }
    }

    if unattributed > 0 {
        tracing::debug!(
            unattributed,
            "records without barangay left out of performance tally"
        );
    }

    board
        .entries
        .into_iter()
        .map(BarangayScore::rescored)
        .collect()
}

struct Scoreboard {
    index: HashMap<String, usize>,
    entries: Vec<BarangayScore>,
}

impl Scoreboard {
    fn seeded(registry: &BarangayRegistry) -> Self {
        let mut board = Self {
            index: HashMap::new(),
            entries: Vec::new(),
        };
        for name in registry.names() {
            board.slot(Some(name.as_str()));
        }
        board
    }

    fn slot(&mut self, barangay: Option<&str>) -> Option<&mut BarangayScore> {
        let name = barangay.map(str::trim).filter(|name| !name.is_empty())?;
        let position = match self.index.get(name) {
            Some(&position) => position,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(BarangayScore::empty(name));
                self.entries.len() - 1
            }
        };
        self.entries.get_mut(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::domain::{ApplicationStatus, BenefitScope, BenefitType, ComplaintStatus};

    fn metrics(
        barangay: &str,
        reg: usize,
        cards: usize,
        benefits: usize,
        apps: usize,
        complaints: usize,
    ) -> BarangayScore {
        BarangayScore {
            registrations: reg,
            cards_issued: cards,
            benefits_distributed: benefits,
            applications_submitted: apps,
            complaints_received: complaints,
            ..BarangayScore::empty(barangay)
        }
        .rescored()
    }

    #[test]
    fn weights_are_fixed_policy_values() {
        assert_eq!(WEIGHT_REGISTRATIONS, 0.30);
        assert_eq!(WEIGHT_CARDS_ISSUED, 0.25);
        assert_eq!(WEIGHT_BENEFITS_DISTRIBUTED, 0.25);
        assert_eq!(WEIGHT_APPLICATIONS_SUBMITTED, 0.15);
        assert_eq!(WEIGHT_COMPLAINTS_RECEIVED, -0.05);
        assert_eq!(
            [
                HUNDREDTHS_REGISTRATIONS,
                HUNDREDTHS_CARDS_ISSUED,
                HUNDREDTHS_BENEFITS_DISTRIBUTED,
                HUNDREDTHS_APPLICATIONS_SUBMITTED,
                HUNDREDTHS_COMPLAINTS_RECEIVED,
            ],
            [30, 25, 25, 15, -5]
        );
    }

    #[test]
    fn score_matches_weighted_sum() {
        let entry = metrics("San Isidro", 10, 8, 5, 6, 2);
        assert!(
            (entry.performance_score - 7.05).abs() < 1e-9,
            "{}",
            entry.performance_score
        );
    }

    #[test]
    fn complaint_heavy_barangays_clamp_to_zero() {
        let entry = metrics("Santo Niño", 0, 0, 0, 0, 40);
        assert_eq!(entry.performance_score, 0.0);
        assert_eq!(score(&BarangayScore::empty("Bagumbayan")), 0.0);
    }

    #[test]
    fn ties_rank_alphabetically_regardless_of_input_order() {
        let a = metrics("A", 10, 8, 5, 6, 2);
        let b = metrics("B", 10, 8, 5, 6, 2);
        let c = metrics("C", 20, 0, 0, 0, 0);

        let forward = rank(vec![b.clone(), a.clone(), c.clone()]);
        let backward = rank(vec![c, a, b]);

        let names: Vec<&str> = forward.iter().map(|entry| entry.barangay.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn different_activity_mixes_with_equal_sums_tie_exactly() {
        // 3 + 2 + 1.25 + 0.9 - 0.1 and 7.25 - 0.2 are both 7.05.
        let mixed = metrics("B", 10, 8, 5, 6, 2);
        let cards_only = metrics("A", 0, 29, 0, 0, 4);

        assert_eq!(score_hundredths(&mixed), 705);
        assert_eq!(score_hundredths(&cards_only), 705);
        assert_eq!(mixed.performance_score, cards_only.performance_score);
        assert_eq!(mixed.performance_score, 7.05);

        let forward = rank(vec![mixed.clone(), cards_only.clone()]);
        let backward = rank(vec![cards_only, mixed]);
        let names: Vec<&str> = forward.iter().map(|entry| entry.barangay.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn top_n_caps_at_input_length() {
        let scores = vec![metrics("A", 1, 0, 0, 0, 0), metrics("B", 3, 0, 0, 0, 0)];
        assert_eq!(top_n(scores.clone(), 1)[0].barangay, "B");
        assert_eq!(top_n(scores, 10).len(), 2);
    }

    #[test]
    fn registry_trims_and_deduplicates() {
        let registry = BarangayRegistry::from_list(" Poblacion, San Jose,,Poblacion ");
        assert_eq!(registry.names(), ["Poblacion", "San Jose"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tally_seeds_registry_and_attributes_activity() {
        let member = MemberRecord {
            id: "m1".to_string(),
            first_name: "Ana".to_string(),
            middle_name: None,
            last_name: "Reyes".to_string(),
            suffix: None,
            birth_date: None,
            barangay: Some("Poblacion".to_string()),
            disability_type: None,
            created_at: None,
            card_id: Some("PWD-0001".to_string()),
            card_issued_at: None,
        };
        let application = ApplicationRecord {
            id: "a1".to_string(),
            barangay: Some("Mabini".to_string()),
            status: ApplicationStatus::Submitted,
            created_at: None,
            disability_type: None,
            decided_at: None,
        };
        let shared = BenefitRecord {
            id: "b1".to_string(),
            kind: BenefitType::FinancialAssistance,
            status: BenefitStatus::Approved,
            scope: BenefitScope::Multiple(vec!["Poblacion".to_string(), "Mabini".to_string()]),
            created_at: None,
            amount: None,
        };
        let pending = BenefitRecord {
            id: "b2".to_string(),
            status: BenefitStatus::Pending,
            scope: BenefitScope::Single("Poblacion".to_string()),
            ..shared.clone()
        };
        let complaint = ComplaintRecord {
            id: "c1".to_string(),
            category: None,
            barangay: None,
            status: ComplaintStatus::Pending,
            created_at: None,
            resolved_at: None,
        };

        let registry = BarangayRegistry::new(["Poblacion", "Quiling"]);
        let result = tally(
            ActivitySources {
                members: &[&member],
                card_holders: &[&member],
                applications: &[&application],
                benefits: &[&shared, &pending],
                complaints: &[&complaint],
            },
            &registry,
        );

        let names: Vec<&str> = result.iter().map(|entry| entry.barangay.as_str()).collect();
        assert_eq!(names, ["Poblacion", "Quiling", "Mabini"]);
        assert_eq!(result[0].registrations, 1);
        assert_eq!(result[0].cards_issued, 1);
        assert_eq!(result[0].benefits_distributed, 1);
        assert_eq!(result[1], BarangayScore::empty("Quiling"));
        assert_eq!(result[2].applications_submitted, 1);
        assert_eq!(result[2].benefits_distributed, 1);
        assert!((result[0].performance_score - 0.80).abs() < 1e-9);
    }
}
