use super::fields::{barangay_list, flexible_amount, flexible_string, flexible_timestamp};
use crate::reports::age::parse_birth_date;
use crate::reports::{
    ApplicationRecord, ApplicationStatus, BenefitRecord, BenefitScope, BenefitStatus,
    BenefitType, ComplaintRecord, ComplaintStatus, MemberRecord,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::warn;

/// Masterlist row as exported by the records system.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: Option<String>,
    #[serde(default, alias = "pwd_id", deserialize_with = "flexible_string")]
    pub pwd_id: Option<String>,
    #[serde(
        default,
        rename = "userID",
        alias = "userId",
        alias = "user_id",
        deserialize_with = "flexible_string"
    )]
    pub user_id: Option<String>,
    #[serde(default, alias = "first_name", deserialize_with = "flexible_string")]
    pub first_name: Option<String>,
    #[serde(default, alias = "middle_name", deserialize_with = "flexible_string")]
    pub middle_name: Option<String>,
    #[serde(default, alias = "last_name", deserialize_with = "flexible_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub suffix: Option<String>,
    #[serde(
        default,
        alias = "birth_date",
        alias = "birthdate",
        deserialize_with = "flexible_string"
    )]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub barangay: Option<String>,
    #[serde(default, alias = "disability_type", deserialize_with = "flexible_string")]
    pub disability_type: Option<String>,
    #[serde(default, alias = "created_at", deserialize_with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "card_id", deserialize_with = "flexible_string")]
    pub card_id: Option<String>,
    #[serde(default, alias = "card_issued_at", deserialize_with = "flexible_timestamp")]
    pub card_issued_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawApplication {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub barangay: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub status: Option<String>,
    #[serde(default, alias = "created_at", deserialize_with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "disability_type", deserialize_with = "flexible_string")]
    pub disability_type: Option<String>,
    #[serde(default, alias = "decided_at", deserialize_with = "flexible_timestamp")]
    pub decided_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBenefit {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "benefitType",
        alias = "benefit_type",
        deserialize_with = "flexible_string"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub barangay: Option<String>,
    #[serde(
        default,
        alias = "selected_barangays",
        deserialize_with = "barangay_list"
    )]
    pub selected_barangays: Vec<String>,
    #[serde(default, alias = "created_at", deserialize_with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "flexible_amount")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComplaint {
    #[serde(default, deserialize_with = "flexible_string")]
    pub id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "flexible_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub barangay: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub status: Option<String>,
    #[serde(default, alias = "created_at", deserialize_with = "flexible_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "resolved_at", deserialize_with = "flexible_timestamp")]
    pub resolved_at: Option<NaiveDateTime>,
}

pub fn normalize_member(raw: RawMember) -> MemberRecord {
    let id = raw.id.or(raw.pwd_id).or(raw.user_id).unwrap_or_default();
    let birth_date = raw
        .birth_date
        .as_deref()
        .and_then(|value| match parse_birth_date(value) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::debug!(member = %id, error = %err, "birth date dropped");
                None
            }
        });

    MemberRecord {
        first_name: raw.first_name.unwrap_or_default(),
        middle_name: raw.middle_name,
        last_name: raw.last_name.unwrap_or_default(),
        suffix: raw.suffix,
        birth_date,
        barangay: raw.barangay,
        disability_type: raw.disability_type,
        created_at: raw.created_at,
        card_id: raw.card_id,
        card_issued_at: raw.card_issued_at,
        id,
    }
}

pub fn normalize_application(raw: RawApplication) -> ApplicationRecord {
    let id = raw.id.unwrap_or_default();
    let status = status_or_initial(
        raw.status.as_deref(),
        ApplicationStatus::parse,
        ApplicationStatus::Submitted,
        "application",
        &id,
    );

    ApplicationRecord {
        barangay: raw.barangay,
        status,
        created_at: raw.created_at,
        disability_type: raw.disability_type,
        decided_at: raw.decided_at,
        id,
    }
}

pub fn normalize_benefit(raw: RawBenefit) -> BenefitRecord {
    let id = raw.id.unwrap_or_default();
    let status = status_or_initial(
        raw.status.as_deref(),
        BenefitStatus::parse,
        BenefitStatus::Pending,
        "benefit",
        &id,
    );
    let scope = match (raw.selected_barangays.len(), raw.barangay) {
        (0, Some(barangay)) => BenefitScope::Single(barangay),
        (0, None) => BenefitScope::Unassigned,
        _ => BenefitScope::Multiple(raw.selected_barangays),
    };

    BenefitRecord {
        kind: BenefitType::parse(raw.kind.as_deref().unwrap_or_default()),
        status,
        scope,
        created_at: raw.created_at,
        amount: raw.amount,
        id,
    }
}

pub fn normalize_complaint(raw: RawComplaint) -> ComplaintRecord {
    let id = raw.id.unwrap_or_default();
    let status = status_or_initial(
        raw.status.as_deref(),
        ComplaintStatus::parse,
        ComplaintStatus::Pending,
        "complaint",
        &id,
    );

    ComplaintRecord {
        category: raw.category.or(raw.kind),
        barangay: raw.barangay.or(raw.location),
        status,
        created_at: raw.created_at,
        resolved_at: raw.resolved_at,
        id,
    }
}

fn status_or_initial<S: Copy>(
    raw: Option<&str>,
    parse: fn(&str) -> Option<S>,
    initial: S,
    record: &str,
    id: &str,
) -> S {
    let Some(value) = raw else {
        return initial;
    };
    parse(value).unwrap_or_else(|| {
        warn!(record, id, status = value, "unrecognized status, using initial status");
        initial
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn member_accepts_camel_and_snake_case_with_id_aliases() {
        let camel: RawMember = serde_json::from_str(
            r#"{
                "userID": "U-17",
                "firstName": "Maria",
                "lastName": "Santos",
                "birthDate": "1988-11-02",
                "barangay": "Poblacion",
                "disabilityType": "Visual",
                "createdAt": "2025-02-01 09:00:00",
                "cardId": "PWD-2025-001"
            }"#,
        )
        .expect("camelCase row decodes");
        let snake: RawMember = serde_json::from_str(
            r#"{
                "pwd_id": "U-17",
                "first_name": "Maria",
                "last_name": "Santos",
                "birth_date": "11/02/1988",
                "barangay": "Poblacion",
                "disability_type": "Visual",
                "created_at": "2025-02-01T09:00:00",
                "card_id": "PWD-2025-001"
            }"#,
        )
        .expect("snake_case row decodes");

        let camel = normalize_member(camel);
        let snake = normalize_member(snake);
        assert_eq!(camel, snake);
        assert_eq!(camel.id, "U-17");
        assert_eq!(camel.birth_date, NaiveDate::from_ymd_opt(1988, 11, 2));
        assert!(camel.has_card());
    }

    #[test]
    fn unparseable_birth_date_becomes_absent() {
        let member = normalize_member(RawMember {
            birth_date: Some("unknown".to_string()),
            ..RawMember::default()
        });
        assert_eq!(member.birth_date, None);
    }

    #[test]
    fn unknown_status_falls_back_to_initial() {
        let application = normalize_application(RawApplication {
            status: Some("escalated".to_string()),
            ..RawApplication::default()
        });
        assert_eq!(application.status, ApplicationStatus::Submitted);

        let benefit = normalize_benefit(RawBenefit {
            status: Some("Released".to_string()),
            ..RawBenefit::default()
        });
        assert_eq!(benefit.status, BenefitStatus::Approved);
    }

    #[test]
    fn selected_barangays_win_over_single_barangay() {
        let multi = normalize_benefit(RawBenefit {
            kind: Some("Financial Assistance".to_string()),
            barangay: Some("Poblacion".to_string()),
            selected_barangays: vec!["Mabini".to_string(), "Quiling".to_string()],
            ..RawBenefit::default()
        });
        assert_eq!(
            multi.scope,
            BenefitScope::Multiple(vec!["Mabini".to_string(), "Quiling".to_string()])
        );
        assert_eq!(multi.kind, BenefitType::FinancialAssistance);

        let single = normalize_benefit(RawBenefit {
            barangay: Some("Poblacion".to_string()),
            ..RawBenefit::default()
        });
        assert_eq!(single.scope, BenefitScope::Single("Poblacion".to_string()));
        assert_eq!(
            normalize_benefit(RawBenefit::default()).scope,
            BenefitScope::Unassigned
        );
    }

    #[test]
    fn complaint_location_stands_in_for_barangay() {
        let raw: RawComplaint = serde_json::from_str(
            r#"{ "type": "Accessibility", "location": "Municipal Hall", "status": "resolved" }"#,
        )
        .expect("complaint decodes");
        let complaint = normalize_complaint(raw);
        assert_eq!(complaint.category.as_deref(), Some("Accessibility"));
        assert_eq!(complaint.barangay.as_deref(), Some("Municipal Hall"));
        assert_eq!(complaint.status, ComplaintStatus::Resolved);
    }
}
