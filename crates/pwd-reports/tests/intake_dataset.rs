use chrono::{NaiveDate, NaiveDateTime};
use pwd_reports::intake::{
    normalize_benefit, normalize_member, read_csv, RawBenefit, RawDataset, RawMember,
};
use pwd_reports::reports::{
    build_report, ApplicationStatus, BarangayRegistry, BenefitScope, BenefitStatus,
    ComplaintStatus, RangeToken, ReportBody, ReportKind,
};

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

#[test]
fn masterlist_csv_rows_normalize_into_members() {
    let csv = "\
id,firstName,lastName,birthDate,barangay,disabilityType,createdAt,cardId
101,Ana,Reyes,1988-07-21,Poblacion,Visual,2025-06-10 09:30:00,PWD-0101
102,Ben,Cruz,not a date,Mabini,,2025-05-02,
";
    let rows: Vec<RawMember> = read_csv(csv.as_bytes()).expect("masterlist parses");
    let members: Vec<_> = rows.into_iter().map(normalize_member).collect();

    assert_eq!(members.len(), 2);
    assert_eq!(members[0].id, "101");
    assert_eq!(members[0].birth_date, NaiveDate::from_ymd_opt(1988, 7, 21));
    assert_eq!(
        members[0].created_at,
        NaiveDate::from_ymd_opt(2025, 6, 10).and_then(|date| date.and_hms_opt(9, 30, 0))
    );
    assert!(members[0].has_card());

    assert_eq!(members[1].birth_date, None);
    assert_eq!(members[1].disability_type, None);
    assert_eq!(members[1].created_at, Some(at(2025, 5, 2, 0)));
    assert!(!members[1].has_card());
}

#[test]
fn benefit_csv_accepts_separated_barangays_and_formatted_amounts() {
    let csv = "\
id,type,status,barangay,selectedBarangays,createdAt,amount
b-1,financial assistance,Released,,Poblacion;Mabini,2025-06-02,\"2,500\"
b-2,Birthday Cash Gift,for approval,Quiling,,2025-06-03,500
b-3,Rice Subsidy,archived,,,2025-06-04,
";
    let rows: Vec<RawBenefit> = read_csv(csv.as_bytes()).expect("benefits parse");
    let benefits: Vec<_> = rows.into_iter().map(normalize_benefit).collect();

    assert_eq!(benefits[0].status, BenefitStatus::Approved);
    assert_eq!(
        benefits[0].scope,
        BenefitScope::Multiple(vec!["Poblacion".to_string(), "Mabini".to_string()])
    );
    assert_eq!(benefits[0].amount, Some(2500.0));
    assert_eq!(benefits[0].kind.label(), "Financial Assistance");

    assert_eq!(benefits[1].status, BenefitStatus::Pending);
    assert_eq!(benefits[1].scope, BenefitScope::Single("Quiling".to_string()));
    assert_eq!(benefits[1].amount, Some(500.0));

    assert_eq!(benefits[2].status, BenefitStatus::Pending, "unknown status falls back");
    assert_eq!(benefits[2].scope, BenefitScope::Unassigned);
    assert_eq!(benefits[2].amount, None);
}

#[test]
fn json_dataset_feeds_reports_end_to_end() {
    let json = r#"{
        "masterlist": [
            { "userID": 7, "firstName": "Lito", "barangay": "Poblacion",
              "createdAt": { "seconds": 1748736000, "nanoseconds": 0 }, "cardId": "PWD-7" },
            { "pwd_id": "PWD-8", "barangay": "San Jose", "created_at": "2025-06-05T10:00:00" }
        ],
        "applications": [
            { "id": "a-1", "barangay": "Poblacion", "status": "pending barangay approval",
              "createdAt": "2025-06-06" },
            { "id": "a-2", "barangay": "San Jose", "status": "approved",
              "createdAt": "2025-06-01", "decidedAt": "2025-06-03" }
        ],
        "ayuda": [
            { "id": "b-1", "benefitType": "Birthday Cash Gift", "status": "approved",
              "selectedBarangays": ["Poblacion", "San Jose"], "createdAt": "2025-06-07" }
        ],
        "complaints": [
            { "id": "c-1", "type": "Accessibility", "location": "Municipal Hall",
              "status": "closed", "createdAt": "2025-06-02", "resolvedAt": "2025-06-04" }
        ],
        "barangays": ["Poblacion", "San Jose", "Mabini"],
        "priorYear": { "registrations": 1, "cardsIssued": 2 }
    }"#;

    let dataset = RawDataset::from_json_reader(json.as_bytes()).expect("dataset decodes");
    let inputs = dataset.into_inputs(&BarangayRegistry::new(["Ignored"]));

    assert_eq!(inputs.registry.names(), ["Poblacion", "San Jose", "Mabini"]);
    assert_eq!(inputs.members[0].id, "7");
    assert_eq!(inputs.members[0].created_at, Some(at(2025, 6, 1, 0)));
    assert_eq!(inputs.members[1].id, "PWD-8");
    assert_eq!(inputs.applications[0].status, ApplicationStatus::PendingBarangay);
    assert_eq!(inputs.complaints[0].status, ComplaintStatus::Resolved);
    assert_eq!(inputs.complaints[0].category.as_deref(), Some("Accessibility"));
    assert_eq!(inputs.complaints[0].barangay.as_deref(), Some("Municipal Hall"));
    let prior = inputs.prior_year.expect("prior totals decoded");
    assert_eq!(prior.registrations, 1);
    assert_eq!(prior.cards_issued, 2);
    assert_eq!(prior.complaints, 0);

    let now = at(2025, 6, 15, 12);
    let report = build_report(ReportKind::Performance, &inputs, RangeToken::Month, now);
    let ReportBody::Performance(body) = report.body else {
        panic!("expected a performance report");
    };
    let names: Vec<&str> = body
        .ranking
        .iter()
        .map(|entry| entry.barangay.as_str())
        .collect();
    assert_eq!(names, ["Poblacion", "San Jose", "Mabini", "Municipal Hall"]);
    assert!((body.ranking[0].performance_score - 0.95).abs() < 1e-9);
    assert_eq!(body.summary.inactive_barangays, 1);
}

#[test]
fn missing_dataset_sections_leave_empty_inputs() {
    let dataset = RawDataset::from_json_reader(r#"{ "members": [] }"#.as_bytes())
        .expect("sparse dataset decodes");
    let fallback = BarangayRegistry::from_list("Poblacion, Mabini");
    let inputs = dataset.into_inputs(&fallback);

    assert!(inputs.members.is_empty());
    assert!(inputs.complaints.is_empty());
    assert_eq!(inputs.registry, fallback);
    assert_eq!(inputs.prior_year, None);
}
