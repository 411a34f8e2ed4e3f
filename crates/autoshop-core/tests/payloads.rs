use autoshop_core::{
    CarSearch, ColumnKind, Entity, Error, MechanicSearch, Op, Payload, SearchCriteria,
    ServiceRecordSearch, Value, check_payload,
};
use chrono::NaiveDate;
use serde_json::json;

#[test]
fn parses_assignments_by_column_kind() {
    let descriptor = Entity::ServiceRecord.descriptor();
    let payload = Payload::parse(
        descriptor,
        [
            "carid=7",
            "servicedate=2024-03-15",
            "servicetype=Oil change",
            "servicecost=89.90",
        ],
    )
    .expect("parse payload");

    assert_eq!(payload.get("carid"), Some(&Value::Int(7)));
    assert_eq!(
        payload.get("servicedate"),
        Some(&Value::Date(
            NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
        ))
    );
    assert_eq!(
        payload.get("servicetype"),
        Some(&Value::Text("Oil change".to_string()))
    );
    assert_eq!(payload.get("servicecost"), Some(&Value::Float(89.90)));
    assert_eq!(
        payload.columns().collect::<Vec<_>>(),
        vec!["carid", "servicedate", "servicetype", "servicecost"]
    );
}

#[test]
fn unparsable_integer_is_kept_as_text() {
    let payload =
        Payload::parse(Entity::Car.descriptor(), ["year=nineteen"]).expect("parse payload");
    assert_eq!(payload.get("year"), Some(&Value::Text("nineteen".to_string())));
}

#[test]
fn blank_and_null_inputs_become_null() {
    let payload = Payload::parse(Entity::Car.descriptor(), ["ownerid=", "vin=NULL"])
        .expect("parse payload");
    assert_eq!(payload.get("ownerid"), Some(&Value::Null));
    assert_eq!(payload.get("vin"), Some(&Value::Null));
}

#[test]
fn parse_rejects_unknown_column_and_missing_equals() {
    let unknown = Payload::parse(Entity::Owner.descriptor(), ["nickname=Bob"]);
    assert!(matches!(unknown, Err(Error::UnknownColumn { .. })));

    let malformed = Payload::parse(Entity::Owner.descriptor(), ["firstname"]);
    assert!(matches!(malformed, Err(Error::InvalidInput(_))));
}

#[test]
fn check_payload_rejects_key_duplicate_and_empty() {
    let descriptor = Entity::Car.descriptor();

    let with_key = Payload::new().with("carid", 1).with("make", "Volvo");
    assert!(matches!(
        check_payload(descriptor, &with_key),
        Err(Error::UnknownColumn { column, .. }) if column == "carid"
    ));

    let duplicate = Payload::new().with("make", "Volvo").with("make", "Saab");
    assert!(matches!(
        check_payload(descriptor, &duplicate),
        Err(Error::DuplicateColumn { .. })
    ));

    assert!(matches!(
        check_payload(descriptor, &Payload::new()),
        Err(Error::EmptyPayload(_))
    ));

    let valid = Payload::new().with("make", "Volvo").with("year", 2019);
    assert!(check_payload(descriptor, &valid).is_ok());
}

#[test]
fn value_matches_row_to_json_output() {
    assert!(Value::Int(2019).matches_json(&json!(2019)));
    assert!(Value::Float(150.5).matches_json(&json!(150.50)));
    assert!(Value::Text("Volvo".into()).matches_json(&json!("Volvo")));
    assert!(Value::Null.matches_json(&json!(null)));
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date");
    assert!(Value::Date(date).matches_json(&json!("2024-01-31")));
    assert!(!Value::Int(1).matches_json(&json!("1")));
}

#[test]
fn blank_search_has_no_active_criteria() {
    let criteria: SearchCriteria = CarSearch::default().into();
    assert!(criteria.is_blank());
    assert!(criteria.check(Entity::Car.descriptor()).is_ok());

    let blank_text: SearchCriteria = MechanicSearch {
        specialty: Some("   ".to_string()),
        name_pattern: None,
    }
    .into();
    assert!(blank_text.is_blank());
}

#[test]
fn search_keeps_only_filled_criteria_in_order() {
    let criteria: SearchCriteria = ServiceRecordSearch {
        date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
        date_to: None,
        servicetype: Some("Brakes".to_string()),
    }
    .into();

    let active: Vec<(&str, Op)> = criteria
        .active()
        .map(|criterion| (criterion.column.as_str(), criterion.op))
        .collect();
    assert_eq!(active, vec![("servicedate", Op::Gte), ("servicetype", Op::Eq)]);
}

#[test]
fn search_check_rejects_foreign_columns() {
    let criteria = SearchCriteria::new(Entity::Owner).with("make", Op::Eq, "Volvo");
    assert!(matches!(
        criteria.check(Entity::Owner.descriptor()),
        Err(Error::UnknownColumn { .. })
    ));
}

#[test]
fn column_kinds_follow_the_tables() {
    let car = Entity::Car.descriptor();
    assert_eq!(car.column("year").map(|c| c.kind), Some(ColumnKind::Integer));
    assert_eq!(
        Entity::ServiceMechanic
            .descriptor()
            .column("hoursworked")
            .map(|c| c.kind),
        Some(ColumnKind::Decimal)
    );
}
