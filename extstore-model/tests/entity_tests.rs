use extstore_model::{Entity, FieldSpec, FieldType, FieldValue, ModelError, SchemaBuilder, SchemaDescriptor};
use extstore_types::{SchemaId, UnitCategory, UnitType, Xyz};
use pretty_assertions::assert_eq;

fn make_schema() -> SchemaDescriptor {
    SchemaBuilder::new(SchemaId::new())
        .schema_name("Splice")
        .vendor_id("Acme")
        .field(FieldSpec::xyz("Location").with_unit(UnitCategory::Length))
        .field(FieldSpec::double("WireLength").with_unit(UnitCategory::Length))
        .field(FieldSpec::string("Description"))
        .finish()
        .unwrap()
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn new_entity_is_bound_to_schema_and_empty() {
    let schema = make_schema();
    let e = Entity::new(&schema);
    assert_eq!(e.schema_id(), schema.id());
    assert_eq!(e.missing_fields(), vec!["Location", "WireLength", "Description"]);
}

#[test]
fn missing_fields_shrinks_as_fields_are_set() {
    let mut e = Entity::new(&make_schema());
    e.set("Description", "x".to_string()).unwrap();
    assert!(e.is_set("Description"));
    assert_eq!(e.missing_fields(), vec!["Location", "WireLength"]);
}

// ── Typed access ─────────────────────────────────────────────────

#[test]
fn string_field_roundtrip() {
    let mut e = Entity::new(&make_schema());
    e.set("Description", "Main splice".to_string()).unwrap();
    assert_eq!(e.get::<String>("Description").unwrap(), "Main splice");
}

#[test]
fn length_is_stored_in_feet() {
    let mut e = Entity::new(&make_schema());
    e.set_in("WireLength", 0.3048, UnitType::Meters).unwrap();
    match e.raw("WireLength") {
        Some(FieldValue::Double(v)) => assert!((v - 1.0).abs() < 1e-9),
        other => panic!("unexpected raw value: {other:?}"),
    }
}

#[test]
fn length_overflowing_storage_unit_is_rejected() {
    let mut e = Entity::new(&make_schema());
    let err = e.set_in("WireLength", 1.0e308, UnitType::Meters).unwrap_err();
    assert_eq!(err, ModelError::NonFinite("WireLength".into()));
    assert!(!e.is_set("WireLength"));
}

#[test]
fn point_with_overflowing_component_is_rejected() {
    let mut e = Entity::new(&make_schema());
    let err = e
        .set_in("Location", Xyz::new(1.0, -1.0e308, 3.0), UnitType::Meters)
        .unwrap_err();
    assert_eq!(err, ModelError::NonFinite("Location".into()));
}

#[test]
fn nan_is_rejected_even_without_conversion() {
    let mut e = Entity::new(&make_schema());
    let err = e.set_in("WireLength", f64::NAN, UnitType::Feet).unwrap_err();
    assert_eq!(err, ModelError::NonFinite("WireLength".into()));
}

#[test]
fn length_reads_back_in_any_length_unit() {
    let mut e = Entity::new(&make_schema());
    e.set_in("WireLength", 12.5, UnitType::Meters).unwrap();
    let m: f64 = e.get_in("WireLength", UnitType::Meters).unwrap();
    let mm: f64 = e.get_in("WireLength", UnitType::Millimeters).unwrap();
    assert!((m - 12.5).abs() < 1e-9);
    assert!((mm - 12_500.0).abs() < 1e-6);
}

#[test]
fn point_roundtrip_in_meters() {
    let mut e = Entity::new(&make_schema());
    e.set_in("Location", Xyz::new(1.0, 2.0, 3.0), UnitType::Meters)
        .unwrap();
    let p: Xyz = e.get_in("Location", UnitType::Meters).unwrap();
    assert!(p.is_almost_equal_to(&Xyz::new(1.0, 2.0, 3.0), 1e-9));
}

// ── Access errors ────────────────────────────────────────────────

#[test]
fn reading_point_as_string_is_type_mismatch() {
    let mut e = Entity::new(&make_schema());
    e.set_in("Location", Xyz::new(1.0, 2.0, 3.0), UnitType::Meters)
        .unwrap();
    let err = e.get::<String>("Location").unwrap_err();
    assert_eq!(
        err,
        ModelError::TypeMismatch {
            field: "Location".into(),
            expected: FieldType::Xyz,
            actual: FieldType::String,
        }
    );
}

#[test]
fn reading_string_as_point_is_type_mismatch() {
    let mut e = Entity::new(&make_schema());
    e.set("Description", "d".to_string()).unwrap();
    let err = e.get_in::<Xyz>("Description", UnitType::Meters).unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
}

#[test]
fn writing_wrong_type_is_rejected() {
    let mut e = Entity::new(&make_schema());
    let err = e.set_in("WireLength", Xyz::ZERO, UnitType::Meters).unwrap_err();
    assert!(matches!(err, ModelError::TypeMismatch { .. }));
    assert!(!e.is_set("WireLength"));
}

#[test]
fn unknown_field_is_rejected() {
    let mut e = Entity::new(&make_schema());
    let err = e.set("Color", "red".to_string()).unwrap_err();
    assert!(matches!(err, ModelError::UnknownField { ref field, .. } if field == "Color"));
    let err = e.get::<String>("Color").unwrap_err();
    assert!(matches!(err, ModelError::UnknownField { .. }));
}

#[test]
fn unset_field_is_distinct_error() {
    let e = Entity::new(&make_schema());
    let err = e.get::<String>("Description").unwrap_err();
    assert_eq!(err, ModelError::FieldNotSet("Description".into()));
}

#[test]
fn unit_tagged_field_requires_unit() {
    let mut e = Entity::new(&make_schema());
    let err = e.set("WireLength", 1.0).unwrap_err();
    assert_eq!(
        err,
        ModelError::UnitRequired {
            field: "WireLength".into(),
            category: UnitCategory::Length,
        }
    );
}

#[test]
fn unitless_field_rejects_unit() {
    let mut e = Entity::new(&make_schema());
    let err = e
        .set_in("Description", "d".to_string(), UnitType::Meters)
        .unwrap_err();
    assert!(matches!(err, ModelError::UnexpectedUnit { .. }));
}

#[test]
fn angle_unit_on_length_field_is_mismatch() {
    let mut e = Entity::new(&make_schema());
    let err = e.set_in("WireLength", 90.0, UnitType::Degrees).unwrap_err();
    assert_eq!(
        err,
        ModelError::UnitMismatch {
            field: "WireLength".into(),
            expected: UnitCategory::Length,
            actual: UnitType::Degrees,
        }
    );
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn entity_serde_roundtrip() {
    let mut e = Entity::new(&make_schema());
    e.set_in("Location", Xyz::new(1.0, 2.0, 3.0), UnitType::Meters)
        .unwrap();
    e.set("Description", "d".to_string()).unwrap();
    let json = serde_json::to_string(&e).unwrap();
    let back: Entity = serde_json::from_str(&json).unwrap();
    assert_eq!(e, back);
}

#[test]
fn field_value_is_tagged_in_json() {
    let json = serde_json::to_value(FieldValue::Double(2.0)).unwrap();
    assert_eq!(json, serde_json::json!({"type": "double", "value": 2.0}));
}
