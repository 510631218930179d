use extstore_types::{Error, UnitCategory, UnitType, Xyz, convert, from_internal, to_internal};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

#[test]
fn meters_to_feet() {
    let ft = convert(1.0, UnitType::Meters, UnitType::Feet).unwrap();
    assert!((ft - 3.280_839_895).abs() < EPS);
}

#[test]
fn feet_to_inches() {
    let inches = convert(2.5, UnitType::Feet, UnitType::Inches).unwrap();
    assert!((inches - 30.0).abs() < EPS);
}

#[test]
fn millimeters_to_meters() {
    let m = convert(1250.0, UnitType::Millimeters, UnitType::Meters).unwrap();
    assert!((m - 1.25).abs() < EPS);
}

#[test]
fn degrees_to_radians() {
    let rad = convert(180.0, UnitType::Degrees, UnitType::Radians).unwrap();
    assert!((rad - std::f64::consts::PI).abs() < EPS);
}

#[test]
fn same_unit_is_identity() {
    assert_eq!(convert(12.5, UnitType::Meters, UnitType::Meters).unwrap(), 12.5);
}

#[test]
fn cross_category_conversion_fails() {
    let err = convert(1.0, UnitType::Meters, UnitType::Degrees).unwrap_err();
    match err {
        Error::IncompatibleUnits {
            from_category,
            to_category,
            ..
        } => {
            assert_eq!(from_category, UnitCategory::Length);
            assert_eq!(to_category, UnitCategory::Angle);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn internal_unit_of_length_is_feet() {
    assert_eq!(UnitCategory::Length.internal_unit(), UnitType::Feet);
    assert!((to_internal(0.3048, UnitType::Meters) - 1.0).abs() < EPS);
    assert!((from_internal(1.0, UnitType::Meters) - 0.3048).abs() < EPS);
}

#[test]
fn unit_parse_accepts_symbols_and_names() {
    assert_eq!("m".parse::<UnitType>().unwrap(), UnitType::Meters);
    assert_eq!("Metres".parse::<UnitType>().unwrap(), UnitType::Meters);
    assert_eq!("deg".parse::<UnitType>().unwrap(), UnitType::Degrees);
    assert!(matches!(
        "furlong".parse::<UnitType>(),
        Err(Error::UnknownUnit(_))
    ));
}

#[test]
fn unit_serde_uses_snake_case() {
    let json = serde_json::to_string(&UnitType::Millimeters).unwrap();
    assert_eq!(json, "\"millimeters\"");
}

#[test]
fn xyz_display_honours_precision() {
    let p = Xyz::new(1.0, 2.346, -3.0);
    assert_eq!(format!("{p:.2}"), "(1.00, 2.35, -3.00)");
}

#[test]
fn xyz_almost_equal() {
    let a = Xyz::new(1.0, 2.0, 3.0);
    let b = Xyz::new(1.0 + 1e-8, 2.0, 3.0 - 1e-8);
    assert!(a.is_almost_equal_to(&b, 1e-6));
    assert!(!a.is_almost_equal_to(&Xyz::ZERO, 1e-6));
}

fn length_unit() -> impl Strategy<Value = UnitType> {
    prop_oneof![
        Just(UnitType::Feet),
        Just(UnitType::Inches),
        Just(UnitType::Meters),
        Just(UnitType::Centimeters),
        Just(UnitType::Millimeters),
    ]
}

proptest! {
    #[test]
    fn internal_storage_preserves_length(value in -1.0e6f64..1.0e6, unit in length_unit()) {
        let back = from_internal(to_internal(value, unit), unit);
        prop_assert!((back - value).abs() <= 1e-6 * value.abs().max(1.0));
    }

    #[test]
    fn conversion_is_reversible(value in -1.0e6f64..1.0e6, a in length_unit(), b in length_unit()) {
        let there = convert(value, a, b).unwrap();
        let back = convert(there, b, a).unwrap();
        prop_assert!((back - value).abs() <= 1e-6 * value.abs().max(1.0));
    }
}
