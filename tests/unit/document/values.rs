use super::*;
use crate::foundation::core::{Point, Size};

fn b(name: &str) -> FieldBinding {
    FieldBinding::new(name).unwrap()
}

#[test]
fn display_strings() {
    assert_eq!(display_string(None), "");
    assert_eq!(RuntimeValue::from(true).display_string(), "X");
    assert_eq!(RuntimeValue::from(false).display_string(), "");
    assert_eq!(RuntimeValue::from("  Ada  ").display_string(), "Ada");
    assert_eq!(RuntimeValue::from(42_i64).display_string(), "42");
    assert_eq!(RuntimeValue::from(2.5).display_string(), "2.5");

    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(RuntimeValue::from(d).display_string(), "01/05/2024");
    let dt = d.and_hms_opt(23, 59, 0).unwrap();
    assert_eq!(RuntimeValue::from(dt).to_string(), "01/05/2024");
}

#[test]
fn set_value_round_trips_and_none_removes() {
    let mut store = RuntimeValueStore::new();
    let name = b("name");
    store.set_value(&name, Some("Ada"));
    assert_eq!(store.value(&b(" name ")), Some(&RuntimeValue::Text("Ada".into())));

    store.set_value::<RuntimeValue>(&name, None);
    assert_eq!(store.value(&name), None);
    assert_eq!(store.value_count(), 0);
}

#[test]
fn empty_signatures_are_not_stored() {
    let mut store = RuntimeValueStore::new();
    let sig = b("sig");
    let canvas = Size::new(200.0, 80.0);

    store.set_signature(&sig, Some(SignatureSnapshot::new(&[vec![Point::new(1.0, 1.0)]], canvas)));
    assert!(store.signature(&sig).is_none());

    let ink = SignatureSnapshot::new(&[vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)]], canvas);
    store.set_signature(&sig, Some(ink.clone()));
    assert_eq!(store.signature(&sig), Some(&ink));
    assert_eq!(store.signature_count(), 1);

    store.set_signature(&sig, None);
    assert!(store.signature_arc(&sig).is_none());
}

#[test]
fn clear_removes_everything() {
    let mut store = RuntimeValueStore::new();
    store.set_value(&b("a"), Some(1_i64));
    store.set_signature(
        &b("s"),
        Some(SignatureSnapshot::new(
            &[vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]],
            Size::new(10.0, 10.0),
        )),
    );
    store.clear();
    assert_eq!(store.value_count(), 0);
    assert_eq!(store.signature_count(), 0);
}
