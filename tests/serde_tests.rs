use atomint::{AtomicIntArray, AtomicUShort, AtomicUShortArray, WidthKind};

#[test]
fn cell_serializes_as_current_value() {
    let cell = AtomicUShort::new(7);
    cell.add_and_fetch(3);
    assert_eq!(serde_json::to_string(&cell).unwrap(), "10");

    let back: AtomicUShort = serde_json::from_str("65535").unwrap();
    assert_eq!(back.read(), 65_535);
}

#[test]
fn cell_deserialization_rejects_out_of_range() {
    assert!(serde_json::from_str::<AtomicUShort>("65536").is_err());
    assert!(serde_json::from_str::<AtomicUShort>("-1").is_err());
}

#[test]
fn array_serializes_as_snapshot() {
    let arr = AtomicIntArray::from_values([1, -2, 3]);
    arr.set(0, 10).unwrap();
    assert_eq!(serde_json::to_string(&arr).unwrap(), "[10,-2,3]");

    let back: AtomicIntArray = serde_json::from_str("[4,5]").unwrap();
    assert_eq!(back.snapshot(), vec![4, 5]);
    assert!(serde_json::from_str::<AtomicUShortArray>("[1,70000]").is_err());
}

#[test]
fn width_kind_uses_c_names() {
    assert_eq!(
        serde_json::to_string(&WidthKind::ULongLong).unwrap(),
        "\"unsigned long long\""
    );
    let kind: WidthKind = serde_json::from_str("\"unsigned int\"").unwrap();
    assert_eq!(kind, WidthKind::UInt);
    assert!(serde_json::from_str::<WidthKind>("\"float\"").is_err());
}
