//! Constraints and notifications seen through the kind-erased interface

use crate::test_utils::{count_changes, AllKinds, Quality};
use std::sync::atomic::Ordering;
use xreal_options::options::{wire, FloatOption, GameOption, OptionKind, OptionValue};
use xreal_options::registry::OptionRegistry;
use xreal_options::OptionsError;

#[test]
fn int_clamping_through_every_path() {
    let schema = AllKinds::new();
    let changes = count_changes(&*schema.count);

    schema.count.set_value(999);
    assert_eq!(schema.count.value(), 10);
    schema.count.set_value(-5);
    assert_eq!(schema.count.value(), 0);
    schema.count.set_value(-5);
    assert_eq!(changes.load(Ordering::SeqCst), 2);

    schema
        .registry
        .set_from_value("Count", OptionValue::Int(50))
        .unwrap();
    assert_eq!(schema.count.value(), 10);

    let mut payload = Vec::new();
    wire::write_i32(&mut payload, -40).unwrap();
    schema.count.decode(&mut payload.as_slice()).unwrap();
    assert_eq!(schema.count.value(), 0);
}

#[test]
fn dynamic_writes_check_the_kind() {
    let schema = AllKinds::new();
    let err = schema
        .registry
        .set_from_value("Flag", OptionValue::String("on".into()))
        .unwrap_err();
    assert!(matches!(
        err,
        OptionsError::KindMismatch {
            expected: "BoolOption",
            found: "StringOption",
            ..
        }
    ));

    assert!(schema.registry.set_from_text("Flag", "on").unwrap());
    assert!(schema.flag.value());
    assert!(schema.registry.set_from_text("Quality", "low").unwrap());
    assert_eq!(schema.quality.value(), Quality::Low);
    assert!(schema.registry.set_from_text("Tint", "1, 0, 0, 1").is_ok());
}

#[test]
fn reset_all_notifies_only_changed_options() {
    let schema = AllKinds::new();
    let flag_changes = count_changes(&*schema.flag);
    let ratio_changes = count_changes(&*schema.ratio);

    schema.flag.set_value(true);
    schema.registry.reset_all();

    assert!(schema.all_default());
    assert_eq!(flag_changes.load(Ordering::SeqCst), 2);
    assert_eq!(ratio_changes.load(Ordering::SeqCst), 0);
}

#[test]
fn kinds_report_stable_tags() {
    let schema = AllKinds::new();
    let kinds: Vec<_> = schema.registry.iter().map(|o| o.kind()).collect();
    assert_eq!(kinds, OptionKind::ALL.to_vec());
    assert_eq!(schema.offset.kind_tag(), "Vector2Option");
}

#[test]
fn presentation_flags_are_independent_of_value() {
    let schema = AllKinds::new();
    let option: &dyn GameOption = &*schema.name;
    let changes = count_changes(option);

    assert!(option.set_enabled(false));
    assert!(option.set_visible(false));
    assert!(!option.is_enabled());
    assert!(option.is_default());
    assert_eq!(changes.load(Ordering::SeqCst), 0);
}

#[test]
fn typed_events_reach_other_threads() {
    let schema = AllKinds::new();
    let rx = schema.ratio.core().value_changed().channel();

    let ratio = schema.ratio.clone();
    std::thread::spawn(move || {
        ratio.set_value(0.75);
    })
    .join()
    .expect("writer thread");

    assert_eq!(rx.try_recv().ok(), Some(0.75));
}

#[test]
fn ranged_float_ignores_nan_from_every_path() {
    let mut writer = OptionRegistry::builder();
    let loose = writer
        .register(FloatOption::new("TextScale", 1.0))
        .unwrap();
    let writer = writer.build();
    loose.set_value(f32::NAN);
    let bytes = writer.encode_all().unwrap();

    let mut reader = OptionRegistry::builder();
    let scale = reader
        .register(FloatOption::new("TextScale", 1.0).with_range(0.5, 3.0))
        .unwrap();
    let reader = reader.build();
    scale.set_value(2.0);
    let changes = count_changes(&*scale);

    assert!(!scale.set_value(f32::NAN));
    assert!(!reader
        .set_from_value("TextScale", OptionValue::Float(f32::NAN))
        .unwrap());
    let report = reader.decode_all(&bytes).unwrap();
    assert!(report.is_clean());

    assert_eq!(scale.value(), 2.0);
    assert_eq!(changes.load(Ordering::SeqCst), 0);
}
