//! Round trip and schema evolution through the registry codec

use crate::test_utils::{AllKinds, Quality};
use glam::Vec2;
use std::sync::Arc;
use xreal_options::options::{BoolOption, Color, FloatOption, IntOption, OptionValue, StringOption};
use xreal_options::registry::{read_raw_records, OptionRegistry};
use xreal_options::LoadOutcome;

#[test]
fn round_trip_reproduces_every_value() {
    let source = AllKinds::new();
    source.set_non_defaults();
    let bytes = source.encoded();

    let target = AllKinds::new();
    let report = target.registry.decode_all(&bytes).expect("decode");
    assert_eq!(report.applied, 7);
    assert!(report.is_clean());

    assert!(target.flag.value());
    assert_eq!(target.count.value(), 9);
    assert_eq!(target.ratio.value().to_bits(), 0.1f32.to_bits());
    assert_eq!(target.name.value(), "Studio ✓");
    assert_eq!(target.quality.value(), Quality::High);
    assert_eq!(target.tint.value(), Color::new(0.1, 0.2, 0.3, 0.4));
    assert_eq!(target.offset.value(), Vec2::new(-1.25, 3.5));
    assert_eq!(target.registry.snapshot(), source.registry.snapshot());
}

#[test]
fn round_trip_of_defaults_is_stable() {
    let source = AllKinds::new();
    let bytes = source.encoded();

    let target = AllKinds::new();
    target.registry.decode_all(&bytes).expect("decode");
    assert!(target.all_default());
    assert_eq!(target.encoded(), bytes);
}

#[test]
fn new_option_keeps_its_default() {
    let mut old = OptionRegistry::builder();
    let old_brightness = old.register(IntOption::new("Brightness", 4)).unwrap();
    old.register(BoolOption::new("RollLock", false)).unwrap();
    let old = old.build();
    old_brightness.set_value(6);
    let bytes = old.encode_all().unwrap();

    let mut new = OptionRegistry::builder();
    let brightness = new.register(IntOption::new("Brightness", 4)).unwrap();
    let added = new
        .register(FloatOption::new("NewSetting", 2.5))
        .unwrap();
    let roll = new.register(BoolOption::new("RollLock", true)).unwrap();
    let new = new.build();

    let report = new.decode_all(&bytes).expect("decode");
    assert_eq!(report.applied, 2);
    assert!(report.is_clean());
    assert_eq!(brightness.value(), 6);
    assert!(!roll.value());
    assert_eq!(added.value(), 2.5);
}

#[test]
fn removed_option_is_skipped_without_disturbing_neighbours() {
    let mut old = OptionRegistry::builder();
    let a = old.register(IntOption::new("A", 0)).unwrap();
    let gone = old.register(StringOption::new("OldSetting", "")).unwrap();
    let b = old.register(IntOption::new("B", 0)).unwrap();
    let old = old.build();
    a.set_value(11);
    gone.set_value("a long value that must be skipped entirely");
    b.set_value(22);
    let bytes = old.encode_all().unwrap();

    let mut new = OptionRegistry::builder();
    let a = new.register(IntOption::new("A", 0)).unwrap();
    let b = new.register(IntOption::new("B", 0)).unwrap();
    let new = new.build();

    let report = new.decode_all(&bytes).expect("decode");
    assert_eq!(report.unknown_keys, vec!["OldSetting".to_string()]);
    assert_eq!(a.value(), 11);
    assert_eq!(b.value(), 22);
}

#[test]
fn kind_change_keeps_new_default() {
    let mut old = OptionRegistry::builder();
    let x = old.register(BoolOption::new("X", false)).unwrap();
    let after = old.register(IntOption::new("After", 0)).unwrap();
    let old = old.build();
    x.set_value(true);
    after.set_value(5);
    let bytes = old.encode_all().unwrap();

    let mut new = OptionRegistry::builder();
    let x = new.register(IntOption::new("X", 7)).unwrap();
    let after = new.register(IntOption::new("After", 0)).unwrap();
    let new = new.build();

    let report = new.decode_all(&bytes).expect("decode");
    assert_eq!(report.kind_mismatches, vec!["X".to_string()]);
    assert_eq!(x.value(), 7);
    assert_eq!(after.value(), 5);
}

#[test]
fn every_truncation_resets_the_whole_registry() {
    let source = AllKinds::new();
    source.set_non_defaults();
    let bytes = source.encoded();

    for len in 0..bytes.len() {
        let target = AllKinds::new();
        target.set_non_defaults();
        target.count.set_value(1);

        let outcome = target.registry.decode_all_from_bytes(&bytes[..len]);
        assert!(outcome.is_reset(), "prefix of {} bytes was accepted", len);
        assert!(target.all_default(), "prefix of {} bytes left values", len);
    }

    let target = AllKinds::new();
    assert!(matches!(
        target.registry.decode_all_from_bytes(&bytes),
        LoadOutcome::Loaded(_)
    ));
    assert_eq!(target.count.value(), 9);
}

#[test]
fn unreadable_payload_resets_only_that_option() {
    let source = AllKinds::new();
    source.set_non_defaults();
    let mut records = read_raw_records(&source.encoded()).unwrap();

    // Rewrite the Flag payload to an invalid boolean byte
    records[0].payload = vec![7];
    let mut bytes = (records.len() as i32).to_le_bytes().to_vec();
    for record in &records {
        for text in [&record.key, &record.kind_tag] {
            bytes.push(text.len() as u8);
            bytes.extend_from_slice(text.as_bytes());
        }
        bytes.extend_from_slice(&(record.payload.len() as i32).to_le_bytes());
        bytes.extend_from_slice(&record.payload);
    }

    let target = AllKinds::new();
    target.flag.set_value(true);
    let report = target.registry.decode_all(&bytes).expect("decode");

    assert_eq!(report.decode_failures, vec!["Flag".to_string()]);
    assert!(!target.flag.value());
    assert_eq!(target.count.value(), 9);
    assert_eq!(target.offset.value(), Vec2::new(-1.25, 3.5));
}

#[test]
fn raw_records_describe_the_file() {
    let source = AllKinds::new();
    source.set_non_defaults();
    let records = read_raw_records(&source.encoded()).unwrap();

    let tags: Vec<_> = records.iter().map(|r| r.kind_tag.as_str()).collect();
    assert_eq!(
        tags,
        vec![
            "BoolOption",
            "IntOption",
            "FloatOption",
            "StringOption",
            "EnumOption",
            "ColorOption",
            "Vector2Option"
        ]
    );
    assert_eq!(records[4].value(), Some(OptionValue::Enum(2)));
}

#[test]
fn shared_registration_is_visible_through_the_registry() {
    let distance = Arc::new(FloatOption::new("ScreenDistance", -5.0));
    let mut builder = OptionRegistry::builder();
    builder.register_shared(distance.clone()).unwrap();
    let registry = builder.build();

    registry
        .set_from_value("ScreenDistance", OptionValue::Float(-3.0))
        .unwrap();
    assert_eq!(distance.value(), -3.0);
}

#[test]
fn decode_keeps_floats_within_epsilon_of_the_live_value() {
    let source = AllKinds::new();
    let next_after_one = f32::from_bits(0x3f80_0001);
    source.ratio.set_value(1.0);
    source.ratio.set_value(1.5);
    assert!(source.ratio.set_value(next_after_one));
    source.offset.set_value(Vec2::new(1.0, 0.0));
    assert!(source.offset.set_value(Vec2::new(1e-8, 0.0)));
    assert!(source.tint.set_value(Color::new(1e-9, 0.0, 0.0, next_after_one)));
    let bytes = source.encoded();

    let target = AllKinds::new();
    target.ratio.set_value(1.0);
    let changes = crate::test_utils::count_changes(&*target.ratio);
    let report = target.registry.decode_all(&bytes).expect("decode");
    assert!(report.is_clean());

    assert_eq!(target.ratio.value().to_bits(), 0x3f80_0001);
    assert_eq!(target.offset.value().x.to_bits(), 1e-8f32.to_bits());
    assert_eq!(target.tint.value().r.to_bits(), 1e-9f32.to_bits());
    assert_eq!(target.tint.value().a.to_bits(), 0x3f80_0001);
    // Same value under float comparison, so no change event
    assert_eq!(changes.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(target.encoded(), bytes);
}
