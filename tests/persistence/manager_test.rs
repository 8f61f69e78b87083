//! End-to-end behavior of the persistence manager

use crate::test_utils::{create_temp_dir, options_path, AllKinds};
use std::fs;
use std::time::Duration;
use tokio::time::sleep;
use xreal_options::persistence::{save_to_file, PersistenceConfig};
use xreal_options::registry::read_raw_records;
use xreal_options::{LoadOutcome, OptionValue, PersistenceManager};

const SAVE_DELAY: Duration = Duration::from_millis(100);

#[tokio::test]
async fn two_edits_in_one_window_make_one_write() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let schema = AllKinds::new();
    let manager = PersistenceManager::new(&path, schema.registry.clone(), SAVE_DELAY);
    assert!(matches!(manager.load_outcome(), LoadOutcome::Missing));
    assert!(schema.all_default());

    schema.count.set_value(7);
    sleep(Duration::from_millis(20)).await;
    schema.name.set_value("Lab");

    sleep(Duration::from_millis(40)).await;
    assert!(manager.save_pending());
    assert!(!path.exists(), "saved before the window closed");

    sleep(Duration::from_millis(300)).await;
    assert!(!manager.save_pending());

    let records = read_raw_records(&fs::read(&path).expect("options file")).unwrap();
    assert_eq!(records.len(), 7);

    let reloaded = AllKinds::new();
    reloaded
        .registry
        .decode_all(&fs::read(&path).unwrap())
        .unwrap();
    assert_eq!(reloaded.count.value(), 7);
    assert_eq!(reloaded.name.value(), "Lab");
    assert!(reloaded
        .registry
        .iter()
        .filter(|o| o.key() != "Count" && o.key() != "Name")
        .all(|o| o.is_default()));
}

#[tokio::test]
async fn construction_loads_without_scheduling_a_save() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let source = AllKinds::new();
    source.set_non_defaults();
    save_to_file(&path, &source.registry).unwrap();

    let schema = AllKinds::new();
    let manager = PersistenceManager::new(&path, schema.registry.clone(), SAVE_DELAY);

    assert_eq!(manager.load_outcome().report().map(|r| r.applied), Some(7));
    assert_eq!(schema.count.value(), 9);
    assert!(!manager.save_pending());
}

#[tokio::test]
async fn corrupt_file_starts_from_defaults() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);
    fs::write(&path, [0x02, 0x00, 0x00, 0x00, 0x09, b'B']).unwrap();

    let schema = AllKinds::new();
    let manager = PersistenceManager::new(&path, schema.registry.clone(), SAVE_DELAY);

    assert!(manager.load_outcome().is_reset());
    assert!(schema.all_default());
}

#[tokio::test]
async fn drop_flushes_pending_changes() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let schema = AllKinds::new();
    let manager =
        PersistenceManager::new(&path, schema.registry.clone(), Duration::from_secs(30));
    schema.flag.set_value(true);
    assert!(manager.save_pending());
    drop(manager);

    let reloaded = AllKinds::new();
    reloaded
        .registry
        .decode_all(&fs::read(&path).expect("flushed on drop"))
        .unwrap();
    assert!(reloaded.flag.value());

    // Listeners were detached; later edits schedule nothing
    schema.count.set_value(1);
    sleep(Duration::from_millis(50)).await;
    let again = AllKinds::new();
    again.registry.decode_all(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(again.count.value(), 3);
}

#[tokio::test]
async fn flush_writes_immediately() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let schema = AllKinds::new();
    let manager =
        PersistenceManager::new(&path, schema.registry.clone(), Duration::from_secs(30));
    schema.ratio.set_value(0.9);
    manager.flush().expect("flush");

    assert!(!manager.save_pending());
    let records = read_raw_records(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(records[2].value(), Some(OptionValue::Float(0.9)));
}

#[tokio::test]
async fn reset_all_is_saved_through_the_debounce() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let source = AllKinds::new();
    source.set_non_defaults();
    save_to_file(&path, &source.registry).unwrap();

    let schema = AllKinds::new();
    let manager = PersistenceManager::new(&path, schema.registry.clone(), SAVE_DELAY);
    manager.reset_all();
    assert!(manager.save_pending());
    sleep(Duration::from_millis(300)).await;

    let reloaded = AllKinds::new();
    reloaded.set_non_defaults();
    reloaded.registry.decode_all(&fs::read(&path).unwrap()).unwrap();
    assert!(reloaded.all_default());
}

#[tokio::test]
async fn disabled_auto_save_only_writes_on_flush() {
    let temp_dir = create_temp_dir();

    let mut config = PersistenceConfig::default();
    config.auto_save.enabled = false;
    config.auto_save.debounce_ms = 20;
    config.storage.base_directory = temp_dir.path().join("xreal");

    let schema = AllKinds::new();
    let manager = PersistenceManager::with_config(&config, schema.registry.clone());
    assert_eq!(manager.path(), config.storage.file_path());

    schema.count.set_value(5);
    sleep(Duration::from_millis(100)).await;
    assert!(!manager.path().exists());

    manager.flush().expect("flush");
    assert!(manager.path().exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_edits_and_flushes_leave_a_valid_file() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let schema = AllKinds::new();
    let manager = std::sync::Arc::new(PersistenceManager::new(
        &path,
        schema.registry.clone(),
        Duration::from_millis(5),
    ));

    let writer = {
        let tint = schema.tint.clone();
        std::thread::spawn(move || {
            for i in 0..200 {
                let c = i as f32 / 200.0;
                tint.set_value(xreal_options::Color::new(c, c, c, 1.0));
            }
        })
    };
    let flusher = {
        let manager = manager.clone();
        std::thread::spawn(move || {
            for _ in 0..20 {
                manager.flush().expect("flush");
            }
        })
    };
    writer.join().expect("writer thread");
    flusher.join().expect("flusher thread");
    sleep(Duration::from_millis(100)).await;

    let reloaded = AllKinds::new();
    let report = reloaded
        .registry
        .decode_all(&fs::read(&path).unwrap())
        .unwrap();
    assert!(report.is_clean());

    // Channels always come from the same write
    let tint = reloaded.tint.value();
    assert_eq!(tint.r, tint.g);
    assert_eq!(tint.g, tint.b);
}

#[tokio::test]
async fn save_delay_is_kept_at_full_precision() {
    let temp_dir = create_temp_dir();
    let path = options_path(&temp_dir);

    let schema = AllKinds::new();
    let fine = Duration::from_micros(2_500);
    let manager = PersistenceManager::new(&path, schema.registry.clone(), fine);
    assert_eq!(manager.save_delay(), fine);
    drop(manager);

    let long = Duration::from_secs(u64::MAX / 1_000 + 1);
    let manager = PersistenceManager::new(&path, schema.registry.clone(), long);
    assert_eq!(manager.save_delay(), long);
}
