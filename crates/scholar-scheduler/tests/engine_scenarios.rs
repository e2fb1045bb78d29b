// End-to-end tick scenarios driven through the public API against a real
// reminder file.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scholar_core::time::parse_stored;
use scholar_scheduler::{
    JsonFileStorage, Notifier, NotifyError, ReminderStorage, ReminderStore, SchedulerEngine,
};

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    path: std::path::PathBuf,
    store: Arc<ReminderStore>,
    recorder: Arc<Recorder>,
    engine: SchedulerEngine,
}

fn fixture(file_body: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reminder_data.json");
    std::fs::write(&path, file_body).unwrap();

    let store = Arc::new(ReminderStore::open(Box::new(JsonFileStorage::new(&path))));
    let recorder = Arc::new(Recorder::default());
    let engine =
        SchedulerEngine::new(&store, recorder.clone(), Duration::from_secs(10), None).unwrap();
    Fixture {
        _dir: dir,
        path,
        store,
        recorder,
        engine,
    }
}

fn on_disk(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn one_shot_fires_once_and_leaves_the_list() {
    let f = fixture(
        r#"[{"title":"A","message":"hand in essay","time":"2024-01-01 09:00","repeat":"none","priority":"medium"}]"#,
    );

    let report = f
        .engine
        .tick_at(parse_stored("2024-01-01 09:00").unwrap())
        .await
        .unwrap();

    assert_eq!(report.fired, vec!["A"]);
    assert_eq!(
        *f.recorder.calls.lock().unwrap(),
        vec![("A".to_string(), "hand in essay".to_string())]
    );
    assert!(f.store.is_empty());
    assert_eq!(on_disk(&f.path), serde_json::json!([]));
}

#[tokio::test]
async fn daily_moves_to_next_day() {
    let f = fixture(
        r#"[{"title":"B","message":"","time":"2024-01-01 09:00","repeat":"daily","priority":"medium"}]"#,
    );

    f.engine
        .tick_at(parse_stored("2024-01-01 09:00").unwrap())
        .await
        .unwrap();

    assert_eq!(f.recorder.calls.lock().unwrap().len(), 1);
    let file = on_disk(&f.path);
    assert_eq!(file.as_array().unwrap().len(), 1);
    assert_eq!(file[0]["title"], "B");
    assert_eq!(file[0]["time"], "2024-01-02 09:00");
    assert_eq!(file[0]["repeat"], "daily");

    // Not due again until exactly 24h after the original slot.
    let early = f
        .engine
        .tick_at(parse_stored("2024-01-02 08:59").unwrap())
        .await
        .unwrap();
    assert!(early.fired.is_empty());
    let again = f
        .engine
        .tick_at(parse_stored("2024-01-02 09:00").unwrap())
        .await
        .unwrap();
    assert_eq!(again.fired, vec!["B"]);
}

#[tokio::test]
async fn delete_before_tick_is_respected() {
    let f = fixture(
        r#"[
            {"title":"doomed","message":"","time":"2024-01-01 09:00","repeat":"none","priority":"medium"},
            {"title":"kept","message":"","time":"2024-01-01 09:00","repeat":"weekly","priority":"medium"}
        ]"#,
    );

    f.store.delete(0).unwrap();
    let report = f
        .engine
        .tick_at(parse_stored("2024-01-01 09:30").unwrap())
        .await
        .unwrap();

    assert_eq!(report.fired, vec!["kept"]);
    let file = on_disk(&f.path);
    assert_eq!(file.as_array().unwrap().len(), 1);
    assert_eq!(file[0]["title"], "kept");
    assert_eq!(file[0]["time"], "2024-01-08 09:00");
}

#[tokio::test]
async fn malformed_record_is_dropped_on_load() {
    let f = fixture(
        r#"[
            {"title":"ok","message":"","time":"2030-01-01 09:00","repeat":"none","priority":"medium"},
            {"title":"broken","time":12}
        ]"#,
    );

    assert_eq!(f.store.len(), 1);
    assert_eq!(f.store.reminders()[0].title, "ok");
    // Reloading the same file is just as stable.
    assert_eq!(JsonFileStorage::new(&f.path).load_list().len(), 1);
}

#[tokio::test]
async fn unknown_repeat_is_kept_across_a_tick() {
    let f = fixture(
        r#"[{"title":"C","message":"","time":"2024-01-01 09:00","repeat":"monthly","priority":"high"}]"#,
    );

    let report = f
        .engine
        .tick_at(parse_stored("2024-01-01 09:00").unwrap())
        .await
        .unwrap();

    assert_eq!(report.fired, vec!["C"]);
    assert!(!report.changed);
    let kept = f.store.reminders();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].repeat.label(), "monthly");
    assert_eq!(kept[0].due_label(), "2024-01-01 09:00");
}

#[tokio::test]
async fn missed_firings_catch_up_after_restart() {
    let f = fixture(
        r#"[
            {"title":"stale","message":"","time":"2023-06-01 08:00","repeat":"none","priority":"medium"},
            {"title":"future","message":"","time":"2030-06-01 08:00","repeat":"none","priority":"medium"}
        ]"#,
    );

    let report = f
        .engine
        .tick_at(parse_stored("2024-01-01 00:00").unwrap())
        .await
        .unwrap();

    assert_eq!(report.fired, vec!["stale"]);
    let left: Vec<String> = f.store.reminders().into_iter().map(|r| r.title).collect();
    assert_eq!(left, vec!["future"]);
}
