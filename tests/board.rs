//! Board scenario tests driven through the reducer seams, without a network.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use uuid::Uuid;

use task_board::api::ApiError;
use task_board::app::{ADD_ERROR, App, DELETE_ERROR, TITLE_TOO_SHORT, UPDATE_ERROR};
use task_board::settings::Settings;
use task_board::types::{SaveStatus, Task};

fn make_task(title: &str, completed: bool) -> Task {
    let stamp = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        completed,
        created_at: stamp,
        updated_at: stamp,
    }
}

fn board_with(tasks: Vec<Task>) -> App {
    let mut app = App::new(Settings::default(), false).expect("app should build");
    app.finish_load(Ok(tasks));
    app
}

fn server_echo(app: &App, id: Uuid) -> Task {
    app.tasks
        .iter()
        .find(|task| task.id == id)
        .cloned()
        .expect("task should exist")
}

#[test]
fn scenario_add_walk_dog_keeps_percent_at_zero() {
    let mut app = board_with(vec![make_task("Buy milk", false)]);

    app.open_input();
    app.input = Some("Walk dog".to_string());
    let title = app.begin_add().expect("title should validate");
    assert_eq!(title, "Walk dog");
    assert_eq!(app.save_status, SaveStatus::Saving);

    app.finish_add(Ok(make_task("Walk dog", false)));

    let titles: Vec<&str> = app.tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Buy milk", "Walk dog"]);
    assert_eq!(app.percent(), 0);
    assert!(!app.all_done());
    assert_eq!(app.input.as_deref(), Some(""), "input cleared and refocused");
}

#[test]
fn scenario_toggle_success_reaches_all_done() {
    let mut app = board_with(vec![make_task("Buy milk", false)]);

    let (id, completed, previous) = app.begin_toggle().expect("toggle should start");
    assert!(completed);
    let server_task = server_echo(&app, id);
    app.finish_toggle(id, previous, Ok(server_task));

    assert_eq!(app.percent(), 100);
    assert!(app.all_done());
    assert_eq!(app.save_status, SaveStatus::Saved);
    assert!(app.banner.is_none());
}

#[test]
fn scenario_toggle_failure_leaves_flag_and_percent() {
    let mut app = board_with(vec![make_task("Buy milk", false)]);

    let (id, _completed, previous) = app.begin_toggle().expect("toggle should start");
    app.finish_toggle(id, previous, Err(ApiError::Transport("down".to_string())));

    assert!(!app.tasks[0].completed, "flag exactly as before the toggle");
    assert_eq!(app.percent(), 0);
    assert_eq!(app.banner.as_deref(), Some(UPDATE_ERROR));
    assert_eq!(app.save_status, SaveStatus::Error);
}

#[test]
fn delete_failure_restores_exact_snapshot_and_order() {
    let mut app = board_with(vec![
        make_task("first", false),
        make_task("second", true),
        make_task("third", false),
    ]);
    app.selected = 2;
    let original = app.tasks.clone();

    let (id, snapshot) = app.begin_delete().expect("delete should start");
    assert!(app.tasks.iter().all(|task| task.id != id));

    app.finish_delete(snapshot, Err(ApiError::Status {
        status: 500,
        detail: "storage failure".to_string(),
    }));

    assert_eq!(app.tasks, original);
    assert_eq!(app.banner.as_deref(), Some(DELETE_ERROR));
    assert_eq!(app.save_status, SaveStatus::Error);
}

#[test]
fn short_title_never_reaches_the_network_seam() {
    let mut app = board_with(Vec::new());
    app.input = Some(" ab ".to_string());

    assert!(app.begin_add().is_none(), "no request payload produced");
    assert_eq!(app.banner.as_deref(), Some(TITLE_TOO_SHORT));
    assert_eq!(
        app.save_status,
        SaveStatus::Idle,
        "indicator untouched by validation failures"
    );
}

#[test]
fn add_failure_leaves_list_unchanged() {
    let mut app = board_with(vec![make_task("kept", false)]);
    app.input = Some("Walk dog".to_string());
    app.begin_add().expect("title should validate");

    app.finish_add(Err(ApiError::Status {
        status: 422,
        detail: "Title must be at least 3 characters.".to_string(),
    }));

    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.banner.as_deref(), Some(ADD_ERROR));
}

#[test]
fn focus_mode_renders_exactly_the_open_subset() {
    let mut app = board_with(vec![
        make_task("open 1", false),
        make_task("done 1", true),
        make_task("open 2", false),
        make_task("done 2", true),
    ]);

    app.toggle_focus_mode();
    let visible: Vec<&str> = app
        .visible_tasks()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(visible, vec!["open 1", "open 2"]);
    assert!(app.visible_tasks().iter().all(|t| !t.completed));

    app.toggle_focus_mode();
    let visible: Vec<&str> = app
        .visible_tasks()
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(
        visible,
        vec!["open 1", "done 1", "open 2", "done 2"],
        "full list restored with original order"
    );
}

#[test]
fn focus_mode_toggle_never_touches_underlying_state() {
    let mut app = board_with(vec![make_task("open", false), make_task("done", true)]);
    let before = app.tasks.clone();

    app.toggle_focus_mode();
    app.toggle_focus_mode();

    assert_eq!(app.tasks, before);
    assert_eq!(app.save_status, SaveStatus::Idle);
}

#[test]
fn percent_is_clamped_and_rounded() {
    for (completed, total, expected) in [(0, 0, 0u8), (0, 4, 0), (1, 3, 33), (2, 3, 67), (5, 5, 100)]
    {
        let tasks: Vec<Task> = (0..total)
            .map(|index| make_task(&format!("task {index}"), index < completed))
            .collect();
        let app = board_with(tasks);
        assert_eq!(app.percent(), expected, "{completed}/{total}");
        assert!(app.completed_count() <= app.total_count());
    }
}

#[test]
fn saved_indicator_dwells_then_reverts() {
    let mut app = board_with(vec![make_task("a", false)]);
    let (id, _, previous) = app.begin_toggle().unwrap();
    let server_task = server_echo(&app, id);
    app.finish_toggle(id, previous, Ok(server_task));
    assert_eq!(app.save_status, SaveStatus::Saved);

    let dwell = Duration::from_millis(app.settings.saved_notice_ms);
    app.maybe_revert_saved(Instant::now());
    assert_eq!(app.save_status, SaveStatus::Saved);

    app.maybe_revert_saved(Instant::now() + dwell + Duration::from_millis(1));
    assert_eq!(app.save_status, SaveStatus::Idle);
}

#[test]
fn stale_response_for_removed_task_is_ignored() {
    // A toggle response can arrive after the task was deleted locally; the
    // reconciliation overwrites by id, so a missing id is simply a no-op.
    let mut app = board_with(vec![make_task("a", false), make_task("b", false)]);
    let (id, _, previous) = app.begin_toggle().unwrap();
    let server_task = server_echo(&app, id);

    app.tasks.retain(|task| task.id != id);
    app.finish_toggle(id, previous, Ok(server_task));

    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.tasks[0].title, "b");
    assert_eq!(app.save_status, SaveStatus::Saved);
}
