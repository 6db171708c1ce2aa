//! End-to-end checks of the subscription pipeline, with the mock
//! store standing in for the REST endpoint.
//!
//! Run with `cargo test --features test`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use veloboard::config::Config;
use veloboard::controller::Controller;
use veloboard::source::{EventMap, MockStore, ResultStore};

fn test_config(output_dir: &PathBuf) -> Config {
    Config {
        store_url: "http://localhost:9000".to_string(),
        event_map_file: PathBuf::from("unused.json"),
        output_dir: output_dir.clone(),
        event_title: "DM e-cykling Test".to_string(),
    }
}

fn test_event_map() -> EventMap {
    r#"{
        "Damer": {
            "heat1": "e1",
            "heat2": "e2",
            "heat3": "e3"
        }
    }"#
    .parse()
    .expect("failed to parse event map")
}

fn heat_payload() -> &'static str {
    r#"{
        "timestamp": "2025-06-14T10:00:00Z",
        "racerScores": [
            {
                "athleteId": 1,
                "name": "Ann Ansen",
                "durationTime": "14:02.500",
                "falPointTotal": 0,
                "ftsPointTotal": 0,
                "leaguePoints": 10
            },
            {
                "athleteId": 2,
                "name": "Bea Boe",
                "durationTime": "14:03.100",
                "falPointTotal": 0,
                "ftsPointTotal": 0,
                "leaguePoints": 8
            }
        ]
    }"#
}

fn output_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("veloboard-{}-{}", test_name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn read_board(dir: &PathBuf, file_name: &str) -> String {
    std::fs::read_to_string(dir.join(file_name)).expect("board file missing")
}

#[tokio::test]
async fn test_boards_follow_published_snapshots() {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = output_dir("pipeline");
    let config = test_config(&dir);

    let mock = MockStore::new();
    let store = Arc::new(mock.clone()) as Arc<dyn ResultStore>;
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let controller = Controller::init(&config, test_event_map());
    controller
        .subscribe_all(&store, &events_tx)
        .await
        .expect("failed to subscribe");

    // The mock answers every subscription right away; nothing is
    // stored yet.
    for _ in 0..3 {
        let event = events_rx.recv().await.expect("missing initial event");
        controller.on_source_event(event).await;
    }

    let heat1 = read_board(&dir, "damer_heat1.html");
    assert!(heat1.contains("No results"));

    let snapshot = serde_json::from_str(heat_payload()).expect("bad test payload");
    mock.publish("e1", Some(snapshot)).await;
    let event = events_rx.recv().await.expect("missing snapshot event");
    controller.on_source_event(event).await;

    let heat1 = read_board(&dir, "damer_heat1.html");
    assert!(heat1.contains("Ann Ansen"));
    assert!(heat1.contains("14:02.500"));
    assert!(heat1.contains("+ 0:00.600"));

    // With only one of three heats raced, everyone is DNF overall.
    let samlet = read_board(&dir, "damer_samlet.html");
    assert!(samlet.contains("Ann Ansen"));
    assert!(samlet.contains("DNF"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_unmapped_route_gets_status_page() {
    let dir = output_dir("route");
    let config = test_config(&dir);

    let controller = Controller::init(&config, test_event_map());

    let html = controller.render_route("Herrer", "heat1").await;
    assert!(html.contains("Invalid Route"));

    // Mapped, but nothing fetched yet.
    let html = controller.render_route("Damer", "heat1").await;
    assert!(html.contains("Loading"));

    let _ = std::fs::remove_dir_all(&dir);
}
