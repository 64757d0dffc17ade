//! Integration tests for session supersession.
//!
//! A new start implicitly terminates the previous session: the old
//! endpoint closes before the new one binds, and the controller sees the
//! old session's stop notice before the new session's details.

mod common;

use benchd::session::SessionState;
use common::TestDaemon;

#[tokio::test]
async fn new_start_supersedes_the_active_session() {
    let daemon = TestDaemon::spawn(24321).await.expect("Failed to spawn daemon");
    let mut controller = daemon.connect().await.expect("Failed to connect");

    controller.start("first();", "firstAlt();").await.unwrap();
    let first = controller.expect_status("benchmark_started").await.unwrap();
    let first_id = first["sessionId"].as_str().unwrap().to_string();
    let first_url = first["url"].as_str().unwrap().to_string();

    controller.start("second();", "secondAlt();").await.unwrap();

    // Exactly one stop notice for the old id, then the new session.
    let stopped = controller.expect_status("benchmark_stopped").await.unwrap();
    assert_eq!(stopped["sessionId"], first_id.as_str());
    let second = controller.expect_status("benchmark_started").await.unwrap();
    let second_id = second["sessionId"].as_str().unwrap().to_string();
    let second_url = second["url"].as_str().unwrap().to_string();
    assert_ne!(second_id, first_id, "session ids are never reused");

    // Same fixed port, new session: the old path is gone.
    let old = reqwest::get(&first_url).await.expect("delivery GET failed");
    assert_eq!(old.status(), 404);

    let new = reqwest::get(&second_url).await.expect("delivery GET failed");
    assert_eq!(new.status(), 200);
    let body = new.text().await.unwrap();
    assert!(body.contains("second();"));
    assert!(!body.contains("first();"));
}

#[tokio::test]
async fn any_connection_may_stop_the_session() {
    let daemon = TestDaemon::spawn(24322).await.expect("Failed to spawn daemon");

    let mut starter = daemon.connect().await.expect("Failed to connect");
    starter.start("a();", "b();").await.unwrap();
    let started = starter.expect_status("benchmark_started").await.unwrap();
    let session_id = started["sessionId"].as_str().unwrap().to_string();
    let url = started["url"].as_str().unwrap().to_string();

    // A different controller stops it, matched purely by id.
    let mut other = daemon.connect().await.expect("Failed to connect");
    other.stop(&session_id).await.unwrap();
    let stopped = other.expect_status("benchmark_stopped").await.unwrap();
    assert_eq!(stopped["sessionId"], session_id.as_str());

    assert!(reqwest::get(&url).await.is_err());
    assert!(daemon.registry().current().await.is_none());
}

#[tokio::test]
async fn session_outlives_its_originating_connection() {
    let daemon = TestDaemon::spawn(24323).await.expect("Failed to spawn daemon");

    let url = {
        let mut starter = daemon.connect().await.expect("Failed to connect");
        starter.start("a();", "b();").await.unwrap();
        let started = starter.expect_status("benchmark_started").await.unwrap();
        started["url"].as_str().unwrap().to_string()
        // starter drops here, closing its connection
    };

    // Give the server a moment to observe the close.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let response = reqwest::get(&url).await.expect("delivery GET failed");
    assert_eq!(response.status(), 200);
    let current = daemon.registry().current().await.expect("session gone");
    assert_eq!(current.state, SessionState::Active);
}

#[tokio::test]
async fn racing_starts_leave_exactly_one_live_session() {
    let daemon = TestDaemon::spawn(24324).await.expect("Failed to spawn daemon");

    let mut c1 = daemon.connect().await.expect("Failed to connect");
    let mut c2 = daemon.connect().await.expect("Failed to connect");

    let (r1, r2) = tokio::join!(
        async {
            c1.start("one();", "oneAlt();").await.unwrap();
            c1.recv_until_status("benchmark_started").await.unwrap()
        },
        async {
            c2.start("two();", "twoAlt();").await.unwrap();
            c2.recv_until_status("benchmark_started").await.unwrap()
        }
    );

    let id1 = r1.last().unwrap()["sessionId"].as_str().unwrap().to_string();
    let id2 = r2.last().unwrap()["sessionId"].as_str().unwrap().to_string();
    assert_ne!(id1, id2);

    // The registry holds exactly one survivor, and only its document is
    // served on the fixed port.
    let current = daemon.registry().current().await.expect("no session survived");
    assert!(current.id == id1 || current.id == id2);
    assert_eq!(current.state, SessionState::Active);

    let survivor = reqwest::get(&current.url).await.expect("delivery GET failed");
    assert_eq!(survivor.status(), 200);

    let loser_id = if current.id == id1 { &id2 } else { &id1 };
    let loser_url = current.url.replace(&current.id, loser_id);
    let loser = reqwest::get(&loser_url).await.expect("delivery GET failed");
    assert_eq!(loser.status(), 404);
}
