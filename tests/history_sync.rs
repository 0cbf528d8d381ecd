//! History synchronization against the in-memory host.

use std::sync::Arc;
use std::time::Duration;

use path_dispatcher::events::topics::NAVIGATE_SUCCESS;
use path_dispatcher::{DispatchEvent, Handler, HistorySync, Navigation};
use tokio::sync::mpsc;

mod common;

fn noop() -> Handler {
    Handler::terminal(|_, _| Ok(()))
}

fn last_navigation(recorder: &common::Recorder) -> Navigation {
    match recorder.events().pop() {
        Some(DispatchEvent::NavigateSuccess { navigation }) => navigation,
        other => panic!("expected navigate success, got {other:?}"),
    }
}

#[test]
fn test_dispatches_push_history_entries() {
    let (dispatcher, host, recorder) = common::setup("/");
    let (_sync, _replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/", [noop()]).unwrap();
    dispatcher.declare("/a", [noop()]).unwrap();
    dispatcher.declare("/b/:id", [noop()]).unwrap();

    // initial dispatch stays out of history
    assert!(dispatcher.init([]));
    assert!(host.entries().is_empty());

    dispatcher.dispatch("/a");
    dispatcher.dispatch("/b/2?x=1");

    let urls: Vec<_> = host.entries().into_iter().map(|entry| entry.url).collect();
    assert_eq!(urls, vec!["/a", "/b/2?x=1"]);
    assert_eq!(host.location(), "/b/2?x=1");
    assert_eq!(last_navigation(&recorder).path, "/b/2?x=1");
}

#[test]
fn test_back_and_forward_replay_without_pushing() {
    let (dispatcher, host, recorder) = common::setup("/");
    let (sync, mut replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/", [noop()]).unwrap();
    dispatcher.declare("/a", [noop()]).unwrap();
    dispatcher.declare("/b", [noop()]).unwrap();

    assert!(dispatcher.init([]));
    dispatcher.dispatch("/a");
    dispatcher.dispatch("/b");
    assert_eq!(host.entries().len(), 2);

    let state = host.back().unwrap();
    assert!(sync.on_pop_state(state));
    assert_eq!(dispatcher.drain_replays(&mut replays), 1);

    let replayed = last_navigation(&recorder);
    assert_eq!(replayed.path, "/a");
    assert!(!replayed.history);
    assert_eq!(host.entries().len(), 2);

    let state = host.forward().unwrap();
    assert!(sync.on_pop_state(state));
    assert_eq!(dispatcher.drain_replays(&mut replays), 1);
    assert_eq!(last_navigation(&recorder).path, "/b");
    assert_eq!(host.entries().len(), 2);
}

#[test]
fn test_back_to_initial_page_replays_init_route() {
    let (dispatcher, host, recorder) = common::setup("/start");
    let (sync, mut replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/start", [noop()]).unwrap();
    dispatcher.declare("/a", [noop()]).unwrap();

    assert!(dispatcher.init([]));
    dispatcher.dispatch("/a");

    let state = host.back().unwrap();
    assert!(sync.on_pop_state(state));
    assert_eq!(dispatcher.drain_replays(&mut replays), 1);

    let replayed = last_navigation(&recorder);
    assert_eq!(replayed.path, "/start");
    assert!(!replayed.history);
    assert_eq!(host.entries().len(), 1);
}

#[test]
fn test_replay_under_root_path() {
    let (dispatcher, host, recorder) = common::setup("/app/home");
    dispatcher
        .configure(path_dispatcher::DispatcherConfig::default().with_root_path("/app"))
        .unwrap();
    let (sync, mut replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/home", [noop()]).unwrap();
    dispatcher.declare("/a", [noop()]).unwrap();

    assert!(dispatcher.init([]));
    dispatcher.dispatch("/a");
    assert_eq!(host.location(), "/app/a");

    assert!(sync.on_pop_state(host.back().unwrap()));
    dispatcher.drain_replays(&mut replays);
    assert_eq!(last_navigation(&recorder).path, "/app/home");
}

#[test]
fn test_replay_keeps_context_and_data() {
    let (dispatcher, host, recorder) = common::setup("/");
    let (sync, mut replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/", [noop()]).unwrap();
    dispatcher
        .declare(path_dispatcher::RouteSpec::new("/doc/:id").with_context("edit"), [noop()])
        .unwrap();

    dispatcher.init([]);
    dispatcher.dispatch(
        path_dispatcher::DispatchDescriptor::new("/doc/9")
            .with_context("edit")
            .with_data(serde_json::json!({"draft": true})),
    );
    dispatcher.dispatch("/");

    assert!(sync.on_pop_state(host.back().unwrap()));
    dispatcher.drain_replays(&mut replays);

    let replayed = last_navigation(&recorder);
    assert_eq!(replayed.context, "edit");
    assert_eq!(replayed.data["draft"], true);
}

#[test]
fn test_pop_state_before_init_is_ignored() {
    let (dispatcher, host, _recorder) = common::setup("/");
    let (sync, mut replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/a", [noop()]).unwrap();
    dispatcher.dispatch("/a");
    dispatcher.dispatch("/a");

    assert!(!sync.is_armed());
    assert!(!sync.on_pop_state(host.back().unwrap()));
    assert_eq!(dispatcher.drain_replays(&mut replays), 0);
}

#[tokio::test]
async fn test_deferred_handler_completes_later() {
    let (dispatcher, host, _recorder) = common::setup("/");
    let (_sync, _replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatcher.events().subscribe(NAVIGATE_SUCCESS, move |event: &DispatchEvent| {
        let _ = tx.send(event.clone());
        Ok(())
    });

    dispatcher
        .declare(
            "/slow",
            [
                Handler::continuable(|_, _, next| {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        next.proceed();
                    });
                }),
                noop(),
            ],
        )
        .unwrap();

    assert!(dispatcher.dispatch("/slow"));
    // nothing has completed yet
    assert!(rx.try_recv().is_err());
    assert!(host.entries().is_empty());

    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("handler chain should complete")
        .unwrap();
    assert_eq!(event.topic(), NAVIGATE_SUCCESS);
    assert_eq!(host.entries().len(), 1);
}

#[tokio::test]
async fn test_run_replays_until_sync_dropped() {
    let (dispatcher, host, _recorder) = common::setup("/");
    let (sync, replays) = HistorySync::install(Arc::clone(dispatcher.events()), host.clone());
    dispatcher.declare("/", [noop()]).unwrap();
    dispatcher.declare("/a", [noop()]).unwrap();

    dispatcher.init([]);
    dispatcher.dispatch("/a");
    dispatcher.dispatch("/");

    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatcher.events().subscribe(NAVIGATE_SUCCESS, move |event: &DispatchEvent| {
        let _ = tx.send(event.clone());
        Ok(())
    });

    let runner = tokio::spawn(Arc::clone(&dispatcher).run_replays(replays));

    assert!(sync.on_pop_state(host.back().unwrap()));
    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("replay should be dispatched")
        .unwrap();
    match event {
        DispatchEvent::NavigateSuccess { navigation } => {
            assert_eq!(navigation.path, "/a");
            assert!(!navigation.history);
        }
        other => panic!("unexpected event {other:?}"),
    }

    drop(sync);
    tokio::time::timeout(Duration::from_secs(1), runner)
        .await
        .expect("runner should stop once the sender is gone")
        .unwrap();
    assert_eq!(host.entries().len(), 2);
}
