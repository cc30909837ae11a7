//! Scenario tests for drain, dispatch and report.
//!
//! These run the engine against `MockRepo` and `StaticProbe` with a real
//! queue file in a temp directory, so every persisted state can be checked
//! on disk.

use tempfile::TempDir;

use devbot::core::queue::{QueueRecord, QueueStore};
use devbot::core::types::{CommitMessage, QueueTimestamp, RepoPath};
use devbot::engine::{
    DispatchOutcome, DrainOutcome, Engine, EngineError, Event, HaltReason, QueueReason, Unpushed,
};
use devbot::git::mock::{FailOn, MockOperation, MockRepo};
use devbot::git::{FailureKind, RemoteFailure};
use devbot::net::mock::StaticProbe;

// =============================================================================
// Fixtures
// =============================================================================

struct Harness {
    _dir: TempDir,
    repo: MockRepo,
    probe: StaticProbe,
    engine: Engine<MockRepo, StaticProbe>,
}

impl Harness {
    fn new(repo: MockRepo) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let store = QueueStore::new(dir.path().join("devbot").join("queue.json"));
        let probe = StaticProbe::offline();
        let engine = Engine::new(repo.clone(), probe.clone(), store);
        Self {
            _dir: dir,
            repo,
            probe,
            engine,
        }
    }

    fn store(&self) -> &QueueStore {
        self.engine.store()
    }

    fn queued(&self) -> Vec<QueueRecord> {
        self.store().load().expect("load queue")
    }

    async fn dispatch(&self, message: &str, files: &[&str]) -> (DispatchOutcome, Vec<Event>) {
        let mut events = Vec::new();
        let outcome = self
            .engine
            .dispatch(msg(message), paths(files), &mut events)
            .await
            .expect("dispatch");
        (outcome, events)
    }

    async fn drain(&self) -> (DrainOutcome, Vec<Event>) {
        let mut events = Vec::new();
        let outcome = self.engine.drain(&mut events).await.expect("drain");
        (outcome, events)
    }
}

fn msg(m: &str) -> CommitMessage {
    CommitMessage::new(m).unwrap()
}

fn paths(files: &[&str]) -> Vec<RepoPath> {
    files.iter().map(|f| RepoPath::new(*f).unwrap()).collect()
}

fn network_failure() -> RemoteFailure {
    RemoteFailure::new(FailureKind::Network, "Could not resolve host: example.com")
}

fn messages(records: &[QueueRecord]) -> Vec<&str> {
    records.iter().map(|r| r.message().as_str()).collect()
}

// =============================================================================
// Dispatch
// =============================================================================

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn offline_dispatch_queues_one_record_without_touching_repository() {
        let h = Harness::new(MockRepo::new());

        let (outcome, events) = h.dispatch("fix bug", &["a.py"]).await;

        assert_eq!(outcome, DispatchOutcome::Queued(QueueReason::Offline));
        let queued = h.queued();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].message().as_str(), "fix bug");
        assert_eq!(queued[0].files(), paths(&["a.py"]).as_slice());
        assert!(queued[0].local_commit().is_none());

        assert!(h.repo.operations().is_empty());
        assert!(matches!(
            &events[..],
            [Event::Queued {
                reason: QueueReason::Offline,
                pending: 1,
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn online_dispatch_commits_and_pushes() {
        let h = Harness::new(MockRepo::new());
        h.probe.set_online(true);

        let (outcome, events) = h.dispatch("add feature", &["src/lib.rs"]).await;

        assert_eq!(outcome, DispatchOutcome::Pushed);
        assert!(h.queued().is_empty());
        assert_eq!(h.repo.pushed_messages(), vec!["add feature"]);
        assert!(matches!(&events[..], [Event::Pushed { .. }]));
    }

    #[tokio::test]
    async fn push_failure_after_commit_queues_push_only_record() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::Push(network_failure())));
        h.probe.set_online(true);

        let (outcome, events) = h.dispatch("A", &["x"]).await;

        assert_eq!(
            outcome,
            DispatchOutcome::Queued(QueueReason::PushFailed(network_failure()))
        );
        let queued = h.queued();
        assert_eq!(queued.len(), 1);
        assert_eq!(
            queued[0].local_commit(),
            Some(&h.repo.history()[0].oid),
            "queued record must point at the local commit"
        );
        assert!(matches!(
            &events[..],
            [Event::Queued {
                reason: QueueReason::PushFailed(_),
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn local_commit_failure_is_reported_not_queued() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::CommitNothing));
        h.probe.set_online(true);

        let (outcome, events) = h.dispatch("nothing", &["a"]).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert!(h.queued().is_empty());
        assert!(matches!(&events[..], [Event::CommitFailed { .. }]));
    }

    #[tokio::test]
    async fn online_dispatch_waits_behind_undrained_queue() {
        let h = Harness::new(MockRepo::new());
        h.dispatch("A", &["a"]).await;
        h.dispatch("B", &["b"]).await;

        // drain sees the network down, dispatch sees it back
        h.probe.answer_next(&[false, true]);
        let mut events = Vec::new();
        let outcome = h
            .engine
            .commit(msg("C"), paths(&["c"]), &mut events)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Queued(QueueReason::Backlog));
        assert!(h.repo.pushed_messages().is_empty());
        assert_eq!(h.repo.commit_count(), 0);

        let queued = h.queued();
        assert_eq!(messages(&queued), vec!["A", "B", "C"]);
        assert!(queued[2].local_commit().is_none());
        assert!(matches!(
            &events[..2],
            [
                Event::DrainSkippedOffline { pending: 2 },
                Event::Queued {
                    reason: QueueReason::Backlog,
                    pending: 3,
                    ..
                }
            ]
        ));

        h.probe.set_online(true);
        h.drain().await;
        assert_eq!(h.repo.pushed_messages(), vec!["A", "B", "C"]);
        assert!(h.queued().is_empty());
    }

    #[tokio::test]
    async fn halted_drain_keeps_new_commit_behind_failed_record() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::Push(network_failure())));
        h.dispatch("A", &["a"]).await;

        h.probe.set_online(true);
        let mut events = Vec::new();
        let outcome = h
            .engine
            .commit(msg("B"), paths(&["b"]), &mut events)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Queued(QueueReason::Backlog));
        assert_eq!(h.repo.commit_count(), 1, "only the replayed record is committed");
        let queued = h.queued();
        assert_eq!(messages(&queued), vec!["A", "B"]);
        assert!(queued[0].local_commit().is_some());
        assert!(queued[1].local_commit().is_none());
    }

    #[tokio::test]
    async fn empty_file_set_is_rejected() {
        let h = Harness::new(MockRepo::new());
        let mut events = Vec::new();

        let result = h.engine.dispatch(msg("x"), Vec::new(), &mut events).await;

        assert!(matches!(result, Err(EngineError::InvalidRequest(_))));
        assert!(!h.store().path().exists());
    }
}

// =============================================================================
// Drain
// =============================================================================

mod drain {
    use super::*;

    #[tokio::test]
    async fn empty_queue_does_not_probe() {
        let h = Harness::new(MockRepo::new());

        let (outcome, events) = h.drain().await;

        assert_eq!(outcome, DrainOutcome::Empty);
        assert!(events.is_empty());
        assert_eq!(h.probe.calls(), 0);
    }

    #[tokio::test]
    async fn offline_drain_leaves_queue_untouched() {
        let h = Harness::new(MockRepo::new());
        h.dispatch("A", &["x"]).await;
        let before = std::fs::read(h.store().path()).unwrap();

        let (outcome, events) = h.drain().await;

        assert_eq!(outcome, DrainOutcome::SkippedOffline { pending: 1 });
        assert!(matches!(&events[..], [Event::DrainSkippedOffline { pending: 1 }]));
        assert_eq!(std::fs::read(h.store().path()).unwrap(), before);
        assert!(h.repo.operations().is_empty());
    }

    #[tokio::test]
    async fn offline_then_online_pushes_and_empties_queue() {
        let h = Harness::new(MockRepo::new());
        h.dispatch("fix bug", &["a.py"]).await;

        h.probe.set_online(true);
        let (outcome, events) = h.drain().await;

        assert_eq!(outcome, DrainOutcome::Completed { pushed: 1 });
        assert!(h.queued().is_empty());
        assert_eq!(h.repo.pushed_messages(), vec!["fix bug"]);
        assert!(matches!(events.last(), Some(Event::DrainCompleted { pushed: 1 })));
    }

    #[tokio::test]
    async fn replay_preserves_enqueue_order() {
        let h = Harness::new(MockRepo::new());
        for (m, f) in [("one", "1"), ("two", "2"), ("three", "3")] {
            h.dispatch(m, &[f]).await;
        }

        h.probe.set_online(true);
        h.drain().await;

        assert_eq!(h.repo.pushed_messages(), vec!["one", "two", "three"]);
        let commits: Vec<String> = h
            .repo
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::Commit { message } => Some(message),
                _ => None,
            })
            .collect();
        assert_eq!(commits, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn second_push_failure_leaves_exactly_the_failed_record() {
        let h = Harness::new(
            MockRepo::new().fail_on(FailOn::PushAfter(1, network_failure())),
        );
        h.dispatch("A", &["x"]).await;
        h.dispatch("B", &["y"]).await;
        let original_b = h.queued()[1].clone();

        h.probe.set_online(true);
        let (outcome, events) = h.drain().await;

        assert_eq!(
            outcome,
            DrainOutcome::Halted {
                pushed: 1,
                remaining: 1,
                reason: HaltReason::Push(network_failure()),
            }
        );
        assert_eq!(h.repo.pushed_messages(), vec!["A"]);

        let queued = h.queued();
        assert_eq!(messages(&queued), vec!["B"]);
        assert!(queued[0].same_intent(&original_b));
        assert_eq!(queued[0].files(), paths(&["y"]).as_slice());
        assert!(matches!(
            &events[..],
            [Event::ReplayPushed { .. }, Event::DrainHalted { remaining: 1, .. }]
        ));
    }

    #[tokio::test]
    async fn halted_record_is_not_committed_twice() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::Push(network_failure())));
        h.dispatch("B", &["y"]).await;

        h.probe.set_online(true);
        h.drain().await;
        assert_eq!(h.repo.commit_count(), 1);
        assert!(h.queued()[0].local_commit().is_some());

        h.repo.clear_failures();
        let (outcome, _) = h.drain().await;

        assert_eq!(outcome, DrainOutcome::Completed { pushed: 1 });
        assert_eq!(h.repo.commit_count(), 1, "replay must push the existing commit");
        assert_eq!(h.repo.pushed_messages(), vec!["B"]);
        assert!(h.queued().is_empty());
    }

    #[tokio::test]
    async fn failure_at_k_keeps_k_through_n() {
        let n = 5;
        for k in 0..n {
            let h = Harness::new(
                MockRepo::new().fail_on(FailOn::PushAfter(k, network_failure())),
            );
            for i in 0..n {
                let file = format!("f{}", i);
                h.dispatch(&format!("commit {}", i), &[file.as_str()]).await;
            }

            h.probe.set_online(true);
            h.drain().await;

            let expected: Vec<String> = (k..n).map(|i| format!("commit {}", i)).collect();
            let remaining: Vec<String> = h
                .queued()
                .iter()
                .map(|r| r.message().as_str().to_string())
                .collect();
            assert_eq!(remaining, expected, "failure at record {}", k);
        }
    }

    #[tokio::test]
    async fn nothing_to_commit_on_replay_still_pushes() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::CommitNothing));
        h.dispatch("already committed by hand", &["a"]).await;

        h.probe.set_online(true);
        let (outcome, events) = h.drain().await;

        assert_eq!(outcome, DrainOutcome::Completed { pushed: 1 });
        assert!(matches!(events[0], Event::ReplayNothingToCommit { .. }));
        assert!(h.queued().is_empty());
    }

    #[tokio::test]
    async fn stage_failure_halts_and_leaves_queue_as_it_was() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::Stage));
        h.dispatch("A", &["gone.txt"]).await;
        h.dispatch("B", &["b"]).await;
        let before = std::fs::read(h.store().path()).unwrap();

        h.probe.set_online(true);
        let (outcome, events) = h.drain().await;

        assert!(matches!(
            &outcome,
            DrainOutcome::Halted {
                pushed: 0,
                remaining: 2,
                reason: HaltReason::Local(message),
            } if message.contains("gone.txt")
        ));
        assert!(matches!(
            &events[..],
            [Event::DrainHalted {
                reason: HaltReason::Local(_),
                remaining: 2,
                ..
            }]
        ));
        assert_eq!(std::fs::read(h.store().path()).unwrap(), before);
        assert_eq!(h.repo.commit_count(), 0);
        assert!(h.repo.pushed_messages().is_empty());
    }

    #[tokio::test]
    async fn commit_failure_halts_before_pushing() {
        let h = Harness::new(
            MockRepo::new().fail_on(FailOn::Commit("index.lock exists".to_string())),
        );
        h.dispatch("A", &["a"]).await;
        let before = std::fs::read(h.store().path()).unwrap();

        h.probe.set_online(true);
        let (outcome, events) = h.drain().await;

        assert!(matches!(
            outcome,
            DrainOutcome::Halted {
                reason: HaltReason::Local(_),
                remaining: 1,
                ..
            }
        ));
        assert!(matches!(&events[..], [Event::DrainHalted { .. }]));
        assert!(!h
            .repo
            .operations()
            .iter()
            .any(|op| matches!(op, MockOperation::Push { .. })));
        assert_eq!(std::fs::read(h.store().path()).unwrap(), before);
    }

    #[tokio::test]
    async fn new_commits_queue_behind_old_ones() {
        let h = Harness::new(MockRepo::new());
        h.dispatch("old", &["a"]).await;

        h.probe.set_online(true);
        let mut events = Vec::new();
        h.engine
            .commit(msg("new"), paths(&["b"]), &mut events)
            .await
            .unwrap();

        assert_eq!(h.repo.pushed_messages(), vec!["old", "new"]);
        assert!(matches!(events.last(), Some(Event::Status(_))));
    }

    #[tokio::test]
    async fn corrupt_queue_ends_the_invocation_and_is_preserved() {
        let h = Harness::new(MockRepo::new());
        std::fs::create_dir_all(h.store().path().parent().unwrap()).unwrap();
        std::fs::write(h.store().path(), "{ not a queue").unwrap();
        h.probe.set_online(true);

        let mut events = Vec::new();
        let drained = h.engine.drain(&mut events).await;
        let dispatched = h
            .engine
            .dispatch(msg("x"), paths(&["a"]), &mut events)
            .await;

        assert!(matches!(drained, Err(EngineError::CorruptState { .. })));
        assert!(matches!(dispatched, Err(EngineError::CorruptState { .. })));
        assert!(h.repo.operations().is_empty(), "nothing committed past a corrupt queue");
        assert_eq!(
            std::fs::read_to_string(h.store().path()).unwrap(),
            "{ not a queue"
        );
    }
}

// =============================================================================
// Report
// =============================================================================

mod report {
    use super::*;

    #[test]
    fn clean_repository_with_empty_queue_is_synced_every_time() {
        let h = Harness::new(MockRepo::new());

        for _ in 0..3 {
            let mut events = Vec::new();
            let summary = h.engine.report(&mut events).unwrap();
            assert!(summary.is_fully_synced());
        }
        assert!(!h.store().path().exists(), "report must not create state");
    }

    #[test]
    fn fetch_failure_is_degraded_not_synced() {
        let h = Harness::new(MockRepo::new().fail_on(FailOn::Fetch(network_failure())));

        let mut events = Vec::new();
        let summary = h.engine.report(&mut events).unwrap();

        assert!(matches!(summary.unpushed, Unpushed::FetchFailed(_)));
        assert!(!summary.is_fully_synced());
    }

    #[tokio::test]
    async fn report_enumerates_every_set() {
        let h = Harness::new(MockRepo::new().with_local_commit("local only"));
        h.repo.set_uncommitted(paths(&["dirty.rs"]));
        h.dispatch("offline work", &["b.py"]).await;

        let mut events = Vec::new();
        let summary = h.engine.report(&mut events).unwrap();

        assert_eq!(summary.uncommitted, paths(&["dirty.rs"]));
        match &summary.unpushed {
            Unpushed::Known(commits) => {
                assert_eq!(commits.len(), 1);
                assert_eq!(commits[0].summary, "local only");
            }
            other => panic!("expected known unpushed commits, got {:?}", other),
        }
        assert_eq!(messages(&summary.queued), vec!["offline work"]);
    }

    #[test]
    fn queue_listing_reflects_disk() {
        let h = Harness::new(MockRepo::new());
        let record = QueueRecord::new(
            msg("listed"),
            paths(&["a", "b"]),
            QueueTimestamp::parse("2025-01-01 12:00:00").unwrap(),
        )
        .unwrap();
        h.store().append(record.clone()).unwrap();

        let mut events = Vec::new();
        let listed = h.engine.list_queue(&mut events).unwrap();

        assert_eq!(listed, vec![record.clone()]);
        assert_eq!(
            events,
            vec![Event::QueueListing {
                records: vec![record]
            }]
        );
    }
}
