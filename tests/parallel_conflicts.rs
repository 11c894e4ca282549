// tests/parallel_conflicts.rs

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use maxpar::{ConflictRule, EngineOptions, ExecutorId, Task, TaskSystem};
use maxpar_test_utils::builders::precedence;
use maxpar_test_utils::probe::OverlapProbe;
use maxpar_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const HOLD: Duration = Duration::from_millis(60);
const RUNS: usize = 5;

fn probed(name: &'static str, reads: &[&str], writes: &[&str]) -> Task<OverlapProbe> {
    Task::new(
        name,
        reads.iter().copied(),
        writes.iter().copied(),
        move |probe: &OverlapProbe| {
            probe.run(name, HOLD);
            Ok(())
        },
    )
}

fn pair_system(a: Task<OverlapProbe>, b: Task<OverlapProbe>) -> TaskSystem<OverlapProbe> {
    let p = precedence(&[(a.name(), &[]), (b.name(), &[])]);
    TaskSystem::new(vec![a, b], &p).expect("independent pair is valid")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_ready_tasks_run_concurrently() -> TestResult {
    init_tracing();
    let ts = pair_system(probed("A", &["P"], &["X"]), probed("B", &["P"], &["Y"]));

    let mut seen_together = false;
    for _ in 0..RUNS {
        let probe = Arc::new(OverlapProbe::new());
        let report = with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;
        assert_eq!(report.completed.len(), 2);
        if probe.overlapped("A", "B") {
            seen_together = true;
            break;
        }
    }

    assert!(seen_together, "A and B never overlapped in {RUNS} runs");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn read_write_overlap_is_never_co_scheduled() -> TestResult {
    init_tracing();
    let ts = pair_system(probed("writer", &[], &["X"]), probed("reader", &["X"], &["Y"]));

    for _ in 0..RUNS {
        let probe = Arc::new(OverlapProbe::new());
        let report = with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;

        assert_eq!(report.completed.len(), 2);
        assert_eq!(report.max_parallelism, 1);
        assert!(!probe.overlapped("writer", "reader"));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn write_read_overlap_is_symmetric() -> TestResult {
    // Same as above with the reader registered first.
    let ts = pair_system(probed("reader", &["X"], &[]), probed("writer", &["Q"], &["X"]));

    for _ in 0..RUNS {
        let probe = Arc::new(OverlapProbe::new());
        with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;
        assert!(!probe.any_overlap());
    }
    Ok(())
}

/// Two tasks that write the same key but read disjoint keys are allowed to
/// run together under the default rule. This is a data race on `Z` that the
/// read/write rule does not catch; `ConflictRule::Strict` closes it.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn write_write_overlap_runs_together_under_default_rule() -> TestResult {
    let ts = pair_system(probed("W1", &["A"], &["Z"]), probed("W2", &["B"], &["Z"]));
    assert_eq!(ts.options().conflict_rule, ConflictRule::ReadWrite);

    let mut raced = false;
    for _ in 0..RUNS {
        let probe = Arc::new(OverlapProbe::new());
        with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;
        if probe.overlapped("W1", "W2") {
            raced = true;
            break;
        }
    }

    assert!(raced, "write/write pair was expected to overlap");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn strict_rule_serialises_write_write_overlap() -> TestResult {
    let ts = pair_system(probed("W1", &["A"], &["Z"]), probed("W2", &["B"], &["Z"]))
        .with_options(EngineOptions {
            conflict_rule: ConflictRule::Strict,
            ..EngineOptions::default()
        });

    for _ in 0..RUNS {
        let probe = Arc::new(OverlapProbe::new());
        let report = with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;
        assert_eq!(report.max_parallelism, 1);
        assert!(!probe.overlapped("W1", "W2"));
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_ceiling_is_respected() -> TestResult {
    let names = ["a", "b", "c", "d", "e", "f"];
    let tasks: Vec<Task<OverlapProbe>> = names.into_iter().map(|n| probed(n, &[], &[n])).collect();
    let entries: Vec<(&str, &[&str])> = names.iter().map(|n| (*n, &[][..])).collect();
    let ts = TaskSystem::new(tasks, &precedence(&entries))?.with_options(EngineOptions {
        max_concurrency: NonZeroUsize::new(2),
        ..EngineOptions::default()
    });

    let probe = Arc::new(OverlapProbe::new());
    let report = with_timeout(ts.run_parallel(Arc::clone(&probe))).await?;

    assert_eq!(report.completed.len(), names.len());
    assert!(report.max_parallelism <= 2, "report: {report:?}");
    assert!(probe.peak() <= 2, "probe peak {}", probe.peak());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unbounded_by_default() -> TestResult {
    let names = ["a", "b", "c", "d"];
    let tasks: Vec<Task<OverlapProbe>> = names.into_iter().map(|n| probed(n, &[], &[n])).collect();
    let entries: Vec<(&str, &[&str])> = names.iter().map(|n| (*n, &[][..])).collect();
    let ts = TaskSystem::new(tasks, &precedence(&entries))?;

    let report = with_timeout(ts.run_parallel(Arc::new(OverlapProbe::new()))).await?;

    // All four start in the first pass, before any of them can finish.
    assert_eq!(report.max_parallelism, names.len());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn start_events_follow_the_logging_toggle() -> TestResult {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ts = pair_system(probed("A", &[], &["X"]), probed("B", &[], &["Y"])).with_event_sink(tx);

    with_timeout(ts.run_parallel(Arc::new(OverlapProbe::new()))).await?;
    let mut started = Vec::new();
    while let Ok(event) = rx.try_recv() {
        assert!(matches!(event.executor, ExecutorId::Unit(_)));
        started.push(event.task);
    }
    started.sort();
    assert_eq!(started, vec!["A", "B"]);

    ts.set_logging(false);
    with_timeout(ts.run_parallel(Arc::new(OverlapProbe::new()))).await?;
    assert!(rx.try_recv().is_err(), "no events expected with logging disabled");

    ts.set_logging(true);
    ts.run_sequential(&OverlapProbe::new())?;
    let event = rx.try_recv()?;
    assert_eq!(event.executor, ExecutorId::Caller(std::thread::current().id()));
    Ok(())
}
