// tests/six_task_scenario.rs

use std::sync::Arc;
use std::time::Duration;

use maxpar::TaskSystem;
use maxpar_test_utils::init_tracing;
use maxpar_test_utils::scenario::{EXPECTED_Z, Store, six_task_scenario, six_task_state};
use maxpar_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn system(delay: Duration) -> TaskSystem<Store> {
    let (tasks, precedence) = six_task_scenario(delay);
    TaskSystem::new(tasks, &precedence).expect("scenario is valid")
}

#[test]
fn dependencies_are_transitive_and_exclude_the_task() -> TestResult {
    let ts = system(Duration::ZERO);

    assert!(ts.get_dependencies("T1")?.is_empty());
    assert!(ts.get_dependencies("T4")?.is_empty());

    let t3 = ts.get_dependencies("T3")?;
    assert_eq!(t3, vec!["T1".to_string(), "T2".to_string()]);

    let t6 = ts.get_dependencies("T6")?;
    assert_eq!(t6.len(), 5);
    assert!(!t6.contains(&"T6".to_string()));
    for name in ["T1", "T2", "T3", "T4", "T5"] {
        assert!(t6.iter().any(|d| d == name), "{name} missing from {t6:?}");
    }
    let pos = |n: &str| t6.iter().position(|d| d == n).unwrap();
    assert!(pos("T1") < pos("T3"));
    assert!(pos("T3") < pos("T5"));
    assert!(pos("T4") < pos("T5"));

    Ok(())
}

#[test]
fn sequential_run_ends_with_z_49() -> TestResult {
    init_tracing();
    let ts = system(Duration::from_millis(1));
    let state = six_task_state();

    let report = ts.run_sequential(&state)?;

    assert_eq!(state.get("X")?, 25);
    assert_eq!(state.get("Y")?, 9);
    assert_eq!(state.get("Z")?, EXPECTED_Z);
    assert_eq!(report.started.len(), 6);
    assert_eq!(report.started, report.completed);
    assert_eq!(report.max_parallelism, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_run_ends_with_z_49() -> TestResult {
    init_tracing();
    let ts = system(Duration::from_millis(20));
    let state = Arc::new(six_task_state());

    let report = with_timeout(ts.run_parallel(Arc::clone(&state))).await?;

    assert_eq!(state.get("Z")?, EXPECTED_Z);
    assert_eq!(report.completed.len(), 6);
    assert!(report.is_success());
    // T1, T2 and T4 are independent and conflict-free.
    assert!(report.max_parallelism >= 2, "report: {report:?}");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn both_strategies_agree_on_final_state() -> TestResult {
    init_tracing();
    let ts = system(Duration::from_millis(2));

    let seq_state = six_task_state();
    ts.run_sequential(&seq_state)?;

    for _ in 0..5 {
        let par_state = Arc::new(six_task_state());
        with_timeout(ts.run_parallel(Arc::clone(&par_state))).await?;
        assert_eq!(par_state.snapshot()?, seq_state.snapshot()?);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_run_never_starts_a_task_before_its_dependencies_complete() -> TestResult {
    let ts = system(Duration::from_millis(5));

    for _ in 0..3 {
        let report = with_timeout(ts.run_parallel(Arc::new(six_task_state()))).await?;

        for name in &report.started {
            let start_pos = report.started.iter().position(|n| n == name).unwrap();
            for dep in ts.get_dependencies(name)? {
                let dep_done = report.completed.iter().position(|n| *n == dep).unwrap();
                let dep_started = report.started.iter().position(|n| *n == dep).unwrap();
                assert!(dep_started < start_pos, "{dep} started after {name}");
                // Every dependency completed before this task was even started,
                // so it cannot be completed after this task.
                let own_done = report.completed.iter().position(|n| n == name).unwrap();
                assert!(dep_done < own_done, "{dep} completed after {name}");
            }
        }
    }
    Ok(())
}
