//! The six-task scenario over shared integers X, Y and Z.
//!
//! ```text
//! T1: X = 5            T2: Y = 3            T4: Z = 10
//! T3: X = X*X, Y = Y*Y         after T1, T2
//! T5: Z = Z + X + Y            after T3, T4
//! T6: Z = Z + 5                after T5
//! ```
//!
//! Final Z is 49 whichever strategy runs it.

use std::thread;
use std::time::Duration;

use maxpar::{Precedence, SharedStore, Task};

use crate::builders::precedence;

pub type Store = SharedStore<i64>;

pub const EXPECTED_Z: i64 = 49;

/// Fresh state: X, Y and Z all zero.
pub fn six_task_state() -> Store {
    SharedStore::new([("X", 0), ("Y", 0), ("Z", 0)])
}

/// The six tasks, registered in a scrambled order, each sleeping `delay`
/// before touching state.
pub fn six_task_scenario(delay: Duration) -> (Vec<Task<Store>>, Precedence) {
    let t1 = Task::new("T1", Vec::<String>::new(), ["X"], move |s: &Store| {
        thread::sleep(delay);
        s.set("X", 5)
    });
    let t2 = Task::new("T2", Vec::<String>::new(), ["Y"], move |s: &Store| {
        thread::sleep(delay);
        s.set("Y", 3)
    });
    let t3 = Task::new("T3", ["X", "Y"], ["X", "Y"], move |s: &Store| {
        thread::sleep(delay);
        s.update("X", |x| *x *= *x)?;
        s.update("Y", |y| *y *= *y)
    });
    let t4 = Task::new("T4", Vec::<String>::new(), ["Z"], move |s: &Store| {
        thread::sleep(delay);
        s.set("Z", 10)
    });
    let t5 = Task::new("T5", ["X", "Y", "Z"], ["Z"], move |s: &Store| {
        thread::sleep(delay);
        let x = s.get("X")?;
        let y = s.get("Y")?;
        s.update("Z", |z| *z += x + y)
    });
    let t6 = Task::new("T6", ["Z"], ["Z"], move |s: &Store| {
        thread::sleep(delay);
        s.update("Z", |z| *z += 5)
    });

    let tasks = vec![t5, t3, t6, t4, t2, t1];
    let precedence = precedence(&[
        ("T1", &[]),
        ("T2", &[]),
        ("T4", &[]),
        ("T3", &["T1", "T2"]),
        ("T5", &["T3", "T4"]),
        ("T6", &["T5"]),
    ]);

    (tasks, precedence)
}
