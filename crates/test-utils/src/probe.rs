use std::collections::{BTreeSet, HashSet};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Records which tasks were observed running at the same time.
///
/// Actions call [`OverlapProbe::run`] around their body; the probe notes
/// every other task active at the moment one enters.
#[derive(Debug, Default)]
pub struct OverlapProbe {
    inner: Mutex<ProbeState>,
}

#[derive(Debug, Default)]
struct ProbeState {
    active: HashSet<String>,
    overlaps: BTreeSet<(String, String)>,
    peak: usize,
}

fn pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl OverlapProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, task: &str) {
        let mut state = self.inner.lock().unwrap();
        let others: Vec<String> = state.active.iter().cloned().collect();
        for other in others {
            state.overlaps.insert(pair(task, &other));
        }
        state.active.insert(task.to_string());
        state.peak = state.peak.max(state.active.len());
    }

    pub fn exit(&self, task: &str) {
        self.inner.lock().unwrap().active.remove(task);
    }

    /// Mark `task` active for `hold`, then inactive.
    pub fn run(&self, task: &str, hold: Duration) {
        self.enter(task);
        thread::sleep(hold);
        self.exit(task);
    }

    pub fn overlapped(&self, a: &str, b: &str) -> bool {
        self.inner.lock().unwrap().overlaps.contains(&pair(a, b))
    }

    pub fn any_overlap(&self) -> bool {
        !self.inner.lock().unwrap().overlaps.is_empty()
    }

    /// Largest number of tasks seen active at once.
    pub fn peak(&self) -> usize {
        self.inner.lock().unwrap().peak
    }
}
