use std::collections::HashSet;

use tokio::sync::Mutex;

/// The set of target URLs already handed to a worker during this run.
///
/// Workers race to claim each target. The membership test and the insert
/// happen under a single lock acquisition, so a given URL can be claimed
/// exactly once per run; the lock is never held across a network call.
/// There is no removal: entries live until the run's registry is dropped.
#[derive(Debug, Default)]
pub struct ClaimSet {
    visited: Mutex<HashSet<String>>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff this call newly claimed the target, making the
    /// caller responsible for probing it.
    pub async fn claim(&self, target: &str) -> bool {
        let mut visited = self.visited.lock().await;
        visited.insert(target.to_string())
    }

    pub async fn len(&self) -> usize {
        self.visited.lock().await.len()
    }
}
