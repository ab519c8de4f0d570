//! Round-robin pool of interchangeable hosts.

use std::sync::Mutex;

use tracing::warn;

/// Rotates over a list of hosts, dropping the ones that fail.
///
/// Once every host has been evicted the pool is refilled from the original
/// list, so a transient outage of all hosts does not disable lookups for
/// the rest of the process.
pub struct HostRotation {
    hosts: Vec<String>,
    state: Mutex<RotationState>,
}

struct RotationState {
    active: Vec<String>,
    next: usize,
}

impl HostRotation {
    pub fn new(hosts: Vec<String>) -> Self {
        let state = RotationState {
            active: hosts.clone(),
            next: 0,
        };
        Self {
            hosts,
            state: Mutex::new(state),
        }
    }

    /// Next host to use, or `None` when the pool was configured empty.
    pub fn next(&self) -> Option<String> {
        let mut state = self.state.lock().unwrap();
        if state.active.is_empty() {
            state.active = self.hosts.clone();
            state.next = 0;
        }
        if state.active.is_empty() {
            return None;
        }
        let idx = state.next % state.active.len();
        state.next = idx + 1;
        Some(state.active[idx].clone())
    }

    /// Remove a host after a failure.
    pub fn evict(&self, host: &str) {
        let mut state = self.state.lock().unwrap();
        let before = state.active.len();
        state.active.retain(|h| h != host);
        if state.active.len() < before {
            warn!(host = %host, remaining = state.active.len(), "Evicted search host");
        }
    }

    /// Number of hosts currently in rotation.
    pub fn active_count(&self) -> usize {
        self.state.lock().unwrap().active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> HostRotation {
        HostRotation::new(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    }

    #[test]
    fn test_round_robin() {
        let rotation = pool();
        let picked: Vec<String> = (0..4).filter_map(|_| rotation.next()).collect();
        assert_eq!(picked, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_evicted_host_is_skipped() {
        let rotation = pool();
        rotation.evict("b");
        assert_eq!(rotation.active_count(), 2);
        let picked: Vec<String> = (0..3).filter_map(|_| rotation.next()).collect();
        assert_eq!(picked, vec!["a", "c", "a"]);
    }

    #[test]
    fn test_refills_when_exhausted() {
        let rotation = pool();
        for host in ["a", "b", "c"] {
            rotation.evict(host);
        }
        assert_eq!(rotation.active_count(), 0);
        assert_eq!(rotation.next().as_deref(), Some("a"));
        assert_eq!(rotation.active_count(), 3);
    }

    #[test]
    fn test_empty_pool() {
        let rotation = HostRotation::new(Vec::new());
        assert!(rotation.next().is_none());
    }
}
