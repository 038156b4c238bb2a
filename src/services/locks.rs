use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// In-process mutual exclusion per tournament id.
///
/// Every read-modify-write of a tournament (round generation, result
/// submission, rollback, deletion) runs while holding that tournament's lock.
#[derive(Debug, Default)]
pub struct TournamentLocks {
    locks: Mutex<HashMap<i32, Arc<Mutex<()>>>>,
}

impl TournamentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, tournament_id: i32) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(tournament_id).or_default())
    }

    /// Runs `f` while no other caller holds the lock of `tournament_id`.
    pub fn with_lock<T>(&self, tournament_id: i32, f: impl FnOnce() -> T) -> T {
        let handle = self.handle(tournament_id);
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
