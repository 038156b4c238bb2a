pub mod ledger;
pub mod locks;
pub mod matches;
pub mod tournaments;

use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::database::DbPool;

pub use locks::TournamentLocks;
pub use matches::MatchService;
pub use tournaments::TournamentService;

/// Both services over one pool, sharing the per-tournament locks.
pub struct Services {
    pub tournaments: TournamentService,
    pub matches: MatchService,
}

impl Services {
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        let locks = Arc::new(TournamentLocks::new());
        Self {
            tournaments: TournamentService::new(config.clone(), pool.clone(), Arc::clone(&locks)),
            matches: MatchService::new(config, pool, locks),
        }
    }
}
