pub mod config;
pub mod session;
pub mod stats;
pub mod status;

use pulsetrack_core::storage::{KvStore, TRACKER_STATE_KEY};
use pulsetrack_core::{Config, Database, KvSessionRepository, Session, SessionRepository};

pub type Repo = KvSessionRepository<Database>;

pub fn open_repo() -> Result<Repo, Box<dyn std::error::Error>> {
    Ok(KvSessionRepository::new(Database::open()?))
}

/// Load the persisted session. A host that has never saved tracker state
/// starts at the configured default intensity.
pub fn load_session(repo: &Repo, config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
    let mut session = repo.load_session()?;
    if repo.store().kv_get(TRACKER_STATE_KEY)?.is_none() {
        session.set_intensity(config.default_intensity);
    }
    Ok(session)
}
