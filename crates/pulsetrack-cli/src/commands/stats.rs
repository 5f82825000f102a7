use pulsetrack_core::Config;

use super::{load_session, open_repo};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;
    let session = load_session(&repo, &config)?;
    println!("{}", serde_json::to_string_pretty(&session.stats())?);
    Ok(())
}
