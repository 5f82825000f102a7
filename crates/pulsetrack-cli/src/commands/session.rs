use pulsetrack_core::{now_ms, Config, SessionEvent, SessionRepository};

use super::{load_session, open_repo};

fn print_event(event: Option<SessionEvent>, ignored: &str) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
        None => println!(
            "{}",
            serde_json::json!({ "type": "ignored", "reason": ignored })
        ),
    }
    Ok(())
}

pub fn begin() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;
    let mut session = load_session(&repo, &config)?;
    let event = session.begin(now_ms());
    repo.save_session(&session)?;
    print_event(event, "interval already in progress")
}

pub fn end() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;
    let mut session = load_session(&repo, &config)?;
    let event = session.end(now_ms());
    repo.save_session(&session)?;
    print_event(event, "no interval in progress")
}

pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;
    let mut session = load_session(&repo, &config)?;
    let event = session.clear();
    repo.save_session(&session)?;
    print_event(Some(event), "")
}

pub fn intensity(level: u8) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;
    let mut session = load_session(&repo, &config)?;
    let event = session.set_intensity(level);
    repo.save_session(&session)?;
    print_event(Some(event), "")
}
