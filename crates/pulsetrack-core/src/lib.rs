//! # Pulsetrack Core Library
//!
//! This library provides the core logic for Pulsetrack, a tracker for
//! discrete timed intervals entered in real time. It follows a CLI-first
//! philosophy: every operation is available through the standalone CLI
//! binary, and any graphical host is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Session**: append-only interval history driven by `begin`/`end`/`clear`
//!   commands. The core never reads the clock; the host passes `now`.
//! - **Layout**: turns the history into gap and bump segments along a time axis
//! - **Curve**: the normalized bump profile and its sampled paths
//! - **Rules**: backward streak scan plus session-wide frequency/duration averages
//! - **Viewport**: pan offset that keeps the newest content visible
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Session`]: interval state machine
//! - [`Frame`]: everything a renderer needs for one tick
//! - [`SessionRepository`]: load/save/clear capability injected by the host
//! - [`Config`]: application configuration management

pub mod curve;
pub mod error;
pub mod events;
pub mod frame;
pub mod interval;
pub mod layout;
pub mod rules;
pub mod session;
pub mod storage;
pub mod viewport;

pub use curve::{build_path, shape, CurvePath, PlotArea, Point};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::SessionEvent;
pub use frame::Frame;
pub use interval::{now_ms, InProgress, Interval, MIN_RECORDED_MS};
pub use layout::{build_layout, format_duration_label, Layout, LayoutConfig, Segment};
pub use rules::{badges, evaluate, RuleBadges, RuleThresholds, StreakResult};
pub use session::{Session, SessionStats, TrackerState};
pub use storage::{
    Config, Database, KvSessionRepository, KvStore, MemoryRepository, SessionRepository,
};
pub use viewport::{pan, ViewportConfig};
