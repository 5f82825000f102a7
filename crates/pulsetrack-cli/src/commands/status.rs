use std::time::Duration;

use chrono::{Local, TimeZone};
use clap::Args;
use pulsetrack_core::{format_duration_label, now_ms, Config, Frame, Segment, Session};
use tracing::debug;

use super::{load_session, open_repo};

#[derive(Args)]
pub struct StatusArgs {
    /// Viewport width in pixels used for the pan offset
    #[arg(long)]
    width: Option<f64>,
    /// Disable follow mode for this call
    #[arg(long)]
    no_follow: bool,
    /// Print the full frame as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Stop after this many ticks (runs until interrupted if omitted)
    #[arg(long)]
    ticks: Option<u64>,
    /// Viewport width in pixels used for the pan offset
    #[arg(long)]
    width: Option<f64>,
    /// Print the full frame instead of a summary line
    #[arg(long)]
    full: bool,
}

pub fn status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if args.no_follow {
        config.viewport.follow = false;
    }
    let repo = open_repo()?;
    let session = load_session(&repo, &config)?;
    let frame = Frame::compute(&session, now_ms(), &config, args.width);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frame)?);
    } else {
        print!("{}", render_text(&session, &frame));
    }
    Ok(())
}

/// Drive the core from a periodic tick source.
///
/// The session is reloaded on every tick so commands issued from another
/// process show up on the next frame.
pub fn watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let repo = open_repo()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));
        let mut last_now = i64::MIN;
        let mut count = 0u64;
        loop {
            ticker.tick().await;
            // The tick source must never run backward.
            let now = now_ms().max(last_now);
            last_now = now;

            let session = load_session(&repo, &config)?;
            let frame = Frame::compute(&session, now, &config, args.width);
            debug!(tick = count, now, "frame computed");

            if args.full {
                println!("{}", serde_json::to_string(&frame)?);
            } else {
                println!("{}", summary_line(&session, &frame));
            }

            count += 1;
            if args.ticks.is_some_and(|n| count >= n) {
                break;
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn summary_line(session: &Session, frame: &Frame) -> serde_json::Value {
    serde_json::json!({
        "now": frame.now,
        "active": session.is_active(),
        "segments": frame.layout.segments.len(),
        "total_extent": frame.layout.total_extent,
        "pan_offset": frame.pan_offset,
        "streak_duration_ms": frame.streak.streak_duration_ms,
        "threshold_met": frame.streak.threshold_met,
    })
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "●"
    } else {
        "·"
    }
}

/// Bar length for an intensity, 0 to 10 blocks.
fn bar_len(intensity: f64) -> usize {
    if intensity.is_nan() {
        return 0;
    }
    (intensity.clamp(0.0, 1.0) * 10.0).round() as usize
}

fn clock(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into())
}

fn render_text(session: &Session, frame: &Frame) -> String {
    let mut out = String::new();
    let stats = &frame.stats;

    out.push_str(&format!(
        "intervals: {}   intensity: {}/10",
        stats.count,
        session.intensity()
    ));
    if let Some(open) = session.in_progress() {
        out.push_str(&format!(
            "   active: {}",
            format_duration_label(open.elapsed_ms(frame.now))
        ));
    }
    out.push('\n');

    let avg = |v: Option<f64>| {
        v.map(|ms| format_duration_label(ms.round() as i64))
            .unwrap_or_else(|| "-".into())
    };
    out.push_str(&format!(
        "avg interval: {}   avg duration: {}\n",
        avg(frame.streak.avg_interval_ms),
        avg(frame.streak.avg_duration_ms)
    ));

    match frame.streak.qualifying_start {
        Some(start) => out.push_str(&format!(
            "streak: {} since {}\n",
            format_duration_label(frame.streak.streak_duration_ms),
            clock(start)
        )),
        None => out.push_str("streak: none\n"),
    }

    out.push_str(&format!(
        "{} frequency  {} duration  {} ongoing\n",
        mark(frame.badges.frequency),
        mark(frame.badges.duration),
        mark(frame.badges.ongoing)
    ));

    out.push_str(&"─".repeat(50));
    out.push('\n');
    for seg in &frame.layout.segments {
        match seg {
            Segment::Gap { width, .. } => out.push_str(&format!(
                "  gap   {:>8.1}px  {}\n",
                width,
                seg.label().unwrap_or_default()
            )),
            Segment::Bump {
                width,
                intensity,
                active,
                ..
            } => out.push_str(&format!(
                "{} bump  {:>8.1}px  {}\n",
                if *active { "▶" } else { " " },
                width,
                "█".repeat(bar_len(*intensity))
            )),
        }
    }
    out.push_str(&"─".repeat(50));
    out.push_str(&format!(
        "\nextent: {:.1}px   pan: {:.1}px\n",
        frame.layout.total_extent, frame.pan_offset
    ));
    out
}
