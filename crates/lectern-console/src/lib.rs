//! Colored console output for scheduling runs.
//!
//! Provides a custom `tracing` layer that formats Lectern events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve, phase, materialize and audit start/end)
//! - **WARN**: Fallback placements and skipped records
//! - **DEBUG**: Per-generation and per-temperature progress

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Honours
/// `RUST_LOG`, defaulting to `info` for the Lectern crates. If another
/// global subscriber is already installed, it is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::builder()
            .with_default_directive(default_directive("lectern_solver=info"))
            .from_env_lossy();
        for directive in ["lectern=info", "lectern_core=info"] {
            filter = filter.add_directive(default_directive(directive));
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(LecternConsoleLayer)
            .try_init();
    });
}

fn default_directive(directive: &str) -> Directive {
    directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 _              _
| |    ___  ___| |_ ___ _ __ _ __
| |   / _ \/ __| __/ _ \ '__| '_ \
| |__|  __/ (__| ||  __/ |  | | | |
|_____\___|\___|\__\___|_|  |_| |_|
"#;

    let version_line = format!("          v{VERSION} - Course Timetabling Engine\n");

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats Lectern events with colors.
pub struct LecternConsoleLayer;

impl<S: Subscriber> Layer<S> for LecternConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("lectern") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    strategy: Option<String>,
    phase: Option<String>,
    score: Option<String>,
    issue: Option<String>,
    reason: Option<String>,
    section: Option<String>,
    period: Option<String>,
    phase_index: Option<u64>,
    steps: Option<u64>,
    duration_ms: Option<u64>,
    section_count: Option<u64>,
    room_count: Option<u64>,
    timeslot_count: Option<u64>,
    moves_evaluated: Option<u64>,
    fallback_placements: Option<u64>,
    records: Option<u64>,
    skipped: Option<u64>,
    removed: Option<u64>,
    room_conflicts: Option<u64>,
    lecturer_conflicts: Option<u64>,
    flagged: Option<u64>,
    feasible: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "strategy" => self.strategy = Some(s),
            "phase" => self.phase = Some(s),
            "score" => self.score = Some(s),
            "issue" => self.issue = Some(s),
            "reason" => self.reason = Some(s),
            "section" => self.section = Some(s),
            "period" => self.period = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "steps" => self.steps = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "section_count" => self.section_count = Some(value),
            "room_count" => self.room_count = Some(value),
            "timeslot_count" => self.timeslot_count = Some(value),
            "moves_evaluated" => self.moves_evaluated = Some(value),
            "fallback_placements" => self.fallback_placements = Some(value),
            "records" => self.records = Some(value),
            "skipped" => self.skipped = Some(value),
            "removed" => self.removed = Some(value),
            "room_conflicts" => self.room_conflicts = Some(value),
            "lecturer_conflicts" => self.lecturer_conflicts = Some(value),
            "flagged" => self.flagged = Some(value),
            "section" => self.section = Some(value.to_string()),
            "period" => self.period = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "feasible" {
            self.feasible = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "score" => self.score = Some(value.to_string()),
            "issue" => self.issue = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "infeasible_assignment" => format_infeasible(v),
        "materialize_end" => format_materialize_end(v),
        "materialize_skipped" if level <= Level::WARN => format_skipped(v),
        "audit_end" => format_audit_end(v),
        "schedule_cleared" => format_cleared(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let strategy = v.strategy.as_deref().unwrap_or("unknown");
    let sections = v.section_count.unwrap_or(0);
    let rooms = v.room_count.unwrap_or(0);
    let timeslots = v.timeslot_count.unwrap_or(0);

    format!(
        "{} {} Solving ({}) │ {} sections │ {} rooms │ {} timeslots │ scale {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        strategy.white().bold(),
        count(v.section_count).bright_yellow(),
        count(v.room_count).bright_yellow(),
        count(v.timeslot_count).bright_yellow(),
        calculate_problem_scale(sections as usize, (rooms * timeslots) as usize).bright_magenta()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let feasible = v.feasible.unwrap_or(false);
    let fallbacks = v.fallback_placements.unwrap_or(0);

    let status = if feasible {
        "CONFLICT-FREE".bright_green().bold().to_string()
    } else {
        "CONFLICTED".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {} moves │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_score(score, feasible),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.moves_evaluated).white(),
        status
    );
    if fallbacks > 0 {
        output.push_str(&format!(
            " │ {} fallback placements",
            count(Some(fallbacks)).bright_red()
        ));
    }
    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} ({}) started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let score = v.score.as_deref().unwrap_or("N/A");

    format!(
        "{} {} {} ({}) ended │ {} │ {} steps │ best {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.steps).white(),
        format_score(score, score == "0")
    )
}

fn format_infeasible(v: &EventVisitor) -> String {
    format!(
        "{} {} Section {} placed at random: {}",
        format_elapsed(),
        "!".bright_red().bold(),
        v.section.as_deref().unwrap_or("?").bright_yellow(),
        v.issue.as_deref().unwrap_or("no free block").bright_black()
    )
}

fn format_materialize_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Materialized {} records for period {}",
        format_elapsed(),
        "✓".bright_green(),
        count(v.records).bright_yellow(),
        v.period.as_deref().unwrap_or("?").white().bold()
    );
    if v.skipped.unwrap_or(0) > 0 {
        output.push_str(&format!(" │ {} skipped", count(v.skipped).bright_red()));
    }
    output
}

fn format_skipped(v: &EventVisitor) -> String {
    format!(
        "{} {} Section {} skipped: {}",
        format_elapsed(),
        "✗".bright_red(),
        v.section.as_deref().unwrap_or("?").bright_yellow(),
        v.reason.as_deref().unwrap_or("unknown").bright_black()
    )
}

fn format_audit_end(v: &EventVisitor) -> String {
    let flagged = v.flagged.unwrap_or(0);
    let icon = if flagged == 0 {
        "✓".bright_green().to_string()
    } else {
        "!".bright_red().bold().to_string()
    };

    format!(
        "{} {} Audit of {} records │ {} room │ {} lecturer │ {} flagged",
        format_elapsed(),
        icon,
        count(v.records).white(),
        count(v.room_conflicts).yellow(),
        count(v.lecturer_conflicts).yellow(),
        count(Some(flagged)).bright_magenta().bold()
    )
}

fn format_cleared(v: &EventVisitor) -> String {
    format!(
        "{} {} Cleared {} records for period {}",
        format_elapsed(),
        "■".bright_cyan(),
        count(v.removed).bright_yellow(),
        v.period.as_deref().unwrap_or("?").white().bold()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

// Penalties are non-negative; zero is perfect.
fn format_score(score: &str, feasible: bool) -> String {
    match score.parse::<i64>() {
        Ok(0) => score.bright_green().bold().to_string(),
        Ok(n) => {
            let formatted = n.to_formatted_string(&Locale::en);
            if feasible {
                formatted.yellow().to_string()
            } else {
                formatted.bright_red().to_string()
            }
        }
        Err(_) => score.white().to_string(),
    }
}

// candidates ^ sections, as mantissa x 10^exponent
fn calculate_problem_scale(section_count: usize, candidate_count: usize) -> String {
    if section_count == 0 || candidate_count == 0 {
        return "0".to_string();
    }

    let log_scale = (section_count as f64) * (candidate_count as f64).log10();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}
