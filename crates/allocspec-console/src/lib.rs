//! Colorful console output for specification changes and solves.
//!
//! Provides a custom `tracing` layer that formats AllocSpec events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Solve lifecycle (start, end)
//! - **WARN**: Rejected changes and failed solves
//! - **ERROR**: Invariant violations found in `full_assert` mode
//! - **DEBUG**: Every applied or no-op change, backend verdicts
//! - **TRACE**: Individual search branches

mod format;


use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "allocspec=info,allocspec_engine=info,allocspec_compiler=info";

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and installs the tracing subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(AllocSpecConsoleLayer)
            .try_init();
    });
}

// Seconds since init, or zero before it.
fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

fn print_banner() {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(
        stdout,
        "{} {}",
        "AllocSpec".bright_cyan().bold(),
        format!("v{VERSION} - allocation specification engine").bright_white()
    );
    let _ = stdout.flush();
}

/// A tracing layer that formats AllocSpec events with colors.
pub struct AllocSpecConsoleLayer;

impl<S: Subscriber> Layer<S> for AllocSpecConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("allocspec") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format::format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventVisitor {
    pub event: Option<String>,
    pub kind: Option<String>,
    pub result: Option<String>,
    pub error: Option<String>,
    pub reason: Option<String>,
    pub constraint: Option<String>,
    pub var: Option<String>,
    pub violation: Option<String>,
    pub version: Option<u64>,
    pub event_id: Option<u64>,
    pub vars: Option<u64>,
    pub constraints: Option<u64>,
    pub assigned: Option<u64>,
    pub core_size: Option<u64>,
    pub removed: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "kind" => &mut self.kind,
            "result" => &mut self.result,
            "error" => &mut self.error,
            "reason" => &mut self.reason,
            "constraint" => &mut self.constraint,
            "var" => &mut self.var,
            "violation" => &mut self.violation,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "version" => self.version = Some(value),
            "event_id" => self.event_id = Some(value),
            "vars" => self.vars = Some(value),
            "constraints" => self.constraints = Some(value),
            "assigned" => self.assigned = Some(value),
            "core_size" => self.core_size = Some(value),
            "removed" => self.removed = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }
}
