//! Logging configuration and initialization.
//!
//! Builds a `tracing` subscriber from a preset (production, verbose, debug,
//! trace, quiet) plus per-target overrides given on the command line.
//! `RUST_LOG`, when set, replaces all of it.

use std::collections::BTreeMap;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Prefix shared by every log target in the workspace.
const TARGET_PREFIX: &str = "promptshelf";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging preset levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogPreset {
    /// Startup, API errors and store mutations
    #[default]
    Production,
    /// Adds per-request HTTP traces
    Verbose,
    /// Storage reads/writes and skipped import items
    Debug,
    Trace,
    /// Warnings and errors only
    Quiet,
}

impl LogPreset {
    /// Pick a preset from CLI flags. Quiet beats trace beats debug beats verbose.
    pub fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> Self {
        match (quiet, trace, debug, verbose) {
            (true, ..) => LogPreset::Quiet,
            (_, true, ..) => LogPreset::Trace,
            (_, _, true, _) => LogPreset::Debug,
            (_, _, _, true) => LogPreset::Verbose,
            _ => LogPreset::Production,
        }
    }

    fn directives(self) -> &'static [&'static str] {
        match self {
            LogPreset::Production => &[
                "promptshelf::startup=info",
                "promptshelf::api=info",
                "promptshelf::store=info",
                "promptshelf::storage=warn",
                "tower_http=warn",
            ],
            LogPreset::Verbose => &["promptshelf=info", "tower_http=info"],
            LogPreset::Debug => &["promptshelf=debug", "tower_http=debug"],
            LogPreset::Trace => &["promptshelf=trace", "tower_http=trace"],
            LogPreset::Quiet => &["promptshelf=warn", "tower_http=error"],
        }
    }
}

/// Logging configuration built from CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub preset: LogPreset,
    /// Per-target levels, keyed by full target name.
    pub overrides: BTreeMap<String, Level>,
    pub format: LogFormat,
}

impl LogConfig {
    /// Create a LogConfig from CLI flags and `--log target=level` values.
    ///
    /// Each value may hold several comma-separated pairs. Targets without the
    /// `promptshelf::` prefix get it added, except `tower_http`. Pairs with an
    /// unknown level are ignored.
    pub fn from_cli(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_overrides: &[String],
        format: LogFormat,
    ) -> Self {
        let overrides = log_overrides
            .iter()
            .flat_map(|value| value.split(','))
            .filter_map(|pair| {
                let (target, level) = pair.split_once('=')?;
                let level = level.trim().parse::<Level>().ok()?;
                Some((qualify_target(target.trim()), level))
            })
            .collect();

        Self {
            preset: LogPreset::from_flags(verbose, debug, trace, quiet),
            overrides,
            format,
        }
    }

    /// The filter directives this configuration produces, overrides last.
    pub fn directives(&self) -> Vec<String> {
        let mut directives: Vec<String> = self
            .preset
            .directives()
            .iter()
            .map(|d| d.to_string())
            .collect();
        for (target, level) in &self.overrides {
            directives.push(format!("{}={}", target, level.as_str().to_lowercase()));
        }
        directives
    }

    /// Build an EnvFilter, preferring `RUST_LOG` when it is set.
    pub fn build_filter(&self) -> EnvFilter {
        if let Ok(env_filter) = EnvFilter::try_from_default_env() {
            return env_filter;
        }
        EnvFilter::try_new(self.directives().join(",")).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn qualify_target(target: &str) -> String {
    if target == TARGET_PREFIX
        || target.starts_with(&format!("{}::", TARGET_PREFIX))
        || target == "tower_http"
    {
        target.to_string()
    } else {
        format!("{}::{}", TARGET_PREFIX, target)
    }
}

/// Initialize the global tracing subscriber.
pub fn init(config: &LogConfig) {
    let filter = config.build_filter();

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }
}
