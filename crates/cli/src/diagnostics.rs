//! Tracing setup for the command line.
//!
//! `-v` and `--debug`/`--info` select `accel::*` targets; `ACCEL_HASH_LOG`
//! adds arbitrary `EnvFilter` directives on top. Events are rendered to
//! standard error and not retained.

use std::env;
use std::io::{self, Write};

use logging::VerbosityConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::args::PROGRAM_NAME;

/// Environment variable holding extra filter directives.
pub const LOG_ENV: &str = "ACCEL_HASH_LOG";

/// Joins the verbosity directives with any from the environment.
fn directives(config: &VerbosityConfig, extra: Option<&str>) -> String {
    [Some(config.filter_directives()), extra.map(str::to_owned)]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_owned())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global subscriber when any diagnostics were requested.
///
/// A second call in the same process keeps the first subscriber.
pub(crate) fn install<Err: Write>(config: &VerbosityConfig, stderr: &mut Err) {
    let extra = env::var(LOG_ENV).ok();
    let mut directives = directives(config, extra.as_deref());
    if directives.is_empty() {
        return;
    }

    let filter = match EnvFilter::try_new(&directives) {
        Ok(filter) => filter,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: ignoring {LOG_ENV}: {error}");
            directives = config.filter_directives();
            if directives.is_empty() {
                return;
            }
            EnvFilter::new(&directives)
        }
    };

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .without_time()
        .with_target(true)
        .with_filter(filter);
    let _ = tracing_subscriber::registry().with(layer).try_init();
}
