use std::ffi::OsString;
use std::time::Duration;

use clap::{Arg, ArgAction, Command, value_parser};
use engine::{Algorithm, ConfigError, EngineConfig};
use logging::VerbosityConfig;

/// Program name used in diagnostics.
pub const PROGRAM_NAME: &str = "accel-sum";

/// Which backend drives the shared engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineKind {
    /// Compression functions run on the calling thread.
    Software,
    /// Register-level driver over the in-memory peripheral model.
    Simulated,
}

/// Fully parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    pub(crate) algorithm: Algorithm,
    pub(crate) engine: EngineKind,
    pub(crate) config: EngineConfig,
    pub(crate) verbosity: VerbosityConfig,
    pub(crate) files: Vec<OsString>,
}

/// Errors found after clap accepted the command line.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ArgsError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid --{option} value: {message}")]
    Flags {
        option: &'static str,
        message: String,
    },
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print message digests computed on a shared block hash engine.")
        .arg(
            Arg::new("algorithm")
                .long("algorithm")
                .short('a')
                .value_name("ALG")
                .help("Digest algorithm: md5, sha1, sha224 or sha256.")
                .default_value("sha256")
                .value_parser(|value: &str| value.parse::<Algorithm>()),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_name("KIND")
                .help("Engine backend.")
                .default_value("software")
                .value_parser(["software", "simulated"]),
        )
        .arg(
            Arg::new("lock-timeout-ms")
                .long("lock-timeout-ms")
                .value_name("MS")
                .help("Give up waiting for the engine after MS milliseconds.")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("busy-poll-limit")
                .long("busy-poll-limit")
                .value_name("N")
                .help("Report a fault after N busy polls of the simulated peripheral.")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Debug flags, e.g. lock2,engine (engine, lock, stream, final, all).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Info flags, e.g. stats (session, stats, all).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .help("Files to hash; '-' or none reads standard input.")
                .num_args(0..)
                .value_parser(clap::builder::OsStringValueParser::new()),
        )
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, ArgsError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let algorithm = matches
        .remove_one::<Algorithm>("algorithm")
        .unwrap_or(Algorithm::Sha256);
    let engine = match matches.remove_one::<String>("engine").as_deref() {
        Some("simulated") => EngineKind::Simulated,
        _ => EngineKind::Software,
    };

    let config = EngineConfig::builder()
        .lock_timeout(
            matches
                .remove_one::<u64>("lock-timeout-ms")
                .map(Duration::from_millis),
        )
        .busy_poll_limit(matches.remove_one::<u64>("busy-poll-limit"))
        .build()?;

    let mut verbosity = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
    for list in matches.remove_many::<String>("debug").into_iter().flatten() {
        verbosity
            .apply_debug_list(&list)
            .map_err(|message| ArgsError::Flags {
                option: "debug",
                message,
            })?;
    }
    for list in matches.remove_many::<String>("info").into_iter().flatten() {
        verbosity
            .apply_info_list(&list)
            .map_err(|message| ArgsError::Flags {
                option: "info",
                message,
            })?;
    }

    let files = matches
        .remove_many::<OsString>("files")
        .map(Iterator::collect)
        .unwrap_or_default();

    Ok(ParsedArgs {
        algorithm,
        engine,
        config,
        verbosity,
        files,
    })
}
