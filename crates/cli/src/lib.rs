#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `accel-sum` front end: it parses the command line
//! with [`clap`](https://docs.rs/clap/), builds one shared engine, hashes
//! every file argument (or standard input) through its own session and
//! prints `md5sum`-style lines.
//!
//! # Design
//!
//! [`run`] accepts the argument iterator together with handles for standard
//! input, output and error so tests can drive it in-process. Files are
//! hashed concurrently on the rayon pool when the `parallel` feature is on;
//! results are always printed in argument order.
//!
//! # Errors
//!
//! Usage errors exit with `2`. A file that cannot be read or hashed is
//! reported as `accel-sum: <name>: <error>` and the run exits with `1` after
//! the remaining files are processed.
//!
//! # Examples
//!
//! ```
//! let mut stdin: &[u8] = b"abc";
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["accel-sum", "-a", "md5"], &mut stdin, &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert_eq!(stdout, b"900150983cd24fb0d6963f7d28e17f72  -\n");
//! ```

mod args;
mod diagnostics;

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use checksums::{Digest, ReadError, digest_reader};
use engine::{
    Algorithm, EngineConfig, EngineResult, PeripheralEngine, SharedEngine, SimulatedPeripheral,
    SoftwareEngine,
};

pub use args::{EngineKind, PROGRAM_NAME};
use args::{ArgsError, ParsedArgs, parse_args};

/// Exit status when every input was hashed.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when at least one input failed.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for command-line usage errors.
pub const EXIT_USAGE: i32 = 2;

const STDIN_NAME: &str = "-";

/// Runs `accel-sum` with the given arguments and I/O handles and returns
/// the process exit status.
pub fn run<I, S, In, Out, Err>(
    arguments: I,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: Read,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(ArgsError::Clap(error)) => return report_clap_error(&error, stdout, stderr),
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            return EXIT_USAGE;
        }
    };

    diagnostics::install(&parsed.verbosity, stderr);
    execute(parsed, stdin, stdout, stderr)
}

/// Converts a status returned by [`run`] into an [`ExitCode`](std::process::ExitCode).
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    std::process::ExitCode::from(status.clamp(0, i32::from(u8::MAX)) as u8)
}

/// Builds the shared engine for `kind`.
///
/// # Errors
///
/// Bring-up failures from the backend.
pub fn build_engine(kind: EngineKind, config: EngineConfig) -> EngineResult<Arc<SharedEngine>> {
    match kind {
        EngineKind::Software => SharedEngine::new(SoftwareEngine::new(), config),
        EngineKind::Simulated => {
            let backend = PeripheralEngine::new(SimulatedPeripheral::new())
                .with_busy_poll_limit(config.busy_poll_limit());
            SharedEngine::new(backend, config)
        }
    }
}

fn report_clap_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    use clap::error::ErrorKind;

    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{error}");
            EXIT_SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{error}");
            EXIT_USAGE
        }
    }
}

enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: OsString) -> Self {
        if arg == STDIN_NAME {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    fn display_name(&self) -> String {
        match self {
            Self::Stdin => STDIN_NAME.to_owned(),
            Self::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

fn execute<In, Out, Err>(parsed: ParsedArgs, stdin: &mut In, stdout: &mut Out, stderr: &mut Err) -> i32
where
    In: Read,
    Out: Write,
    Err: Write,
{
    let ParsedArgs {
        algorithm,
        engine: kind,
        config,
        files,
        ..
    } = parsed;

    let engine = match build_engine(kind, config) {
        Ok(engine) => engine,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: engine: {error}");
            return EXIT_FAILURE;
        }
    };

    let inputs: Vec<Input> = if files.is_empty() {
        vec![Input::Stdin]
    } else {
        files.into_iter().map(Input::from_arg).collect()
    };

    let paths: Vec<&Path> = inputs
        .iter()
        .filter_map(|input| match input {
            Input::File(path) => Some(path.as_path()),
            Input::Stdin => None,
        })
        .collect();
    let mut file_results = hash_files(&engine, algorithm, &paths).into_iter();

    let mut status = EXIT_SUCCESS;
    for input in &inputs {
        let result = match input {
            Input::Stdin => digest_reader(&engine, algorithm, &mut *stdin),
            Input::File(_) => match file_results.next() {
                Some(result) => result,
                None => continue,
            },
        };
        let name = input.display_name();
        match result {
            Ok(digest) => {
                if writeln!(stdout, "{digest}  {name}").is_err() {
                    return EXIT_FAILURE;
                }
            }
            Err(error) => {
                let _ = writeln!(stderr, "{PROGRAM_NAME}: {name}: {error}");
                status = EXIT_FAILURE;
            }
        }
    }

    engine.log_stats();
    status
}

#[cfg(feature = "parallel")]
fn hash_files(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    paths: &[&Path],
) -> Vec<Result<Digest, ReadError>> {
    checksums::parallel::digest_files(engine, algorithm, paths)
}

#[cfg(not(feature = "parallel"))]
fn hash_files(
    engine: &Arc<SharedEngine>,
    algorithm: Algorithm,
    paths: &[&Path],
) -> Vec<Result<Digest, ReadError>> {
    paths
        .iter()
        .map(|path| checksums::digest_file(engine, algorithm, path))
        .collect()
}
