//! This module provides the opt-in logging hook for the composite-id library.
//!
//! The library itself only emits through the `log` facade: `debug!` when a schema
//! is built or a computed block runs, `trace!` for every encode, decode and lookup.
//! Hosts that already install a logger need nothing from here.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::CompositeIdError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `level`, writing `[LEVEL] message` lines to stderr
/// or, when `log_file` is given, appending them to that file.
///
/// Only the first call installs a logger; later calls are no-ops.
pub fn enable_verbose_logging(
    level: LevelFilter,
    log_file: Option<&Path>,
) -> Result<(), CompositeIdError> {
    // Opened outside `call_once` so I/O failures reach the caller.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

/// Installs a test-friendly logger that respects `RUST_LOG`. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
