//! Diagnostic logging setup.
//!
//! User-facing progress goes through [`crate::output`]; this is the `log`
//! side channel for debugging a build. `RUST_LOG` is read first and the
//! command-line verbosity is applied on top.

use log::LevelFilter;

/// Level for the given verbosity flags. `quiet` wins over `verbose`.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Initialize the global logger. Call once, from `main`.
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = level_for(verbose, quiet);

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    log::debug!("Logger initialized with level: {level:?}");
}
