// src/logging.rs
// =============================================================================
// Logger initialization. Logs go to stderr so CLI output on stdout stays clean.
// =============================================================================

use std::io::Write;

use log::LevelFilter;

/// Sets up `env_logger` for the whole process.
///
/// `RUST_LOG` is read first and `level` is applied on top of it, so
/// `--log-level` always wins for this crate. The HTTP stack is capped at
/// `info` because its debug output drowns the validator's own lines.
///
/// Fails if a logger was already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    builder.filter_module("llmstxt_check", level);

    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5} {}] {}",
            buf.timestamp_seconds(),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder.try_init()
}
