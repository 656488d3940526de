//! Log sink for the binary
//!
//! `env_logger` with one JSON object per line. The filter defaults to `info`
//! and follows `RUST_LOG` when set.

use chrono::{SecondsFormat, Utc};
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Install the global logger, writing to `logfile` (appended) or stderr.
///
/// # Errors
///
/// Fails when the log file cannot be opened or a logger is already set.
pub fn init_logging(logfile: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        let line = serde_json::json!({
            "time": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "level": record.level().as_str(),
            "target": record.target(),
            "msg": record.args().to_string(),
        });
        writeln!(buf, "{line}")
    });

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder.try_init()?;
    Ok(())
}
