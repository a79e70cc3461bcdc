//! Logger initialisation.
//!
//! Records go to stderr so that stdout carries nothing but the tour.

use std::io::Write;

use env_logger::{fmt::Formatter, Builder, Env, Target};
use log::{Level, LevelFilter};

use crate::error::{Error, Result};

/// Install the global logger. `RUST_LOG`, when set, takes precedence over `level`.
pub fn init_logger(level: LevelFilter, timestamps: bool) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_env(Env::default())
        .write_style(env_logger::WriteStyle::Never)
        .target(Target::Stderr)
        .format(move |buf: &mut Formatter, record| {
            if timestamps {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            writeln!(buf, "{} {}", level_tag(record.level()), record.args())
        });

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(Level::Warn), "WARN");
        assert_eq!(level_tag(Level::Trace), "TRACE");
    }

    #[test]
    fn test_second_init_fails() {
        // the first call may race with other tests; only the second is checked
        let _ = init_logger(LevelFilter::Off, false);
        assert!(init_logger(LevelFilter::Off, false).is_err());
    }
}
