//! Structured logging setup
//!
//! Logs always go to stderr so that stdout stays reserved for the engine
//! output the gateway relays.

use crate::config::LoggingConfig;
use anyhow::{anyhow, Result};
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` directives take precedence over the configured level;
/// `verbose` raises the default to DEBUG.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let subscriber = build_subscriber(config, verbose, std::io::stderr)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Build a subscriber for the configured format and writer
pub fn build_subscriber<W>(
    config: &LoggingConfig,
    verbose: bool,
    writer: W,
) -> Result<Box<dyn Subscriber + Send + Sync>>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let level = default_level(config, verbose)?;
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer);

    let subscriber: Box<dyn Subscriber + Send + Sync> =
        match config.format.to_lowercase().as_str() {
            "json" => Box::new(builder.json().finish()),
            "pretty" => Box::new(builder.pretty().finish()),
            "compact" => Box::new(builder.compact().finish()),
            other => anyhow::bail!("Invalid log format: {}", other),
        };

    Ok(subscriber)
}

fn default_level(config: &LoggingConfig, verbose: bool) -> Result<Level> {
    if verbose {
        return Ok(Level::DEBUG);
    }
    config.log_level()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::{debug, info};

    /// Collects everything written by the subscriber
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn config(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_json_output_is_parseable() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber =
            build_subscriber(&config("info", "json"), false, move || writer.clone()).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            info!(operation = "scene-create", "Invoking engine");
        });

        let text = captured.text();
        let line = text.lines().next().expect("one log line");
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(parsed["fields"]["operation"], "scene-create");
        assert_eq!(parsed["level"], "INFO");
    }

    #[test]
    fn test_verbose_enables_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber =
            build_subscriber(&config("warn", "compact"), true, move || writer.clone()).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            debug!("argument vector built");
        });

        assert!(captured.text().contains("argument vector built"));
    }

    #[test]
    fn test_all_formats_build() {
        for format in ["json", "pretty", "compact", "JSON"] {
            assert!(
                build_subscriber(&config("info", format), false, std::io::sink).is_ok(),
                "Format {} should build",
                format
            );
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(build_subscriber(&config("info", "xml"), false, std::io::sink).is_err());
        assert!(build_subscriber(&config("loud", "json"), false, std::io::sink).is_err());
    }
}
