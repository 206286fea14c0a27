//! Logging bootstrap.
//!
//! The library itself only talks to the `log` facade. Applications (and the
//! integration tests) that want to see the engine's output call one of these
//! functions once to install an `env_logger` backend.

use std::fs::OpenOptions;
use std::sync::Once;

use log::LevelFilter;

use crate::config::EngineConfig;
use crate::error::TransduceError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend at `level`, optionally appending to `log_file`.
///
/// Only the first call in a process has any effect. If another logger was
/// already installed by the host application, that one is kept.
pub fn enable_verbose_logging(level: LevelFilter, log_file: Option<&str>) -> Result<(), TransduceError> {
    // Open the file before entering the `Once` so the failure can be reported.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // `[LEVEL] message`, no timestamp or module path.
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

/// Installs logging at the level named in `config`, if it names one.
pub fn init_from_config(config: &EngineConfig) -> Result<(), TransduceError> {
    match config.level_filter()? {
        Some(level) => enable_verbose_logging(level, None),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_initialisation_is_harmless() {
        enable_verbose_logging(LevelFilter::Debug, None).unwrap();
        enable_verbose_logging(LevelFilter::Trace, None).unwrap();
        log::debug!("logging initialised twice without panicking");
    }

    #[test]
    fn test_init_from_config_rejects_bad_level() {
        let config = EngineConfig {
            log_level: Some("loud".to_string()),
            ..EngineConfig::default()
        };
        assert!(matches!(
            init_from_config(&config),
            Err(TransduceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_init_from_config_without_level_is_noop() {
        assert!(init_from_config(&EngineConfig::default()).is_ok());
    }
}
