#![forbid(unsafe_code)]

//! Global `tracing` subscriber setup for native binaries.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the directive
//! passed in. Output goes to stderr so stdout stays free for program output.

use tracing_subscriber::EnvFilter;

use crate::error::LifeError;

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single lines.
    #[default]
    Text,
    /// One JSON object per event.
    #[cfg(feature = "tracing-json")]
    Json,
}

/// Install the process-wide subscriber.
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init(default_filter: &str, format: LogFormat) -> Result<(), LifeError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|err| LifeError::Logging(format!("bad filter {default_filter:?}: {err}")))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| LifeError::Logging(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_rejected() {
        // Whichever call wins, at most one subscriber can be global.
        let first = init("debug", LogFormat::Text);
        let second = init("debug", LogFormat::Text);
        assert!(second.is_err());
        if let Err(err) = first {
            assert!(matches!(err, LifeError::Logging(_)));
        }
    }
}
