//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, malformed distribution tables, exhausted placement or sampling
//! budgets, IO and image encoding failures, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("distribution table '{source_name}': {message}")]
    Table {
        source_name: String,
        message: String,
    },

    #[error(
        "wire (length {length:.1}, width {width:.1}, opening angle {opening_angle_deg:.1} deg) \
         could not be placed after {attempts} attempts; choose shorter wires or a bigger image"
    )]
    PlacementExhausted {
        attempts: usize,
        length: f64,
        width: f64,
        opening_angle_deg: f64,
    },

    #[error("rejection sampling did not accept a value within {attempts} attempts")]
    SamplingExhausted { attempts: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn table(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Table {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn placement_exhausted_message_names_attempts() {
        let err = Error::PlacementExhausted {
            attempts: 100,
            length: 200.0,
            width: 3.0,
            opening_angle_deg: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("100 attempts"), "{msg}");
        assert!(msg.contains("length 200.0"), "{msg}");
    }

    #[test]
    fn table_helper_sets_fields() {
        let err = Error::table("lengths.txt", "no rows");
        assert!(matches!(
            err,
            Error::Table { ref source_name, ref message }
                if source_name == "lengths.txt" && message == "no rows"
        ));
    }
}
