//! Error types for the palette engine.

use thiserror::Error;

/// Errors produced by color parsing, interpolation and palette generation.
///
/// Out-of-gamut intermediate values are never reported here: they are
/// absorbed by the gamut mapping fallbacks in [`crate::gamut`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// A hex color string was not exactly six hexadecimal digits.
    #[error("invalid color format: {0}")]
    InvalidFormat(String),

    /// A numeric parameter was out of range (step count, exponent, target Delta E, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An interpolation method or adjustment strategy name was not recognized.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_includes_message() {
        let err = PaletteError::InvalidFormat("#12345".into());
        let msg = format!("{err}");
        assert!(msg.contains("#12345"), "missing input in: {msg}");
        assert!(msg.contains("format"), "missing kind in: {msg}");
    }

    #[test]
    fn invalid_parameter_includes_message() {
        let err = PaletteError::InvalidParameter("steps must be >= 1, got 0".into());
        let msg = format!("{err}");
        assert!(msg.contains("steps"), "missing parameter name in: {msg}");
        assert!(msg.contains('0'), "missing value in: {msg}");
    }

    #[test]
    fn unsupported_method_includes_name() {
        let err = PaletteError::UnsupportedMethod("bezier".into());
        let msg = format!("{err}");
        assert!(msg.contains("bezier"), "missing method name in: {msg}");
    }

    #[test]
    fn palette_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PaletteError>();
    }

    #[test]
    fn palette_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PaletteError>();
    }
}
