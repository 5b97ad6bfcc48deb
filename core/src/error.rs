//! Error types for resolution failures.
//!
//! Every runtime failure is fatal to the resolve call that raised it: no
//! partial snapshot is ever returned. Each variant names the parameter and
//! the offending source so diagnostics can distinguish bad command-line
//! input from a bad environment value.

use std::fmt;

use thiserror::Error;

/// Origin of the raw text that failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Tokens supplied on the command line.
    CommandLine,
    /// Text read from the named environment variable.
    Env(String),
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::CommandLine => write!(f, "command line"),
            ValueSource::Env(key) => write!(f, "environment variable `{key}`"),
        }
    }
}

impl std::error::Error for ValueSource {}

/// Errors raised while resolving a command's parameter values.
///
/// The conversion and arity variants carry the same shape regardless of
/// whether the raw text came from the command line or an environment
/// variable; only the named [`ValueSource`] differs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// Raw text cannot convert to the parameter's declared type.
    #[error("argument `{param}`: invalid {expected} value {token:?} (from {source})")]
    Conversion {
        /// Display name of the parameter.
        param: String,
        /// Where the offending text came from.
        source: ValueSource,
        /// The token that failed to convert.
        token: String,
        /// Label of the expected type.
        expected: String,
    },

    /// Wrong number of values for the parameter's arity.
    #[error("argument `{param}`: expected {expected}, got {actual} (from {source})")]
    Arity {
        /// Display name of the parameter.
        param: String,
        /// Where the values came from.
        source: ValueSource,
        /// Expectation label from the declared arity.
        expected: String,
        /// Number of values actually available.
        actual: usize,
    },

    /// An environment decoder returned leftover unconverted tokens.
    #[error("argument `{param}`: environment variable `{key}` supplied extra values: {extras:?}")]
    ExtraValues {
        /// Display name of the parameter.
        param: String,
        /// Environment variable that carried the surplus.
        key: String,
        /// The unconsumed tokens.
        extras: Vec<String>,
    },

    /// No source supplied a value for a required parameter.
    #[error("argument `{param}` is required but no source supplied a value")]
    RequiredMissing {
        /// Display name of the parameter.
        param: String,
    },

    /// A command-line token matched no declared parameter.
    #[error("unrecognized argument: {token}")]
    UnknownArgument {
        /// The unmatched token.
        token: String,
    },

    /// Two members of a mutually exclusive group were supplied.
    #[error("argument `{param}`: not allowed with argument `{other}`")]
    Conflict {
        /// The later-supplied member.
        param: String,
        /// The member that was already supplied.
        other: String,
    },
}

/// Convenience alias for results with [`ResolveError`].
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(ValueSource::CommandLine.to_string(), "command line");
        assert_eq!(
            ValueSource::Env("BAR".into()).to_string(),
            "environment variable `BAR`"
        );
    }

    #[test]
    fn test_conversion_message_names_param_and_source() {
        let err = ResolveError::Conversion {
            param: "--bar".into(),
            source: ValueSource::Env("BAR".into()),
            token: "x".into(),
            expected: "integer".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("--bar"));
        assert!(msg.contains("environment variable `BAR`"));
        assert!(msg.contains("integer"));
    }

    #[test]
    fn test_conversion_shape_matches_across_sources() {
        let from_cli = ResolveError::Conversion {
            param: "--bar".into(),
            source: ValueSource::CommandLine,
            token: "x".into(),
            expected: "integer".into(),
        };
        let from_env = ResolveError::Conversion {
            param: "--bar".into(),
            source: ValueSource::Env("BAR".into()),
            token: "x".into(),
            expected: "integer".into(),
        };
        // Same variant, same payload apart from the named source.
        assert!(matches!(from_cli, ResolveError::Conversion { .. }));
        assert!(matches!(from_env, ResolveError::Conversion { .. }));
        assert_ne!(from_cli, from_env);
    }
}
