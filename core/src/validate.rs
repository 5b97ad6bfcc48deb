//! Declaration-time validation of command specs.
//!
//! Catches structural mistakes (duplicate destinations, malformed flag
//! forms, positionals bound to environment variables, bad group wiring)
//! before any resolution runs. Resolver construction rejects a spec with
//! validation errors, so runtime resolution only ever sees well-formed
//! parameter sets.
//!
//! # Examples
//!
//! ```
//! use envarg_core::*;
//!
//! let good = CommandSpec::new("demo")
//!     .with_param(ParamSpec::option("bar", None, Some("--bar"), ValueType::Int));
//! assert!(validate_spec(&good).is_empty());
//!
//! // Positional parameters may not bind an environment variable.
//! let bad = CommandSpec::new("demo")
//!     .with_param(ParamSpec::positional("baz", ValueType::Int).from_env("BAZ"));
//! assert!(!validate_spec(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Arity, CommandSpec, ValueType};

/// Command spec validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A parameter's destination key is empty.
    #[error("parameter destination cannot be empty")]
    EmptyDest,
    /// Two parameters share a destination key.
    #[error("duplicate destination: {0}")]
    DuplicateDest(String),
    /// Short flag does not look like `-x`.
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long flag does not start with `--` or is too short.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// Two parameters share a flag string.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
    /// A positional parameter carries an environment binding.
    #[error("positional parameter `{0}` may not bind an environment variable")]
    PositionalWithEnv(String),
    /// An environment key is empty or not a valid variable name.
    #[error("parameter `{param}` binds invalid environment key {key:?}")]
    InvalidEnvKey {
        /// Destination of the offending parameter.
        param: String,
        /// The rejected key.
        key: String,
    },
    /// A choice parameter declares no candidates.
    #[error("parameter `{0}` declares an empty choice set")]
    EmptyChoices(String),
    /// `Arity::Exact(0)` consumes nothing and resolves nothing.
    #[error("parameter `{0}` declares a zero-count arity")]
    ZeroArity(String),
    /// A variable-arity positional is followed by another positional.
    #[error("variadic positional `{0}` must be declared last")]
    VariadicNotLast(String),
    /// A group names a destination that no parameter declares.
    #[error("exclusive group names unknown parameter: {0}")]
    UnknownGroupMember(String),
    /// A group names a positional parameter.
    #[error("exclusive group member `{0}` must be an option, not a positional")]
    PositionalGroupMember(String),
    /// A parameter appears in more than one group.
    #[error("parameter `{0}` appears in multiple exclusive groups")]
    OverlappingGroups(String),
}

fn valid_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Validates a command spec.
///
/// Returns the problems found; an empty vector means the spec is
/// well-formed. Checks stop at the first error within each scope so the
/// reported problem is the one closest to its cause.
pub fn validate_spec(spec: &CommandSpec) -> Vec<SpecError> {
    let mut errors = Vec::new();

    if spec.name.trim().is_empty() {
        errors.push(SpecError::EmptyCommandName);
        return errors;
    }

    let mut seen_dests: HashSet<&str> = HashSet::new();
    let mut seen_flags: HashSet<&str> = HashSet::new();

    for param in &spec.params {
        if param.dest.trim().is_empty() {
            errors.push(SpecError::EmptyDest);
            return errors;
        }
        if !seen_dests.insert(param.dest.as_str()) {
            errors.push(SpecError::DuplicateDest(param.dest.clone()));
            return errors;
        }

        if let Some(short) = &param.short {
            if !short.starts_with('-') || short.starts_with("--") || short.len() < 2 {
                errors.push(SpecError::InvalidShortFlag(short.clone()));
                return errors;
            }
            if !seen_flags.insert(short.as_str()) {
                errors.push(SpecError::DuplicateFlag(short.clone()));
                return errors;
            }
        }

        if let Some(long) = &param.long {
            if !long.starts_with("--") || long.len() < 3 {
                errors.push(SpecError::InvalidLongFlag(long.clone()));
                return errors;
            }
            if !seen_flags.insert(long.as_str()) {
                errors.push(SpecError::DuplicateFlag(long.clone()));
                return errors;
            }
        }

        if let Some(binding) = &param.env {
            if param.is_positional() {
                errors.push(SpecError::PositionalWithEnv(param.dest.clone()));
                return errors;
            }
            if !valid_env_key(&binding.key) {
                errors.push(SpecError::InvalidEnvKey {
                    param: param.dest.clone(),
                    key: binding.key.clone(),
                });
                return errors;
            }
        }

        if let ValueType::Choice(candidates) = &param.value_type {
            if candidates.is_empty() {
                errors.push(SpecError::EmptyChoices(param.dest.clone()));
                return errors;
            }
        }

        if param.arity == Arity::Exact(0) {
            errors.push(SpecError::ZeroArity(param.dest.clone()));
            return errors;
        }
    }

    // Positional token distribution is greedy left-to-right, which only
    // stays unambiguous when at most the final positional is variadic.
    let positionals: Vec<_> = spec.positionals().collect();
    for param in positionals.iter().take(positionals.len().saturating_sub(1)) {
        if matches!(param.arity, Arity::AtLeastOne | Arity::Any) {
            errors.push(SpecError::VariadicNotLast(param.dest.clone()));
            return errors;
        }
    }

    let mut grouped: HashSet<&str> = HashSet::new();
    for group in &spec.groups {
        for member in &group.members {
            let Some(param) = spec.find_param(member) else {
                errors.push(SpecError::UnknownGroupMember(member.clone()));
                return errors;
            };
            if param.is_positional() {
                errors.push(SpecError::PositionalGroupMember(member.clone()));
                return errors;
            }
            if !grouped.insert(member.as_str()) {
                errors.push(SpecError::OverlappingGroups(member.clone()));
                return errors;
            }
        }
    }

    errors
}
