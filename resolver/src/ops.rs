//! Per-parameter resolution capabilities.
//!
//! A parameter's resolution unit exposes three overridable operations:
//! converting one token, matching a token count against the arity, and
//! fetching a shaped value from a token run. The default implementations
//! forward to the shared conversion logic in `envarg-core`, so a parameter
//! without an override behaves identically on the command-line and
//! environment paths. Substitutes are explicit strategy objects registered
//! per parameter on the resolver; nothing is inherited or intercepted.

use envarg_core::{
    ParamSpec, ResolveError, Value, ValueSource, consume_len, convert_token, shape_values,
};

/// Overridable operations for one parameter's resolution unit.
///
/// Implement this trait to substitute conversion or value-fetch behavior
/// for a single parameter, then register the implementation with
/// [`Resolver::override_ops`](crate::Resolver::override_ops). Unimplemented
/// methods keep the shared default behavior.
pub trait ParamOps: Send + Sync {
    /// Converts one raw token to the parameter's declared type.
    fn convert(
        &self,
        param: &ParamSpec,
        source: &ValueSource,
        token: &str,
    ) -> Result<Value, ResolveError> {
        convert_token(param, source, token)
    }

    /// Computes how many of `available` tokens the parameter consumes.
    fn match_count(
        &self,
        param: &ParamSpec,
        source: &ValueSource,
        available: usize,
    ) -> Result<usize, ResolveError> {
        consume_len(param, source, available)
    }

    /// Converts a token run and collapses it into the resolved shape.
    fn fetch(
        &self,
        param: &ParamSpec,
        source: &ValueSource,
        tokens: &[String],
    ) -> Result<Value, ResolveError> {
        let values = tokens
            .iter()
            .map(|t| self.convert(param, source, t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(shape_values(param.arity, values))
    }
}

/// The shared default behavior: every operation forwards to
/// `envarg-core`'s conversion and arity logic.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultOps;

impl ParamOps for DefaultOps {}

#[cfg(test)]
mod tests {
    use super::*;
    use envarg_core::{Arity, ValueType};

    struct Doubling;

    impl ParamOps for Doubling {
        fn convert(
            &self,
            param: &ParamSpec,
            source: &ValueSource,
            token: &str,
        ) -> Result<Value, ResolveError> {
            match convert_token(param, source, token)? {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                other => Ok(other),
            }
        }
    }

    fn bar() -> ParamSpec {
        ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
            .with_arity(Arity::AtLeastOne)
    }

    #[test]
    fn test_default_fetch_shapes_values() {
        let param = bar();
        let value = DefaultOps
            .fetch(
                &param,
                &ValueSource::CommandLine,
                &["1".to_string(), "2".to_string()],
            )
            .unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_override_flows_through_default_fetch() {
        // Overriding `convert` alone changes `fetch` output, because the
        // default fetch delegates token conversion back through the trait.
        let param = bar();
        let value = Doubling
            .fetch(&param, &ValueSource::CommandLine, &["3".to_string()])
            .unwrap();
        assert_eq!(value, Value::List(vec![Value::Int(6)]));
    }
}
