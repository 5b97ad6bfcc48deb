//! Shared token conversion and arity matching.
//!
//! Command-line tokens and decoded environment text both funnel through
//! these routines, so a value is accepted from one source exactly when it
//! would be accepted from the other.

use crate::error::{ResolveError, ValueSource};
use crate::types::{Arity, ParamSpec, Value, ValueType};

/// Converts one raw token to the parameter's declared type.
///
/// # Examples
///
/// ```
/// use envarg_core::{convert_token, ParamSpec, Value, ValueSource, ValueType};
///
/// let bar = ParamSpec::option("bar", None, Some("--bar"), ValueType::Int);
/// let v = convert_token(&bar, &ValueSource::CommandLine, "45  ").unwrap();
/// assert_eq!(v, Value::Int(45));
/// assert!(convert_token(&bar, &ValueSource::CommandLine, "x").is_err());
/// ```
pub fn convert_token(
    param: &ParamSpec,
    source: &ValueSource,
    token: &str,
) -> Result<Value, ResolveError> {
    let fail = || ResolveError::Conversion {
        param: param.display_name().to_string(),
        source: source.clone(),
        token: token.to_string(),
        expected: param.value_type.label(),
    };

    match &param.value_type {
        ValueType::Str => Ok(Value::Str(token.to_string())),
        ValueType::Int => token
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| fail()),
        ValueType::Float => token
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| fail()),
        ValueType::Bool => match token.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(fail()),
        },
        ValueType::Choice(candidates) => {
            if candidates.iter().any(|c| c == token) {
                Ok(Value::Str(token.to_string()))
            } else {
                Err(fail())
            }
        }
    }
}

/// Converts a slice of raw tokens in order.
pub fn convert_tokens(
    param: &ParamSpec,
    source: &ValueSource,
    tokens: &[String],
) -> Result<Vec<Value>, ResolveError> {
    tokens
        .iter()
        .map(|t| convert_token(param, source, t))
        .collect()
}

/// Computes how many of `available` tokens the parameter's arity consumes.
///
/// Fails with an arity error when fewer than the minimum are available;
/// otherwise consumes up to the maximum and leaves the rest for the caller
/// (surplus command-line tokens fall through to positional matching,
/// surplus environment tokens become hard extras).
pub fn consume_len(
    param: &ParamSpec,
    source: &ValueSource,
    available: usize,
) -> Result<usize, ResolveError> {
    let arity = param.arity;
    if available < arity.min_values() {
        return Err(ResolveError::Arity {
            param: param.display_name().to_string(),
            source: source.clone(),
            expected: arity.expected_label(),
            actual: available,
        });
    }
    Ok(match arity.max_values() {
        Some(max) => available.min(max),
        None => available,
    })
}

/// Collapses converted values into the parameter's resolved shape: a bare
/// scalar for single-value arities, a [`Value::List`] otherwise.
///
/// Callers must not pass an empty vector for single-value arities; zero
/// consumed values never reach installation (the parameter simply stays
/// unset).
pub fn shape_values(arity: Arity, mut values: Vec<Value>) -> Value {
    if arity.takes_list() {
        Value::List(values)
    } else {
        values.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_many() -> ParamSpec {
        ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
            .with_arity(Arity::AtLeastOne)
    }

    #[test]
    fn test_int_conversion_trims_whitespace() {
        // Shell-quoted environment tokens like '45  ' keep their padding
        // through tokenization; conversion must still accept them.
        let param = int_many();
        let v = convert_token(&param, &ValueSource::CommandLine, "45  ").unwrap();
        assert_eq!(v, Value::Int(45));
    }

    #[test]
    fn test_bool_conversion_accepts_common_spellings() {
        let param = ParamSpec::option("flag", None, Some("--flag"), ValueType::Bool);
        for token in ["true", "TRUE", "yes", "1"] {
            assert_eq!(
                convert_token(&param, &ValueSource::CommandLine, token).unwrap(),
                Value::Bool(true)
            );
        }
        for token in ["false", "no", "0"] {
            assert_eq!(
                convert_token(&param, &ValueSource::CommandLine, token).unwrap(),
                Value::Bool(false)
            );
        }
        assert!(convert_token(&param, &ValueSource::CommandLine, "maybe").is_err());
    }

    #[test]
    fn test_choice_rejects_non_member() {
        let param = ParamSpec::option(
            "format",
            None,
            Some("--format"),
            ValueType::Choice(vec!["json".into(), "yaml".into()]),
        );
        assert_eq!(
            convert_token(&param, &ValueSource::CommandLine, "json").unwrap(),
            Value::Str("json".into())
        );
        let err = convert_token(&param, &ValueSource::CommandLine, "xml").unwrap_err();
        assert!(err.to_string().contains("one of json, yaml"));
    }

    #[test]
    fn test_conversion_error_carries_env_source() {
        let param = int_many();
        let err = convert_token(&param, &ValueSource::Env("BAR".into()), "x").unwrap_err();
        match err {
            ResolveError::Conversion { source, .. } => {
                assert_eq!(source, ValueSource::Env("BAR".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_consume_len_enforces_minimum() {
        let param = int_many();
        let err = consume_len(&param, &ValueSource::CommandLine, 0).unwrap_err();
        assert!(matches!(err, ResolveError::Arity { actual: 0, .. }));
        assert_eq!(consume_len(&param, &ValueSource::CommandLine, 4).unwrap(), 4);
    }

    #[test]
    fn test_consume_len_caps_at_maximum() {
        let one = ParamSpec::option("x", None, Some("--x"), ValueType::Int);
        assert_eq!(consume_len(&one, &ValueSource::CommandLine, 3).unwrap(), 1);

        let exact = ParamSpec::option("y", None, Some("--y"), ValueType::Int)
            .with_arity(Arity::Exact(2));
        assert_eq!(consume_len(&exact, &ValueSource::CommandLine, 5).unwrap(), 2);
        assert!(consume_len(&exact, &ValueSource::CommandLine, 1).is_err());
    }

    #[test]
    fn test_shape_values_scalar_vs_list() {
        assert_eq!(
            shape_values(Arity::One, vec![Value::Int(1)]),
            Value::Int(1)
        );
        assert_eq!(
            shape_values(Arity::AtLeastOne, vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        // Fixed counts resolve as lists even for a single element.
        assert_eq!(
            shape_values(Arity::Exact(1), vec![Value::Int(7)]),
            Value::List(vec![Value::Int(7)])
        );
    }
}
