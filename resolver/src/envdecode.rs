//! Decoders for raw alternate-source text.
//!
//! The default decoder, [`ShellWords`], tokenizes environment text with
//! shell-style whitespace and quoting rules and then routes the tokens
//! through the same conversion and arity matching the command-line path
//! uses, so `BAR="1 2 3"` resolves exactly like `--bar 1 2 3`. Custom
//! decoders implement [`EnvDecode`] for any other textual format;
//! [`Delimited`] is a ready-made single-separator variant.

use envarg_core::{
    Decoded, EnvDecode, ParamSpec, ResolveError, ValueSource, consume_len, convert_tokens,
};

fn env_source(param: &ParamSpec) -> ValueSource {
    let key = param
        .env
        .as_ref()
        .map(|binding| binding.key.clone())
        .unwrap_or_default();
    ValueSource::Env(key)
}

/// Shell-style tokenization with the shared conversion and arity logic.
///
/// Quoting is honored, so `BAR="1 2 '45  ' 6"` yields the tokens `1`,
/// `2`, `45  `, `6`. Tokens beyond what the parameter's arity consumes
/// are returned as extras, which the engine treats as a hard failure,
/// matching how surplus command-line tokens are rejected.
///
/// # Examples
///
/// ```
/// use envarg_core::{Arity, EnvDecode, ParamSpec, Value, ValueType};
/// use envarg_resolver::ShellWords;
///
/// let bar = ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
///     .with_arity(Arity::AtLeastOne)
///     .from_env("BAR");
/// let decoded = ShellWords.decode(&bar, "1 2 3 '45  ' 6 7").unwrap();
/// assert_eq!(decoded.values.len(), 6);
/// assert_eq!(decoded.values[3], Value::Int(45));
/// assert!(decoded.extras.is_empty());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellWords;

impl EnvDecode for ShellWords {
    fn decode(&self, param: &ParamSpec, raw: &str) -> Result<Decoded, ResolveError> {
        let source = env_source(param);
        let tokens = shell_words::split(raw).map_err(|_| ResolveError::Conversion {
            param: param.display_name().to_string(),
            source: source.clone(),
            token: raw.to_string(),
            expected: "shell-quoted text".to_string(),
        })?;
        let consumed = consume_len(param, &source, tokens.len())?;
        let values = convert_tokens(param, &source, &tokens[..consumed])?;
        Ok(Decoded {
            values,
            extras: tokens[consumed..].to_vec(),
        })
    }
}

/// Splits raw text on a single separator character.
///
/// Segments are trimmed and empty segments dropped, so `"1, 2, 3"` with a
/// comma separator and `"1\n2\n3"` with a newline separator both yield
/// three tokens. Conversion and arity matching are the shared routines.
#[derive(Debug, Clone, Copy)]
pub struct Delimited {
    separator: char,
}

impl Delimited {
    /// Creates a decoder splitting on `separator`.
    pub fn new(separator: char) -> Self {
        Self { separator }
    }
}

impl EnvDecode for Delimited {
    fn decode(&self, param: &ParamSpec, raw: &str) -> Result<Decoded, ResolveError> {
        let source = env_source(param);
        let tokens: Vec<String> = raw
            .split(self.separator)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect();
        let consumed = consume_len(param, &source, tokens.len())?;
        let values = convert_tokens(param, &source, &tokens[..consumed])?;
        Ok(Decoded {
            values,
            extras: tokens[consumed..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envarg_core::{Arity, Value, ValueType};

    fn int_many() -> ParamSpec {
        ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
            .with_arity(Arity::AtLeastOne)
            .from_env("BAR")
    }

    #[test]
    fn test_shell_words_honors_quoting() {
        let decoded = ShellWords.decode(&int_many(), "1 2 3 '45  ' 6 7").unwrap();
        assert_eq!(
            decoded.values,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(45),
                Value::Int(6),
                Value::Int(7),
            ]
        );
        assert!(decoded.extras.is_empty());
    }

    #[test]
    fn test_shell_words_reports_surplus_as_extras() {
        let one = ParamSpec::option("x", None, Some("--x"), ValueType::Int).from_env("X");
        let decoded = ShellWords.decode(&one, "1 2 3").unwrap();
        assert_eq!(decoded.values, vec![Value::Int(1)]);
        assert_eq!(decoded.extras, vec!["2".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_shell_words_unbalanced_quote_is_conversion_error() {
        let err = ShellWords.decode(&int_many(), "1 '2").unwrap_err();
        match err {
            ResolveError::Conversion { source, .. } => {
                assert_eq!(source, ValueSource::Env("BAR".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shell_words_conversion_failure_names_env_source() {
        let err = ShellWords.decode(&int_many(), "1 x 3").unwrap_err();
        assert!(err.to_string().contains("environment variable `BAR`"));
    }

    #[test]
    fn test_shell_words_enforces_minimum_arity() {
        let err = ShellWords.decode(&int_many(), "").unwrap_err();
        assert!(matches!(err, ResolveError::Arity { actual: 0, .. }));
    }

    #[test]
    fn test_delimited_splits_and_trims() {
        let decoded = Delimited::new(',').decode(&int_many(), " 1, 2 ,3,, ").unwrap();
        assert_eq!(
            decoded.values,
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
        assert!(decoded.extras.is_empty());
    }
}
