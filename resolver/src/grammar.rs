//! Grammar-driven token matching.
//!
//! A compact command-line grammar: long flags (`--bar`, `--bar=1`), short
//! flags (`-b`), a `--` separator after which every token is positional,
//! and greedy value consumption bounded by each parameter's arity.
//! Positional tokens are collected during the option scan and distributed
//! over the declared positionals afterward. Abbreviation and subcommands
//! are not part of this grammar.

use envarg_core::{Arity, ResolveError, Snapshot, ValueSource};
use tracing::debug;

use crate::engine::Resolver;

/// Whether a token should be treated as a flag rather than a value.
///
/// A lone `-` and negative numbers (`-5`) are values.
pub(crate) fn is_flag_like(token: &str) -> bool {
    let mut chars = token.chars();
    if chars.next() != Some('-') {
        return false;
    }
    match chars.next() {
        Some(ch) => !ch.is_ascii_digit(),
        None => false,
    }
}

/// Splits `--key=value` into flag base and inline value. Short flags and
/// separators pass through unchanged.
pub(crate) fn split_inline(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        if let Some((base, value)) = token.split_once('=') {
            return (base, Some(value));
        }
    }
    (token, None)
}

/// Scans `tokens`, resolving every flag occurrence and returning the
/// positional tokens in order of appearance.
pub(crate) fn scan_options(
    rt: &mut Resolver,
    tokens: &[String],
    snap: &mut Snapshot,
) -> Result<Vec<String>, ResolveError> {
    let mut positionals = Vec::new();
    let mut only_positional = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if only_positional || !is_flag_like(token) {
            positionals.push(token.clone());
            i += 1;
            continue;
        }
        if token == "--" {
            only_positional = true;
            i += 1;
            continue;
        }

        let (base, inline) = split_inline(token);
        let Some(idx) = rt.find_option(base) else {
            return Err(ResolveError::UnknownArgument {
                token: token.clone(),
            });
        };
        rt.note_flag_match(idx)?;

        let mut values: Vec<String> = Vec::new();
        let mut next = i + 1;
        if let Some(inline_value) = inline {
            values.push(inline_value.to_string());
        } else {
            let max = rt.spec.params[idx].arity.max_values();
            while next < tokens.len() {
                if let Some(max) = max {
                    if values.len() >= max {
                        break;
                    }
                }
                let candidate = &tokens[next];
                if candidate == "--" || is_flag_like(candidate) {
                    break;
                }
                values.push(candidate.clone());
                next += 1;
            }
        }

        if values.is_empty() && rt.spec.params[idx].arity == Arity::Optional {
            // Matched bare: the parameter is seen, but its fetch unit
            // never runs, so lower-precedence sources may still fill it.
            debug!(
                param = %rt.spec.params[idx].display_name(),
                "Flag present without a value; leaving unset"
            );
        } else {
            rt.invoke(idx, &values, snap)?;
        }
        i = next;
    }

    Ok(positionals)
}

/// Distributes collected positional tokens over the declared positionals.
///
/// Greedy left-to-right, reserving the minimum demanded by later
/// positionals. A positional that receives nothing stays unset (the
/// required check runs after alternate sources and defaults); one that
/// receives fewer tokens than its minimum but more than zero fails with
/// an arity error.
pub(crate) fn match_positionals(
    rt: &mut Resolver,
    tokens: &[String],
    snap: &mut Snapshot,
) -> Result<(), ResolveError> {
    let indices: Vec<usize> = rt
        .spec
        .params
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_positional())
        .map(|(i, _)| i)
        .collect();
    let mins: Vec<usize> = indices
        .iter()
        .map(|&i| rt.spec.params[i].arity.min_values())
        .collect();

    let mut cursor = 0;
    for (k, &idx) in indices.iter().enumerate() {
        let arity = rt.spec.params[idx].arity;
        let available = tokens.len() - cursor;
        let reserved: usize = mins[k + 1..].iter().sum();
        let usable = available.saturating_sub(reserved);

        let mut take = match arity.max_values() {
            Some(max) => usable.min(max),
            None => usable,
        };
        // Earlier positionals have first claim on scarce tokens.
        take = take.max(arity.min_values().min(available));

        if take == 0 {
            continue;
        }
        if take < arity.min_values() {
            return Err(ResolveError::Arity {
                param: rt.spec.params[idx].display_name().to_string(),
                source: ValueSource::CommandLine,
                expected: arity.expected_label(),
                actual: take,
            });
        }

        rt.invoke(idx, &tokens[cursor..cursor + take], snap)?;
        cursor += take;
    }

    if cursor < tokens.len() {
        return Err(ResolveError::UnknownArgument {
            token: tokens[cursor].clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_likeness() {
        assert!(is_flag_like("--bar"));
        assert!(is_flag_like("-b"));
        assert!(is_flag_like("--"));
        assert!(!is_flag_like("bar"));
        assert!(!is_flag_like("-"));
        assert!(!is_flag_like("-5"));
        assert!(!is_flag_like("-123"));
    }

    #[test]
    fn test_split_inline_long_flags_only() {
        assert_eq!(split_inline("--bar=1"), ("--bar", Some("1")));
        assert_eq!(split_inline("--bar=a=b"), ("--bar", Some("a=b")));
        assert_eq!(split_inline("--bar"), ("--bar", None));
        assert_eq!(split_inline("-b"), ("-b", None));
    }
}
