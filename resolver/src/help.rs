//! Help text rendering.
//!
//! Pure formatting over the declared spec: rendering never consults the
//! live environment, so help output is identical whether or not a bound
//! key is currently set. Defaulting from the environment would make
//! `--help` lie about what the program will do; the annotation names the
//! key instead and lets the resolution engine do the layering.

use envarg_core::{Arity, CommandSpec, ParamSpec};

/// Augments a parameter's base help text with its default value and
/// alternate-source key.
///
/// # Examples
///
/// ```
/// use envarg_core::{ParamSpec, Value, ValueType};
/// use envarg_resolver::help::annotate;
///
/// let bar = ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
///     .with_default(Value::Int(22))
///     .from_env("BAR")
///     .with_help("Help message for bar.");
/// assert_eq!(annotate(&bar), "Help message for bar. (default: 22) (env: BAR)");
/// ```
pub fn annotate(param: &ParamSpec) -> String {
    let mut text = param.help.clone().unwrap_or_default();
    if let Some(default) = &param.default {
        push_marker(&mut text, &format!("(default: {default})"));
    }
    if let Some(binding) = &param.env {
        push_marker(&mut text, &format!("(env: {})", binding.key));
    }
    text
}

fn push_marker(text: &mut String, marker: &str) {
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(marker);
}

/// Metavar for a parameter: uppercased destination for options, the bare
/// destination for positionals.
fn metavar(param: &ParamSpec) -> String {
    if param.is_positional() {
        param.dest.clone()
    } else {
        param.dest.to_uppercase()
    }
}

/// Value placeholder reflecting the parameter's arity.
fn placeholder(param: &ParamSpec) -> String {
    let var = metavar(param);
    match param.arity {
        Arity::One => var,
        Arity::Optional => format!("[{var}]"),
        Arity::Exact(n) => vec![var; n].join(" "),
        Arity::AtLeastOne => format!("{var} [{var} ...]"),
        Arity::Any => format!("[{var} ...]"),
    }
}

/// One-line usage summary: options first, then positionals, optional
/// pieces bracketed.
pub fn render_usage(spec: &CommandSpec) -> String {
    let mut parts = vec![format!("usage: {}", spec.name)];
    for param in spec.params.iter().filter(|p| !p.is_positional()) {
        let piece = format!("{} {}", param.display_name(), placeholder(param));
        parts.push(if param.required {
            piece
        } else {
            format!("[{piece}]")
        });
    }
    for param in spec.positionals() {
        parts.push(placeholder(param));
    }
    parts.join(" ")
}

/// Full help page: usage, description, positional section, options
/// section.
pub fn render_help(spec: &CommandSpec) -> String {
    let mut out = render_usage(spec);
    out.push('\n');

    if let Some(about) = &spec.about {
        out.push('\n');
        out.push_str(about);
        out.push('\n');
    }

    let positionals: Vec<_> = spec.positionals().collect();
    if !positionals.is_empty() {
        out.push_str("\npositional arguments:\n");
        for param in positionals {
            push_entry(&mut out, &metavar(param), param);
        }
    }

    let options: Vec<_> = spec.params.iter().filter(|p| !p.is_positional()).collect();
    if !options.is_empty() {
        out.push_str("\noptions:\n");
        for param in options {
            let invocation = format!("{} {}", param.display_name(), placeholder(param));
            push_entry(&mut out, &invocation, param);
        }
    }

    out
}

fn push_entry(out: &mut String, invocation: &str, param: &ParamSpec) {
    out.push_str("  ");
    out.push_str(invocation);
    let annotated = annotate(param);
    if !annotated.is_empty() {
        out.push_str("  ");
        out.push_str(&annotated);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use envarg_core::{Value, ValueType};

    fn demo_spec() -> CommandSpec {
        CommandSpec::new("demo")
            .with_about("A demo command")
            .with_param(
                ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
                    .with_arity(Arity::AtLeastOne)
                    .required(true)
                    .with_default(Value::Int(22))
                    .from_env("BAR")
                    .with_help("Help message for bar."),
            )
            .with_param(ParamSpec::positional("baz", ValueType::Int))
    }

    #[test]
    fn test_annotate_orders_default_before_env() {
        let spec = demo_spec();
        let bar = spec.find_param("bar").unwrap();
        assert_eq!(
            annotate(bar),
            "Help message for bar. (default: 22) (env: BAR)"
        );
    }

    #[test]
    fn test_annotate_without_base_help() {
        let param = ParamSpec::option("x", None, Some("--x"), ValueType::Str).from_env("X");
        assert_eq!(annotate(&param), "(env: X)");
    }

    #[test]
    fn test_usage_reflects_arity_and_requiredness() {
        let usage = render_usage(&demo_spec());
        assert_eq!(usage, "usage: demo --bar BAR [BAR ...] baz");

        let optional = CommandSpec::new("demo").with_param(
            ParamSpec::option("out", None, Some("--out"), ValueType::Str)
                .with_arity(Arity::Optional),
        );
        assert_eq!(render_usage(&optional), "usage: demo [--out [OUT]]");
    }

    #[test]
    fn test_help_page_sections() {
        let help = render_help(&demo_spec());
        assert!(help.starts_with("usage: demo"));
        assert!(help.contains("\npositional arguments:\n  baz\n"));
        assert!(help.contains("--bar BAR [BAR ...]  Help message for bar. (default: 22) (env: BAR)"));
    }

    #[test]
    fn test_rendering_ignores_live_environment() {
        let spec = demo_spec();
        let before = render_help(&spec);
        // Rendering only reads the declared binding, never the live value.
        unsafe {
            std::env::set_var("BAR", "9 9 9");
        }
        let after = render_help(&spec);
        unsafe {
            std::env::remove_var("BAR");
        }
        assert_eq!(before, after);
        assert!(!after.contains("9 9 9"));
    }
}
