//! Demo program for layered argument resolution.
//!
//! Declares a small parameter set through `envarg` and resolves its own
//! argv, so every precedence layer can be exercised from a shell:
//!
//! ```text
//! $ BAR="1 2 3 '45  ' 6 7" envarg-demo 123
//! {
//!   "bar": [1, 2, 3, 45, 6, 7],
//!   "baz": 123,
//!   "format": "json"
//! }
//! ```

use std::process::ExitCode;

use envarg_core::{Arity, CommandSpec, ParamSpec, Value, ValueType};
use envarg_resolver::{Resolver, help};

mod output;

use output::OutputFormat;

fn demo_spec() -> CommandSpec {
    CommandSpec::new("envarg-demo")
        .with_about("Show layered resolution: command line over environment over defaults.")
        .with_param(
            ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
                .with_arity(Arity::AtLeastOne)
                .required(true)
                .with_default(Value::Int(22))
                .from_env("BAR")
                .with_help("Help message for bar."),
        )
        .with_param(ParamSpec::positional("baz", ValueType::Int).with_help("An integer argument."))
        .with_param(
            ParamSpec::option(
                "format",
                None,
                Some("--format"),
                ValueType::Choice(vec!["json".into(), "yaml".into()]),
            )
            .with_default(Value::Str("json".into()))
            .from_env("ENVARG_DEMO_FORMAT")
            .with_help("Output format for the resolved snapshot."),
        )
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let spec = demo_spec();

    if argv.iter().any(|arg| arg == "-h" || arg == "--help") {
        print!("{}", help::render_help(&spec));
        return ExitCode::SUCCESS;
    }

    let mut resolver = match Resolver::new(spec) {
        Ok(resolver) => resolver,
        Err(error) => {
            eprintln!("envarg-demo: invalid parameter spec: {error}");
            return ExitCode::from(2);
        }
    };

    let snapshot = match resolver.resolve(argv) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            eprintln!("envarg-demo: error: {error}");
            return ExitCode::from(2);
        }
    };

    let format = snapshot
        .get("format")
        .and_then(Value::as_str)
        .and_then(OutputFormat::from_name)
        .unwrap_or(OutputFormat::Json);

    match output::format_snapshot(&snapshot, format) {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("envarg-demo: {error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envarg_core::validate_spec;
    use envarg_resolver::MapSource;

    #[test]
    fn test_demo_spec_is_well_formed() {
        assert!(validate_spec(&demo_spec()).is_empty());
    }

    #[test]
    fn test_demo_resolution_end_to_end() {
        let source = MapSource::new().with("BAR", "1 2 3 '45  ' 6 7");
        let mut resolver = Resolver::with_source(demo_spec(), source).unwrap();
        let snapshot = resolver.resolve(["123"]).unwrap();
        assert_eq!(snapshot.get("baz"), Some(&Value::Int(123)));
        assert_eq!(
            snapshot.get("bar").and_then(|v| v.as_list()).map(<[Value]>::len),
            Some(6)
        );
        assert_eq!(snapshot.get("format"), Some(&Value::Str("json".into())));
    }

    #[test]
    fn test_demo_help_names_the_bindings() {
        let text = help::render_help(&demo_spec());
        assert!(text.contains("(env: BAR)"));
        assert!(text.contains("(default: 22)"));
    }
}
