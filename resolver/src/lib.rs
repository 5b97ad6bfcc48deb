//! Layered argument resolution over a compact command-line grammar.
//!
//! This crate resolves a command's parameter values from four competing
//! sources with a fixed total precedence:
//!
//! 1. command-line tokens,
//! 2. alternate-source values (environment variables by default),
//! 3. pre-existing preset snapshot values,
//! 4. static defaults.
//!
//! The centerpiece is [`Resolver`], which tracks, per parameter, whether
//! and how many times the command line supplied a value, then applies
//! alternate-source values exactly once, at the end of the outermost pass,
//! only to parameters whose value fetch never ran. The bookkeeping stays
//! correct when a parse internally runs nested passes over the same
//! parameter set (two-phase intermixed parsing).
//!
//! Environment text decodes through [`EnvDecode`] strategies:
//! [`ShellWords`] (the default) tokenizes with shell quoting rules and
//! reuses the command-line conversion and arity logic, so `BAR="1 2 3"`
//! and `--bar 1 2 3` resolve identically. [`Delimited`] handles
//! single-separator formats, and custom strategies plug in per parameter.
//!
//! Help rendering ([`help`]) is pure over the declared spec and never
//! reads live alternate-source values.
//!
//! # Example
//!
//! ```
//! use envarg_core::{Arity, CommandSpec, ParamSpec, Value, ValueType};
//! use envarg_resolver::{MapSource, Resolver};
//!
//! let spec = CommandSpec::new("demo")
//!     .with_param(
//!         ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
//!             .with_arity(Arity::AtLeastOne)
//!             .required(true)
//!             .with_default(Value::Int(22))
//!             .from_env("BAR"),
//!     )
//!     .with_param(ParamSpec::positional("baz", ValueType::Int));
//!
//! // The command line wins over the environment:
//! let source = MapSource::new().with("BAR", "9 9 9");
//! let mut resolver = Resolver::with_source(spec, source).unwrap();
//! let snapshot = resolver.resolve(["123", "--bar", "1", "2"]).unwrap();
//! assert_eq!(
//!     snapshot.get("bar"),
//!     Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
//! );
//!
//! // Without it, the environment fills in:
//! let snapshot = resolver.resolve(["123"]).unwrap();
//! assert_eq!(
//!     snapshot.get("bar"),
//!     Some(&Value::List(vec![Value::Int(9), Value::Int(9), Value::Int(9)]))
//! );
//! ```

pub mod help;

mod engine;
mod envdecode;
mod grammar;
mod ops;
mod source;
mod tracker;

pub use engine::Resolver;
pub use envdecode::{Delimited, ShellWords};
pub use ops::{DefaultOps, ParamOps};
pub use source::{KeyValueSource, MapSource, OsEnv};

// Re-exported so downstream callers can name the decoder seam without a
// direct envarg-core dependency.
pub use envarg_core::{Decoded, EnvDecode};
