//! Core parameter model and shared resolution primitives.
//!
//! This crate defines the foundational types for layered argument
//! resolution:
//!
//! - [`CommandSpec`] — a command's full parameter set (options,
//!   positionals, exclusive groups, parse mode).
//! - [`ParamSpec`] — one configurable value with flag forms, type, arity,
//!   requiredness, default, and optional [`EnvBinding`].
//! - [`Value`] / [`Snapshot`] — resolved values and the owned result map a
//!   resolve call produces.
//! - [`EnvDecode`] — the strategy seam for turning raw environment text
//!   into values.
//!
//! Conversion and arity matching ([`convert_token`], [`consume_len`],
//! [`shape_values`]) are shared by the command-line and environment paths
//! so both sources accept identical text.
//!
//! Validation ([`validate_spec`]) catches structural errors such as
//! duplicate destinations, malformed flags, and positionals bound to
//! environment variables before resolution runs.
//!
//! # Example
//!
//! ```
//! use envarg_core::*;
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
//! assert!(validate_spec(&spec).is_empty());
//! assert_eq!(spec.find_param("bar").unwrap().display_name(), "--bar");
//! ```

mod convert;
mod error;
mod snapshot;
mod types;
mod validate;

pub use convert::{consume_len, convert_token, convert_tokens, shape_values};
pub use error::{ResolveError, Result, ValueSource};
pub use snapshot::Snapshot;
pub use types::*;
pub use validate::{SpecError, validate_spec};
