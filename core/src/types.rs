//! Parameter and value model for command resolution.
//!
//! This module defines the data model shared by the resolver and embedding
//! applications: [`CommandSpec`] describes a command's full parameter set,
//! [`ParamSpec`] one configurable value, [`EnvBinding`] the optional
//! environment fallback attached to a parameter, and [`Value`] a resolved
//! value. Specs and values serialize with [`serde`] so they can round-trip
//! through JSON and YAML.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Value type for a parameter.
///
/// Every raw token, from the command line or from an environment
/// variable, is converted through the parameter's `ValueType` by the same
/// conversion routine, so both sources accept and reject exactly the same
/// text.
///
/// # Examples
///
/// ```
/// use envarg_core::ValueType;
///
/// let choices = ValueType::Choice(vec!["json".into(), "yaml".into()]);
/// assert!(matches!(choices, ValueType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Arbitrary string value.
    Str,
    /// Signed integer value.
    Int,
    /// Floating-point value.
    Float,
    /// Boolean value (`true`/`false`/`yes`/`no`/`1`/`0`, case-insensitive).
    Bool,
    /// One of a fixed set of string candidates.
    Choice(Vec<String>),
}

impl ValueType {
    /// Human-readable label used in conversion error messages.
    pub fn label(&self) -> String {
        match self {
            ValueType::Str => "string".to_string(),
            ValueType::Int => "integer".to_string(),
            ValueType::Float => "float".to_string(),
            ValueType::Bool => "boolean".to_string(),
            ValueType::Choice(candidates) => format!("one of {}", candidates.join(", ")),
        }
    }
}

/// Number of values a parameter consumes from its source.
///
/// The same arity governs command-line consumption and environment text:
/// an `AtLeastOne` parameter accepts `--bar 1 2 3` and `BAR="1 2 3"`
/// interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    /// Exactly one value.
    One,
    /// Zero or one value. A flag appearing bare consumes nothing and the
    /// parameter stays unset, leaving it open to lower-precedence sources.
    Optional,
    /// Exactly `n` values, resolved as a list.
    Exact(usize),
    /// One or more values, resolved as a list.
    AtLeastOne,
    /// Zero or more values, resolved as a list.
    Any,
}

impl Arity {
    /// Minimum number of values this arity requires.
    pub fn min_values(&self) -> usize {
        match self {
            Arity::One | Arity::AtLeastOne => 1,
            Arity::Optional | Arity::Any => 0,
            Arity::Exact(n) => *n,
        }
    }

    /// Maximum number of values this arity consumes, `None` when unbounded.
    pub fn max_values(&self) -> Option<usize> {
        match self {
            Arity::One | Arity::Optional => Some(1),
            Arity::Exact(n) => Some(*n),
            Arity::AtLeastOne | Arity::Any => None,
        }
    }

    /// Whether resolved values are collected into a [`Value::List`].
    pub fn takes_list(&self) -> bool {
        matches!(self, Arity::Exact(_) | Arity::AtLeastOne | Arity::Any)
    }

    /// Expectation label used in arity error messages.
    pub fn expected_label(&self) -> String {
        match self {
            Arity::One => "exactly one value".to_string(),
            Arity::Optional => "at most one value".to_string(),
            Arity::Exact(n) => format!("exactly {n} values"),
            Arity::AtLeastOne => "at least one value".to_string(),
            Arity::Any => "any number of values".to_string(),
        }
    }
}

/// A resolved parameter value.
///
/// Serialized untagged, so a snapshot prints as plain scalars and arrays:
/// `{"bar": [1, 2], "baz": 123}`.
///
/// # Examples
///
/// ```
/// use envarg_core::Value;
///
/// let v = Value::List(vec![Value::Int(1), Value::Int(2)]);
/// assert_eq!(serde_json::to_string(&v).unwrap(), "[1,2]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// String.
    Str(String),
    /// List of values (multi-arity parameters).
    List(Vec<Value>),
}

impl Value {
    /// Returns the integer value, if this is an [`Value::Int`].
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the list slice, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Output of an [`EnvDecode`] implementation.
///
/// `extras` carries raw tokens the decoder could not attribute to the
/// parameter; a non-empty `extras` is always treated as a hard resolution
/// failure, the same way surplus command-line tokens are.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Converted values, already matching the parameter's type.
    pub values: Vec<Value>,
    /// Leftover raw tokens beyond what the parameter's arity consumes.
    pub extras: Vec<String>,
}

/// Strategy for turning raw environment text into parameter values.
///
/// The default implementation (provided by the resolver crate) splits the
/// text with shell-style whitespace and quoting rules and then runs the
/// same per-token conversion and arity matching the command-line path
/// uses. Custom implementations may accept any textual format (line
/// delimited, comma separated, structured) as long as they return the
/// converted values plus any leftover tokens.
pub trait EnvDecode: Send + Sync {
    /// Decodes `raw` into values for `param`.
    fn decode(&self, param: &ParamSpec, raw: &str) -> Result<Decoded, ResolveError>;
}

/// Environment fallback attached to a parameter.
///
/// Names the environment variable consulted when the command line did not
/// supply the parameter, and optionally a custom [`EnvDecode`] strategy.
/// Attached once at declaration time and immutable thereafter.
#[derive(Clone, Serialize)]
pub struct EnvBinding {
    /// Environment variable name.
    pub key: String,
    /// Custom decoder; `None` selects the resolver's default shell-style
    /// decoder.
    #[serde(skip)]
    pub decoder: Option<Arc<dyn EnvDecode>>,
}

impl fmt::Debug for EnvBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvBinding")
            .field("key", &self.key)
            .field("custom_decoder", &self.decoder.is_some())
            .finish()
    }
}

/// One configurable value a command accepts.
///
/// A parameter with a short and/or long flag form is an option; one with
/// neither is positional. Use the constructors [`option`](ParamSpec::option)
/// and [`positional`](ParamSpec::positional), then chain builder methods.
///
/// # Examples
///
/// ```
/// use envarg_core::{Arity, ParamSpec, Value, ValueType};
///
/// let bar = ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
///     .with_arity(Arity::AtLeastOne)
///     .required(true)
///     .with_default(Value::Int(22))
///     .from_env("BAR")
///     .with_help("Help message for bar.");
/// assert_eq!(bar.display_name(), "--bar");
/// assert_eq!(bar.env.as_ref().unwrap().key, "BAR");
///
/// let baz = ParamSpec::positional("baz", ValueType::Int);
/// assert!(baz.is_positional());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    /// Destination key in the resolved snapshot.
    pub dest: String,
    /// Long flag form (e.g. "--bar").
    pub long: Option<String>,
    /// Short flag form (e.g. "-b").
    pub short: Option<String>,
    /// Type every raw token converts through.
    pub value_type: ValueType,
    /// Number of values consumed.
    pub arity: Arity,
    /// Whether some source must supply a value.
    pub required: bool,
    /// Static default, lowest-precedence source.
    pub default: Option<Value>,
    /// Base help text.
    pub help: Option<String>,
    /// Environment fallback, if any.
    pub env: Option<EnvBinding>,
}

impl ParamSpec {
    /// Creates an option parameter with the given flag forms.
    ///
    /// # Examples
    ///
    /// ```
    /// use envarg_core::{ParamSpec, ValueType};
    ///
    /// let v = ParamSpec::option("verbose", Some("-v"), Some("--verbose"), ValueType::Bool);
    /// assert!(v.matches_flag("-v"));
    /// assert!(v.matches_flag("--verbose"));
    /// assert!(!v.matches_flag("--quiet"));
    /// ```
    pub fn option(
        dest: &str,
        short: Option<&str>,
        long: Option<&str>,
        value_type: ValueType,
    ) -> Self {
        Self {
            dest: dest.to_string(),
            long: long.map(String::from),
            short: short.map(String::from),
            value_type,
            arity: Arity::One,
            required: false,
            default: None,
            help: None,
            env: None,
        }
    }

    /// Creates a positional parameter. Positionals are required unless
    /// [`required(false)`](ParamSpec::required) or an optional arity says
    /// otherwise.
    pub fn positional(dest: &str, value_type: ValueType) -> Self {
        Self {
            dest: dest.to_string(),
            long: None,
            short: None,
            value_type,
            arity: Arity::One,
            required: true,
            default: None,
            help: None,
            env: None,
        }
    }

    /// Sets the arity.
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Sets whether some source must supply a value.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the static default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the base help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Binds an environment fallback using the default decoder.
    pub fn from_env(mut self, key: &str) -> Self {
        self.env = Some(EnvBinding {
            key: key.to_string(),
            decoder: None,
        });
        self
    }

    /// Binds an environment fallback with a custom decoder.
    pub fn from_env_with(mut self, key: &str, decoder: Arc<dyn EnvDecode>) -> Self {
        self.env = Some(EnvBinding {
            key: key.to_string(),
            decoder: Some(decoder),
        });
        self
    }

    /// Whether this parameter is positional (no flag forms).
    pub fn is_positional(&self) -> bool {
        self.long.is_none() && self.short.is_none()
    }

    /// Checks whether a flag token matches this parameter's short or long
    /// form.
    pub fn matches_flag(&self, token: &str) -> bool {
        self.short.as_deref() == Some(token) || self.long.as_deref() == Some(token)
    }

    /// Returns the name used in diagnostics (long form preferred, then
    /// short form, then the destination key).
    pub fn display_name(&self) -> &str {
        self.long
            .as_deref()
            .or(self.short.as_deref())
            .unwrap_or(&self.dest)
    }
}

/// Mutually exclusive parameter group.
///
/// At most one member may be supplied on the command line. When any member
/// matches, the conflict check touches every member of the group; only the
/// matched parameter's value fetch actually runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExclusiveGroup {
    /// Destination keys of the member parameters.
    pub members: Vec<String>,
}

impl ExclusiveGroup {
    /// Creates a group from member destination keys.
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// Full parameter set for a command.
///
/// # Examples
///
/// ```
/// use envarg_core::{Arity, CommandSpec, ParamSpec, Value, ValueType};
///
/// let spec = CommandSpec::new("demo")
///     .with_about("A demo command")
///     .with_param(
///         ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
///             .with_arity(Arity::AtLeastOne)
///             .with_default(Value::Int(22))
///             .from_env("BAR"),
///     )
///     .with_param(ParamSpec::positional("baz", ValueType::Int));
///
/// assert_eq!(spec.params.len(), 2);
/// assert!(spec.find_param("bar").is_some());
/// assert_eq!(spec.positionals().count(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    /// Program name, used in usage and help output.
    pub name: String,
    /// Short description shown at the top of help output.
    pub about: Option<String>,
    /// Declared parameters, in declaration order.
    pub params: Vec<ParamSpec>,
    /// Mutually exclusive groups over declared parameters.
    pub groups: Vec<ExclusiveGroup>,
    /// Whether options and positionals parse in two interleaved phases.
    pub intermixed: bool,
}

impl CommandSpec {
    /// Creates an empty command spec with the given program name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            about: None,
            params: Vec::new(),
            groups: Vec::new(),
            intermixed: false,
        }
    }

    /// Sets the command description.
    pub fn with_about(mut self, about: &str) -> Self {
        self.about = Some(about.to_string());
        self
    }

    /// Adds a parameter.
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a mutually exclusive group.
    pub fn with_group(mut self, group: ExclusiveGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Enables or disables two-phase (intermixed) parsing.
    pub fn intermixed(mut self, intermixed: bool) -> Self {
        self.intermixed = intermixed;
        self
    }

    /// Finds a parameter by destination key.
    pub fn find_param(&self, dest: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.dest == dest)
    }

    /// Iterates positional parameters in declaration order.
    pub fn positionals(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.is_positional())
    }

    /// Returns the group containing `dest`, if any.
    pub fn group_of(&self, dest: &str) -> Option<&ExclusiveGroup> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m == dest))
    }
}
