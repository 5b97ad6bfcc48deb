//! The layered resolution engine.

use std::collections::HashMap;
use std::sync::Arc;

use envarg_core::{
    CommandSpec, EnvDecode, ResolveError, Snapshot, SpecError, ValueSource, shape_values,
    validate_spec,
};
use tracing::debug;

use crate::envdecode::ShellWords;
use crate::grammar;
use crate::ops::{DefaultOps, ParamOps};
use crate::source::{KeyValueSource, OsEnv};
use crate::tracker::PassTracker;

/// Resolves parameter values from layered sources with a fixed total
/// precedence: command line > alternate source > preset snapshot > static
/// default.
///
/// An instance owns the pass-scoped tracking state (invocation counters,
/// seen set, pass depth), so multiple resolvers coexist without
/// interference. The state resets at the start of every top-level
/// [`resolve`](Resolver::resolve) call and never mid-pass, which keeps the
/// bookkeeping correct when a parse internally runs nested passes over the
/// same parameter set. One instance is not safe for concurrent resolves;
/// use one resolver per thread.
///
/// # Examples
///
/// ```
/// use envarg_core::{Arity, CommandSpec, ParamSpec, Value, ValueType};
/// use envarg_resolver::{MapSource, Resolver};
///
/// let spec = CommandSpec::new("demo")
///     .with_param(
///         ParamSpec::option("bar", None, Some("--bar"), ValueType::Int)
///             .with_arity(Arity::AtLeastOne)
///             .required(true)
///             .with_default(Value::Int(22))
///             .from_env("BAR"),
///     )
///     .with_param(ParamSpec::positional("baz", ValueType::Int));
///
/// let source = MapSource::new().with("BAR", "1 2 3 '45  ' 6 7");
/// let mut resolver = Resolver::with_source(spec, source).unwrap();
/// let snapshot = resolver.resolve(["123"]).unwrap();
///
/// assert_eq!(snapshot.get("baz"), Some(&Value::Int(123)));
/// let bar = snapshot.get("bar").and_then(|v| v.as_list()).unwrap();
/// assert_eq!(bar.len(), 6);
/// assert_eq!(bar[3], Value::Int(45));
/// ```
pub struct Resolver {
    pub(crate) spec: CommandSpec,
    pub(crate) tracker: PassTracker,
    source: Box<dyn KeyValueSource>,
    ops: HashMap<String, Arc<dyn ParamOps>>,
    default_ops: Arc<dyn ParamOps>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("spec", &self.spec)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver over the process environment.
    ///
    /// Fails with the first [`SpecError`] when the spec is structurally
    /// invalid, so resolution only ever runs over well-formed specs.
    pub fn new(spec: CommandSpec) -> Result<Self, SpecError> {
        Self::with_source(spec, OsEnv)
    }

    /// Creates a resolver over an injected key-value source.
    pub fn with_source<S>(spec: CommandSpec, source: S) -> Result<Self, SpecError>
    where
        S: KeyValueSource + 'static,
    {
        if let Some(error) = validate_spec(&spec).into_iter().next() {
            return Err(error);
        }
        Ok(Self {
            spec,
            tracker: PassTracker::new(),
            source: Box::new(source),
            ops: HashMap::new(),
            default_ops: Arc::new(DefaultOps),
        })
    }

    /// Substitutes the resolution capabilities for one parameter.
    ///
    /// Operations the substitute does not override keep the shared
    /// default behavior.
    pub fn override_ops(mut self, dest: &str, ops: Arc<dyn ParamOps>) -> Self {
        self.ops.insert(dest.to_string(), ops);
        self
    }

    /// The command spec this resolver serves.
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Resolves `argv` with an empty preset.
    pub fn resolve<I, S>(&mut self, argv: I) -> Result<Snapshot, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_seeded(argv, Snapshot::new())
    }

    /// Resolves `argv` seeded with pre-existing values.
    ///
    /// Preset values sit between alternate-source values and static
    /// defaults in precedence: the command line and a set alternate-source
    /// key both override a preset entry, while a preset entry masks the
    /// static default.
    pub fn resolve_seeded<I, S>(
        &mut self,
        argv: I,
        preset: Snapshot,
    ) -> Result<Snapshot, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = argv.into_iter().map(Into::into).collect();
        let mut snap = preset;
        self.run_pass(&mut snap, |rt, snap| {
            if rt.spec.intermixed {
                // Two-phase parsing: options first, positionals second,
                // each as a nested pass over the same tracking state.
                let mut leftover = Vec::new();
                rt.run_pass(snap, |rt, snap| {
                    leftover = grammar::scan_options(rt, &tokens, snap)?;
                    Ok(())
                })?;
                rt.run_pass(snap, |rt, snap| {
                    grammar::match_positionals(rt, &leftover, snap)
                })
            } else {
                let leftover = grammar::scan_options(rt, &tokens, snap)?;
                grammar::match_positionals(rt, &leftover, snap)
            }
        })?;
        Ok(snap)
    }

    /// Runs one resolution pass.
    ///
    /// Entering at depth zero resets the tracking state; returning to
    /// depth zero finalizes the snapshot (alternate sources, defaults,
    /// required check). Nested passes pass through the same gate without
    /// triggering either side effect, so finalization happens exactly once
    /// per top-level call, after every nested pass has completed.
    fn run_pass<F>(&mut self, snap: &mut Snapshot, body: F) -> Result<(), ResolveError>
    where
        F: FnOnce(&mut Self, &mut Snapshot) -> Result<(), ResolveError>,
    {
        if self.tracker.depth() == 0 {
            debug!(command = %self.spec.name, "Starting top-level resolution pass");
            self.tracker.begin_top_level();
        }
        self.tracker.enter();
        let result = body(self, snap);
        self.tracker.exit();
        result?;
        if self.tracker.depth() == 0 {
            self.apply_alternate_source(snap)?;
            self.fill_defaults(snap);
            self.check_required(snap)?;
        }
        Ok(())
    }

    /// Finds the option parameter matching a flag token.
    pub(crate) fn find_option(&self, flag: &str) -> Option<usize> {
        self.spec
            .params
            .iter()
            .position(|p| !p.is_positional() && p.matches_flag(flag))
    }

    /// Notes that a flag token matched the parameter and runs the
    /// exclusive-group conflict scan.
    ///
    /// The scan marks every member of the parameter's group as seen but
    /// runs no fetch; a conflict is raised only when another member's
    /// fetch already ran this pass.
    pub(crate) fn note_flag_match(&mut self, idx: usize) -> Result<(), ResolveError> {
        let dest = self.spec.params[idx].dest.clone();
        self.tracker.note_seen(&dest);

        let members: Vec<String> = match self.spec.group_of(&dest) {
            Some(group) => group.members.clone(),
            None => return Ok(()),
        };
        for member in &members {
            self.tracker.note_seen(member);
        }
        for member in &members {
            if member != &dest && self.tracker.invoked(member) {
                return Err(ResolveError::Conflict {
                    param: self.display_name(&dest),
                    other: self.display_name(member),
                });
            }
        }
        Ok(())
    }

    /// Runs the parameter's value fetch over command-line tokens: counts
    /// the invocation, marks the parameter seen, delegates to the
    /// parameter's capabilities, and installs the shaped value.
    pub(crate) fn invoke(
        &mut self,
        idx: usize,
        tokens: &[String],
        snap: &mut Snapshot,
    ) -> Result<(), ResolveError> {
        let dest = self.spec.params[idx].dest.clone();
        self.tracker.record_invocation(&dest);

        let ops = self.ops_for(&dest);
        let source = ValueSource::CommandLine;
        let param = &self.spec.params[idx];
        // A substituted match_count may not exceed what is actually there.
        let consumed = ops
            .match_count(param, &source, tokens.len())?
            .min(tokens.len());
        let value = ops.fetch(param, &source, &tokens[..consumed])?;
        debug!(
            param = %param.display_name(),
            invocations = self.tracker.invoke_count(&dest),
            "Fetched command-line value"
        );
        snap.insert(&dest, value);
        Ok(())
    }

    fn ops_for(&self, dest: &str) -> Arc<dyn ParamOps> {
        self.ops
            .get(dest)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_ops))
    }

    fn display_name(&self, dest: &str) -> String {
        self.spec
            .find_param(dest)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| dest.to_string())
    }

    /// Applies alternate-source values to every bound parameter whose
    /// fetch never ran this pass.
    ///
    /// The gate is the invocation counter alone: a parameter the grammar
    /// touched without fetching (bare optional flag, conflict scan) still
    /// receives its alternate-source value. Decoder extras are a hard
    /// failure, surfaced like surplus command-line tokens.
    fn apply_alternate_source(&mut self, snap: &mut Snapshot) -> Result<(), ResolveError> {
        for idx in 0..self.spec.params.len() {
            let param = &self.spec.params[idx];
            let Some(binding) = &param.env else {
                continue;
            };
            if self.tracker.invoked(&param.dest) {
                debug!(
                    param = %param.display_name(),
                    invocations = self.tracker.invoke_count(&param.dest),
                    "Command line supplied a value; skipping alternate source"
                );
                continue;
            }
            let Some(raw) = self.source.get(&binding.key) else {
                debug!(param = %param.display_name(), key = %binding.key, "Alternate source key unset");
                continue;
            };

            let decoded = match &binding.decoder {
                Some(decoder) => decoder.decode(param, &raw)?,
                None => ShellWords.decode(param, &raw)?,
            };
            if !decoded.extras.is_empty() {
                return Err(ResolveError::ExtraValues {
                    param: param.display_name().to_string(),
                    key: binding.key.clone(),
                    extras: decoded.extras,
                });
            }
            if decoded.values.is_empty() && !param.arity.takes_list() {
                continue;
            }
            debug!(
                param = %param.display_name(),
                key = %binding.key,
                seen = self.tracker.was_seen(&param.dest),
                "Applying alternate-source value"
            );
            snap.insert(&param.dest, shape_values(param.arity, decoded.values));
        }
        Ok(())
    }

    fn fill_defaults(&self, snap: &mut Snapshot) {
        for param in &self.spec.params {
            if snap.contains(&param.dest) {
                continue;
            }
            if let Some(default) = &param.default {
                snap.insert(&param.dest, default.clone());
            }
        }
    }

    fn check_required(&self, snap: &Snapshot) -> Result<(), ResolveError> {
        for param in &self.spec.params {
            if param.required && !snap.contains(&param.dest) {
                return Err(ResolveError::RequiredMissing {
                    param: param.display_name().to_string(),
                });
            }
        }
        Ok(())
    }
}
