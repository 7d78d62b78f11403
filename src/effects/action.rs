//! Transition actions and their resolution.
//!
//! An [`ActionSpec`] is what a table declares: a callback, the name of an
//! action registered on the machine, either of those with an argument
//! payload, or an ordered list of specs. Compilation flattens a spec into a
//! sequence of [`ActionStep`]s. Names stay names until the step runs, so a
//! registered action can be replaced after the machine is built.

use crate::effects::transition::TransitionError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the dispatch context and the step's arguments.
pub type ActionFn<C> = Arc<dyn Fn(&mut C, &[Value]) -> Result<(), TransitionError> + Send + Sync>;

/// Something that can be called: a callback value or a registered name.
pub enum Callable<C> {
    Func(ActionFn<C>),
    Named(String),
}

impl<C> Callable<C> {
    /// The registry name, for named callables.
    pub fn name(&self) -> Option<&str> {
        match self {
            Callable::Func(_) => None,
            Callable::Named(name) => Some(name),
        }
    }
}

impl<C> Clone for Callable<C> {
    fn clone(&self) -> Self {
        match self {
            Callable::Func(f) => Callable::Func(Arc::clone(f)),
            Callable::Named(name) => Callable::Named(name.clone()),
        }
    }
}

impl<C> fmt::Debug for Callable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Func(_) => f.write_str("Func(<callback>)"),
            Callable::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

/// Declared action of a transition.
///
/// # Example
///
/// ```rust
/// use statetable::effects::ActionSpec;
/// use serde_json::json;
///
/// struct Host;
///
/// let spec: ActionSpec<Host> = ActionSpec::seq([
///     ActionSpec::named("show"),
///     ActionSpec::named("greet").with_args(json!("john")),
///     ActionSpec::func(|_host: &mut Host, _args| Ok(())),
/// ]);
/// assert_eq!(spec.resolve().len(), 3);
/// ```
pub enum ActionSpec<C> {
    /// Call with no arguments.
    Call(Callable<C>),
    /// Call with a payload. An array payload is spread into positional
    /// arguments, anything else is passed as the single argument.
    Apply { func: Callable<C>, args: Value },
    /// Run each spec in order.
    Seq(Vec<ActionSpec<C>>),
}

impl<C> ActionSpec<C> {
    /// Wrap a callback.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        ActionSpec::Call(Callable::Func(Arc::new(f)))
    }

    /// Reference an action registered on the machine by name.
    pub fn named(name: impl Into<String>) -> Self {
        ActionSpec::Call(Callable::Named(name.into()))
    }

    /// Ordered list of actions.
    pub fn seq(specs: impl IntoIterator<Item = ActionSpec<C>>) -> Self {
        ActionSpec::Seq(specs.into_iter().collect())
    }

    /// Attach an argument payload.
    ///
    /// On a sequence the payload is attached to every member, replacing
    /// any payload a member already had.
    pub fn with_args(self, args: impl Into<Value>) -> Self {
        let args = args.into();
        match self {
            ActionSpec::Call(func) | ActionSpec::Apply { func, .. } => {
                ActionSpec::Apply { func, args }
            }
            ActionSpec::Seq(specs) => ActionSpec::Seq(
                specs
                    .into_iter()
                    .map(|spec| spec.with_args(args.clone()))
                    .collect(),
            ),
        }
    }

    /// Flatten into the ordered steps to run.
    pub fn resolve(&self) -> Vec<ActionStep<C>> {
        let mut steps = Vec::new();
        self.flatten_into(&mut steps);
        steps
    }

    fn flatten_into(&self, steps: &mut Vec<ActionStep<C>>) {
        match self {
            ActionSpec::Call(func) => steps.push(ActionStep {
                callable: func.clone(),
                args: Vec::new(),
            }),
            ActionSpec::Apply { func, args } => steps.push(ActionStep {
                callable: func.clone(),
                args: spread(args),
            }),
            ActionSpec::Seq(specs) => {
                for spec in specs {
                    spec.flatten_into(steps);
                }
            }
        }
    }
}

fn spread(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

impl<C> Clone for ActionSpec<C> {
    fn clone(&self) -> Self {
        match self {
            ActionSpec::Call(func) => ActionSpec::Call(func.clone()),
            ActionSpec::Apply { func, args } => ActionSpec::Apply {
                func: func.clone(),
                args: args.clone(),
            },
            ActionSpec::Seq(specs) => ActionSpec::Seq(specs.clone()),
        }
    }
}

impl<C> fmt::Debug for ActionSpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionSpec::Call(func) => f.debug_tuple("Call").field(func).finish(),
            ActionSpec::Apply { func, args } => f
                .debug_struct("Apply")
                .field("func", func)
                .field("args", args)
                .finish(),
            ActionSpec::Seq(specs) => f.debug_tuple("Seq").field(specs).finish(),
        }
    }
}

impl<C> From<&str> for ActionSpec<C> {
    fn from(name: &str) -> Self {
        ActionSpec::named(name)
    }
}

impl<C> From<String> for ActionSpec<C> {
    fn from(name: String) -> Self {
        ActionSpec::named(name)
    }
}

impl<C> From<Vec<ActionSpec<C>>> for ActionSpec<C> {
    fn from(specs: Vec<ActionSpec<C>>) -> Self {
        ActionSpec::Seq(specs)
    }
}

/// One resolved call: a callable and its positional arguments.
pub struct ActionStep<C> {
    pub callable: Callable<C>,
    pub args: Vec<Value>,
}

impl<C> Clone for ActionStep<C> {
    fn clone(&self) -> Self {
        Self {
            callable: self.callable.clone(),
            args: self.args.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionStep<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionStep")
            .field("callable", &self.callable)
            .field("args", &self.args)
            .finish()
    }
}

/// Named actions available to a machine's transitions.
pub struct ActionRegistry<C> {
    actions: HashMap<String, ActionFn<C>>,
}

impl<C> ActionRegistry<C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register (or replace) an action under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut C, &[Value]) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, &[Value]) -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    /// Remove an action, returning it if it was registered.
    pub fn remove(&mut self, name: &str) -> Option<ActionFn<C>> {
        self.actions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ActionFn<C>> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check that every named step resolves, without calling anything.
    ///
    /// Returns the first name that does not resolve.
    pub fn dry_run<'a>(&self, steps: &'a [ActionStep<C>]) -> Result<(), &'a str> {
        steps
            .iter()
            .filter_map(|step| step.callable.name())
            .find(|name| !self.contains(name))
            .map_or(Ok(()), Err)
    }
}

impl<C> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for ActionRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ActionRegistry")
            .field("actions", &names)
            .finish()
    }
}

/// Run `steps` left to right against `ctx`.
///
/// Named steps are looked up through `lookup` at call time. The first
/// failing step stops the sequence and its error is returned.
pub fn run_steps<C, L>(ctx: &mut C, steps: &[ActionStep<C>], lookup: L) -> Result<(), TransitionError>
where
    L: Fn(&C, &str) -> Option<ActionFn<C>>,
{
    for step in steps {
        let func = match &step.callable {
            Callable::Func(f) => Arc::clone(f),
            Callable::Named(name) => {
                lookup(ctx, name).ok_or_else(|| TransitionError::ActionNotDefined {
                    name: name.clone(),
                })?
            }
        };
        func(ctx, &step.args)?;
    }
    Ok(())
}
