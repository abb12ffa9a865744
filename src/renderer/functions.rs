//! Functions exposed to templates.
//!
//! Context-free functions live in a [`FunctionSet`]. Functions that need to
//! reach other templates implement [`TemplateAwareFunction`] and are bound to
//! the environment of the template being rendered before its body is compiled.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use minijinja::{
    functions::Function,
    value::{FunctionArgs, FunctionResult, Object, Rest, Value},
    Environment, Error, ErrorKind, State,
};

use super::filters::{regex_filter, regex_replace};

/// Ordered mapping of function name to callable value.
#[derive(Debug, Clone, Default)]
pub struct FunctionSet {
    functions: IndexMap<String, Value>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Function set with the helpers every generator gets out of the box.
    pub fn with_defaults() -> Self {
        Self::new()
            .with("regex_match", regex_filter)
            .with("regex_replace", regex_replace)
            .with("join_path", join_path)
    }

    pub fn add<N, F, Rv, Args>(&mut self, name: N, f: F)
    where
        N: Into<String>,
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.insert(name.into(), Value::from_function(f));
    }

    pub fn with<N, F, Rv, Args>(mut self, name: N, f: F) -> Self
    where
        N: Into<String>,
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.add(name, f);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub(crate) fn register(&self, env: &mut Environment<'_>) {
        for (name, function) in &self.functions {
            env.add_global(name.clone(), function.clone());
        }
    }
}

fn join_path(parts: Rest<String>) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Upper bound on renders started from within template-aware functions.
///
/// Each such render runs on a fresh minijinja state, so the engine's own
/// recursion limit does not see through them.
const MAX_NESTED_RENDERS: usize = 16;

thread_local! {
    static NESTED_RENDERS: Cell<usize> = const { Cell::new(0) };
}

/// Counts one nested render for as long as it lives.
struct NestedRender;

impl NestedRender {
    fn enter() -> Result<Self, Error> {
        NESTED_RENDERS.with(|depth| {
            if depth.get() >= MAX_NESTED_RENDERS {
                return Err(Error::new(
                    ErrorKind::InvalidOperation,
                    format!("too many nested template renders (limit {MAX_NESTED_RENDERS})"),
                ));
            }
            depth.set(depth.get() + 1);
            Ok(NestedRender)
        })
    }
}

impl Drop for NestedRender {
    fn drop(&mut self) {
        NESTED_RENDERS.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Access to the template environment a function was bound to.
pub struct TemplateHandle<'a, 'tmpl, 'env> {
    state: &'a State<'tmpl, 'env>,
}

impl<'a, 'tmpl, 'env> TemplateHandle<'a, 'tmpl, 'env> {
    fn new(state: &'a State<'tmpl, 'env>) -> Self {
        Self { state }
    }

    /// Name of the template currently being rendered.
    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.state.env().get_template(name).is_ok()
    }

    /// Renders the named template, common templates included, against `context`.
    pub fn render_template(&self, name: &str, context: Value) -> Result<String, Error> {
        let _nested = NestedRender::enter()?;
        self.state.env().get_template(name)?.render(context)
    }

    /// Compiles and renders `source` within the same environment.
    pub fn render_str(&self, source: &str, context: Value) -> Result<String, Error> {
        let _nested = NestedRender::enter()?;
        self.state.env().render_str(source, context)
    }

    /// Looks up a variable visible to the current template.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.state.lookup(name)
    }
}

/// A function that needs the template it is rendered from.
pub trait TemplateAwareFunction: Send + Sync {
    fn call(&self, template: &TemplateHandle<'_, '_, '_>, args: &[Value])
        -> Result<Value, Error>;
}

impl<F> TemplateAwareFunction for F
where
    F: Fn(&TemplateHandle<'_, '_, '_>, &[Value]) -> Result<Value, Error> + Send + Sync,
{
    fn call(
        &self,
        template: &TemplateHandle<'_, '_, '_>,
        args: &[Value],
    ) -> Result<Value, Error> {
        self(template, args)
    }
}

/// Ordered mapping of name to template-aware function.
#[derive(Clone, Default)]
pub struct TemplateAwareFunctions {
    functions: IndexMap<String, Arc<dyn TemplateAwareFunction>>,
}

impl TemplateAwareFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `include(name, context?)` and `tpl(source, context?)`.
    pub fn with_defaults() -> Self {
        Self::new().with("include", IncludeFunction).with("tpl", TplFunction)
    }

    pub fn add(&mut self, name: impl Into<String>, function: impl TemplateAwareFunction + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        function: impl TemplateAwareFunction + 'static,
    ) -> Self {
        self.add(name, function);
        self
    }

    /// Closure flavour of [`TemplateAwareFunctions::with`].
    pub fn with_fn<F>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&TemplateHandle<'_, '_, '_>, &[Value]) -> Result<Value, Error>
            + Send
            + Sync
            + 'static,
    {
        self.with(name, function)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Binds every function to `env`, the environment the body is about to be
    /// compiled into.
    pub(crate) fn bind(&self, env: &mut Environment<'_>) {
        for (name, function) in &self.functions {
            let bound = BoundFunction { name: name.clone(), function: Arc::clone(function) };
            env.add_global(name.clone(), Value::from_object(bound));
        }
    }
}

impl fmt::Debug for TemplateAwareFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.functions.keys()).finish()
    }
}

struct BoundFunction {
    name: String,
    function: Arc<dyn TemplateAwareFunction>,
}

impl fmt::Debug for BoundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<template-aware function {}>", self.name)
    }
}

impl Object for BoundFunction {
    fn call(
        self: &Arc<Self>,
        state: &State<'_, '_>,
        args: &[Value],
    ) -> Result<Value, Error> {
        self.function.call(&TemplateHandle::new(state), args)
    }
}

fn split_name_and_context<'v>(
    function: &str,
    args: &'v [Value],
) -> Result<(&'v str, Value), Error> {
    let name = args.first().and_then(|value| value.as_str()).ok_or_else(|| {
        Error::new(
            ErrorKind::MissingArgument,
            format!("{function} expects a string as first argument"),
        )
    })?;
    if args.len() > 2 {
        return Err(Error::from(ErrorKind::TooManyArguments));
    }
    let context = args.get(1).cloned().unwrap_or_else(|| minijinja::context! {});
    Ok((name, context))
}

/// Renders a named template and returns its output as a string.
#[derive(Debug, Clone, Copy)]
pub struct IncludeFunction;

impl TemplateAwareFunction for IncludeFunction {
    fn call(
        &self,
        template: &TemplateHandle<'_, '_, '_>,
        args: &[Value],
    ) -> Result<Value, Error> {
        let (name, context) = split_name_and_context("include", args)?;
        template.render_template(name, context).map(Value::from)
    }
}

/// Renders a string as a template within the current environment.
#[derive(Debug, Clone, Copy)]
pub struct TplFunction;

impl TemplateAwareFunction for TplFunction {
    fn call(
        &self,
        template: &TemplateHandle<'_, '_, '_>,
        args: &[Value],
    ) -> Result<Value, Error> {
        let (source, context) = split_name_and_context("tpl", args)?;
        template.render_str(source, context).map(Value::from)
    }
}
