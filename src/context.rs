use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Result;
use crate::expression::ExprParser;
use crate::functions::{Function, FunctionResult, Registry};
use crate::multi::MultiExpression;
use crate::{consts, Number};

/// Default cap on the number of arguments in a single function call.
pub const DEFAULT_MAX_ARGUMENTS: usize = 8;

/// Default cap on nested parentheses, signs and call arguments.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Evaluation knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Calls with more arguments than this fail with `Too many arguments`.
    pub max_arguments: usize,
    /// Deeper nesting fails with `Expression nested too deeply` before the stack runs out.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_arguments: DEFAULT_MAX_ARGUMENTS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Symbol tables plus the evaluation entry points.
///
/// Not internally synchronized: a context shared between threads must be guarded by
/// the caller. Borrowing already enforces this within one thread, since a live
/// [`MultiExpression`] holds a shared borrow and registration needs `&mut self`.
#[derive(Debug, Clone)]
pub struct Context {
    variables: HashMap<String, Number>,
    units: HashMap<String, Number>,
    functions: Registry,
    options: Options,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Context with `pi`, `e` and the built-in functions.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let mut ctx = Self {
            variables: HashMap::new(),
            units: HashMap::new(),
            functions: Registry::with_builtins(),
            options,
        };
        ctx.set_variable("pi", consts::PI);
        ctx.set_variable("e", consts::E);
        ctx
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Binding for `name`, created as `0` if absent. Writes through it are seen by
    /// every later evaluation.
    pub fn add_variable(&mut self, name: impl Into<String>) -> &mut Number {
        self.variables.entry(name.into()).or_insert(0.0)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Number) {
        *self.add_variable(name) = value;
    }

    pub fn variable(&self, name: &str) -> Option<Number> {
        self.variables.get(name).copied()
    }

    /// Scale factor binding for the unit suffix `name`, created as `0` if absent.
    pub fn add_unit(&mut self, name: impl Into<String>) -> &mut Number {
        self.units.entry(name.into()).or_insert(0.0)
    }

    pub fn set_unit(&mut self, name: impl Into<String>, scale: Number) {
        *self.add_unit(name) = scale;
    }

    pub fn unit(&self, name: &str) -> Option<Number> {
        self.units.get(name).copied()
    }

    /// Register or replace a function.
    pub fn add_function(&mut self, name: impl Into<String>, f: Function) {
        self.functions.register(name, f);
    }

    pub fn add_function_1<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Number) -> Number + Send + Sync + 'static,
    {
        self.add_function(name, Function::unary(f));
    }

    pub fn add_function_2<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(Number, Number) -> Number + Send + Sync + 'static,
    {
        self.add_function(name, Function::binary(f));
    }

    pub fn add_function_variadic<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Number]) -> FunctionResult + Send + Sync + 'static,
    {
        self.add_function(name, Function::variadic(f));
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Evaluate one complete expression. Anything but whitespace after it is an error.
    pub fn eval_expression(&self, text: &str) -> Result<Number> {
        debug!(expression = text, "evaluating expression");
        let result = ExprParser::new(self, text).parse_complete();
        if let Err(e) = &result {
            debug!(error = %e, "evaluation failed");
        }
        result
    }

    /// Evaluate comma-separated expressions one segment at a time. The first segment
    /// is evaluated before this returns.
    pub fn eval_multi_expression<'c, 's>(&'c self, text: &'s str) -> MultiExpression<'c, 's> {
        debug!(expression = text, "evaluating multi-expression");
        MultiExpression::new(ExprParser::new(self, text))
    }
}
