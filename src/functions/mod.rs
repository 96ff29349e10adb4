use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{ErrorKind, FunctionError};
use crate::Number;

/// Result returned by a variadic function.
pub type FunctionResult = std::result::Result<Number, FunctionError>;

type UnaryFn = dyn Fn(Number) -> Number + Send + Sync;
type BinaryFn = dyn Fn(Number, Number) -> Number + Send + Sync;
type VariadicFn = dyn Fn(&[Number]) -> FunctionResult + Send + Sync;

/// A callable registered under a name, tagged with its arity contract.
#[derive(Clone)]
pub enum Function {
    /// Exactly one argument.
    Unary(Arc<UnaryFn>),
    /// Exactly two arguments.
    Binary(Arc<BinaryFn>),
    /// Any number of arguments up to the context's `max_arguments`; the callback
    /// validates the count itself.
    Variadic(Arc<VariadicFn>),
}

impl Function {
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(Number) -> Number + Send + Sync + 'static,
    {
        Function::Unary(Arc::new(f))
    }

    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(Number, Number) -> Number + Send + Sync + 'static,
    {
        Function::Binary(Arc::new(f))
    }

    pub fn variadic<F>(f: F) -> Self
    where
        F: Fn(&[Number]) -> FunctionResult + Send + Sync + 'static,
    {
        Function::Variadic(Arc::new(f))
    }

    /// Declared argument count, `None` for variadic functions.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Function::Unary(_) => Some(1),
            Function::Binary(_) => Some(2),
            Function::Variadic(_) => None,
        }
    }

    /// Check the arity contract, then invoke.
    pub(crate) fn call(&self, args: &[Number]) -> std::result::Result<Number, ErrorKind> {
        if let Some(required) = self.arity() {
            if args.len() != required {
                return Err(ErrorKind::ArgumentCount { required });
            }
        }
        match self {
            Function::Unary(f) => Ok(f(args[0])),
            Function::Binary(f) => Ok(f(args[0], args[1])),
            Function::Variadic(f) => f(args).map_err(|e| ErrorKind::Function(e.0)),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Unary(_) => f.write_str("Function::Unary"),
            Function::Binary(_) => f.write_str("Function::Binary"),
            Function::Variadic(_) => f.write_str("Function::Variadic"),
        }
    }
}

/// Function table. Cloning is cheap until one of the clones registers something.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<String, Function>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Insert or replace.
    pub fn register(&mut self, name: impl Into<String>, f: Function) {
        let mut_map = Arc::make_mut(&mut self.inner);
        mut_map.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.inner.get(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.inner.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("functions", &names).finish()
    }
}

pub mod builtins {
    use super::*;

    pub fn register_all(registry: &mut Registry) {
        let unary: [(&str, fn(Number) -> Number); 15] = [
            ("abs", Number::abs),
            ("ceil", Number::ceil),
            ("floor", Number::floor),
            ("round", Number::round),
            ("ln", Number::ln),
            ("log", Number::log10),
            ("cos", Number::cos),
            ("sin", Number::sin),
            ("acos", Number::acos),
            ("asin", Number::asin),
            ("cosh", Number::cosh),
            ("sinh", Number::sinh),
            ("tan", Number::tan),
            ("tanh", Number::tanh),
            ("sqrt", Number::sqrt),
        ];
        for (name, f) in unary {
            registry.register(name, Function::unary(f));
        }
        registry.register("atan2", Function::binary(Number::atan2));
        registry.register("pow", Function::binary(Number::powf));
        registry.register("min", Function::variadic(min));
        registry.register("max", Function::variadic(max));
    }

    pub fn min(args: &[Number]) -> FunctionResult {
        if args.is_empty() {
            return Err("At least one argument required".into());
        }
        Ok(args.iter().fold(Number::MAX, |acc, &x| x.min(acc)))
    }

    pub fn max(args: &[Number]) -> FunctionResult {
        if args.is_empty() {
            return Err("At least one argument required".into());
        }
        Ok(args.iter().fold(Number::MIN, |acc, &x| x.max(acc)))
    }
}
