//! Tiny embeddable arithmetic-expression evaluator.
//!
//! Expressions combine numbers, unit suffixes, variables and function calls with
//! `+ - * /` and unary signs. Everything is evaluated in a single pass over the text:
//!
//! ```
//! use picocalc::Context;
//!
//! let mut ctx = Context::new();
//! *ctx.add_unit("km") = 1000.0;
//! *ctx.add_variable("x") = 2.0;
//! assert_eq!(ctx.eval_expression("1.5km + x * 3").unwrap(), 1506.0);
//! ```
pub mod errors;
pub mod config;
pub mod context;
pub mod functions;
pub mod multi;
mod expression;
mod scanner;

pub use config::Config;
pub use context::{Context, Options, DEFAULT_MAX_ARGUMENTS, DEFAULT_MAX_DEPTH};
pub use errors::{ConfigError, ErrorKind, EvalError, Found, FunctionError, Result};
pub use functions::{Function, FunctionResult, Registry};
pub use multi::MultiExpression;

/// Numeric type used throughout; `f32` with the `single-precision` feature.
#[cfg(not(feature = "single-precision"))]
pub type Number = f64;
#[cfg(not(feature = "single-precision"))]
pub(crate) use std::f64::consts;

#[cfg(feature = "single-precision")]
pub type Number = f32;
#[cfg(feature = "single-precision")]
pub(crate) use std::f32::consts;

/// Convenience: evaluate with a default context (constants and built-in functions).
pub fn eval(expr: &str) -> Result<Number> {
    Context::new().eval_expression(expr)
}
