//! The Eloquence runtime: value model, lexical environments, builtins, and
//! the tree-walking evaluator.
//!
//! ```
//! use eloquence_interpreter::{eval, Environment, Value};
//! use eloquence_syntax::parse;
//!
//! let (program, errors) = parse("x is 5 adds 5 x");
//! assert!(errors.is_empty());
//!
//! let env = Environment::root();
//! let result = eval(&program, &env).unwrap();
//! assert_eq!(result, Value::Integer(10));
//! ```

mod builtins;
mod environment;
mod evaluator;
mod value;

pub use builtins::{Builtins, NativeFn, NativeFunction};
pub use environment::Environment;
pub use evaluator::{eval, Evaluator, IncludeHook, RuntimeError};
pub use value::{KeyKind, MapKey, Value};
