use eloquence_interpreter::{Environment, Evaluator, Value};
use eloquence_syntax::parse;
use std::rc::Rc;

#[derive(Debug, PartialEq)]
pub enum RunResult {
  Success,
  ParseError,
  RuntimeError(String),
}

/// Runs a source string with a default evaluator, returning the outcome,
/// the program's final value, and the root environment for inspection.
pub fn run(source: &str) -> (RunResult, Value, Rc<Environment>) {
  let (program, errors) = parse(source);
  if !errors.is_empty() {
    return (RunResult::ParseError, Value::Null, Environment::root());
  }

  let env = Environment::root();
  match Evaluator::new().eval(&program, &env) {
    Ok(value) => (RunResult::Success, value, env),
    Err(error) => (RunResult::RuntimeError(error.message), Value::Null, env),
  }
}

/// Declares a behaviour test: run the program, then assert that the listed
/// variables hold the expected values, or that it fails in the stated way.
#[macro_export]
macro_rules! eloquence_test {
  ($name:ident $code:literal $($var:ident == $expected:literal)*) => {
    #[test]
    fn $name() {
      let (result, _value, env) = run($code);
      assert_eq!(result, RunResult::Success);

      $(
        {
          let variable = env
            .get(stringify!($var))
            .expect(concat!("variable `", stringify!($var), "` should be defined"));
          let expected = eloquence_interpreter::Value::from($expected);
          assert!(variable == expected, "expected {expected:?}, got {variable:?}");
        };
      )*
    }
  };

  ($name:ident $code:literal RuntimeError $message:literal) => {
    #[test]
    fn $name() {
      let (result, _value, _env) = run($code);
      assert_eq!(result, RunResult::RuntimeError(String::from($message)));
    }
  };

  ($name:ident $code:literal ParseError) => {
    #[test]
    fn $name() {
      let (result, _value, _env) = run($code);
      assert_eq!(result, RunResult::ParseError);
    }
  };
}
