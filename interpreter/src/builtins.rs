use crate::evaluator::RuntimeError;
use crate::value::Value;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// The callable behind a builtin. `Rc<dyn Fn>` rather than a plain function
/// pointer so hosts can install capturing closures (a shell writing through
/// ANSI styling, a test capturing into a buffer).
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value, RuntimeError>>;

#[derive(Clone)]
pub struct NativeFunction {
  pub name: &'static str,
  func: NativeFn,
}

impl NativeFunction {
  fn new(name: &'static str, func: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static) -> Self {
    Self {
      name,
      func: Rc::new(func),
    }
  }

  pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
    (self.func)(args)
  }
}

/// The fixed, ordered table of host-provided functions.
///
/// Identifier resolution checks the environment first, so user code may
/// shadow any of these names. Hosts replace `show` and `ask` in place.
pub struct Builtins {
  entries: Vec<NativeFunction>,
}

impl Builtins {
  pub fn new() -> Self {
    Self {
      entries: vec![
        NativeFunction::new("show", show),
        NativeFunction::new("count", count),
        NativeFunction::new("append", append),
        NativeFunction::new("ask", ask),
        NativeFunction::new("upper", upper),
        NativeFunction::new("lower", lower),
        NativeFunction::new("split", split),
        NativeFunction::new("join", join),
        NativeFunction::new("str", str_builtin),
      ],
    }
  }

  pub fn get(&self, name: &str) -> Option<NativeFunction> {
    self.entries.iter().find(|entry| entry.name == name).cloned()
  }

  /// Replaces the callable of an existing entry. Returns false when no
  /// builtin of that name exists.
  pub fn install_override(&mut self, name: &str, func: NativeFn) -> bool {
    match self.entries.iter_mut().find(|entry| entry.name == name) {
      Some(entry) => {
        entry.func = func;
        true
      }
      None => false,
    }
  }
}

impl Default for Builtins {
  fn default() -> Self {
    Self::new()
  }
}

fn wrong_arguments(got: usize, want: usize) -> RuntimeError {
  RuntimeError::new(format!("wrong number of arguments. got={got}, want={want}"))
}

/// Joins the inspect forms of all arguments with spaces and prints one line.
fn show(args: &[Value]) -> Result<Value, RuntimeError> {
  let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
  println!("{}", parts.join(" "));
  Ok(Value::Null)
}

fn count(args: &[Value]) -> Result<Value, RuntimeError> {
  if args.len() != 1 {
    return Err(wrong_arguments(args.len(), 1));
  }
  match &args[0] {
    Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
    Value::String(string) => Ok(Value::Integer(string.len() as i64)),
    other => Err(RuntimeError::new(format!(
      "argument to `count` not supported, got {}",
      other.type_name()
    ))),
  }
}

/// Functional append: the original array is left untouched.
fn append(args: &[Value]) -> Result<Value, RuntimeError> {
  if args.len() != 2 {
    return Err(wrong_arguments(args.len(), 2));
  }
  match &args[0] {
    Value::Array(elements) => {
      let mut extended = elements.as_ref().clone();
      extended.push(args[1].clone());
      Ok(Value::from(extended))
    }
    other => Err(RuntimeError::new(format!(
      "first argument to `append` must be ARRAY, got {}",
      other.type_name()
    ))),
  }
}

/// Prompts (when given an argument) and reads one line from standard input.
/// A failed or exhausted read yields `none`.
fn ask(args: &[Value]) -> Result<Value, RuntimeError> {
  if let Some(prompt) = args.first() {
    print!("{prompt} ");
    io::stdout().flush().ok();
  }

  let mut line = String::new();
  match io::stdin().lock().read_line(&mut line) {
    Ok(0) | Err(_) => Ok(Value::Null),
    Ok(_) => Ok(Value::from(line.trim())),
  }
}

fn upper(args: &[Value]) -> Result<Value, RuntimeError> {
  match args {
    [Value::String(string)] => Ok(Value::from(string.to_uppercase())),
    _ => Err(RuntimeError::new("upper takes a string")),
  }
}

fn lower(args: &[Value]) -> Result<Value, RuntimeError> {
  match args {
    [Value::String(string)] => Ok(Value::from(string.to_lowercase())),
    _ => Err(RuntimeError::new("lower takes a string")),
  }
}

fn split(args: &[Value]) -> Result<Value, RuntimeError> {
  if args.len() != 2 {
    return Err(wrong_arguments(args.len(), 2));
  }
  match (&args[0], &args[1]) {
    (Value::String(string), Value::String(separator)) => {
      let pieces: Vec<Value> = if separator.is_empty() {
        string.chars().map(|c| Value::from(c.to_string())).collect()
      } else {
        string.split(separator.as_ref()).map(Value::from).collect()
      };
      Ok(Value::from(pieces))
    }
    _ => Err(RuntimeError::new("split requires (string, separator)")),
  }
}

fn join(args: &[Value]) -> Result<Value, RuntimeError> {
  if args.len() != 2 {
    return Err(wrong_arguments(args.len(), 2));
  }
  match (&args[0], &args[1]) {
    (Value::Array(elements), Value::String(separator)) => {
      let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
      Ok(Value::from(parts.join(separator)))
    }
    _ => Err(RuntimeError::new("join requires (array, separator)")),
  }
}

fn str_builtin(args: &[Value]) -> Result<Value, RuntimeError> {
  if args.len() != 1 {
    return Err(wrong_arguments(args.len(), 1));
  }
  Ok(Value::from(args[0].to_string()))
}
