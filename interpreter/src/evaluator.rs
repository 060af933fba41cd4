use crate::builtins::{Builtins, NativeFn};
use crate::environment::Environment;
use crate::value::{Function, MapObject, Pointer, StructDef, StructInstance, Value};
use ahash::AHashMap;
use eloquence_syntax::ast::{Block, Expression, Identifier, Program, Statement};
use smallvec::SmallVec;
use std::error;
use std::fmt;
use std::rc::Rc;

/// A language-level runtime error. The message is itself the value consumed
/// by `try`/`catch`; hosts render it with the `ERROR:` prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeError {
  pub message: String,
}

impl RuntimeError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

impl fmt::Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "ERROR: {}", self.message)
  }
}

impl error::Error for RuntimeError {}

/// Control flow threaded through the error channel: `return` unwinding and
/// runtime errors both terminate blocks, loops, and calls early. A function
/// call boundary consumes `Return`; only `try` consumes `Error`.
enum Interrupt {
  Return(Value),
  Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
  fn from(error: RuntimeError) -> Self {
    Self::Error(error)
  }
}

type Evaluated = Result<Value, Interrupt>;

fn fail(message: String) -> Interrupt {
  Interrupt::Error(RuntimeError::new(message))
}

/// Hook backing the `include` statement. Receives the rendered path value;
/// the host fetches and parses, the core never reads the filesystem.
pub type IncludeHook = Box<dyn Fn(&str) -> Result<Program, String>>;

/// The tree-walking evaluator, carrying the builtin registry and the
/// optional include hook a host has installed.
pub struct Evaluator {
  builtins: Builtins,
  include_hook: Option<IncludeHook>,
}

impl Evaluator {
  pub fn new() -> Self {
    Self {
      builtins: Builtins::new(),
      include_hook: None,
    }
  }

  /// Replaces a builtin's native callable in place (at least `show` and
  /// `ask` are expected to be replaceable). Returns false for unknown names.
  pub fn install_builtin_override(&mut self, name: &str, func: NativeFn) -> bool {
    self.builtins.install_override(name, func)
  }

  pub fn install_include_hook(&mut self, hook: IncludeHook) {
    self.include_hook = Some(hook);
  }

  /// Runs a program. The result is the value of the last top-level
  /// statement, with a terminal `return` unwrapped.
  pub fn eval(&self, program: &Program, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    let mut result = Value::Null;
    for statement in &program.statements {
      result = match self.eval_statement(statement, env) {
        Ok(value) => value,
        Err(Interrupt::Return(value)) => return Ok(value),
        Err(Interrupt::Error(error)) => return Err(error),
      };
    }
    Ok(result)
  }

  fn eval_statement(&self, statement: &Statement, env: &Rc<Environment>) -> Evaluated {
    match statement {
      Statement::Assignment { name, value, .. } => {
        let value = self.eval_expression(value, env)?;
        env.set(&name.value, value.clone());
        Ok(value)
      }
      Statement::PointerAssignment { name, value, .. } => {
        self.eval_pointer_assignment(name, value, env)
      }
      Statement::Return { value, .. } => {
        let value = self.eval_expression(value, env)?;
        Err(Interrupt::Return(value))
      }
      Statement::Expression { expression, .. } => self.eval_expression(expression, env),
      Statement::While { condition, body, .. } => {
        // The body runs in the enclosing scope so counters update naturally
        loop {
          let condition = self.eval_expression(condition, env)?;
          if !condition.is_truthy() {
            break Ok(Value::Null);
          }
          self.eval_block(body, env)?;
        }
      }
      Statement::ForIn {
        variable,
        iterable,
        body,
        ..
      } => {
        let iterable = self.eval_expression(iterable, env)?;
        let Value::Array(elements) = &iterable else {
          return Err(fail(format!("for-in expects ARRAY, got {}", iterable.type_name())));
        };
        for element in elements.iter() {
          env.set(&variable.value, element.clone());
          self.eval_block(body, env)?;
        }
        Ok(Value::Null)
      }
      Statement::TryCatch {
        try_block,
        catch_block,
        finally_block,
        ..
      } => self.eval_try_catch(try_block, catch_block.as_ref(), finally_block.as_ref(), env),
      Statement::StructDefinition { name, fields, .. } => {
        let definition = StructDef {
          name: name.value.clone(),
          fields: fields.iter().map(|field| field.value.clone()).collect(),
        };
        env.set(&name.value, Value::StructDef(Rc::new(definition)));
        Ok(Value::Null)
      }
      Statement::Include { path, .. } => self.eval_include(path, env),
    }
  }

  fn eval_block(&self, block: &Block, env: &Rc<Environment>) -> Evaluated {
    let mut result = Value::Null;
    for statement in &block.statements {
      result = self.eval_statement(statement, env)?;
    }
    Ok(result)
  }

  fn eval_try_catch(
    &self,
    try_block: &Block,
    catch_block: Option<&Block>,
    finally_block: Option<&Block>,
    env: &Rc<Environment>,
  ) -> Evaluated {
    let result = match self.eval_block(try_block, &Environment::enclosed(env)) {
      Err(Interrupt::Error(_)) => match catch_block {
        Some(catch) => self.eval_block(catch, &Environment::enclosed(env)),
        None => Ok(Value::Null),
      },
      other => other,
    };

    // Always runs; its own error or return is discarded
    if let Some(finally) = finally_block {
      let _ = self.eval_block(finally, &Environment::enclosed(env));
    }

    result
  }

  fn eval_include(&self, path: &Expression, env: &Rc<Environment>) -> Evaluated {
    let path = self.eval_expression(path, env)?;
    let Some(hook) = &self.include_hook else {
      return Ok(Value::Null);
    };

    let program = hook(&path.to_string()).map_err(RuntimeError::new)?;
    for statement in &program.statements {
      self.eval_statement(statement, env)?;
    }
    Ok(Value::Null)
  }

  fn eval_expression(&self, expression: &Expression, env: &Rc<Environment>) -> Evaluated {
    match expression {
      Expression::Identifier(identifier) => self.eval_identifier(identifier, env),
      Expression::Integer { value, .. } => Ok(Value::Integer(*value)),
      Expression::Float { value, .. } => Ok(Value::Float(*value)),
      Expression::String { value, .. } => Ok(Value::from(value.as_str())),
      Expression::Char { value, .. } => Ok(Value::Char(*value)),
      Expression::Boolean { value, .. } => Ok(Value::Boolean(*value)),
      Expression::Null { .. } => Ok(Value::Null),
      Expression::Prefix { operator, right, .. } => {
        let right = self.eval_expression(right, env)?;
        eval_prefix(operator, right)
      }
      Expression::Infix {
        operator,
        left,
        right,
        ..
      } => {
        let left = self.eval_expression(left, env)?;
        let right = self.eval_expression(right, env)?;
        eval_infix(operator, left, right)
      }
      Expression::If {
        condition,
        consequence,
        alternative,
        ..
      } => {
        let condition = self.eval_expression(condition, env)?;
        // Branches run in a fresh scope so their bindings do not leak
        if condition.is_truthy() {
          self.eval_block(consequence, &Environment::enclosed(env))
        } else if let Some(alternative) = alternative {
          self.eval_block(alternative, &Environment::enclosed(env))
        } else {
          Ok(Value::Null)
        }
      }
      Expression::Array { elements, .. } => {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
          values.push(self.eval_expression(element, env)?);
        }
        Ok(Value::from(values))
      }
      Expression::Map { pairs, .. } => self.eval_map_literal(pairs, env),
      Expression::Function {
        parameters, body, ..
      } => Ok(Value::Function(Rc::new(Function {
        parameters: parameters.clone(),
        body: Rc::clone(body),
        env: Rc::clone(env),
      }))),
      Expression::Call {
        function, arguments, ..
      } => {
        let callee = self.eval_expression(function, env)?;
        let mut args: SmallVec<[Value; 8]> = SmallVec::with_capacity(arguments.len());
        for argument in arguments {
          args.push(self.eval_expression(argument, env)?);
        }
        self.apply_function(callee, &args)
      }
      Expression::Index { left, index, .. } => {
        let left = self.eval_expression(left, env)?;
        let index = self.eval_expression(index, env)?;
        eval_index(left, index)
      }
      Expression::FieldAccess { object, field, .. } => {
        let object = self.eval_expression(object, env)?;
        let Value::StructInstance(instance) = &object else {
          return Err(fail(format!("not a struct instance: {}", object.type_name())));
        };
        match instance.fields.get(&field.value) {
          Some(value) => Ok(value.clone()),
          None => Err(fail(format!(
            "struct {} has no field {}",
            instance.definition.name, field.value
          ))),
        }
      }
      Expression::StructInstantiation { name, fields, .. } => {
        self.eval_struct_instantiation(name, fields, env)
      }
      Expression::PointerReference { target, .. } => eval_pointer_reference(target, env),
      Expression::PointerDereference { pointer, .. } => {
        let value = self.eval_expression(pointer, env)?;
        let Value::Pointer(pointer) = value else {
          return Err(fail(String::from("cannot dereference non-pointer")));
        };
        match pointer.env.get(&pointer.name) {
          Some(value) => Ok(value),
          None => Err(fail(format!("dangling pointer: {}", pointer.name))),
        }
      }
    }
  }

  fn eval_identifier(&self, identifier: &Identifier, env: &Rc<Environment>) -> Evaluated {
    if let Some(value) = env.get(&identifier.value) {
      return Ok(value);
    }
    if let Some(builtin) = self.builtins.get(&identifier.value) {
      return Ok(Value::Builtin(builtin));
    }
    Err(fail(format!("identifier not found: {}", identifier.value)))
  }

  fn eval_pointer_assignment(
    &self,
    name: &Identifier,
    value: &Expression,
    env: &Rc<Environment>,
  ) -> Evaluated {
    let Some(bound) = env.get(&name.value) else {
      return Err(fail(format!("identifier not found: {}", name.value)));
    };
    let Value::Pointer(pointer) = bound else {
      return Err(fail(format!("'{}' is not a pointer", name.value)));
    };

    let value = self.eval_expression(value, env)?;
    pointer.env.set(&pointer.name, value.clone());
    Ok(value)
  }

  fn eval_map_literal(
    &self,
    pairs: &[(Expression, Expression)],
    env: &Rc<Environment>,
  ) -> Evaluated {
    let mut map = AHashMap::with_capacity(pairs.len());
    for (key_expression, value_expression) in pairs {
      let key = self.eval_expression(key_expression, env)?;
      let Some(map_key) = key.map_key() else {
        return Err(fail(format!("unusable as map key: {}", key.type_name())));
      };
      let value = self.eval_expression(value_expression, env)?;
      map.insert(map_key, (key, value)); // duplicate keys overwrite
    }
    Ok(Value::Map(Rc::new(MapObject { pairs: map })))
  }

  fn eval_struct_instantiation(
    &self,
    name: &Identifier,
    fields: &[(Identifier, Expression)],
    env: &Rc<Environment>,
  ) -> Evaluated {
    let Some(value) = env.get(&name.value) else {
      return Err(fail(format!("unknown struct: {}", name.value)));
    };
    let Value::StructDef(definition) = value else {
      return Err(fail(format!("{} is not a struct", name.value)));
    };

    let mut instance_fields = AHashMap::with_capacity(definition.fields.len());
    for field in &definition.fields {
      instance_fields.insert(field.clone(), Value::Null);
    }
    // Provided fields overwrite the defaults; undeclared names are kept
    for (field, expression) in fields {
      let value = self.eval_expression(expression, env)?;
      instance_fields.insert(field.value.clone(), value);
    }

    Ok(Value::StructInstance(Rc::new(StructInstance {
      definition,
      fields: instance_fields,
    })))
  }

  fn apply_function(&self, callee: Value, args: &[Value]) -> Evaluated {
    match callee {
      Value::Function(function) => {
        let scope = Environment::enclosed(&function.env);
        // Extra arguments are discarded; missing parameters stay unbound
        for (parameter, argument) in function.parameters.iter().zip(args) {
          scope.set(&parameter.value, argument.clone());
        }
        match self.eval_block(&function.body, &scope) {
          Err(Interrupt::Return(value)) => Ok(value),
          other => other,
        }
      }
      Value::Builtin(builtin) => Ok(builtin.call(args)?),
      other => Err(fail(format!("not a function: {}", other.type_name()))),
    }
  }
}

impl Default for Evaluator {
  fn default() -> Self {
    Self::new()
  }
}

/// Runs a program with a default evaluator (stdout `show`, stdin `ask`,
/// no include hook).
pub fn eval(program: &Program, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
  Evaluator::new().eval(program, env)
}

fn eval_prefix(operator: &str, right: Value) -> Evaluated {
  match operator {
    "!" | "not" => Ok(Value::Boolean(!right.is_truthy())),
    "-" | "minus" => match right {
      Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
      Value::Float(value) => Ok(Value::Float(-value)),
      other => Err(fail(format!("unknown operator: -{}", other.type_name()))),
    },
    _ => Err(fail(format!("unknown operator: {operator}{}", right.type_name()))),
  }
}

fn eval_infix(operator: &str, left: Value, right: Value) -> Evaluated {
  if std::mem::discriminant(&left) != std::mem::discriminant(&right) {
    // Comparing anything against none is allowed and just yields false/true
    if matches!(left, Value::Null) || matches!(right, Value::Null) {
      match operator {
        "equals" => return Ok(Value::Boolean(false)),
        "not_equals" => return Ok(Value::Boolean(true)),
        _ => {}
      }
    }
    return Err(fail(format!(
      "type mismatch: {} {operator} {}",
      left.type_name(),
      right.type_name()
    )));
  }

  match (&left, &right) {
    (Value::Integer(l), Value::Integer(r)) => integer_infix(operator, *l, *r),
    (Value::Float(l), Value::Float(r)) => float_infix(operator, *l, *r),
    (Value::String(l), Value::String(r)) => string_infix(operator, l, r),
    (Value::Boolean(l), Value::Boolean(r)) => boolean_infix(operator, *l, *r),
    (Value::Null, Value::Null) => match operator {
      "equals" => Ok(Value::Boolean(true)),
      "not_equals" => Ok(Value::Boolean(false)),
      _ => Err(unknown_infix(operator, &left, &right)),
    },
    _ => Err(unknown_infix(operator, &left, &right)),
  }
}

fn unknown_infix(operator: &str, left: &Value, right: &Value) -> Interrupt {
  fail(format!(
    "unknown operator: {} {operator} {}",
    left.type_name(),
    right.type_name()
  ))
}

fn integer_infix(operator: &str, left: i64, right: i64) -> Evaluated {
  match operator {
    "adds" => Ok(Value::Integer(left.wrapping_add(right))),
    "subtracts" | "minus" | "-" => Ok(Value::Integer(left.wrapping_sub(right))),
    "times" => Ok(Value::Integer(left.wrapping_mul(right))),
    "divides" => {
      if right == 0 {
        Err(fail(String::from("division by zero")))
      } else {
        Ok(Value::Integer(left.wrapping_div(right)))
      }
    }
    "modulo" => {
      if right == 0 {
        Err(fail(String::from("division by zero")))
      } else {
        Ok(Value::Integer(left.wrapping_rem(right)))
      }
    }
    "equals" => Ok(Value::Boolean(left == right)),
    "not_equals" => Ok(Value::Boolean(left != right)),
    "greater" => Ok(Value::Boolean(left > right)),
    "less" => Ok(Value::Boolean(left < right)),
    "greater_equal" => Ok(Value::Boolean(left >= right)),
    "less_equal" => Ok(Value::Boolean(left <= right)),
    _ => Err(fail(format!("unknown operator: INTEGER {operator} INTEGER"))),
  }
}

fn float_infix(operator: &str, left: f64, right: f64) -> Evaluated {
  match operator {
    "adds" => Ok(Value::Float(left + right)),
    "subtracts" | "minus" | "-" => Ok(Value::Float(left - right)),
    "times" => Ok(Value::Float(left * right)),
    // Float division by zero is IEEE infinity, not an error
    "divides" => Ok(Value::Float(left / right)),
    "equals" => Ok(Value::Boolean(left == right)),
    "not_equals" => Ok(Value::Boolean(left != right)),
    "greater" => Ok(Value::Boolean(left > right)),
    "less" => Ok(Value::Boolean(left < right)),
    "greater_equal" => Ok(Value::Boolean(left >= right)),
    "less_equal" => Ok(Value::Boolean(left <= right)),
    _ => Err(fail(format!("unknown operator: FLOAT {operator} FLOAT"))),
  }
}

fn string_infix(operator: &str, left: &Rc<str>, right: &Rc<str>) -> Evaluated {
  match operator {
    "adds" => Ok(Value::from(format!("{left}{right}"))),
    "equals" => Ok(Value::Boolean(left == right)),
    "not_equals" => Ok(Value::Boolean(left != right)),
    _ => Err(fail(format!("unknown operator: STRING {operator} STRING"))),
  }
}

fn boolean_infix(operator: &str, left: bool, right: bool) -> Evaluated {
  match operator {
    "equals" => Ok(Value::Boolean(left == right)),
    "not_equals" => Ok(Value::Boolean(left != right)),
    "and" => Ok(Value::Boolean(left && right)),
    "or" => Ok(Value::Boolean(left || right)),
    _ => Err(fail(format!("unknown operator: BOOLEAN {operator} BOOLEAN"))),
  }
}

fn eval_index(left: Value, index: Value) -> Evaluated {
  match (&left, &index) {
    (Value::Array(elements), Value::Integer(position)) => {
      let position = *position;
      if position < 0 || position >= elements.len() as i64 {
        Ok(Value::Null) // out-of-range reads yield none
      } else {
        Ok(elements[position as usize].clone())
      }
    }
    (Value::Map(map), _) => {
      let Some(key) = index.map_key() else {
        return Err(fail(format!("unusable as map key: {}", index.type_name())));
      };
      match map.pairs.get(&key) {
        Some((_, value)) => Ok(value.clone()),
        None => Ok(Value::Null), // missing keys yield none
      }
    }
    _ => Err(fail(format!("index operator not supported: {}", left.type_name()))),
  }
}

fn eval_pointer_reference(target: &Expression, env: &Rc<Environment>) -> Evaluated {
  let Expression::Identifier(identifier) = target else {
    return Err(fail(String::from("can only point to identifier")));
  };

  match env.resolve(&identifier.value) {
    Some(defining_scope) => Ok(Value::Pointer(Rc::new(Pointer {
      name: identifier.value.clone(),
      env: defining_scope,
    }))),
    None => Err(fail(format!("identifier not found: {}", identifier.value))),
  }
}
