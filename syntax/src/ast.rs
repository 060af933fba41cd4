use crate::tokens::Token;
use std::fmt;
use std::rc::Rc;

/// Root node: the parsed program.
///
/// Stringifies by concatenating its statements in order, without inserted
/// separators.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
  pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.statements.iter().try_for_each(|statement| write!(f, "{statement}"))
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
  pub token: Token,
  pub value: String,
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.value)
  }
}

/// A brace-delimited sequence of statements.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
  pub token: Token,
  pub statements: Vec<Statement>,
}

impl fmt::Display for Block {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.statements.iter().try_for_each(|statement| write!(f, "{statement}"))
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
  /// `name is value`
  Assignment {
    token: Token,
    name: Identifier,
    value: Expression,
  },
  /// `pointing from name is value`, writing through a pointer binding
  PointerAssignment {
    token: Token,
    name: Identifier,
    value: Expression,
  },
  /// `return value`
  Return { token: Token, value: Expression },
  /// A bare expression used as a statement
  Expression { token: Token, expression: Expression },
  /// `while cond { … }` (also spelt `repeat`)
  While {
    token: Token,
    condition: Expression,
    body: Block,
  },
  /// `for item in iterable { … }`
  ForIn {
    token: Token,
    variable: Identifier,
    iterable: Expression,
    body: Block,
  },
  /// `try { … } catch { … } finally { … }`
  TryCatch {
    token: Token,
    try_block: Block,
    catch_block: Option<Block>,
    finally_block: Option<Block>,
  },
  /// `define Name as struct { field, … }`
  StructDefinition {
    token: Token,
    name: Identifier,
    fields: Vec<Identifier>,
  },
  /// `include path`
  Include { token: Token, path: Expression },
}

impl fmt::Display for Statement {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Assignment { name, value, .. } => write!(f, "{name} is {value}"),
      Self::PointerAssignment { name, value, .. } => {
        write!(f, "pointing from {name} is {value}")
      }
      Self::Return { value, .. } => write!(f, "return {value}"),
      Self::Expression { expression, .. } => write!(f, "{expression}"),
      Self::While { condition, body, .. } => write!(f, "while {condition} {{ {body} }}"),
      Self::ForIn {
        variable,
        iterable,
        body,
        ..
      } => write!(f, "for {variable} in {iterable} {{ {body} }}"),
      Self::TryCatch {
        try_block,
        catch_block,
        finally_block,
        ..
      } => {
        write!(f, "try {{ {try_block} }}")?;
        if let Some(catch) = catch_block {
          write!(f, " catch {{ {catch} }}")?;
        }
        if let Some(finally) = finally_block {
          write!(f, " finally {{ {finally} }}")?;
        }
        Ok(())
      }
      Self::StructDefinition { name, fields, .. } => {
        write!(f, "define {name} as struct {{ {} }}", join(fields, ", "))
      }
      Self::Include { path, .. } => write!(f, "include {path}"),
    }
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
  Identifier(Identifier),
  Integer {
    token: Token,
    value: i64,
  },
  Float {
    token: Token,
    value: f64,
  },
  String {
    token: Token,
    value: String,
  },
  Char {
    token: Token,
    value: char,
  },
  Boolean {
    token: Token,
    value: bool,
  },
  Null {
    token: Token,
  },
  /// `- x`, `not x`
  Prefix {
    token: Token,
    operator: String,
    right: Box<Expression>,
  },
  /// `left op right` with a natural-language operator word
  Infix {
    token: Token,
    operator: String,
    left: Box<Expression>,
    right: Box<Expression>,
  },
  /// `if cond { … } else { … }`; an expression yielding the branch value
  If {
    token: Token,
    condition: Box<Expression>,
    consequence: Block,
    alternative: Option<Block>,
  },
  /// `takes(a, b) { … }`; the body is shared with closures at runtime
  Function {
    token: Token,
    parameters: Vec<Identifier>,
    body: Rc<Block>,
  },
  Call {
    token: Token,
    function: Box<Expression>,
    arguments: Vec<Expression>,
  },
  Index {
    token: Token,
    left: Box<Expression>,
    index: Box<Expression>,
  },
  /// `object.field`
  FieldAccess {
    token: Token,
    object: Box<Expression>,
    field: Identifier,
  },
  Array {
    token: Token,
    elements: Vec<Expression>,
  },
  /// `{ key: value, … }`; pairs retain source order
  Map {
    token: Token,
    pairs: Vec<(Expression, Expression)>,
  },
  /// `Name { field: value, … }`
  StructInstantiation {
    token: Token,
    name: Identifier,
    fields: Vec<(Identifier, Expression)>,
  },
  /// `pointing to x`
  PointerReference {
    token: Token,
    target: Box<Expression>,
  },
  /// `pointing from p`
  PointerDereference {
    token: Token,
    pointer: Box<Expression>,
  },
}

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Identifier(identifier) => write!(f, "{identifier}"),
      Self::Integer { value, .. } => write!(f, "{value}"),
      Self::Float { value, .. } => write!(f, "{value}"),
      Self::String { value, .. } => write!(f, "\"{value}\""),
      Self::Char { value, .. } => write!(f, "'{value}'"),
      Self::Boolean { value, .. } => write!(f, "{value}"),
      Self::Null { .. } => f.write_str("none"),
      Self::Prefix { operator, right, .. } => write!(f, "({operator} {right})"),
      Self::Infix {
        operator,
        left,
        right,
        ..
      } => write!(f, "({left} {operator} {right})"),
      Self::If {
        condition,
        consequence,
        alternative,
        ..
      } => {
        write!(f, "if {condition} {{ {consequence} }}")?;
        if let Some(alternative) = alternative {
          write!(f, " else {{ {alternative} }}")?;
        }
        Ok(())
      }
      Self::Function { parameters, body, .. } => {
        write!(f, "takes({}) {{ {body} }}", join(parameters, ", "))
      }
      Self::Call {
        function, arguments, ..
      } => write!(f, "{function}({})", join(arguments, ", ")),
      Self::Index { left, index, .. } => write!(f, "({left}[{index}])"),
      Self::FieldAccess { object, field, .. } => write!(f, "({object}.{field})"),
      Self::Array { elements, .. } => write!(f, "[{}]", join(elements, ", ")),
      Self::Map { pairs, .. } => {
        let pairs: Vec<String> = pairs.iter().map(|(key, value)| format!("{key}: {value}")).collect();
        write!(f, "{{{}}}", pairs.join(", "))
      }
      Self::StructInstantiation { name, fields, .. } => {
        let fields: Vec<String> = fields.iter().map(|(name, value)| format!("{name}: {value}")).collect();
        write!(f, "{name} {{{}}}", fields.join(", "))
      }
      Self::PointerReference { target, .. } => write!(f, "(pointing to {target})"),
      Self::PointerDereference { pointer, .. } => write!(f, "(pointing from {pointer})"),
    }
  }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
  items
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<String>>()
    .join(separator)
}
