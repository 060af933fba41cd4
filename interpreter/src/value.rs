use crate::builtins::NativeFunction;
use crate::environment::Environment;
use ahash::AHashMap;
use eloquence_syntax::ast::{Block, Identifier};
use fnv::FnvHasher;
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

/// A runtime value. Heap-backed variants share their payload through `Rc`,
/// so cloning a value is always cheap.
///
/// Return-unwinding and runtime errors are carried on the evaluator's error
/// channel rather than as value variants, so they can never leak into
/// arrays or maps.
#[derive(Clone)]
pub enum Value {
  Integer(i64),
  Float(f64),
  Boolean(bool),
  String(Rc<str>),
  Char(char),
  Null,
  Array(Rc<Vec<Value>>),
  Map(Rc<MapObject>),
  Function(Rc<Function>),
  StructDef(Rc<StructDef>),
  StructInstance(Rc<StructInstance>),
  Pointer(Rc<Pointer>),
  Builtin(NativeFunction),
}

/// Map payload: each entry keeps the original key next to the value so the
/// inspect form can show it.
pub struct MapObject {
  pub pairs: AHashMap<MapKey, (Value, Value)>,
}

/// A user function: parameter names, shared body AST, and the environment
/// captured at definition time (the closure).
pub struct Function {
  pub parameters: Vec<Identifier>,
  pub body: Rc<Block>,
  pub env: Rc<Environment>,
}

/// The blueprint stored by `define Name as struct { … }`.
pub struct StructDef {
  pub name: String,
  pub fields: Vec<String>,
}

pub struct StructInstance {
  pub definition: Rc<StructDef>,
  pub fields: AHashMap<String, Value>,
}

/// A first-class reference to a named binding in a specific scope.
pub struct Pointer {
  pub name: String,
  pub env: Rc<Environment>,
}

/// Key of a map entry: the value's kind plus a stable 64-bit digest.
/// Only integers, booleans, and strings are hashable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapKey {
  pub kind: KeyKind,
  pub digest: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
  Integer,
  Boolean,
  String,
}

fn fnv1a(bytes: &[u8]) -> u64 {
  let mut hasher = FnvHasher::default();
  hasher.write(bytes);
  hasher.finish()
}

impl Value {
  /// The type name used in error messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::Integer(_) => "INTEGER",
      Self::Float(_) => "FLOAT",
      Self::Boolean(_) => "BOOLEAN",
      Self::String(_) => "STRING",
      Self::Char(_) => "CHAR",
      Self::Null => "NULL",
      Self::Array(_) => "ARRAY",
      Self::Map(_) => "MAP",
      Self::Function(_) => "FUNCTION",
      Self::StructDef(_) => "STRUCT_DEFINITION",
      Self::StructInstance(_) => "STRUCT_INSTANCE",
      Self::Pointer(_) => "POINTER",
      Self::Builtin(_) => "BUILTIN",
    }
  }

  /// Only `none` and `false` are falsy; `0`, `""`, and `[]` are all truthy.
  pub fn is_truthy(&self) -> bool {
    !matches!(self, Self::Null | Self::Boolean(false))
  }

  /// Digest for use as a map key, or `None` for unhashable kinds.
  pub fn map_key(&self) -> Option<MapKey> {
    match self {
      Self::Integer(value) => Some(MapKey {
        kind: KeyKind::Integer,
        digest: *value as u64,
      }),
      Self::Boolean(value) => Some(MapKey {
        kind: KeyKind::Boolean,
        digest: u64::from(*value),
      }),
      Self::String(value) => Some(MapKey {
        kind: KeyKind::String,
        digest: fnv1a(value.as_bytes()),
      }),
      _ => None,
    }
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Integer(a), Self::Integer(b)) => a == b,
      (Self::Float(a), Self::Float(b)) => a == b,
      (Self::Boolean(a), Self::Boolean(b)) => a == b,
      (Self::String(a), Self::String(b)) => a == b,
      (Self::Char(a), Self::Char(b)) => a == b,
      (Self::Null, Self::Null) => true,
      (Self::Array(a), Self::Array(b)) => a == b,
      (Self::Map(a), Self::Map(b)) => a.pairs == b.pairs,
      (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
      (Self::StructDef(a), Self::StructDef(b)) => Rc::ptr_eq(a, b),
      (Self::StructInstance(a), Self::StructInstance(b)) => Rc::ptr_eq(a, b),
      (Self::Pointer(a), Self::Pointer(b)) => a.name == b.name && Rc::ptr_eq(&a.env, &b.env),
      (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
      _ => false,
    }
  }
}

impl PartialEq for MapObject {
  fn eq(&self, other: &Self) -> bool {
    self.pairs == other.pairs
  }
}

// Inspect forms: the canonical display of each value.
impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Integer(value) => write!(f, "{value}"),
      Self::Float(value) => write!(f, "{value}"),
      Self::Boolean(value) => write!(f, "{value}"),
      Self::String(value) => f.write_str(value),
      Self::Char(value) => write!(f, "{value}"),
      Self::Null => f.write_str("none"),
      Self::Array(elements) => {
        let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
      }
      Self::Map(map) => {
        let parts: Vec<String> = map
          .pairs
          .values()
          .map(|(key, value)| format!("{key}: {value}"))
          .collect();
        write!(f, "{{{}}}", parts.join(", "))
      }
      Self::Function(_) => f.write_str("takes(...) { ... }"),
      Self::StructDef(definition) => write!(f, "struct {}", definition.name),
      Self::StructInstance(instance) => {
        let mut parts = Vec::new();
        for field in &instance.definition.fields {
          if let Some(value) = instance.fields.get(field) {
            parts.push(format!("{field}: {value}"));
          }
        }
        for (field, value) in &instance.fields {
          if !instance.definition.fields.contains(field) {
            parts.push(format!("{field}: {value}"));
          }
        }
        write!(f, "{}{{{}}}", instance.definition.name, parts.join(", "))
      }
      Self::Pointer(pointer) => write!(f, "pointing to {}", pointer.name),
      Self::Builtin(_) => f.write_str("builtin function"),
    }
  }
}

// Closures hold their whole captured environment, so a derived Debug could
// recurse forever. Render the inspect form with strings quoted instead.
impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::String(value) => write!(f, "\"{value}\""),
      value => write!(f, "{value}"),
    }
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Self::Integer(value)
  }
}
impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Self::Float(value)
  }
}
impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Self::Boolean(value)
  }
}
impl From<char> for Value {
  fn from(value: char) -> Self {
    Self::Char(value)
  }
}
impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Self::String(value.into())
  }
}
impl From<String> for Value {
  fn from(value: String) -> Self {
    Self::String(value.into())
  }
}
impl From<()> for Value {
  fn from(_: ()) -> Self {
    Self::Null
  }
}
impl From<Vec<Value>> for Value {
  fn from(elements: Vec<Value>) -> Self {
    Self::Array(Rc::new(elements))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Boolean(false).is_truthy());

    assert!(Value::Boolean(true).is_truthy());
    assert!(Value::Integer(0).is_truthy());
    assert!(Value::from("").is_truthy());
    assert!(Value::from(Vec::new()).is_truthy());
  }

  #[test]
  fn type_names_match_error_message_forms() {
    assert_eq!(Value::Integer(1).type_name(), "INTEGER");
    assert_eq!(Value::Null.type_name(), "NULL");
    assert_eq!(Value::from(vec![]).type_name(), "ARRAY");
    assert_eq!(
      Value::StructDef(Rc::new(StructDef {
        name: String::from("Box"),
        fields: vec![],
      }))
      .type_name(),
      "STRUCT_DEFINITION"
    );
  }

  #[test]
  fn equal_values_have_equal_map_keys() {
    let pairs = [
      (Value::Integer(42), Value::Integer(42)),
      (Value::Integer(-1), Value::Integer(-1)),
      (Value::Boolean(true), Value::Boolean(true)),
      (Value::from("hello"), Value::from("hello")),
    ];
    for (a, b) in pairs {
      assert_eq!(a.map_key(), b.map_key());
    }
  }

  #[test]
  fn distinct_values_have_distinct_map_keys() {
    assert_ne!(
      Value::from("hello").map_key(),
      Value::from("world").map_key()
    );
    assert_ne!(Value::Integer(1).map_key(), Value::Integer(2).map_key());
    // kind tag separates 1 from true even though both digest to 1
    assert_ne!(Value::Integer(1).map_key(), Value::Boolean(true).map_key());
  }

  #[test]
  fn string_digest_is_fnv1a() {
    // FNV-1a 64-bit of "a": (offset_basis ^ 0x61) * prime
    let key = Value::from("a").map_key().unwrap();
    assert_eq!(key.digest, 0xaf63dc4c8601ec8c);
  }

  #[test]
  fn unhashable_kinds_have_no_map_key() {
    assert!(Value::Float(1.5).map_key().is_none());
    assert!(Value::Null.map_key().is_none());
    assert!(Value::from(vec![]).map_key().is_none());
  }

  #[test]
  fn inspect_forms() {
    assert_eq!(Value::Integer(42).to_string(), "42");
    assert_eq!(Value::Float(3.5).to_string(), "3.5");
    assert_eq!(Value::Boolean(true).to_string(), "true");
    assert_eq!(Value::from("raw text").to_string(), "raw text");
    assert_eq!(Value::Char('a').to_string(), "a");
    assert_eq!(Value::Null.to_string(), "none");
    assert_eq!(
      Value::from(vec![Value::Integer(1), Value::from("x")]).to_string(),
      "[1, x]"
    );
  }

  #[test]
  fn struct_instance_inspect_uses_declared_field_order() {
    let definition = Rc::new(StructDef {
      name: String::from("Box"),
      fields: vec![String::from("width"), String::from("height")],
    });
    let mut fields = AHashMap::new();
    fields.insert(String::from("height"), Value::Integer(20));
    fields.insert(String::from("width"), Value::Integer(10));

    let instance = Value::StructInstance(Rc::new(StructInstance { definition, fields }));
    assert_eq!(instance.to_string(), "Box{width: 10, height: 20}");
  }

  #[test]
  fn cross_type_values_are_not_equal() {
    assert_ne!(Value::Integer(1), Value::Float(1.0));
    assert_ne!(Value::Boolean(true), Value::Integer(1));
    assert_ne!(Value::Null, Value::Boolean(false));
  }
}
