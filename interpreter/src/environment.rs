use crate::value::Value;
use ahash::AHashMap;
use smartstring::alias::String;
use std::cell::RefCell;
use std::rc::Rc;

/// A lexical scope: a name→value table plus an optional outer scope.
///
/// Scopes are shared (`Rc`) because closures and pointers keep their
/// defining environment alive after the block that created it has finished.
pub struct Environment {
  store: RefCell<AHashMap<String, Value>>,
  outer: Option<Rc<Environment>>,
}

impl Environment {
  /// A fresh global scope, one per program run.
  pub fn root() -> Rc<Self> {
    Rc::new(Self {
      store: RefCell::new(AHashMap::new()),
      outer: None,
    })
  }

  /// A new local scope chained to `outer`.
  pub fn enclosed(outer: &Rc<Environment>) -> Rc<Self> {
    Rc::new(Self {
      store: RefCell::new(AHashMap::new()),
      outer: Some(Rc::clone(outer)),
    })
  }

  /// Returns the binding from the nearest scope that contains `name`.
  pub fn get(&self, name: &str) -> Option<Value> {
    if let Some(value) = self.store.borrow().get(name) {
      return Some(value.clone());
    }
    self.outer.as_ref()?.get(name)
  }

  /// Writes into the current scope unconditionally; an inner write shadows
  /// an outer binding without touching it.
  pub fn set(&self, name: &str, value: Value) {
    self.store.borrow_mut().insert(name.into(), value);
  }

  /// Returns the specific scope in which `name` is defined. Pointer reads
  /// and writes go through this, reaching across shadow layers.
  pub fn resolve(self: &Rc<Self>, name: &str) -> Option<Rc<Environment>> {
    if self.store.borrow().contains_key(name) {
      return Some(Rc::clone(self));
    }
    self.outer.as_ref()?.resolve(name)
  }
}
