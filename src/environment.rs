use crate::core;
use crate::evaluator::{self, Error};
use crate::types::{Symbol, Value};
use itertools::Itertools;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// How a closure's private environment is chained to the rest of the world
/// when the closure is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Parent-link the private environment to the *calling* environment on
    /// every call, so free variables in a closure body resolve in the
    /// caller's scope chain. The default.
    Caller,
    /// Fix the parent link to the environment the lambda was built in.
    Lexical,
}

/// An ordered name-to-value mapping with an optional parent, forming the
/// lexical scope chain. Values are stored and handed out as deep copies;
/// the parent handle is the only shared piece.
pub struct Environment {
    entries: RefCell<Vec<(Symbol, Value)>>,
    parent: RefCell<Option<Rc<Environment>>>,
    mode: Cell<ScopeMode>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            entries: RefCell::new(Vec::new()),
            parent: RefCell::new(None),
            mode: Cell::new(ScopeMode::Caller),
        }
    }

    /// Resolve `name`, scanning the local mapping first and then the parent
    /// chain. A miss at a parentless scope is the unbound-symbol error.
    pub fn get(&self, name: &Symbol) -> evaluator::Result {
        if let Some((_, value)) = self
            .entries
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
        {
            return Ok(value.clone());
        }
        let parent = self.parent.borrow().clone();
        match parent {
            Some(parent) => parent.get(name),
            None => Err(Error::UnboundSymbol(name.clone())),
        }
    }

    /// Define locally: overwrite in place if the name is already bound here,
    /// append otherwise.
    pub fn set(&self, name: Symbol, value: Value) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => entries.push((name, value)),
        }
    }

    /// Define in the outermost scope, so the binding is visible regardless
    /// of call depth.
    pub fn define_global(&self, name: Symbol, value: Value) {
        let parent = self.parent.borrow().clone();
        match parent {
            Some(parent) => parent.define_global(name, value),
            None => self.set(name, value),
        }
    }

    /// Duplicate the local mapping; the parent handle is copied structurally
    /// so the ancestor chain is shared, not cloned.
    pub fn duplicate(&self) -> Environment {
        Environment {
            entries: RefCell::new(self.entries.borrow().clone()),
            parent: RefCell::new(self.parent.borrow().clone()),
            mode: Cell::new(self.mode.get()),
        }
    }

    pub fn set_parent(&self, parent: &Rc<Environment>) {
        *self.parent.borrow_mut() = Some(Rc::clone(parent));
    }

    /// Names bound locally whose values satisfy `keep`, in definition order.
    pub(crate) fn local_names(&self, keep: impl Fn(&Value) -> bool) -> Vec<Symbol> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, value)| keep(value))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The scope mode lives on the root environment; every lookup walks up.
    pub fn scope_mode(&self) -> ScopeMode {
        let parent = self.parent.borrow().clone();
        match parent {
            Some(parent) => parent.scope_mode(),
            None => self.mode.get(),
        }
    }

    pub fn set_scope_mode(&self, mode: ScopeMode) {
        let parent = self.parent.borrow().clone();
        match parent {
            Some(parent) => parent.set_scope_mode(mode),
            None => self.mode.set(mode),
        }
    }
}

impl Default for Environment {
    /// The root environment: the full builtin catalog plus the two
    /// convenience bindings `true` and `false`.
    fn default() -> Self {
        let root = Environment::new();
        for &builtin in core::BUILTINS {
            root.set(Symbol::new(builtin.name), Value::Builtin(builtin));
        }
        root.set(Symbol::new("true"), Value::Bool(true));
        root.set(Symbol::new("false"), Value::Bool(false));
        root
    }
}

impl fmt::Debug for Environment {
    // Entries only; a stored closure's parent handle may point back here.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Environment{{{}}}",
            self.entries
                .borrow()
                .iter()
                .map(|(key, _)| key.as_ref())
                .join(" ")
        )
    }
}
