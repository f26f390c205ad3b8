use crate::environment::Environment;
use crate::evaluator;
use crate::printer;
use crate::reader::Form;
use derive_more::Deref;
use std::fmt::{self, Formatter};
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Number = i64;

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl Symbol {
    pub(crate) fn new(name: &str) -> Self {
        Symbol(String::from(name))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl BadArgCount {
    pub(crate) fn new(name: &'static str, expected: Arity, got: usize) -> Self {
        BadArgCount {
            name,
            expected,
            got,
        }
    }
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Function '{}' expected {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

/// A native operation exposed under a language-level name.
///
/// Entries are `'static` and shared immutably; everything else in the value
/// model is exclusively owned by its container.
pub struct BuiltinFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&Rc<Environment>, Vec<Value>) -> evaluator::Result,
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core function #<{}>", self.name)
    }
}

/// A user-defined function: a formal list still waiting to be bound, a body,
/// and the private environment that accumulates bindings across calls.
pub struct Closure {
    pub formals: Vec<Symbol>,
    pub body: Vec<Value>,
    pub env: Environment,
}

impl Clone for Closure {
    // Binding into the private environment must never leak between copies,
    // so the local slots are duplicated; the parent handle is shared.
    fn clone(&self) -> Self {
        Closure {
            formals: self.formals.clone(),
            body: self.body.clone(),
            env: self.env.duplicate(),
        }
    }
}

impl fmt::Debug for Closure {
    // Not derived because we want to skip the environment: its parent chain
    // may well contain this Closure!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{formals: {:?}, body: {:?}}}",
            self.formals, self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Number(Number),
    Bool(bool),
    Signal(u8),
    Symbol(Symbol),
    String(String),
    Builtin(&'static BuiltinFn),
    Closure(Box<Closure>),
    Sexpr(Vec<Value>),
    Qexpr(Vec<Value>),
}

pub(crate) fn truthy(value: &Value) -> bool {
    use Value::*;
    match value {
        Number(_) | Signal(_) | Symbol(_) | String(_) | Builtin(_) | Closure(_) | Sexpr(_)
        | Qexpr(_) => true,
        Bool(flag) => *flag,
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    use Value::*;
    match value {
        Number(_) => "number",
        Bool(_) => "boolean",
        Signal(_) => "signal",
        Symbol(_) => "symbol",
        String(_) => "string",
        Builtin(_) | Closure(_) => "function",
        Sexpr(_) => "symbolic expression",
        Qexpr(_) => "quoted expression",
    }
}

impl Value {
    pub(crate) fn empty_sexpr() -> Self {
        Value::Sexpr(Vec::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", printer::pr_str(self))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Number(x), Number(y)) => x == y,
            (Bool(x), Bool(y)) => x == y,
            (Signal(x), Signal(y)) => x == y,
            (Symbol(x), Symbol(y)) => x == y,
            (String(x), String(y)) => x == y,
            (Builtin(x), Builtin(y)) => std::ptr::eq(*x, *y),
            (Sexpr(x), Sexpr(y)) => x == y,
            (Qexpr(x), Qexpr(y)) => x == y,
            (_, _) => false,
        }
    }
}

/// Adapter from the reader's syntax tree to a runtime value tree.
///
/// Call lists and the implicit top-level grouping both become symbolic
/// expressions; quoted lists become quoted expressions and are thereafter
/// inert until `eval` retags them.
pub fn build_value(form: Form) -> evaluator::Result {
    match form {
        Form::Number(text) => text
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| evaluator::Error::BadNumber(text)),
        Form::Symbol(name) => Ok(Value::Symbol(Symbol(name))),
        Form::String(text) => Ok(Value::String(text)),
        Form::Call(items) | Form::Toplevel(items) => build_sequence(items).map(Value::Sexpr),
        Form::Quoted(items) => build_sequence(items).map(Value::Qexpr),
    }
}

fn build_sequence(items: Vec<Form>) -> evaluator::Result<Vec<Value>> {
    items.into_iter().map(build_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_use_their_flag_for_truthiness() {
        assert!(truthy(&Value::Bool(true)));
        assert!(!truthy(&Value::Bool(false)));
    }

    #[test]
    fn every_other_variant_is_truthy() {
        assert!(truthy(&Value::Number(0)));
        assert!(truthy(&Value::Qexpr(Vec::new())));
        assert!(truthy(&Value::String(String::new())));
        assert!(truthy(&Value::Symbol(Symbol::new("x"))));
    }

    #[test]
    fn arity_validation() {
        assert!(Arity::exactly(2).validate_for(2, "f").is_ok());
        assert!(Arity::exactly(2).validate_for(3, "f").is_err());
        assert!(Arity::at_least(1).validate_for(4, "f").is_ok());
        assert!(Arity::at_least(1).validate_for(0, "f").is_err());
        assert!(Arity::Between(2..=3).validate_for(3, "f").is_ok());
        assert!(Arity::Between(2..=3).validate_for(4, "f").is_err());
    }

    #[test]
    fn bad_arg_count_message_names_the_function() {
        let err = Arity::exactly(1).validate_for(3, "head").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Function 'head' expected exactly 1 arguments, but received 3"
        );
    }

    #[test]
    fn closure_copies_do_not_share_bindings() {
        let original = Closure {
            formals: vec![Symbol::new("a")],
            body: vec![Value::Symbol(Symbol::new("a"))],
            env: Environment::new(),
        };
        let copy = original.clone();
        copy.env.set(Symbol::new("a"), Value::Number(1));
        assert!(original.env.get(&Symbol::new("a")).is_err());
    }

    #[test]
    fn adapter_parses_numbers_in_base_ten() {
        let value = build_value(Form::Number(String::from("-42"))).unwrap();
        assert_eq!(value, Value::Number(-42));
    }

    #[test]
    fn adapter_rejects_out_of_range_literals() {
        let result = build_value(Form::Number(String::from("99999999999999999999")));
        assert!(matches!(result, Err(evaluator::Error::BadNumber(_))));
    }
}
