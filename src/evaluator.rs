use crate::environment::{Environment, ScopeMode};
use crate::printer;
use crate::reader;
use crate::types::{type_name, Arity, BadArgCount, BuiltinFn, Closure, Number, Symbol, Value};
use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Every way an evaluation can fail. Failures flow through the same channel
/// as successes, abort the enclosing expression, and surface as one printed
/// message at the top level; nothing is retried.
#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    BadNumber(String),
    UnboundSymbol(Symbol),
    NotAFunction(&'static str),
    BadArgCount(BadArgCount),
    Type {
        function: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },
    BadFormal {
        index: usize,
        got: &'static str,
    },
    EmptyList(&'static str),
    Bounds {
        index: Number,
        len: usize,
    },
    DivideByZero,
    MalformedFunction,
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Read(e) => write!(f, "read error: {}", e),
            Error::BadNumber(text) => write!(f, "invalid number '{}'", text),
            Error::UnboundSymbol(name) => write!(
                f,
                "Unbound Symbol, there is no such function or reference '{}'",
                name
            ),
            Error::NotAFunction(got) => write!(
                f,
                "cannot call a {}; the first element of a symbolic expression must be a function",
                got
            ),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::Type {
                function,
                index,
                expected,
                got,
            } => write!(
                f,
                "Function '{}' passed a {} at argument index {} when a {} was expected",
                function, got, index, expected
            ),
            Error::BadFormal { index, got } => write!(
                f,
                "function definitions only take symbols as arguments, but the argument at index {} is a {}",
                index, got
            ),
            Error::EmptyList(function) => write!(f, "Function '{}' passed {{}}!", function),
            Error::Bounds { index, len } => write!(
                f,
                "out of bounds: tried to get list item at index {} but the list length is only {}",
                index, len
            ),
            Error::DivideByZero => write!(f, "Division by Zero!"),
            Error::MalformedFunction => {
                write!(f, "the rest marker '&' must be followed by exactly one symbol")
            }
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<reader::Error> for Error {
    fn from(e: reader::Error) -> Self {
        Self::Read(e)
    }
}

/// Reduce one value. Symbols resolve to a fresh copy of their binding,
/// symbolic expressions reduce to a call, and everything else evaluates to
/// itself; quoted expressions in particular are never entered implicitly.
pub fn evaluate(env: &Rc<Environment>, value: Value) -> Result {
    match value {
        Value::Symbol(name) => {
            let resolved = env.get(&name)?;
            log::trace!("resolve {} to {}", name, resolved);
            Ok(resolved)
        }
        Value::Sexpr(items) => evaluate_sexpr(env, items),
        other => Ok(other),
    }
}

fn evaluate_sexpr(env: &Rc<Environment>, items: Vec<Value>) -> Result {
    let mut reduced = evaluate_elementwise(env, items)?;
    match reduced.len() {
        // Nothing to call: the empty expression is its own result.
        0 => Ok(Value::Sexpr(reduced)),
        // Degenerate grouping.
        1 => Ok(reduced.remove(0)),
        _ => {
            let func = reduced.remove(0);
            apply(env, func, reduced)
        }
    }
}

/// Evaluate a sequence left to right. The first error wins and the
/// unevaluated tail is dropped.
pub fn evaluate_elementwise(env: &Rc<Environment>, items: Vec<Value>) -> Result<Vec<Value>> {
    items.into_iter().map(|item| evaluate(env, item)).collect()
}

pub fn apply(env: &Rc<Environment>, func: Value, args: Vec<Value>) -> Result {
    match func {
        Value::Builtin(builtin) => call_builtin(env, builtin, args),
        Value::Closure(closure) => call_closure(env, closure, args),
        other => Err(Error::NotAFunction(type_name(&other))),
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => String::from("no args"),
        1 => printer::pr_str(&args[0]),
        _ => args.iter().map(printer::pr_str).join(", "),
    }
}

pub fn call_builtin(
    env: &Rc<Environment>,
    builtin: &'static BuiltinFn,
    args: Vec<Value>,
) -> Result {
    builtin
        .arity
        .validate_for(args.len(), builtin.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("call {} with {}", builtin.name, pretty_print_args(&args));
    let result = (builtin.fn_ptr)(env, args);
    match &result {
        Ok(value) => log::trace!("call to {} resulted in {}", builtin.name, value),
        Err(e) => log::trace!("call to {} failed: {}", builtin.name, e),
    }
    result
}

/// Bind arguments to formals positionally, consuming both lists from the
/// front. Supplying fewer arguments than formals is not an error: the
/// partially-bound closure is the result, and a later call continues where
/// this one stopped.
fn call_closure(env: &Rc<Environment>, mut closure: Box<Closure>, mut args: Vec<Value>) -> Result {
    let given = args.len();
    let expected = closure.formals.len();
    log::trace!("call user-function with {}", pretty_print_args(&args));

    while !args.is_empty() {
        if closure.formals.is_empty() {
            return Err(Error::BadArgCount(BadArgCount::new(
                "user-function",
                Arity::exactly(expected),
                given,
            )));
        }
        let formal = closure.formals.remove(0);
        if formal.as_str() == "&" {
            if closure.formals.len() != 1 {
                return Err(Error::MalformedFunction);
            }
            let rest_name = closure.formals.remove(0);
            closure
                .env
                .set(rest_name, Value::Qexpr(args.drain(..).collect()));
        } else {
            closure.env.set(formal, args.remove(0));
        }
    }

    // A rest marker left dangling with nothing to bind still binds its
    // trailing symbol, to an empty list.
    if closure.formals.first().map(Symbol::as_ref) == Some("&") {
        if closure.formals.len() != 2 {
            return Err(Error::MalformedFunction);
        }
        closure.formals.remove(0);
        let rest_name = closure.formals.remove(0);
        closure.env.set(rest_name, Value::Qexpr(Vec::new()));
    }

    if closure.formals.is_empty() {
        let Closure {
            formals: _,
            body,
            env: private,
        } = *closure;
        if env.scope_mode() == ScopeMode::Caller {
            private.set_parent(env);
        }
        let private = Rc::new(private);
        evaluate(&private, Value::Sexpr(body))
    } else {
        Ok(Value::Closure(closure))
    }
}
