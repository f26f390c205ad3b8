use crate::environment::{Environment, ScopeMode};
use crate::evaluator::{self, Error};
use crate::types::{
    truthy, type_name, Arity, BadArgCount, BuiltinFn, Closure, Number, Symbol, Value,
};
use crate::{cmdline, reader, types};
use std::convert::TryFrom;
use std::fs::read_to_string;
use std::rc::Rc;

/// Reserved name the `exit` builtin defines in the global environment; the
/// session loop polls it after every top-level form.
pub const QUIT_SIGNAL: &str = "__quit__";

fn type_error(function: &'static str, index: usize, expected: &'static str, got: &Value) -> Error {
    Error::Type {
        function,
        index,
        expected,
        got: type_name(got),
    }
}

fn expect_number(function: &'static str, index: usize, value: &Value) -> evaluator::Result<Number> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(type_error(function, index, "number", other)),
    }
}

fn take_qexpr(
    function: &'static str,
    index: usize,
    value: Value,
) -> evaluator::Result<Vec<Value>> {
    match value {
        Value::Qexpr(items) => Ok(items),
        other => Err(type_error(function, index, "quoted expression", &other)),
    }
}

fn grab_numbers(function: &'static str, args: &[Value]) -> evaluator::Result<Vec<Number>> {
    args.iter()
        .enumerate()
        .map(|(index, value)| expect_number(function, index, value))
        .collect()
}

// Arithmetic

fn fold_numbers(
    function: &'static str,
    args: Vec<Value>,
    op: fn(Number, Number) -> evaluator::Result<Number>,
) -> evaluator::Result {
    let mut operands = grab_numbers(function, &args)?.into_iter();
    let seed = operands.next().ok_or_else(|| {
        Error::BadArgCount(BadArgCount::new(function, Arity::at_least(1), 0))
    })?;
    operands.try_fold(seed, op).map(Value::Number)
}

static ADD: BuiltinFn = BuiltinFn {
    name: "+",
    fn_ptr: |_env, args| fold_numbers("+", args, |x, y| Ok(x.wrapping_add(y))),
    arity: Arity::at_least(1),
};

static SUB: BuiltinFn = BuiltinFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::at_least(1),
};

fn sub_(_env: &Rc<Environment>, args: Vec<Value>) -> evaluator::Result {
    // The symbol is overloaded: with a single operand it negates.
    if args.len() == 1 {
        return expect_number("-", 0, &args[0]).map(|n| Value::Number(n.wrapping_neg()));
    }
    fold_numbers("-", args, |x, y| Ok(x.wrapping_sub(y)))
}

static MUL: BuiltinFn = BuiltinFn {
    name: "*",
    fn_ptr: |_env, args| fold_numbers("*", args, |x, y| Ok(x.wrapping_mul(y))),
    arity: Arity::at_least(1),
};

static DIV: BuiltinFn = BuiltinFn {
    name: "/",
    fn_ptr: |_env, args| {
        fold_numbers("/", args, |x, y| match y {
            0 => Err(Error::DivideByZero),
            _ => Ok(x.wrapping_div(y)),
        })
    },
    arity: Arity::at_least(1),
};

static MOD: BuiltinFn = BuiltinFn {
    name: "%",
    fn_ptr: |_env, args| {
        fold_numbers("%", args, |x, y| match y {
            0 => Err(Error::DivideByZero),
            _ => Ok(x.wrapping_rem(y)),
        })
    },
    arity: Arity::at_least(1),
};

fn int_pow(base: Number, exponent: Number) -> Number {
    if exponent < 0 {
        // Integer semantics: magnitudes above one truncate towards zero.
        match base {
            1 => 1,
            -1 if exponent % 2 == 0 => 1,
            -1 => -1,
            _ => 0,
        }
    } else {
        base.wrapping_pow(exponent as u32)
    }
}

static POW: BuiltinFn = BuiltinFn {
    name: "^",
    fn_ptr: |_env, args| fold_numbers("^", args, |x, y| Ok(int_pow(x, y))),
    arity: Arity::at_least(1),
};

static MIN: BuiltinFn = BuiltinFn {
    name: "min",
    fn_ptr: |_env, args| fold_numbers("min", args, |x, y| Ok(x.min(y))),
    arity: Arity::at_least(1),
};

static MAX: BuiltinFn = BuiltinFn {
    name: "max",
    fn_ptr: |_env, args| fold_numbers("max", args, |x, y| Ok(x.max(y))),
    arity: Arity::at_least(1),
};

// Comparisons

fn comparison_(
    function: &'static str,
    args: &[Value],
    comp: fn(&Number, &Number) -> bool,
) -> evaluator::Result {
    match grab_numbers(function, args)?.as_slice() {
        [x, y] => Ok(Value::Bool(comp(x, y))),
        operands => Err(Error::BadArgCount(BadArgCount::new(
            function,
            Arity::exactly(2),
            operands.len(),
        ))),
    }
}

macro_rules! comparison_builtin {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            static $NAME: BuiltinFn = BuiltinFn {
                name: stringify!($SYMBOL),
                fn_ptr: |_env, args| comparison_(stringify!($SYMBOL), &args, Number:: [<$NAME:lower>]),
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_builtin!(<, LT);
comparison_builtin!(<=, LE);
comparison_builtin!(>, GT);
comparison_builtin!(>=, GE);
comparison_builtin!(==, EQ);
comparison_builtin!(!=, NE);

// Boolean logic

static AND: BuiltinFn = BuiltinFn {
    name: "&&",
    fn_ptr: |_env, args| Ok(Value::Bool(truthy(&args[0]) && truthy(&args[1]))),
    arity: Arity::exactly(2),
};

static OR: BuiltinFn = BuiltinFn {
    name: "||",
    fn_ptr: |_env, args| Ok(Value::Bool(truthy(&args[0]) || truthy(&args[1]))),
    arity: Arity::exactly(2),
};

static NOT: BuiltinFn = BuiltinFn {
    name: "!",
    fn_ptr: |_env, args| Ok(Value::Bool(!truthy(&args[0]))),
    arity: Arity::exactly(1),
};

// List operations

static HEAD: BuiltinFn = BuiltinFn {
    name: "head",
    fn_ptr: head_,
    arity: Arity::exactly(1),
};

fn head_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let mut items = take_qexpr("head", 0, args.remove(0))?;
    if items.is_empty() {
        return Err(Error::EmptyList("head"));
    }
    items.truncate(1);
    Ok(Value::Qexpr(items))
}

static TAIL: BuiltinFn = BuiltinFn {
    name: "tail",
    fn_ptr: tail_,
    arity: Arity::exactly(1),
};

fn tail_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let mut items = take_qexpr("tail", 0, args.remove(0))?;
    if items.is_empty() {
        return Err(Error::EmptyList("tail"));
    }
    items.remove(0);
    Ok(Value::Qexpr(items))
}

static CONS: BuiltinFn = BuiltinFn {
    name: "cons",
    fn_ptr: cons_,
    arity: Arity::at_least(1),
};

fn cons_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let mut list = take_qexpr("cons", 0, args.remove(0))?;
    // Each trailing value lands at the front in turn.
    for value in args {
        list.insert(0, value);
    }
    Ok(Value::Qexpr(list))
}

static JOIN: BuiltinFn = BuiltinFn {
    name: "join",
    fn_ptr: join_,
    arity: Arity::at_least(1),
};

fn join_(_env: &Rc<Environment>, args: Vec<Value>) -> evaluator::Result {
    let mut joined = Vec::new();
    for (index, arg) in args.into_iter().enumerate() {
        joined.extend(take_qexpr("join", index, arg)?);
    }
    Ok(Value::Qexpr(joined))
}

static LENGTH: BuiltinFn = BuiltinFn {
    name: "length",
    fn_ptr: length_,
    arity: Arity::exactly(1),
};

fn length_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let items = take_qexpr("length", 0, args.remove(0))?;
    Ok(Value::Number(items.len() as Number))
}

static NTH: BuiltinFn = BuiltinFn {
    name: "nth",
    fn_ptr: nth_,
    arity: Arity::exactly(2),
};

fn nth_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let index = expect_number("nth", 0, &args[0])?;
    let mut items = take_qexpr("nth", 1, args.remove(1))?;
    let len = items.len();
    match usize::try_from(index).ok().filter(|&i| i < len) {
        Some(i) => Ok(items.remove(i)),
        None => Err(Error::Bounds { index, len }),
    }
}

// Control

static IF: BuiltinFn = BuiltinFn {
    name: "if",
    fn_ptr: if_,
    arity: Arity::Between(2..=3),
};

fn if_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    // Both branches must be quoted expressions, taken or not.
    let mut branches = Vec::with_capacity(args.len() - 1);
    for (offset, branch) in args.drain(1..).enumerate() {
        branches.push(take_qexpr("if", offset + 1, branch)?);
    }
    let chosen = if truthy(&args[0]) {
        branches.drain(..).next()
    } else {
        branches.drain(..).nth(1)
    };
    match chosen {
        Some(items) => evaluator::evaluate(env, Value::Sexpr(items)),
        None => Ok(Value::Bool(false)),
    }
}

static EVAL: BuiltinFn = BuiltinFn {
    name: "eval",
    fn_ptr: eval_,
    arity: Arity::exactly(1),
};

fn eval_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let items = take_qexpr("eval", 0, args.remove(0))?;
    evaluator::evaluate(env, Value::Sexpr(items))
}

static QUOTE: BuiltinFn = BuiltinFn {
    name: "quote",
    // The whole (already evaluated) argument sequence becomes literal data.
    fn_ptr: |_env, args| Ok(Value::Qexpr(args)),
    arity: Arity::at_least(0),
};

// Reflection

static TYPE: BuiltinFn = BuiltinFn {
    name: "type",
    fn_ptr: |_env, args| Ok(Value::String(String::from(type_name(&args[0])))),
    arity: Arity::exactly(1),
};

// Reflection over the calling environment. A lone `(locals)` is degenerate
// grouping and returns the function itself, so like `exit` these take a
// dummy operand: `(locals 0)`.
static LOCALS: BuiltinFn = BuiltinFn {
    name: "locals",
    fn_ptr: |env, _args| {
        let names =
            env.local_names(|value| !matches!(value, Value::Builtin(_) | Value::Closure(_)));
        Ok(Value::Qexpr(names.into_iter().map(Value::Symbol).collect()))
    },
    arity: Arity::at_least(0),
};

static FUNCTIONS: BuiltinFn = BuiltinFn {
    name: "functions",
    fn_ptr: |env, _args| {
        let names =
            env.local_names(|value| matches!(value, Value::Builtin(_) | Value::Closure(_)));
        Ok(Value::Qexpr(names.into_iter().map(Value::Symbol).collect()))
    },
    arity: Arity::at_least(0),
};

static EXISTS: BuiltinFn = BuiltinFn {
    name: "exists",
    fn_ptr: exists_,
    arity: Arity::exactly(1),
};

fn exists_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let items = take_qexpr("exists", 0, args.remove(0))?;
    match items.into_iter().next() {
        Some(Value::Symbol(name)) => Ok(Value::Bool(env.get(&name).is_ok())),
        Some(other) => Err(type_error("exists", 0, "symbol", &other)),
        None => Err(Error::EmptyList("exists")),
    }
}

// Definition

static DEF: BuiltinFn = BuiltinFn {
    name: "def",
    fn_ptr: |env, args| define("def", env, args, true),
    arity: Arity::at_least(1),
};

static PUT: BuiltinFn = BuiltinFn {
    name: "=",
    fn_ptr: |env, args| define("=", env, args, false),
    arity: Arity::at_least(1),
};

fn define(
    function: &'static str,
    env: &Rc<Environment>,
    mut args: Vec<Value>,
    global: bool,
) -> evaluator::Result {
    let names = take_qexpr(function, 0, args.remove(0))?;
    let mut symbols = Vec::with_capacity(names.len());
    for (index, name) in names.into_iter().enumerate() {
        match name {
            Value::Symbol(symbol) => symbols.push(symbol),
            other => return Err(type_error(function, index, "symbol", &other)),
        }
    }
    if symbols.len() != args.len() {
        return Err(Error::BadArgCount(BadArgCount::new(
            function,
            Arity::exactly(symbols.len() + 1),
            args.len() + 1,
        )));
    }
    for (symbol, value) in symbols.into_iter().zip(args) {
        log::debug!("define {} as {}", symbol, value);
        if global {
            env.define_global(symbol, value);
        } else {
            env.set(symbol, value);
        }
    }
    Ok(Value::empty_sexpr())
}

static LAMBDA: BuiltinFn = BuiltinFn {
    name: "lambda",
    fn_ptr: lambda_,
    arity: Arity::exactly(2),
};

fn lambda_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let formal_items = take_qexpr("lambda", 0, args.remove(0))?;
    let body = take_qexpr("lambda", 1, args.remove(0))?;
    let mut formals = Vec::with_capacity(formal_items.len());
    for (index, item) in formal_items.into_iter().enumerate() {
        match item {
            Value::Symbol(symbol) => formals.push(symbol),
            other => {
                return Err(Error::BadFormal {
                    index,
                    got: type_name(&other),
                })
            }
        }
    }
    let private = Environment::new();
    if env.scope_mode() == ScopeMode::Lexical {
        private.set_parent(env);
    }
    Ok(Value::Closure(Box::new(Closure {
        formals,
        body,
        env: private,
    })))
}

// Session control

static EXIT: BuiltinFn = BuiltinFn {
    name: "exit",
    fn_ptr: |env, _args| {
        env.define_global(Symbol::new(QUIT_SIGNAL), Value::Signal(0));
        Ok(Value::Symbol(Symbol::new("Exiting!")))
    },
    arity: Arity::at_least(0),
};

static LOAD: BuiltinFn = BuiltinFn {
    name: "load",
    fn_ptr: load_,
    arity: Arity::exactly(1),
};

fn load_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    match args.remove(0) {
        Value::String(path) => load_file(env, &path),
        other => Err(type_error("load", 0, "string", &other)),
    }
}

/// Evaluate every top-level form of a source file in order. A form that
/// fails has its error reported and the load carries on; only a parse
/// failure aborts the whole file.
pub fn load_file(env: &Rc<Environment>, path: &str) -> evaluator::Result {
    let source = read_to_string(path)?;
    run_source(env, &source)
}

fn run_source(env: &Rc<Environment>, source: &str) -> evaluator::Result {
    let forms = reader::read_str(source)?;
    for form in forms {
        match types::build_value(form).and_then(|value| evaluator::evaluate(env, value)) {
            Ok(_) => (),
            Err(e) => cmdline::report_error(&e),
        }
    }
    Ok(Value::empty_sexpr())
}

/// The full catalog, in the order it is seeded into the root environment.
pub static BUILTINS: &[&BuiltinFn] = &[
    // Definition and reflection
    &DEF, &PUT, &LAMBDA, &EXISTS, &LOCALS, &FUNCTIONS, &TYPE,
    // Arithmetic
    &ADD, &SUB, &MUL, &DIV, &MOD, &POW, &MIN, &MAX,
    // Comparisons
    &GT, &LT, &GE, &LE, &EQ, &NE,
    // Boolean logic
    &IF, &NOT, &AND, &OR,
    // List operations
    &HEAD, &TAIL, &JOIN, &CONS, &LENGTH, &NTH,
    // Control
    &QUOTE, &EVAL,
    // Session control
    &EXIT, &LOAD,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter;

    fn session() -> Rc<Environment> {
        Rc::new(Environment::default())
    }

    fn print_of(env: &Rc<Environment>, line: &str) -> String {
        match interpreter::rep(line, env) {
            Ok(output) => output,
            Err(e) => format!("Error: {}", e),
        }
    }

    #[test]
    fn arithmetic_folds_left_to_right() {
        let env = session();
        assert_eq!(print_of(&env, "(+ 1 2 3)"), "6");
        assert_eq!(print_of(&env, "(- 10 2 3)"), "5");
        assert_eq!(print_of(&env, "(* 2 3 4)"), "24");
        assert_eq!(print_of(&env, "(/ 17 2)"), "8");
        assert_eq!(print_of(&env, "(% 17 5)"), "2");
        assert_eq!(print_of(&env, "(^ 2 10)"), "1024");
    }

    #[test]
    fn unary_minus_negates() {
        let env = session();
        assert_eq!(print_of(&env, "(- 5)"), "-5");
        assert_eq!(print_of(&env, "(- -5)"), "5");
    }

    #[test]
    fn division_and_modulo_by_zero_are_errors() {
        let env = session();
        assert_eq!(print_of(&env, "(/ 1 0)"), "Error: Division by Zero!");
        assert_eq!(print_of(&env, "(% 1 0)"), "Error: Division by Zero!");
    }

    #[test]
    fn arithmetic_rejects_non_numbers() {
        let env = session();
        assert_eq!(
            print_of(&env, "(+ 1 {})"),
            "Error: Function '+' passed a quoted expression at argument index 1 when a number was expected"
        );
    }

    #[test]
    fn min_and_max_fold() {
        let env = session();
        assert_eq!(print_of(&env, "(min 3 1 2)"), "1");
        assert_eq!(print_of(&env, "(max 3 7 2)"), "7");
    }

    #[test]
    fn comparisons_are_number_only() {
        let env = session();
        assert_eq!(print_of(&env, "(> 2 1)"), "true");
        assert_eq!(print_of(&env, "(<= 2 2)"), "true");
        assert_eq!(print_of(&env, "(== 1 2)"), "false");
        assert_eq!(print_of(&env, "(!= 1 2)"), "true");
        assert!(print_of(&env, "(== {} {})").starts_with("Error:"));
    }

    #[test]
    fn boolean_logic_uses_truthiness() {
        let env = session();
        assert_eq!(print_of(&env, "(&& true true)"), "true");
        assert_eq!(print_of(&env, "(&& true false)"), "false");
        assert_eq!(print_of(&env, "(|| false true)"), "true");
        assert_eq!(print_of(&env, "(! true)"), "false");
        // Everything that is not the boolean false is true, zero included.
        assert_eq!(print_of(&env, "(&& 0 {})"), "true");
    }

    #[test]
    fn head_and_tail() {
        let env = session();
        assert_eq!(print_of(&env, "(head {1 2 3})"), "{1}");
        assert_eq!(print_of(&env, "(tail {1 2 3})"), "{2 3}");
        assert_eq!(print_of(&env, "(head {})"), "Error: Function 'head' passed {}!");
        assert_eq!(print_of(&env, "(tail {})"), "Error: Function 'tail' passed {}!");
        assert_eq!(
            print_of(&env, "(head 1)"),
            "Error: Function 'head' passed a number at argument index 0 when a quoted expression was expected"
        );
    }

    #[test]
    fn cons_prepends_each_trailing_value() {
        let env = session();
        assert_eq!(print_of(&env, "(cons {1 2} 3)"), "{3 1 2}");
        assert_eq!(print_of(&env, "(cons {1 2} 3 4)"), "{4 3 1 2}");
        assert_eq!(print_of(&env, "(cons {1 2})"), "{1 2}");
    }

    #[test]
    fn join_concatenates_quoted_expressions() {
        let env = session();
        assert_eq!(print_of(&env, "(join {1 2} {3} {4 5})"), "{1 2 3 4 5}");
        assert!(print_of(&env, "(join {1} 2)").starts_with("Error:"));
    }

    #[test]
    fn length_counts_children() {
        let env = session();
        assert_eq!(print_of(&env, "(length {1 2 3})"), "3");
        assert_eq!(print_of(&env, "(length {})"), "0");
    }

    #[test]
    fn nth_is_bounds_checked() {
        let env = session();
        assert_eq!(print_of(&env, "(nth 0 {1 2 3})"), "1");
        assert_eq!(print_of(&env, "(nth 2 {1 2 3})"), "3");
        assert_eq!(
            print_of(&env, "(nth 5 {1 2 3})"),
            "Error: out of bounds: tried to get list item at index 5 but the list length is only 3"
        );
        assert!(print_of(&env, "(nth -1 {1 2 3})").starts_with("Error:"));
    }

    #[test]
    fn if_chooses_exactly_one_branch() {
        let env = session();
        assert_eq!(print_of(&env, "(if true {1} {2})"), "1");
        assert_eq!(print_of(&env, "(if false {1} {2})"), "2");
        assert_eq!(print_of(&env, "(if false {1})"), "false");
        assert_eq!(print_of(&env, "(if (> 2 1) {+ 10 1} {0})"), "11");
        // More branches than then/else is an arity violation.
        assert!(print_of(&env, "(if true {1} {2} {3})").starts_with("Error:"));
    }

    #[test]
    fn quote_turns_a_call_form_into_data() {
        let env = session();
        assert_eq!(print_of(&env, "(quote 1 2 3)"), "{1 2 3}");
        // Arguments are evaluated before quote repackages them.
        assert_eq!(print_of(&env, "(quote (+ 1 2))"), "{3}");
        assert_eq!(print_of(&env, "(eval (quote head {8 9}))"), "{8}");
    }

    #[test]
    fn type_reports_human_names() {
        let env = session();
        assert_eq!(print_of(&env, "(type 1)"), "number");
        assert_eq!(print_of(&env, "(type true)"), "boolean");
        assert_eq!(print_of(&env, "(type {})"), "quoted expression");
        assert_eq!(print_of(&env, "(type \"s\")"), "string");
        assert_eq!(print_of(&env, "(type head)"), "function");
    }

    #[test]
    fn def_binds_globally_and_put_binds_locally() {
        let env = session();
        assert_eq!(print_of(&env, "(def {a b} 1 2)"), "()");
        assert_eq!(print_of(&env, "(+ a b)"), "3");
        assert_eq!(print_of(&env, "(= {c} 9)"), "()");
        assert_eq!(print_of(&env, "c"), "9");
        // A local bind inside a closure body does not escape the call.
        print_of(&env, "(def {f} (lambda {x} {= {hidden} x}))");
        print_of(&env, "(f 5)");
        assert_eq!(print_of(&env, "(exists {hidden})"), "false");
        // A global bind does.
        print_of(&env, "(def {g} (lambda {x} {def {seen} x}))");
        print_of(&env, "(g 5)");
        assert_eq!(print_of(&env, "seen"), "5");
    }

    #[test]
    fn def_validates_symbols_and_counts() {
        let env = session();
        assert!(print_of(&env, "(def {a 1} 1 2)").starts_with("Error:"));
        assert_eq!(
            print_of(&env, "(def {a b} 1)"),
            "Error: Function 'def' expected exactly 3 arguments, but received 2"
        );
        assert!(print_of(&env, "(def a 1)").starts_with("Error:"));
    }

    #[test]
    fn lambda_validates_its_formals() {
        let env = session();
        assert_eq!(
            print_of(&env, "(lambda {a 1} {a})"),
            "Error: function definitions only take symbols as arguments, but the argument at index 1 is a number"
        );
        assert!(print_of(&env, "(lambda {a} 1)").starts_with("Error:"));
    }

    #[test]
    fn exists_checks_the_whole_chain() {
        let env = session();
        assert_eq!(print_of(&env, "(exists {head})"), "true");
        assert_eq!(print_of(&env, "(exists {missing})"), "false");
        print_of(&env, "(def {f} (lambda {a} {exists {head}}))");
        assert_eq!(print_of(&env, "(f 0)"), "true");
    }

    #[test]
    fn locals_and_functions_partition_bindings() {
        let env = session();
        print_of(&env, "(def {x} 1)");
        print_of(&env, "(def {f} (lambda {a} {a}))");
        assert_eq!(print_of(&env, "(locals 0)"), "{true false x}");
        let functions = print_of(&env, "(functions 0)");
        assert!(functions.contains("head"));
        // The user-defined closure was appended after every builtin.
        assert!(functions.ends_with(" f}"));
        assert!(!functions.contains("x"));
    }

    #[test]
    fn load_runs_every_toplevel_form_of_a_file() {
        let env = session();
        let mut path = std::env::temp_dir();
        path.push("lispy_load_test.lspy");
        std::fs::write(&path, "(def {a} 1)\n(def {b} (+ a 1))\n; comment\n").unwrap();
        let line = format!("(load \"{}\")", path.display());
        assert_eq!(print_of(&env, &line), "()");
        assert_eq!(print_of(&env, "(+ a b)"), "3");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_of_a_missing_file_is_an_io_error() {
        let env = session();
        assert!(print_of(&env, "(load \"/no/such/file.lspy\")").starts_with("Error: io error"));
    }

    #[test]
    fn int_pow_handles_negative_exponents() {
        assert_eq!(int_pow(2, -1), 0);
        assert_eq!(int_pow(1, -5), 1);
        assert_eq!(int_pow(-1, -5), -1);
        assert_eq!(int_pow(-1, -4), 1);
        assert_eq!(int_pow(-2, 3), -8);
    }
}
