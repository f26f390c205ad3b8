use crate::types::Value;
use itertools::Itertools;

/// Render a value the way the session prints results. Strings print raw;
/// read-back fidelity is not a goal of this format.
pub fn pr_str(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => String::from("true"),
        Value::Bool(false) => String::from("false"),
        Value::Symbol(name) => name.to_string(),
        Value::String(text) => text.clone(),
        Value::Builtin(_) => String::from("<core-function>"),
        Value::Closure(closure) => format!(
            "<user-function>{{{}}}{{{}}}",
            closure.formals.iter().join(" "),
            closure.body.iter().map(pr_str).join(" ")
        ),
        Value::Signal(code) => format!("<signal {}>", code),
        Value::Sexpr(items) => format!("({})", items.iter().map(pr_str).join(" ")),
        Value::Qexpr(items) => format!("{{{}}}", items.iter().map(pr_str).join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;

    #[test]
    fn sequences_are_space_joined_inside_their_delimiters() {
        let value = Value::Sexpr(vec![
            Value::Symbol(Symbol::new("+")),
            Value::Number(1),
            Value::Qexpr(vec![Value::Number(2), Value::Bool(false)]),
        ]);
        assert_eq!(pr_str(&value), "(+ 1 {2 false})");
    }

    #[test]
    fn empty_sequences_print_as_bare_delimiters() {
        assert_eq!(pr_str(&Value::Sexpr(Vec::new())), "()");
        assert_eq!(pr_str(&Value::Qexpr(Vec::new())), "{}");
    }

    #[test]
    fn strings_print_raw() {
        assert_eq!(pr_str(&Value::String(String::from("a\nb"))), "a\nb");
    }
}
