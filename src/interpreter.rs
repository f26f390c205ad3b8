use crate::environment::Environment;
use crate::reader::{self, Form};
use crate::{evaluator, printer, types};
use std::rc::Rc;

pub type Result = std::result::Result<String, evaluator::Error>;

/// read → adapt → evaluate → print for one line of input.
///
/// The line's top-level forms are wrapped in one implicit call form, which
/// is what lets the prompt accept `+ 1 2` without parentheses.
pub fn rep(line: &str, env: &Rc<Environment>) -> Result {
    let forms = reader::read_str(line)?;
    let value = types::build_value(Form::Toplevel(forms))?;
    let result = evaluator::evaluate(env, value)?;
    Ok(printer::pr_str(&result))
}
