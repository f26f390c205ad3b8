pub mod cmdline;
pub mod core;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod printer;
pub mod reader;

#[macro_use]
extern crate lazy_static;

mod strings;
mod tokens;
pub mod types;

pub use types::Value;
