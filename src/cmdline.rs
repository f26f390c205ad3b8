use crate::core;
use crate::environment::Environment;
use crate::evaluator;
use crate::interpreter;
use crate::types::{Symbol, Value};
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::path::PathBuf;
use std::rc::Rc;

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("lispy")?;
    interface.set_prompt("lispy> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".lispy_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Print an evaluation failure, in red when someone is watching.
pub fn report_error(err: &evaluator::Error) {
    let message = format!("Error: {}", err);
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{}", Red.paint(message));
    } else {
        eprintln!("{}", message);
    }
}

fn quit_requested(env: &Rc<Environment>) -> bool {
    matches!(
        env.get(&Symbol::new(core::QUIT_SIGNAL)),
        Ok(Value::Signal(_))
    )
}

/// The interactive loop: evaluate each line against `env`, print the result
/// or the error, and stop once the termination signal has been installed.
pub fn repl<T: Terminal>(interface: &Interface<T>, env: &Rc<Environment>) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                interface.add_history_unique(line.clone());
                match interpreter::rep(&line, env) {
                    Ok(output) => {
                        writeln!(interface, "{}", output).ok();
                    }
                    Err(e) => report_error(&e),
                }
                if quit_requested(env) {
                    break;
                }
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}
