use lispy::cmdline;
use lispy::core;
use lispy::environment::{Environment, ScopeMode};
use std::rc::Rc;

fn main() {
    pretty_env_logger::init();

    let mut lexical = false;
    let mut files = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--lexical" => lexical = true,
            _ => files.push(arg),
        }
    }

    let env = Rc::new(Environment::default());
    if lexical {
        env.set_scope_mode(ScopeMode::Lexical);
    }

    // File arguments are loaded in place of the interactive session.
    if !files.is_empty() {
        for file in &files {
            if let Err(e) = core::load_file(&env, file) {
                cmdline::report_error(&e);
            }
        }
        return;
    }

    println!("Lispy Version 0.1.0");
    println!("Press Ctrl+c to Exit\n");

    let interface = match cmdline::setup() {
        Ok(interface) => interface,
        Err(e) => {
            eprintln!("failed to start line editor: {}", e);
            std::process::exit(1);
        }
    };
    cmdline::repl(&interface, &env);
    cmdline::save_history(&interface).ok();
}
