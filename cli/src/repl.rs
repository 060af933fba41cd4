use ansi_term::Colour::{Cyan, Green, Red};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use std::rc::Rc;

use eloquence_interpreter::{Environment, Evaluator, Value};
use eloquence_syntax::parse;

const PROMPT: &str = ">> ";

const BANNER: &str = "\
┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓
┃  Eloquence                      ┃
┃  a language that reads aloud    ┃
┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛";

fn print_help() {
  println!("Meta commands:");
  println!("  .help    show this message");
  println!("  .clear   reset the session environment");
  println!("  .debug   toggle token/AST dumps before evaluation");
  println!("  .exit    leave the shell");
}

/// The interactive shell: one persistent environment for the whole session,
/// results echoed unless they are `none`.
pub fn start() {
  println!("{}", BANNER);
  print_help();

  let mut rl = Editor::<()>::new();
  let evaluator = Evaluator::new();
  let mut env = Environment::root();
  let mut debug = false;

  loop {
    let readline = rl.readline(&Cyan.paint(PROMPT).to_string());
    match readline {
      Ok(line) => {
        let input = line.trim();
        if input.is_empty() {
          continue;
        }
        rl.add_history_entry(input);

        match input {
          ".exit" => break,
          ".help" => print_help(),
          ".clear" => {
            env = Environment::root();
            println!("{}", Green.paint("Environment cleared."));
          }
          ".debug" => {
            debug = !debug;
            let state = if debug { "on" } else { "off" };
            println!("{}", Green.paint(format!("Debug mode {state}.")));
          }
          _ => run_line(&evaluator, &env, input, debug),
        }
      }
      Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
      Err(err) => {
        println!("Error: {:?}", err);
        break;
      }
    }
  }
}

fn run_line(evaluator: &Evaluator, env: &Rc<Environment>, source: &str, debug: bool) {
  if debug {
    crate::print::tokens(source);
  }

  let (program, errors) = parse(source);
  if !errors.is_empty() {
    for error in errors {
      println!("{} {}", Red.bold().paint("Parse error:"), error);
    }
    return;
  }

  if debug {
    crate::print::ast(&program);
  }

  match evaluator.eval(&program, env) {
    Ok(Value::Null) => {}
    Ok(value) => println!("{value}"),
    Err(error) => println!("{}", Red.paint(error.to_string())),
  }
}
