use clap::{Arg, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use eloquence_interpreter::{Environment, Evaluator, IncludeHook};
use eloquence_syntax::parse;

mod print;
mod repl;

fn read_file(filename: &str) -> String {
  match fs::read_to_string(filename) {
    Ok(file) => file,
    Err(_) => {
      println!("Problem reading file: {}", filename);
      exit(74);
    }
  }
}

/// Include hook for the file runner: paths resolve relative to the
/// including script's directory, and the host does the reading and parsing.
fn file_include_hook(base: PathBuf) -> IncludeHook {
  Box::new(move |path| {
    let full_path = base.join(path);
    let source =
      fs::read_to_string(&full_path).map_err(|_| format!("could not include: {path}"))?;

    let (program, errors) = parse(&source);
    match errors.into_iter().next() {
      None => Ok(program),
      Some(error) => Err(format!("include {path}: {error}")),
    }
  })
}

fn run_file(filename: &str, source: &str) {
  let (program, errors) = parse(source);
  if !errors.is_empty() {
    print::parse_errors(filename, &errors);
    exit(65);
  }

  let base = Path::new(filename)
    .parent()
    .map_or_else(PathBuf::new, Path::to_path_buf);

  let mut evaluator = Evaluator::new();
  evaluator.install_include_hook(file_include_hook(base));

  let env = Environment::root();
  if let Err(error) = evaluator.eval(&program, &env) {
    print::runtime_error(&error);
    exit(70);
  }
}

fn main() {
  let app = Command::new("eloquence")
    .version("0.1.0")
    .subcommand(
      Command::new("run")
        .about("Execute an Eloquence program")
        .arg(Arg::new("file").help("The file to run").required(true)),
    )
    .subcommand(
      Command::new("tokens")
        .about("Display the tokens for a file")
        .arg(Arg::new("file").help("The file to scan").required(true)),
    )
    .subcommand(
      Command::new("ast")
        .about("Display the parsed program for a file")
        .arg(Arg::new("file").help("The file to parse").required(true)),
    )
    .get_matches();

  if let Some((command @ ("run" | "tokens" | "ast"), subcommand)) = app.subcommand() {
    let filename = subcommand.value_of("file").unwrap();
    let source = read_file(filename);

    match command {
      "run" => run_file(filename, &source),
      "tokens" => print::tokens(&source),
      "ast" => match parse(&source) {
        (program, errors) if errors.is_empty() => print::ast(&program),
        (_, errors) => {
          print::parse_errors(filename, &errors);
          exit(65);
        }
      },
      _ => unreachable!(),
    }
  } else {
    repl::start();
  }
}
