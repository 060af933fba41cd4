use ansi_term::Colour::Red;
use ansi_term::Style;

use eloquence_interpreter::RuntimeError;
use eloquence_syntax::ast::Program;
use eloquence_syntax::{tokenize, TokenKind};

pub fn parse_errors(file: &str, errors: &[String]) {
  eprintln!(
    "{} {}",
    Red.bold().paint("Parse Error:"),
    Style::new()
      .bold()
      .paint(format!("{} syntax error(s) in '{}'", errors.len(), file))
  );

  eprintln!("    ╭─[{}]", file);
  for error in errors {
    eprintln!("    │ {}", error);
  }
  eprintln!("────╯");
}

pub fn runtime_error(error: &RuntimeError) {
  eprintln!(
    "{} {}",
    Red.bold().paint("Runtime Error:"),
    Style::new().bold().paint(&error.message)
  );
}

/// Token stream with line numbers in a box frame.
pub fn tokens(source: &str) {
  let mut line = 0;

  println!("     ╭─[Tokens]");
  for token in tokenize(source) {
    if token.line != line {
      print!("{:>4} │ ", token.line);
      line = token.line;
    } else {
      print!("     │ ");
    }
    println!("{} ({})", token.kind, token.literal);

    if token.kind == TokenKind::Eof {
      break;
    }
  }
  println!("─────╯");
}

/// Parsed program, one statement per line in canonical stringified form.
pub fn ast(program: &Program) {
  println!("     ╭─[Program]");
  for (index, statement) in program.statements.iter().enumerate() {
    println!("{:>4} │ {}", index + 1, statement);
  }
  println!("─────╯");
}
