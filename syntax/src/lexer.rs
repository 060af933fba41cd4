use crate::tokens::{lookup_ident, Token, TokenKind};

/// Scanner state saved before looking ahead for a multi-word keyword, and
/// restored when the following word is not part of one.
#[derive(Clone, Copy)]
struct ScannerState {
  position: usize,
  read_position: usize,
  ch: char,
  line: usize,
  column: usize,
}

/// Reads a source buffer left to right, producing one token per call.
///
/// The lexer keeps one character of lookahead over the raw character stream
/// and never aborts: unrecognised input becomes `Illegal` tokens.
pub struct Lexer<'source> {
  input: &'source str,
  position: usize,      // byte offset of the current character
  read_position: usize, // byte offset after the current character
  ch: char,             // '\0' signals end of input
  line: usize,
  column: usize,
  finished: bool, // the iterator has yielded Eof
}

impl<'source> Lexer<'source> {
  pub fn new(input: &'source str) -> Self {
    let mut lexer = Self {
      input,
      position: 0,
      read_position: 0,
      ch: '\0',
      line: 1,
      column: 0,
      finished: false,
    };
    lexer.read_char();
    lexer
  }

  fn read_char(&mut self) {
    match self.input[self.read_position..].chars().next() {
      None => {
        self.ch = '\0';
        self.position = self.read_position;
      }
      Some(c) => {
        self.position = self.read_position;
        self.read_position += c.len_utf8();
        if c == '\n' {
          self.line += 1;
          self.column = 0;
        } else {
          self.column += 1;
        }
        self.ch = c;
      }
    }
  }

  fn peek_char(&self) -> char {
    self.input[self.read_position..].chars().next().unwrap_or('\0')
  }

  fn save_state(&self) -> ScannerState {
    ScannerState {
      position: self.position,
      read_position: self.read_position,
      ch: self.ch,
      line: self.line,
      column: self.column,
    }
  }

  fn restore_state(&mut self, state: ScannerState) {
    self.position = state.position;
    self.read_position = state.read_position;
    self.ch = state.ch;
    self.line = state.line;
    self.column = state.column;
  }

  pub fn next_token(&mut self) -> Token {
    loop {
      self.skip_whitespace();

      if self.ch == '/' && self.peek_char() == '/' {
        self.skip_line_comment();
        continue;
      }
      if self.ch == '/' && self.peek_char() == '*' {
        let (line, column) = (self.line, self.column);
        self.read_char();
        self.read_char();
        if !self.skip_block_comment() {
          return Token::new(TokenKind::Illegal, "unterminated comment", line, column);
        }
        continue;
      }
      break;
    }

    let (line, column) = (self.line, self.column);

    match self.ch {
      '\0' => Token::new(TokenKind::Eof, "", line, column),
      '-' => self.single_char_token(TokenKind::Minus),
      '!' => self.single_char_token(TokenKind::Not),
      '(' => self.single_char_token(TokenKind::LeftParen),
      ')' => self.single_char_token(TokenKind::RightParen),
      '[' => self.single_char_token(TokenKind::LeftBracket),
      ']' => self.single_char_token(TokenKind::RightBracket),
      '{' => self.single_char_token(TokenKind::LeftBrace),
      '}' => self.single_char_token(TokenKind::RightBrace),
      ',' => self.single_char_token(TokenKind::Comma),
      ':' => self.single_char_token(TokenKind::Colon),
      '.' if self.peek_char().is_ascii_digit() => self.read_number_token(),
      '.' => self.single_char_token(TokenKind::Dot),
      '"' => {
        let literal = self.read_string();
        Token::new(TokenKind::String, literal, line, column)
      }
      '\'' => self.read_char_token(),
      c if is_letter(c) => {
        let literal = self.read_identifier();
        let kind = lookup_ident(&literal);
        Token::new(kind, literal, line, column)
      }
      c if c.is_ascii_digit() => self.read_number_token(),
      c => {
        self.read_char();
        Token::new(TokenKind::Illegal, c.to_string(), line, column)
      }
    }
  }

  fn single_char_token(&mut self, kind: TokenKind) -> Token {
    let token = Token::new(kind, self.ch.to_string(), self.line, self.column);
    self.read_char();
    token
  }

  /// Reads an identifier, assembling the compound keywords
  /// `pointing to` / `pointing from` when the following word matches.
  fn read_identifier(&mut self) -> String {
    let start = self.position;
    while is_letter(self.ch) || self.ch.is_ascii_digit() {
      self.read_char();
    }
    let literal = &self.input[start..self.position];

    if literal == "pointing" {
      let saved = self.save_state();

      while self.ch == ' ' || self.ch == '\t' {
        self.read_char();
      }

      if is_letter(self.ch) {
        let next_start = self.position;
        while is_letter(self.ch) {
          self.read_char();
        }
        match &self.input[next_start..self.position] {
          "to" => return String::from("pointing to"),
          "from" => return String::from("pointing from"),
          _ => {}
        }
      }

      self.restore_state(saved);
    }

    literal.to_string()
  }

  fn read_number_token(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    let start = self.position;
    let mut is_float = false;

    while self.ch.is_ascii_digit() {
      self.read_char();
    }

    if self.ch == '.' && self.peek_char().is_ascii_digit() {
      is_float = true;
      self.read_char();
      while self.ch.is_ascii_digit() {
        self.read_char();
      }
    }

    let literal = &self.input[start..self.position];
    let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
    Token::new(kind, literal, line, column)
  }

  /// Reads a double-quoted string, translating the escape sequences
  /// `\n \t \r \" \\`; any other escape passes the raw character through.
  fn read_string(&mut self) -> String {
    let mut out = String::new();
    loop {
      self.read_char();
      match self.ch {
        '"' | '\0' => break,
        '\\' => {
          self.read_char();
          let escaped = match self.ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '"' => '"',
            '\\' => '\\',
            other => other,
          };
          out.push(escaped);
        }
        c => out.push(c),
      }
    }
    self.read_char(); // past the closing quote
    out
  }

  fn read_char_token(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    self.read_char(); // past the opening quote
    let c = self.ch;
    self.read_char();
    if self.ch == '\'' {
      self.read_char();
    }
    Token::new(TokenKind::Char, c.to_string(), line, column)
  }

  fn skip_whitespace(&mut self) {
    while self.ch != '\0' && self.ch.is_whitespace() {
      self.read_char();
    }
  }

  fn skip_line_comment(&mut self) {
    while self.ch != '\n' && self.ch != '\0' {
      self.read_char();
    }
  }

  fn skip_block_comment(&mut self) -> bool {
    loop {
      if self.ch == '\0' {
        return false;
      }
      if self.ch == '*' && self.peek_char() == '/' {
        self.read_char();
        self.read_char();
        return true;
      }
      self.read_char();
    }
  }
}

fn is_letter(c: char) -> bool {
  c.is_alphabetic() || c == '_'
}

/// Yields every token up to and including `Eof`, then stops.
impl Iterator for Lexer<'_> {
  type Item = Token;

  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }
    let token = self.next_token();
    self.finished = token.kind == TokenKind::Eof;
    Some(token)
  }
}

/// Scans the whole source, including the terminating `Eof` token.
pub fn tokenize(source: &str) -> Vec<Token> {
  Lexer::new(source).collect()
}
