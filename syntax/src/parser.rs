use crate::ast::{Block, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::tokens::{Token, TokenKind};
use std::mem;
use std::rc::Rc;

/// Binding strength of operators, weakest first.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq)]
enum Precedence {
  Lowest,
  Equals,      // equals, not_equals, and, or
  LessGreater, // less, greater, less_equal, greater_equal
  Sum,         // adds, subtracts, minus
  Product,     // times, divides, modulo
  Prefix,      // - x, not x, pointing to x
  Call,        // fn(x)
  Index,       // arr[i], obj.field
}

fn precedence_of(kind: TokenKind) -> Precedence {
  match kind {
    TokenKind::Equals | TokenKind::NotEquals | TokenKind::And | TokenKind::Or => Precedence::Equals,
    TokenKind::Less | TokenKind::Greater | TokenKind::LessEqual | TokenKind::GreaterEqual => {
      Precedence::LessGreater
    }
    TokenKind::Adds | TokenKind::Subtracts | TokenKind::Minus => Precedence::Sum,
    TokenKind::Times | TokenKind::Divides | TokenKind::Modulo => Precedence::Product,
    TokenKind::LeftParen => Precedence::Call,
    TokenKind::LeftBracket | TokenKind::Dot => Precedence::Index,
    _ => Precedence::Lowest,
  }
}

/// Recursive-descent statement parser with a Pratt expression core.
///
/// Keeps the current token plus a three-token lookahead buffer; the third
/// token exists solely to tell `Name { field: … }` struct instantiation
/// apart from an identifier followed by a block. Errors accumulate and
/// parsing continues; callers decide whether an errored program runs.
pub struct Parser<'source> {
  lexer: Lexer<'source>,
  current: Token,
  peeks: [Token; 3],
  errors: Vec<String>,
}

impl<'source> Parser<'source> {
  pub fn new(mut lexer: Lexer<'source>) -> Self {
    let current = lexer.next_token();
    let peeks = [lexer.next_token(), lexer.next_token(), lexer.next_token()];
    Self {
      lexer,
      current,
      peeks,
      errors: Vec::new(),
    }
  }

  pub fn errors(&self) -> &[String] {
    &self.errors
  }

  pub fn into_errors(self) -> Vec<String> {
    self.errors
  }

  fn next_token(&mut self) {
    let incoming = self.lexer.next_token();
    let second = mem::replace(&mut self.peeks[2], incoming);
    let first = mem::replace(&mut self.peeks[1], second);
    self.current = mem::replace(&mut self.peeks[0], first);
  }

  fn current_is(&self, kind: TokenKind) -> bool {
    self.current.kind == kind
  }

  fn peek_is(&self, kind: TokenKind) -> bool {
    self.peeks[0].kind == kind
  }

  fn peek1_is(&self, kind: TokenKind) -> bool {
    self.peeks[1].kind == kind
  }

  fn peek2_is(&self, kind: TokenKind) -> bool {
    self.peeks[2].kind == kind
  }

  fn peek_precedence(&self) -> Precedence {
    precedence_of(self.peeks[0].kind)
  }

  fn current_precedence(&self) -> Precedence {
    precedence_of(self.current.kind)
  }

  fn expect_peek(&mut self, kind: TokenKind) -> bool {
    if self.peek_is(kind) {
      self.next_token();
      true
    } else {
      self.peek_error(kind);
      false
    }
  }

  fn peek_error(&mut self, expected: TokenKind) {
    let token = &self.peeks[0];
    self.errors.push(format!(
      "line {}:{} - expected next token to be {}, got {} instead",
      token.line, token.column, expected, token.kind
    ));
  }

  fn current_identifier(&self) -> Identifier {
    Identifier {
      token: self.current.clone(),
      value: self.current.literal.clone(),
    }
  }

  pub fn parse_program(&mut self) -> Program {
    let mut statements = Vec::new();
    while !self.current_is(TokenKind::Eof) {
      if let Some(statement) = self.parse_statement() {
        statements.push(statement);
      }
      self.next_token();
    }
    Program { statements }
  }

  fn parse_statement(&mut self) -> Option<Statement> {
    match self.current.kind {
      TokenKind::Return => self.parse_return_statement(),
      TokenKind::Define => self.parse_struct_definition(),
      TokenKind::While | TokenKind::Repeat => self.parse_while_statement(),
      TokenKind::For => self.parse_for_statement(),
      TokenKind::Try => self.parse_try_statement(),
      TokenKind::Include => self.parse_include_statement(),
      TokenKind::PointingFrom
        if self.peek_is(TokenKind::Ident) && self.peek1_is(TokenKind::Is) =>
      {
        self.parse_pointer_assignment()
      }
      TokenKind::Ident if self.peek_is(TokenKind::Is) => self.parse_assignment(),
      _ => self.parse_expression_statement(),
    }
  }

  fn parse_assignment(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    let name = self.current_identifier();
    self.next_token(); // onto `is`
    self.next_token();
    let value = self.parse_expression(Precedence::Lowest)?;
    Some(Statement::Assignment { token, name, value })
  }

  fn parse_pointer_assignment(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::Ident) {
      return None;
    }
    let name = self.current_identifier();
    if !self.expect_peek(TokenKind::Is) {
      return None;
    }
    self.next_token();
    let value = self.parse_expression(Precedence::Lowest)?;
    Some(Statement::PointerAssignment { token, name, value })
  }

  fn parse_return_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    self.next_token();
    let value = self.parse_expression(Precedence::Lowest)?;
    Some(Statement::Return { token, value })
  }

  fn parse_expression_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    let expression = self.parse_expression(Precedence::Lowest)?;
    Some(Statement::Expression { token, expression })
  }

  fn parse_while_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    self.next_token();
    let condition = self.parse_expression(Precedence::Lowest)?;
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }
    let body = self.parse_block()?;
    Some(Statement::While { token, condition, body })
  }

  fn parse_for_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::Ident) {
      return None;
    }
    let variable = self.current_identifier();
    if !self.expect_peek(TokenKind::In) {
      return None;
    }
    self.next_token();
    let iterable = self.parse_expression(Precedence::Lowest)?;
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }
    let body = self.parse_block()?;
    Some(Statement::ForIn {
      token,
      variable,
      iterable,
      body,
    })
  }

  fn parse_try_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }
    let try_block = self.parse_block()?;

    let catch_block = if self.peek_is(TokenKind::Catch) {
      self.next_token();
      if !self.expect_peek(TokenKind::LeftBrace) {
        return None;
      }
      Some(self.parse_block()?)
    } else {
      None
    };

    let finally_block = if self.peek_is(TokenKind::Finally) {
      self.next_token();
      if !self.expect_peek(TokenKind::LeftBrace) {
        return None;
      }
      Some(self.parse_block()?)
    } else {
      None
    };

    Some(Statement::TryCatch {
      token,
      try_block,
      catch_block,
      finally_block,
    })
  }

  fn parse_struct_definition(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::Ident) {
      return None;
    }
    let name = self.current_identifier();
    if !self.expect_peek(TokenKind::As) {
      return None;
    }
    if !self.expect_peek(TokenKind::Struct) {
      return None;
    }
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }

    let mut fields = Vec::new();
    if self.peek_is(TokenKind::RightBrace) {
      self.next_token();
    } else {
      loop {
        if !self.expect_peek(TokenKind::Ident) {
          return None;
        }
        fields.push(self.current_identifier());
        if self.peek_is(TokenKind::Comma) {
          self.next_token();
        } else {
          break;
        }
      }
      if !self.expect_peek(TokenKind::RightBrace) {
        return None;
      }
    }

    Some(Statement::StructDefinition { token, name, fields })
  }

  fn parse_include_statement(&mut self) -> Option<Statement> {
    let token = self.current.clone();
    self.next_token();
    let path = self.parse_expression(Precedence::Lowest)?;
    Some(Statement::Include { token, path })
  }

  /// Parses statements up to the matching `}`. The current token must be
  /// the opening brace on entry and is the closing brace on exit.
  fn parse_block(&mut self) -> Option<Block> {
    let token = self.current.clone();
    self.next_token();

    let mut statements = Vec::new();
    while !self.current_is(TokenKind::RightBrace) {
      if self.current_is(TokenKind::Eof) {
        self.errors.push(String::from("unterminated block: expected '}', got EOF"));
        return None;
      }
      if let Some(statement) = self.parse_statement() {
        statements.push(statement);
      }
      self.next_token();
    }
    Some(Block { token, statements })
  }

  fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
    let mut left = self.parse_prefix()?;

    while !self.peek_is(TokenKind::Eof) && precedence < self.peek_precedence() {
      match self.peeks[0].kind {
        TokenKind::Adds
        | TokenKind::Subtracts
        | TokenKind::Minus
        | TokenKind::Times
        | TokenKind::Divides
        | TokenKind::Modulo
        | TokenKind::Equals
        | TokenKind::NotEquals
        | TokenKind::Less
        | TokenKind::Greater
        | TokenKind::LessEqual
        | TokenKind::GreaterEqual
        | TokenKind::And
        | TokenKind::Or => {
          self.next_token();
          left = self.parse_infix_expression(left)?;
        }
        TokenKind::LeftParen => {
          self.next_token();
          left = self.parse_call_expression(left)?;
        }
        TokenKind::LeftBracket => {
          self.next_token();
          left = self.parse_index_expression(left)?;
        }
        TokenKind::Dot => {
          self.next_token();
          left = self.parse_field_access(left)?;
        }
        _ => return Some(left),
      }
    }

    Some(left)
  }

  fn parse_prefix(&mut self) -> Option<Expression> {
    match self.current.kind {
      TokenKind::Ident => self.parse_identifier_expression(),
      TokenKind::Int => self.parse_integer_literal(),
      TokenKind::Float => self.parse_float_literal(),
      TokenKind::String => Some(Expression::String {
        token: self.current.clone(),
        value: self.current.literal.clone(),
      }),
      TokenKind::Char => Some(Expression::Char {
        token: self.current.clone(),
        value: self.current.literal.chars().next().unwrap_or('\0'),
      }),
      TokenKind::Bool => Some(Expression::Boolean {
        token: self.current.clone(),
        value: self.current.literal == "true",
      }),
      TokenKind::Nil => Some(Expression::Null {
        token: self.current.clone(),
      }),
      TokenKind::Minus | TokenKind::Not => self.parse_prefix_expression(),
      TokenKind::PointingTo => self.parse_pointer_reference(),
      TokenKind::PointingFrom => self.parse_pointer_dereference(),
      TokenKind::LeftParen => self.parse_grouped_expression(),
      TokenKind::LeftBracket => self.parse_array_literal(),
      TokenKind::LeftBrace => self.parse_map_literal(),
      TokenKind::If => self.parse_if_expression(),
      TokenKind::Takes => self.parse_function_literal(),
      kind => {
        self.errors.push(format!("no prefix parse function for {kind}"));
        None
      }
    }
  }

  /// An identifier in expression position; three-token lookahead decides
  /// whether a following `{` starts a struct instantiation (`{ }`, or
  /// `{ IDENT :`) or belongs to an enclosing construct.
  fn parse_identifier_expression(&mut self) -> Option<Expression> {
    let identifier = self.current_identifier();

    if self.peek_is(TokenKind::LeftBrace)
      && (self.peek1_is(TokenKind::RightBrace)
        || (self.peek1_is(TokenKind::Ident) && self.peek2_is(TokenKind::Colon)))
    {
      self.next_token();
      return self.parse_struct_instantiation(identifier);
    }

    Some(Expression::Identifier(identifier))
  }

  fn parse_struct_instantiation(&mut self, name: Identifier) -> Option<Expression> {
    let token = self.current.clone();

    let mut fields = Vec::new();
    if self.peek_is(TokenKind::RightBrace) {
      self.next_token();
    } else {
      loop {
        if !self.expect_peek(TokenKind::Ident) {
          return None;
        }
        let field = self.current_identifier();
        if !self.expect_peek(TokenKind::Colon) {
          return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        fields.push((field, value));
        if self.peek_is(TokenKind::Comma) {
          self.next_token();
        } else {
          break;
        }
      }
      if !self.expect_peek(TokenKind::RightBrace) {
        return None;
      }
    }

    Some(Expression::StructInstantiation { token, name, fields })
  }

  fn parse_integer_literal(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    match token.literal.parse::<i64>() {
      Ok(value) => Some(Expression::Integer { token, value }),
      Err(_) => {
        self.errors.push(format!("could not parse {:?} as integer", token.literal));
        None
      }
    }
  }

  fn parse_float_literal(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    match token.literal.parse::<f64>() {
      Ok(value) => Some(Expression::Float { token, value }),
      Err(_) => {
        self.errors.push(format!("could not parse {:?} as float", token.literal));
        None
      }
    }
  }

  fn parse_prefix_expression(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    let operator = token.literal.clone();
    self.next_token();
    let right = Box::new(self.parse_expression(Precedence::Prefix)?);
    Some(Expression::Prefix { token, operator, right })
  }

  fn parse_pointer_reference(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    self.next_token();
    let target = Box::new(self.parse_expression(Precedence::Prefix)?);
    Some(Expression::PointerReference { token, target })
  }

  fn parse_pointer_dereference(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    self.next_token();
    let pointer = Box::new(self.parse_expression(Precedence::Prefix)?);
    Some(Expression::PointerDereference { token, pointer })
  }

  fn parse_grouped_expression(&mut self) -> Option<Expression> {
    self.next_token();
    let expression = self.parse_expression(Precedence::Lowest)?;
    if !self.expect_peek(TokenKind::RightParen) {
      return None;
    }
    Some(expression)
  }

  fn parse_if_expression(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    self.next_token();
    let condition = Box::new(self.parse_expression(Precedence::Lowest)?);
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }
    let consequence = self.parse_block()?;

    let alternative = if self.peek_is(TokenKind::Else) {
      self.next_token();
      if self.peek_is(TokenKind::If) {
        // `else if …` chains re-enter the if parser without a brace
        self.next_token();
        let chain_token = self.current.clone();
        let nested = self.parse_if_expression()?;
        Some(Block {
          token: chain_token.clone(),
          statements: vec![Statement::Expression {
            token: chain_token,
            expression: nested,
          }],
        })
      } else {
        if !self.expect_peek(TokenKind::LeftBrace) {
          return None;
        }
        Some(self.parse_block()?)
      }
    } else {
      None
    };

    Some(Expression::If {
      token,
      condition,
      consequence,
      alternative,
    })
  }

  fn parse_function_literal(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::LeftParen) {
      return None;
    }
    let parameters = self.parse_function_parameters()?;
    if !self.expect_peek(TokenKind::LeftBrace) {
      return None;
    }
    let body = Rc::new(self.parse_block()?);
    Some(Expression::Function {
      token,
      parameters,
      body,
    })
  }

  fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
    let mut parameters = Vec::new();
    if self.peek_is(TokenKind::RightParen) {
      self.next_token();
      return Some(parameters);
    }

    loop {
      if !self.expect_peek(TokenKind::Ident) {
        return None;
      }
      parameters.push(self.current_identifier());
      if self.peek_is(TokenKind::Comma) {
        self.next_token();
      } else {
        break;
      }
    }
    if !self.expect_peek(TokenKind::RightParen) {
      return None;
    }
    Some(parameters)
  }

  fn parse_array_literal(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    let elements = self.parse_expression_list(TokenKind::RightBracket)?;
    Some(Expression::Array { token, elements })
  }

  fn parse_map_literal(&mut self) -> Option<Expression> {
    let token = self.current.clone();
    let mut pairs = Vec::new();

    while !self.peek_is(TokenKind::RightBrace) {
      self.next_token();
      let key = self.parse_expression(Precedence::Lowest)?;
      if !self.expect_peek(TokenKind::Colon) {
        return None;
      }
      self.next_token();
      let value = self.parse_expression(Precedence::Lowest)?;
      pairs.push((key, value));
      if !self.peek_is(TokenKind::RightBrace) && !self.expect_peek(TokenKind::Comma) {
        return None;
      }
    }
    if !self.expect_peek(TokenKind::RightBrace) {
      return None;
    }

    Some(Expression::Map { token, pairs })
  }

  fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
    let mut list = Vec::new();
    if self.peek_is(end) {
      self.next_token();
      return Some(list);
    }

    self.next_token();
    list.push(self.parse_expression(Precedence::Lowest)?);
    while self.peek_is(TokenKind::Comma) {
      self.next_token();
      self.next_token();
      list.push(self.parse_expression(Precedence::Lowest)?);
    }
    if !self.expect_peek(end) {
      return None;
    }
    Some(list)
  }

  fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
    let token = self.current.clone();
    let operator = token.literal.clone();
    let precedence = self.current_precedence();
    self.next_token();
    let right = Box::new(self.parse_expression(precedence)?);
    Some(Expression::Infix {
      token,
      operator,
      left: Box::new(left),
      right,
    })
  }

  fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
    let token = self.current.clone();
    let arguments = self.parse_expression_list(TokenKind::RightParen)?;
    Some(Expression::Call {
      token,
      function: Box::new(function),
      arguments,
    })
  }

  fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
    let token = self.current.clone();
    self.next_token();
    let index = Box::new(self.parse_expression(Precedence::Lowest)?);
    if !self.expect_peek(TokenKind::RightBracket) {
      return None;
    }
    Some(Expression::Index {
      token,
      left: Box::new(left),
      index,
    })
  }

  fn parse_field_access(&mut self, object: Expression) -> Option<Expression> {
    let token = self.current.clone();
    if !self.expect_peek(TokenKind::Ident) {
      return None;
    }
    let field = self.current_identifier();
    Some(Expression::FieldAccess {
      token,
      object: Box::new(object),
      field,
    })
  }
}

/// Parses a source string, returning the program together with any
/// collected syntax errors. A program with errors should not be evaluated.
pub fn parse(source: &str) -> (Program, Vec<String>) {
  let mut parser = Parser::new(Lexer::new(source));
  let program = parser.parse_program();
  (program, parser.into_errors())
}
