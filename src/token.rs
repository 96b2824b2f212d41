use std::fmt;

use crate::error::ParseError;

/// The missing-value marker used inside numeric table cells
pub const MISSING: &str = ".";

/// A single parsed data token
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Int(i64),
    Float(f64),
    Str(String),
    Missing,
}

impl Token {
    /// Numeric value, widening ints to floats; `None` for strings and missing
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Token::Int(n) => Some(*n as f64),
            Token::Float(x) => Some(*x),
            Token::Str(_) | Token::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Token::Missing)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(x) => write!(f, "{}", x),
            Token::Str(s) => write!(f, "{}", s),
            Token::Missing => write!(f, "{}", MISSING),
        }
    }
}

/// Parse a token in a numeric context: int, then float, then error.
///
/// The literal `.` is legal only where the caller allows missing values
/// (numeric table and array cells); everywhere else it is a fatal error.
/// Decimal point only, no locale handling.
pub fn parse_numeric(tok: &str, allow_missing: bool, context: &str) -> Result<Token, ParseError> {
    if tok == MISSING {
        if allow_missing {
            return Ok(Token::Missing);
        }
        return Err(ParseError::bad_token(tok, context));
    }
    if let Ok(n) = tok.parse::<i64>() {
        return Ok(Token::Int(n));
    }
    if let Ok(x) = tok.parse::<f64>() {
        return Ok(Token::Float(x));
    }
    Err(ParseError::bad_token(tok, context))
}

/// Parse a token in a set context: int, then float, then fall back to string
pub fn parse_loose(tok: &str) -> Token {
    if let Ok(n) = tok.parse::<i64>() {
        return Token::Int(n);
    }
    if let Ok(x) = tok.parse::<f64>() {
        return Token::Float(x);
    }
    Token::Str(tok.to_string())
}
