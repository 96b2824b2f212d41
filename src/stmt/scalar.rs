use log::warn;

use crate::error::ParseError;
use crate::stmt::{after_keyword, split_assign};
use crate::token::{Token, parse_numeric};
use crate::value::{Axis, DenseArray, Value};

/// Parse `param NAME := VALUE`
pub(crate) fn parse_scalar(stmt: &str) -> Result<(String, Value), ParseError> {
    let (header, body) = split_assign(stmt);
    let name = after_keyword(header).trim().to_string();
    let body = body.unwrap_or("");
    let tok = body
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?;
    let value = match parse_numeric(tok, false, &format!("scalar `{name}`"))? {
        Token::Int(n) => n as f64,
        Token::Float(x) => x,
        Token::Str(_) | Token::Missing => unreachable!("parse_numeric returns numbers"),
    };
    Ok((name, Value::Scalar(value)))
}

/// Parse the explicit-list form: `param NAME :=` followed by
/// (index, value) rows on the remaining lines.
///
/// The result spans `[1, max index]`; indices never written stay `NAN`,
/// an implicit hole distinct from the explicit `.` marker.
pub(crate) fn parse_list(stmt: &str) -> Result<(String, Value), ParseError> {
    let (header, body) = split_assign(stmt);
    let name = after_keyword(header).trim().to_string();
    let body = body.unwrap_or("");

    let mut pairs: Vec<(i64, Token)> = Vec::new();
    for line in body.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 2 {
            warn!("skipping row with {} tokens in list `{name}`: {line}", tokens.len());
            continue;
        }
        let Ok(ix) = tokens[0].parse::<i64>() else {
            warn!("skipping row with non-integer index in list `{name}`: {line}");
            continue;
        };
        if ix < 1 {
            warn!("skipping out-of-range index {ix} in list `{name}`");
            continue;
        }
        let value = parse_numeric(tokens[1], true, &format!("list `{name}`"))?;
        pairs.push((ix, value));
    }

    if pairs.is_empty() {
        return Err(ParseError::EmptyTable(name));
    }

    let max = pairs.iter().map(|(ix, _)| *ix).max().expect("non-empty");
    let mut data = vec![f64::NAN; max as usize];
    for (ix, tok) in pairs {
        // an explicit `.` leaves the same hole as an unwritten index
        if let Some(v) = tok.as_f64() {
            data[(ix - 1) as usize] = v;
        }
    }
    let axes = vec![Axis::Range { lo: 1, hi: max }];
    Ok((name, Value::Dense(DenseArray::new(axes, data))))
}
