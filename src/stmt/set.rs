use crate::error::ParseError;
use crate::stmt::{after_keyword, split_assign};
use crate::token::{Token, parse_loose};
use crate::value::{Atom, SetBody, Value};

/// Parse `set NAME := ...` into an ordered, homogeneously-typed sequence.
///
/// Members are bare tokens, comma-separated lists, or parenthesized
/// tuples. Tokens that parse as neither integer nor float fall back to
/// strings, and mixed members widen: int -> float -> string.
pub(crate) fn parse(stmt: &str) -> Result<(String, Value), ParseError> {
    let (header, body) = split_assign(stmt);
    let body = body.ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?;
    let name = after_keyword(header).trim().to_string();
    if name.is_empty() || name.split_whitespace().count() != 1 {
        return Err(ParseError::UnrecognizedStatement(stmt.to_string()));
    }

    let set = if body.contains('(') {
        let mut tuples = Vec::new();
        let mut rest = body;
        while let Some(open) = rest.find('(') {
            let close = rest[open..]
                .find(')')
                .ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?
                + open;
            let members = rest[open + 1..close]
                .split(',')
                .map(|tok| atom(tok.trim()))
                .collect();
            tuples.push(members);
            rest = &rest[close + 1..];
        }
        SetBody::Tuples(homogenize_tuples(tuples))
    } else {
        let atoms = body
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(atom)
            .collect();
        SetBody::Atoms(homogenize(atoms))
    };

    Ok((name, Value::Set(set)))
}

fn atom(tok: &str) -> Atom {
    match parse_loose(tok) {
        Token::Int(n) => Atom::Int(n),
        Token::Float(x) => Atom::Float(x),
        Token::Str(s) => Atom::Str(s),
        Token::Missing => unreachable!("parse_loose never yields missing"),
    }
}

/// Widen mixed members to a single type
fn homogenize(atoms: Vec<Atom>) -> Vec<Atom> {
    if atoms.iter().any(|a| matches!(a, Atom::Str(_))) {
        return atoms
            .into_iter()
            .map(|a| Atom::Str(a.to_string()))
            .collect();
    }
    if atoms.iter().any(|a| matches!(a, Atom::Float(_))) {
        return atoms
            .into_iter()
            .map(|a| match a {
                Atom::Int(n) => Atom::Float(n as f64),
                other => other,
            })
            .collect();
    }
    atoms
}

/// Apply one promotion across every tuple element
fn homogenize_tuples(tuples: Vec<Vec<Atom>>) -> Vec<Vec<Atom>> {
    let any_str = tuples
        .iter()
        .flatten()
        .any(|a| matches!(a, Atom::Str(_)));
    let any_float = tuples
        .iter()
        .flatten()
        .any(|a| matches!(a, Atom::Float(_)));
    tuples
        .into_iter()
        .map(|t| {
            if any_str {
                t.into_iter().map(|a| Atom::Str(a.to_string())).collect()
            } else if any_float {
                t.into_iter()
                    .map(|a| match a {
                        Atom::Int(n) => Atom::Float(n as f64),
                        other => other,
                    })
                    .collect()
            } else {
                t
            }
        })
        .collect()
}
