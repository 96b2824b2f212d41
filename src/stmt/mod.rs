mod bracket;
mod scalar;
mod set;
mod sliced;
mod table;

use log::debug;

use crate::error::ParseError;
use crate::value::Entries;

/// Statement shape, decided by one pass over the header substring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// `param NAME := VALUE`
    Scalar,
    /// `param NAME :=` followed by (index, value) rows
    List,
    /// `param [NAME] : COL COL ... :=` multi-column table
    Table { named: bool },
    /// `param NAME [*] :` or `param NAME [*,*] :` indexed table
    Bracket { dims: usize },
    /// `param NAME [*,*,*,...]` serialized as 2-D slices
    Sliced { dims: usize },
    /// `set NAME := ...`
    Set,
}

/// Classify a statement by keyword and header shape.
///
/// `param` and `let` are treated identically. The header is the text up to
/// the first `:=` (or the whole statement when a bracket form omits it):
/// `[` selects the bracket/sliced shapes, a bare `:` the multi-column
/// table, and otherwise the scalar/list pair, told apart by whether a
/// value follows `:=` on the declaration line.
pub fn classify(stmt: &str) -> Result<Shape, ParseError> {
    let keyword = stmt.split_whitespace().next().unwrap_or("");
    match keyword {
        "set" => Ok(Shape::Set),
        "param" | "let" => classify_param(stmt, keyword),
        _ => Err(ParseError::UnrecognizedStatement(stmt.to_string())),
    }
}

fn classify_param(stmt: &str, keyword: &str) -> Result<Shape, ParseError> {
    if let Some(open) = stmt.find('[') {
        let close = stmt[open..]
            .find(']')
            .ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?
            + open;
        let dims = stmt[open + 1..close].split(',').count();
        return Ok(if dims <= 2 {
            Shape::Bracket { dims }
        } else {
            Shape::Sliced { dims }
        });
    }

    let (header, body) = split_assign(stmt);
    let rest = &header.trim_start()[keyword.len()..];
    if rest.contains(':') {
        let named = !rest[..rest.find(':').unwrap()].trim().is_empty();
        return Ok(Shape::Table { named });
    }

    match body {
        Some(body) if body.lines().next().is_some_and(|l| !l.trim().is_empty()) => {
            Ok(Shape::Scalar)
        }
        Some(_) => Ok(Shape::List),
        None => Err(ParseError::UnrecognizedStatement(stmt.to_string())),
    }
}

/// Parse one statement and apply its entries to the result mapping
pub(crate) fn apply(stmt: &str, out: &mut Entries) -> Result<(), ParseError> {
    let shape = classify(stmt)?;
    debug!("{:?}", shape);
    match shape {
        Shape::Set => {
            let (name, value) = set::parse(stmt)?;
            out.insert(name, value);
        }
        Shape::Scalar => {
            let (name, value) = scalar::parse_scalar(stmt)?;
            out.insert(name, value);
        }
        Shape::List => {
            let (name, value) = scalar::parse_list(stmt)?;
            out.insert(name, value);
        }
        Shape::Table { named } => table::parse(stmt, named, out)?,
        Shape::Bracket { dims } => {
            let (name, value) = bracket::parse(stmt, dims)?;
            out.insert(name, value);
        }
        Shape::Sliced { dims } => {
            let (name, value) = sliced::parse(stmt, dims)?;
            out.insert(name, value);
        }
    }
    Ok(())
}

// ==============================
// SHARED HEADER HELPERS
// ==============================

/// Split a statement around the first `:=`
pub(crate) fn split_assign(stmt: &str) -> (&str, Option<&str>) {
    match stmt.find(":=") {
        Some(pos) => (&stmt[..pos], Some(&stmt[pos + 2..])),
        None => (stmt, None),
    }
}

/// The statement text after its leading keyword
pub(crate) fn after_keyword(stmt: &str) -> &str {
    let keyword = stmt.split_whitespace().next().unwrap_or("");
    &stmt.trim_start()[keyword.len()..]
}

/// Parameter name of a bracket-form header (`param NAME [...`),
/// tolerating an assignment marker before the bracket
pub(crate) fn name_before_bracket(stmt: &str) -> Result<String, ParseError> {
    let rest = after_keyword(stmt);
    let open = rest
        .find('[')
        .ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?;
    let name = rest[..open].replace(":=", " ").trim().to_string();
    if name.is_empty() || name.split_whitespace().count() != 1 {
        return Err(ParseError::UnrecognizedStatement(stmt.to_string()));
    }
    Ok(name)
}

/// Rows consisting solely of separator markers carry no data
pub(crate) fn is_separator(tokens: &[&str]) -> bool {
    tokens
        .iter()
        .all(|tok| tok.chars().all(|c| ":=-+".contains(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scalar_and_list() {
        assert_eq!(classify("param S := 5").unwrap(), Shape::Scalar);
        assert_eq!(classify("let S := 5").unwrap(), Shape::Scalar);
        assert_eq!(
            classify("param rho :=\n1 0.5\n2 0.25").unwrap(),
            Shape::List
        );
    }

    #[test]
    fn test_classify_tables() {
        assert_eq!(
            classify("param : rho beta :=\n1 0.5 0.6").unwrap(),
            Shape::Table { named: false }
        );
        assert_eq!(
            classify("param C : 1 2 :=\n1 0.5 0.6").unwrap(),
            Shape::Table { named: true }
        );
    }

    #[test]
    fn test_classify_brackets() {
        assert_eq!(
            classify("param d [*] : 1 0.5 2 0.25").unwrap(),
            Shape::Bracket { dims: 1 }
        );
        assert_eq!(
            classify("param d [*,*] : 1 1 0.5").unwrap(),
            Shape::Bracket { dims: 2 }
        );
        assert_eq!(
            classify("param T := [*,*,1]: 1 2 :=\n1 0.5 0.6").unwrap(),
            Shape::Sliced { dims: 3 }
        );
    }

    #[test]
    fn test_classify_set_and_unknown() {
        assert_eq!(classify("set YEAR := 1990 1991").unwrap(), Shape::Set);
        assert!(matches!(
            classify("minimize cost: x + y"),
            Err(ParseError::UnrecognizedStatement(_))
        ));
    }
}
