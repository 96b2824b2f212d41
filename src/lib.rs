//! # amdat
//!
//! `amdat` is an AMPL data-file parser: it turns `param`, `let` and `set`
//! declarations into named scalars, ordered sets, and dense or sparse
//! numeric arrays, ready to bind into an optimization model.

mod assemble;
mod splitter;
mod stmt;

pub mod error;
pub mod token;
pub mod utils;
pub mod value;

pub use error::ParseError;
pub use stmt::{Shape, classify};
pub use value::{Atom, Axis, DenseArray, Entries, Key, SetBody, SparseArray, Value};

/// Parse an in-memory data document into an ordered name -> value mapping.
///
/// Statements apply in source order; a name declared twice keeps the later
/// value. Fails on the first fatal syntax or value error.
pub fn parse(text: &str) -> Result<Entries, ParseError> {
    let mut entries = Entries::new();
    for stmt in splitter::statements(text) {
        stmt::apply(&stmt, &mut entries)?;
    }
    Ok(entries)
}

/// Loads the data file at `path` into an internal representation
pub fn load_data(path: &str) -> Result<Entries, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = r#"param S := 5; set YEAR := 1990 1991;"#;
        let entries = parse(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["S"], Value::Scalar(5.0));
    }

    #[test]
    fn test_bad_statement() {
        let text = r#"
            INVALID MODEL STUFF;
        "#;
        assert!(matches!(
            parse(text),
            Err(ParseError::UnrecognizedStatement(_))
        ));
    }

    #[test]
    fn test_later_declaration_wins() {
        let entries = parse("param S := 5;\nparam S := 7;").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["S"], Value::Scalar(7.0));
    }
}
