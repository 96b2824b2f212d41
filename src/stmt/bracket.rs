use indexmap::IndexMap;
use itertools::Itertools;
use log::warn;

use crate::assemble::assemble;
use crate::error::ParseError;
use crate::stmt::{is_separator, name_before_bracket};
use crate::token::{Token, parse_numeric};
use crate::value::{Key, Value};

/// Parse a 1-D or 2-D bracket-indexed table:
/// `param NAME [*] :` with (index, value) rows, or `param NAME [*,*] :`
/// with (index1, index2, value) rows. Column-header lines (leading `:`
/// or trailing `:=`) after the bracket carry no data and are skipped.
/// Assembled directly over the observed index ranges, no `Table`
/// intermediate.
pub(crate) fn parse(stmt: &str, dims: usize) -> Result<(String, Value), ParseError> {
    let name = name_before_bracket(stmt)?;

    let close = stmt.find(']').expect("classifier matched a bracket header");

    let mut cells: IndexMap<Key, Token> = IndexMap::new();
    for (ln, line) in stmt[close + 1..].lines().enumerate() {
        let mut line = line.trim();
        if ln == 0 {
            // the field separator (or an assignment marker) follows the bracket
            if let Some(rest) = line.strip_prefix(":=").or_else(|| line.strip_prefix(':')) {
                line = rest.trim_start();
            }
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() || is_separator(&tokens) {
            continue;
        }
        if line.ends_with(":=") || (ln > 0 && line.starts_with(':')) {
            // column-header line
            continue;
        }
        for chunk in &tokens.iter().chunks(dims + 1) {
            let chunk: Vec<&&str> = chunk.collect();
            if chunk.len() != dims + 1 {
                warn!("skipping trailing tokens in `{name}`: {chunk:?}");
                continue;
            }
            let mut key = Key::new();
            let mut ok = true;
            for tok in &chunk[..dims] {
                match tok.parse::<i64>() {
                    Ok(ix) => key.push(ix),
                    Err(_) => {
                        warn!("skipping row with non-integer index `{tok}` in `{name}`");
                        ok = false;
                        break;
                    }
                }
            }
            if !ok {
                continue;
            }
            let value = parse_numeric(chunk[dims], true, &format!("table `{name}`"))?;
            cells.insert(key, value);
        }
    }

    let value = assemble(&name, cells, vec![None; dims])?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_dim_dense() {
        let (name, value) = parse("param d [*] : 1 0.5 2 0.25 3 0.125", 1).unwrap();
        assert_eq!(name, "d");
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.get(&[3]), Some(0.125));
    }

    #[test]
    fn test_one_dim_sparse_gap() {
        let (_, value) = parse("param d [*] :\n1 0.5\n4 0.25", 1).unwrap();
        let arr = value.as_sparse().expect("sparse");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(&[4]), Some(0.25));
        assert_eq!(arr.get(&[2]), None);
    }

    #[test]
    fn test_two_dim() {
        let stmt = "param c [*,*] :\n1 1 10\n1 2 20\n2 1 30\n2 2 40";
        let (_, value) = parse(stmt, 2).unwrap();
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.get(&[1, 2]), Some(20.0));
        assert_eq!(arr.get(&[2, 2]), Some(40.0));
    }

    #[test]
    fn test_two_dim_header_line_skipped() {
        let stmt = "param c [*,*]\n: 1 2 :=\n1 1 10\n1 2 20\n2 1 30\n2 2 40";
        let (_, value) = parse(stmt, 2).unwrap();
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.get(&[2, 1]), Some(30.0));
    }

    #[test]
    fn test_missing_marker_goes_sparse() {
        let (_, value) = parse("param d [*] :\n1 0.5\n2 .\n3 0.125", 1).unwrap();
        let arr = value.as_sparse().expect("sparse");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(&[2]), None);
    }

    #[test]
    fn test_empty_is_fatal() {
        assert!(matches!(
            parse("param d [*] :", 1),
            Err(ParseError::EmptyTable(_))
        ));
    }
}
