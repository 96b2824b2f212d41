use indexmap::IndexMap;
use log::warn;
use smallvec::smallvec;

use crate::assemble::assemble;
use crate::error::ParseError;
use crate::stmt::{is_separator, name_before_bracket};
use crate::token::{Token, parse_numeric};
use crate::value::{Key, SparseArray, Value};

/// Parse a 3+-dimensional table serialized as 2-D slices.
///
/// Each slice is introduced by a marker line whose bracket carries the
/// fixed trailing index (`[*,*,K]`). Within a slice, a data row's leading
/// token is the dimension-1 index and each value's 1-based position in the
/// row is the dimension-2 index. Exactly-3-D data is assembled into a
/// dense/sparse array; 4+ dimensions cannot be resolved from this
/// serialization and come back as the raw index mapping with no axes.
pub(crate) fn parse(stmt: &str, dims: usize) -> Result<(String, Value), ParseError> {
    let name = name_before_bracket(stmt)?;

    let open = stmt.find('[').expect("classifier matched a bracket header");
    let mut slice: Option<i64> = None;
    let mut cells: IndexMap<Key, Token> = IndexMap::new();

    for line in stmt[open..].lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.contains('[') {
            // marker line; an all-star bracket is the dimension declaration
            for group in bracket_groups(line) {
                if let Some(k) = group.split(',').next_back().and_then(|t| t.trim().parse().ok()) {
                    slice = Some(k);
                }
            }
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if line.ends_with(":=") || line.starts_with(':') || is_separator(&tokens) {
            // column-header line following a marker
            continue;
        }
        let Some(k) = slice else {
            warn!("skipping row before any slice marker in `{name}`: {line}");
            continue;
        };
        let Ok(row) = tokens[0].parse::<i64>() else {
            warn!("skipping row with non-integer index `{}` in `{name}`", tokens[0]);
            continue;
        };
        for (pos, tok) in tokens[1..].iter().enumerate() {
            let value = parse_numeric(tok, true, &format!("table `{name}`"))?;
            cells.insert(smallvec![row, pos as i64 + 1, k], value);
        }
    }

    if dims == 3 {
        let value = assemble(&name, cells, vec![None; 3])?;
        return Ok((name, value));
    }

    // 4+ dimensions: positions beyond the third are not recoverable from
    // the slice serialization, so hand back the observed cells unreduced
    warn!("`{name}` declares {dims} dimensions; returning unreduced index mapping");
    if cells.is_empty() {
        return Err(ParseError::EmptyTable(name));
    }
    let cells = cells
        .into_iter()
        .filter_map(|(key, tok)| tok.as_f64().map(|v| (key, v)))
        .collect();
    Ok((name, Value::Sparse(SparseArray { axes: vec![], cells })))
}

/// Contents of every `[...]` group on a line
fn bracket_groups(line: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        groups.push(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_D: &str = "param T := [*,*,1]: 1 2 :=\n\
                           1 0.1 0.2\n\
                           2 0.3 0.4\n\
                           [*,*,2]: 1 2 :=\n\
                           1 0.5 0.6\n\
                           2 0.7 0.8";

    #[test]
    fn test_three_dim_dense() {
        let (name, value) = parse(THREE_D, 3).unwrap();
        assert_eq!(name, "T");
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.ndim(), 3);
        assert_eq!(arr.len(), 8);
        assert_eq!(arr.get(&[1, 2, 1]), Some(0.2));
        assert_eq!(arr.get(&[2, 1, 2]), Some(0.7));
    }

    #[test]
    fn test_declaration_bracket_form() {
        let stmt = "param T [*,*,*]\n[*,*,1]: 1 :=\n1 0.5";
        let (_, value) = parse(stmt, 3).unwrap();
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.get(&[1, 1, 1]), Some(0.5));
    }

    #[test]
    fn test_incomplete_slice_goes_sparse() {
        let stmt = "param T := [*,*,1]:\n1 0.1 0.2\n[*,*,3]:\n1 0.5 0.6";
        let (_, value) = parse(stmt, 3).unwrap();
        let arr = value.as_sparse().expect("sparse");
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.get(&[1, 2, 3]), Some(0.6));
        assert_eq!(arr.get(&[1, 1, 2]), None);
    }

    #[test]
    fn test_four_dims_unreduced() {
        let stmt = "param Q [*,*,*,*] :=\n[*,*,1,1]:\n1 0.5";
        let (_, value) = parse(stmt, 4).unwrap();
        let arr = value.as_sparse().expect("sparse");
        assert!(!arr.is_reduced());
        assert_eq!(arr.get(&[1, 1, 1]), Some(0.5));
    }

    #[test]
    fn test_malformed_row_skipped() {
        let stmt = "param T := [*,*,1]:\nxx 0.9\n1 0.1\n2 0.2";
        let (_, value) = parse(stmt, 3).unwrap();
        let arr = value.as_dense().expect("dense");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.get(&[2, 1, 1]), Some(0.2));
    }
}
