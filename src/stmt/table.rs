use indexmap::IndexMap;
use log::warn;
use smallvec::smallvec;

use crate::assemble::{Table, assemble, assemble_column};
use crate::error::ParseError;
use crate::stmt::{after_keyword, is_separator, split_assign};
use crate::token::{Token, parse_numeric};
use crate::value::{Axis, Entries, Key};

/// Parse a multi-column table statement.
///
/// Unnamed form (`param : COL COL ... :=`): every column becomes its own
/// top-level entry, assembled independently. Named form
/// (`param NAME : COL COL ... :=`): the columns are the second-dimension
/// axis of a single 2-D value stored under NAME.
///
/// The number of leading index tokens per row is inferred from the first
/// data row as `tokens - columns` and must be 1 or 2; one-component keys
/// that do not parse as integers become string labels.
pub(crate) fn parse(stmt: &str, named: bool, out: &mut Entries) -> Result<(), ParseError> {
    let (header, body) = split_assign(stmt);
    let body = body.ok_or_else(|| ParseError::UnrecognizedStatement(stmt.to_string()))?;

    let rest = after_keyword(header);
    let colon = rest.find(':').expect("classifier matched a table header");
    let name = rest[..colon].trim().to_string();
    let cols: Vec<String> = rest[colon + 1..]
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let display = if named { name.as_str() } else { "table" };
    if cols.is_empty() {
        return Err(ParseError::malformed(display, "no columns declared"));
    }

    let lines: Vec<Vec<&str>> = body
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<&str>>())
        .filter(|tokens| !tokens.is_empty() && !is_separator(tokens))
        .collect();
    let Some(first) = lines.first() else {
        return Err(ParseError::EmptyTable(display.to_string()));
    };

    let arity = first.len() as i64 - cols.len() as i64;
    if arity != 1 && arity != 2 {
        return Err(ParseError::malformed(
            display,
            &format!("{} tokens per row with {} columns", first.len(), cols.len()),
        ));
    }
    let arity = arity as usize;
    if named && arity != 1 {
        return Err(ParseError::malformed(display, "named table takes one row index"));
    }
    let label_keys = arity == 1 && first[0].parse::<i64>().is_err();

    let mut labels: IndexMap<String, i64> = IndexMap::new();
    let mut rows: Vec<(Key, Vec<Token>)> = Vec::new();
    for tokens in &lines {
        if tokens.len() != arity + cols.len() {
            warn!("skipping row with {} tokens in `{display}`", tokens.len());
            continue;
        }
        let key: Key = if label_keys {
            let next = labels.len() as i64 + 1;
            smallvec![*labels.entry(tokens[0].to_string()).or_insert(next)]
        } else {
            let mut key = Key::new();
            let mut ok = true;
            for tok in &tokens[..arity] {
                match tok.parse::<i64>() {
                    Ok(ix) => key.push(ix),
                    Err(_) => {
                        warn!("skipping row with non-integer index `{tok}` in `{display}`");
                        ok = false;
                        break;
                    }
                }
            }
            if !ok {
                continue;
            }
            key
        };
        let values = tokens[arity..]
            .iter()
            .map(|tok| parse_numeric(tok, true, &format!("table `{display}`")))
            .collect::<Result<Vec<Token>, ParseError>>()?;
        rows.push((key, values));
    }

    let row_axis = label_keys.then(|| Axis::Labels(labels.keys().cloned().collect()));

    if named {
        insert_named(name, cols, rows, row_axis, out)
    } else {
        let mut axes = vec![row_axis];
        axes.resize(arity, None);
        let table = Table { cols, axes, rows };
        for (ci, col) in table.cols.iter().enumerate() {
            let value = assemble_column(&table, ci, col)?;
            out.insert(col.clone(), value);
        }
        Ok(())
    }
}

/// Named container: rows are dimension 1, columns dimension 2
fn insert_named(
    name: String,
    cols: Vec<String>,
    rows: Vec<(Key, Vec<Token>)>,
    row_axis: Option<Axis>,
    out: &mut Entries,
) -> Result<(), ParseError> {
    // integer column headers address the second axis directly; anything
    // else becomes an ordered label axis keyed by position
    let col_ixs: Option<Vec<i64>> = cols.iter().map(|c| c.parse::<i64>().ok()).collect();
    let (col_ixs, col_axis) = match col_ixs {
        Some(ixs) => (ixs, None),
        None => (
            (1..=cols.len() as i64).collect(),
            Some(Axis::Labels(cols)),
        ),
    };

    let mut cells: IndexMap<Key, Token> = IndexMap::new();
    for (key, values) in rows {
        for (col_ix, tok) in col_ixs.iter().zip(values) {
            cells.insert(smallvec![key[0], *col_ix], tok);
        }
    }
    let value = assemble(&name, cells, vec![row_axis, col_axis])?;
    out.insert(name, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Entries;

    #[test]
    fn test_unnamed_single_index() {
        let stmt = "param : rho beta :=\n1 0.5 0.9\n2 0.25 0.8";
        let mut out = Entries::new();
        parse(stmt, false, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        let rho = out["rho"].as_dense().expect("dense");
        assert_eq!(rho.get(&[2]), Some(0.25));
        let beta = out["beta"].as_dense().expect("dense");
        assert_eq!(beta.get(&[1]), Some(0.9));
    }

    #[test]
    fn test_unnamed_two_indices() {
        let stmt = "param : C :=\n1 1 10\n1 2 20\n2 1 30\n2 2 40";
        let mut out = Entries::new();
        parse(stmt, false, &mut out).unwrap();
        let c = out["C"].as_dense().expect("dense");
        assert_eq!(c.ndim(), 2);
        assert_eq!(c.get(&[2, 1]), Some(30.0));
    }

    #[test]
    fn test_string_indexed_rows() {
        let stmt = "param : demand :=\nUTOPIA 12.5\nATLANTIS 7.25";
        let mut out = Entries::new();
        parse(stmt, false, &mut out).unwrap();
        let demand = out["demand"].as_dense().expect("dense");
        assert_eq!(demand.get_label("ATLANTIS"), Some(7.25));
        assert_eq!(demand.get_label("ELDORADO"), None);
    }

    #[test]
    fn test_named_container() {
        let stmt = "param C : 1 2 :=\n1 80.2636 12.1\n2 3.4 100.944157";
        let mut out = Entries::new();
        parse(stmt, true, &mut out).unwrap();
        assert_eq!(out.len(), 1);
        let c = out["C"].as_dense().expect("dense");
        assert_eq!(c.get(&[1, 1]), Some(80.2636));
        assert_eq!(c.get(&[2, 2]), Some(100.944157));
    }

    #[test]
    fn test_bad_index_row_skipped() {
        let stmt = "param : rho :=\n1 0.5\noops 0.7\n2 0.25";
        let mut out = Entries::new();
        parse(stmt, false, &mut out).unwrap();
        let rho = out["rho"].as_dense().expect("dense");
        assert_eq!(rho.len(), 2);
        assert_eq!(rho.get(&[2]), Some(0.25));
    }

    #[test]
    fn test_separator_rows_skipped() {
        let stmt = "param : rho :=\n:= := \n1 0.5\n=====\n2 0.25";
        let mut out = Entries::new();
        parse(stmt, false, &mut out).unwrap();
        assert_eq!(out["rho"].as_dense().unwrap().len(), 2);
    }
}
