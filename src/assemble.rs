use indexmap::IndexMap;
use itertools::{Itertools, MinMaxResult};

use crate::error::ParseError;
use crate::token::Token;
use crate::value::{Axis, DenseArray, Key, SparseArray, Value};

// ==============================
// INTERMEDIATE TABLE
// ==============================

/// Transient table produced by the multi-column and bracket-indexed shape
/// parsers: index-keyed rows carrying one value per declared column.
///
/// Label-keyed dimensions are positionalized by the shape parser (labels
/// mapped to 1-based positions), with the label order carried in `axes`.
#[derive(Clone, Debug)]
pub(crate) struct Table {
    pub cols: Vec<String>,
    pub axes: Vec<Option<Axis>>,
    pub rows: Vec<(Key, Vec<Token>)>,
}

/// Assemble a single column of a table into an array value
pub(crate) fn assemble_column(table: &Table, col: usize, name: &str) -> Result<Value, ParseError> {
    let mut cells: IndexMap<Key, Token> = IndexMap::new();
    for (key, vals) in &table.rows {
        // duplicate keys follow last-write-wins
        cells.insert(key.clone(), vals[col].clone());
    }
    assemble(name, cells, table.axes.clone())
}

// ==============================
// ARRAY ASSEMBLY
// ==============================

/// Turn accumulated cells into a dense or sparse array.
///
/// Per dimension the axis is `[min observed, max observed]` unless the
/// caller fixed it (label axes). The result is dense iff the distinct key
/// count equals the product of axis sizes and no cell is the missing
/// marker; otherwise only the non-missing cells are kept, sparse, with the
/// same axes retained as bounding metadata.
pub(crate) fn assemble(
    name: &str,
    cells: IndexMap<Key, Token>,
    fixed: Vec<Option<Axis>>,
) -> Result<Value, ParseError> {
    if cells.is_empty() {
        return Err(ParseError::EmptyTable(name.to_string()));
    }

    let mut axes = Vec::with_capacity(fixed.len());
    for (dim, fix) in fixed.into_iter().enumerate() {
        let axis = match fix {
            Some(axis) => axis,
            None => {
                let (lo, hi) = match cells.keys().map(|k| k[dim]).minmax() {
                    MinMaxResult::NoElements => unreachable!("cells checked non-empty"),
                    MinMaxResult::OneElement(x) => (x, x),
                    MinMaxResult::MinMax(lo, hi) => (lo, hi),
                };
                Axis::Range { lo, hi }
            }
        };
        axes.push(axis);
    }

    let expected: usize = axes.iter().map(Axis::len).product();
    let any_missing = cells.values().any(Token::is_missing);

    if cells.len() == expected && !any_missing {
        let mut data = vec![f64::NAN; expected];
        for (key, tok) in &cells {
            let mut offset = 0;
            for (axis, ix) in axes.iter().zip(key.iter()) {
                offset = offset * axis.len()
                    + axis.offset(*ix).expect("observed index within inferred axis");
            }
            data[offset] = tok.as_f64().expect("non-missing numeric cell");
        }
        Ok(Value::Dense(DenseArray::new(axes, data)))
    } else {
        let cells = cells
            .into_iter()
            .filter_map(|(key, tok)| tok.as_f64().map(|v| (key, v)))
            .collect();
        Ok(Value::Sparse(SparseArray { axes, cells }))
    }
}
