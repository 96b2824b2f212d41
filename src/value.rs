use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

// ==============================
// KEYS AND AXES
// ==============================

/// Index tuple addressing one array cell (arity 1, 2 or 3)
pub type Key = SmallVec<[i64; 3]>;

/// Ordered name -> value mapping produced by a parse call
pub type Entries = IndexMap<String, Value>;

/// One array dimension: a contiguous integer interval (not assumed to
/// start at 1) or an ordered label sequence for string-keyed tables
#[derive(Clone, Debug, PartialEq)]
pub enum Axis {
    Range { lo: i64, hi: i64 },
    Labels(Vec<String>),
}

impl Axis {
    pub fn len(&self) -> usize {
        match self {
            Axis::Range { lo, hi } => (hi - lo + 1).max(0) as usize,
            Axis::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-based offset of integer index `ix` along this axis.
    ///
    /// Label axes are addressed by 1-based label position, which is how
    /// the assembler keys them internally.
    pub fn offset(&self, ix: i64) -> Option<usize> {
        match self {
            Axis::Range { lo, hi } => (*lo..=*hi).contains(&ix).then(|| (ix - lo) as usize),
            Axis::Labels(labels) => {
                (1..=labels.len() as i64).contains(&ix).then(|| (ix - 1) as usize)
            }
        }
    }

    /// Zero-based offset of a label along a label axis
    pub fn offset_label(&self, label: &str) -> Option<usize> {
        match self {
            Axis::Range { .. } => None,
            Axis::Labels(labels) => labels.iter().position(|l| l == label),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Range { lo, hi } => write!(f, "{}..{}", lo, hi),
            Axis::Labels(labels) => write!(f, "<{} labels>", labels.len()),
        }
    }
}

// ==============================
// ARRAYS
// ==============================

/// Rectangular array with every cell populated, stored row-major.
///
/// Explicit-list holes are `f64::NAN` rather than the `.` missing marker:
/// an index below the observed maximum that was never written.
#[derive(Clone, Debug)]
pub struct DenseArray {
    pub axes: Vec<Axis>,
    data: Vec<f64>,
}

/// NaN holes compare equal to themselves, so parsing the same document
/// twice yields equal values even when a list leaves holes
impl PartialEq for DenseArray {
    fn eq(&self, other: &Self) -> bool {
        self.axes == other.axes
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl DenseArray {
    pub(crate) fn new(axes: Vec<Axis>, data: Vec<f64>) -> Self {
        Self { axes, data }
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Total cell count (product of axis sizes)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at an integer index tuple (label axes use 1-based positions)
    pub fn get(&self, idx: &[i64]) -> Option<f64> {
        self.at(self.flatten(idx)?)
    }

    /// Cell at a raw per-dimension positional offset
    pub fn at(&self, offset: usize) -> Option<f64> {
        self.data.get(offset).copied()
    }

    /// Cell of a label-keyed 1-D array
    pub fn get_label(&self, label: &str) -> Option<f64> {
        if self.axes.len() != 1 {
            return None;
        }
        self.at(self.axes[0].offset_label(label)?)
    }

    fn flatten(&self, idx: &[i64]) -> Option<usize> {
        if idx.len() != self.axes.len() {
            return None;
        }
        let mut offset = 0;
        for (axis, ix) in self.axes.iter().zip(idx) {
            offset = offset * axis.len() + axis.offset(*ix)?;
        }
        Some(offset)
    }
}

impl fmt::Display for DenseArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "dense [{}]", join_axes(&self.axes))
    }
}

/// Array populated only where data was observed, keyed by exact index
/// tuples. `axes` is bounding metadata; it is empty when the source was a
/// 4+-dimensional sliced table, which is returned unreduced.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseArray {
    pub axes: Vec<Axis>,
    pub cells: IndexMap<Key, f64>,
}

impl SparseArray {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, idx: &[i64]) -> Option<f64> {
        self.cells.get(idx).copied()
    }

    /// False for 4+-dimensional tables, whose position-encoded indices
    /// cannot be resolved into axes
    pub fn is_reduced(&self) -> bool {
        !self.axes.is_empty()
    }
}

impl fmt::Display for SparseArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_reduced() {
            write!(f, "sparse [{}] <{} cells>", join_axes(&self.axes), self.len())
        } else {
            write!(f, "sparse <{} cells, unreduced>", self.len())
        }
    }
}

fn join_axes(axes: &[Axis]) -> String {
    let parts: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
    parts.join(" x ")
}

// ==============================
// SETS
// ==============================

/// Set member (identifier, integer or float)
#[derive(Clone, Debug, PartialEq)]
pub enum Atom {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Atom::Int(n) => write!(f, "{}", n),
            Atom::Float(x) => write!(f, "{}", x),
            Atom::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Ordered, homogeneously-typed set contents
#[derive(Clone, Debug, PartialEq)]
pub enum SetBody {
    Atoms(Vec<Atom>),
    Tuples(Vec<Vec<Atom>>),
}

impl SetBody {
    pub fn len(&self) -> usize {
        match self {
            SetBody::Atoms(v) => v.len(),
            SetBody::Tuples(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SetBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SetBody::Atoms(atoms) => {
                let items: Vec<String> = atoms.iter().map(|a| a.to_string()).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            SetBody::Tuples(tuples) => {
                let items: Vec<String> = tuples
                    .iter()
                    .map(|t| {
                        let inner: Vec<String> = t.iter().map(|a| a.to_string()).collect();
                        format!("({})", inner.join(","))
                    })
                    .collect();
                write!(f, "{{{}}}", items.join(" "))
            }
        }
    }
}

// ==============================
// ROOT VALUE ENUM
// ==============================

/// One parsed declaration value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Set(SetBody),
    Dense(DenseArray),
    Sparse(SparseArray),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&DenseArray> {
        match self {
            Value::Dense(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseArray> {
        match self {
            Value::Sparse(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetBody> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{}", x),
            Value::Set(s) => write!(f, "{}", s),
            Value::Dense(a) => write!(f, "{}", a),
            Value::Sparse(a) => write!(f, "{}", a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_axis_offsets() {
        let axis = Axis::Range { lo: 3, hi: 5 };
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.offset(3), Some(0));
        assert_eq!(axis.offset(5), Some(2));
        assert_eq!(axis.offset(6), None);

        let labels = Axis::Labels(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.offset(2), Some(1));
        assert_eq!(labels.offset_label("b"), Some(1));
        assert_eq!(labels.offset_label("z"), None);
    }

    #[test]
    fn test_dense_get() {
        // 2x2, rows 1..2, cols 1..2, row-major
        let arr = DenseArray::new(
            vec![Axis::Range { lo: 1, hi: 2 }, Axis::Range { lo: 1, hi: 2 }],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        assert_eq!(arr.get(&[1, 1]), Some(1.0));
        assert_eq!(arr.get(&[2, 1]), Some(3.0));
        assert_eq!(arr.get(&[3, 1]), None);
        assert_eq!(arr.get(&[1]), None);
    }

    #[test]
    fn test_dense_nan_holes_compare_equal() {
        let arr = DenseArray::new(
            vec![Axis::Range { lo: 1, hi: 3 }],
            vec![1.0, f64::NAN, 3.0],
        );
        assert_eq!(arr, arr.clone());
        let other = DenseArray::new(
            vec![Axis::Range { lo: 1, hi: 3 }],
            vec![1.0, 2.0, 3.0],
        );
        assert_ne!(arr, other);
    }

    #[test]
    fn test_sparse_get() {
        let mut cells = IndexMap::new();
        let key: Key = smallvec![2, 7];
        cells.insert(key, 9.5);
        let arr = SparseArray {
            axes: vec![Axis::Range { lo: 2, hi: 2 }, Axis::Range { lo: 7, hi: 7 }],
            cells,
        };
        assert_eq!(arr.get(&[2, 7]), Some(9.5));
        assert_eq!(arr.get(&[2, 8]), None);
        assert!(arr.is_reduced());
    }
}
