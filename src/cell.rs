use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The shape of a stored value, without the value itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellKind {
    Scalar,
    Sequence,
    Text,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CellKind::Scalar => write!(f, "scalar"),
            CellKind::Sequence => write!(f, "sequence"),
            CellKind::Text => write!(f, "text"),
        }
    }
}

/// A single stored value in one of three shapes
///
/// Sequence and text cells own their buffers; building one from a borrowed
/// slice or string always copies, so later changes to the caller's buffer
/// never reach the stored value.
///
/// # Examples
///
/// ```
/// use sovran_cellmap::{Cell, CellKind};
///
/// let mut source = vec![4, 5, 6];
/// let cell = Cell::sequence(&source);
/// source[0] = 99;
///
/// assert_eq!(cell.kind(), CellKind::Sequence);
/// assert_eq!(cell.as_sequence(), Some(&[4, 5, 6][..]));
/// assert_eq!(cell.as_scalar(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cell<V> {
    Scalar(V),
    Sequence(Vec<V>),
    Text(String),
}

impl<V> Cell<V> {
    /// Creates a scalar cell
    pub fn scalar(value: V) -> Self {
        Cell::Scalar(value)
    }

    /// Creates a sequence cell holding a copy of `values`
    pub fn sequence(values: &[V]) -> Self
    where
        V: Clone,
    {
        Cell::Sequence(values.to_vec())
    }

    /// Creates a text cell holding a copy of `text`
    pub fn text(text: &str) -> Self {
        Cell::Text(text.to_owned())
    }

    /// Returns the active variant
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Scalar(_) => CellKind::Scalar,
            Cell::Sequence(_) => CellKind::Sequence,
            Cell::Text(_) => CellKind::Text,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Cell::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Cell::Sequence(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }

    pub fn as_scalar(&self) -> Option<&V> {
        match self {
            Cell::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[V]> {
        match self {
            Cell::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Number of stored elements: 1 for a scalar, the element count for a
    /// sequence, the byte length for text.
    pub fn len(&self) -> usize {
        match self {
            Cell::Scalar(_) => 1,
            Cell::Sequence(values) => values.len(),
            Cell::Text(text) => text.len(),
        }
    }

    /// True for an empty sequence or empty text. A scalar is never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
