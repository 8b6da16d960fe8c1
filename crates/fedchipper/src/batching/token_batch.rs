//! # Token Batches

use serde::{Deserialize, Serialize};

use crate::types::TokenType;

/// A dense, row-major `[rows, width]` array of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBatch<T: TokenType> {
    width: usize,
    data: Vec<T>,
}

impl<T: TokenType> TokenBatch<T> {
    /// Create an empty batch with the given row width.
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    /// Create an empty batch with room for `rows` rows.
    pub fn with_capacity(
        width: usize,
        rows: usize,
    ) -> Self {
        Self {
            width,
            data: Vec::with_capacity(width * rows),
        }
    }

    /// Append a row.
    ///
    /// ## Panics
    /// Panics if `row.len() != self.width()`.
    pub fn push_row(
        &mut self,
        row: &[T],
    ) {
        assert_eq!(row.len(), self.width, "row width mismatch");
        self.data.extend_from_slice(row);
    }

    /// The row width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of rows.
    pub fn num_rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// The `[rows, width]` shape.
    pub fn shape(&self) -> [usize; 2] {
        [self.num_rows(), self.width]
    }

    /// Get a row.
    pub fn row(
        &self,
        idx: usize,
    ) -> Option<&[T]> {
        let start = idx.checked_mul(self.width)?;
        self.data.get(start..start + self.width)
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.width.max(1))
    }

    /// The flat row-major token data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The rows as nested vectors.
    pub fn to_nested_vec(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }
}
