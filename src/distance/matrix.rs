//! Dense cost matrix.

use crate::error::{Error, Result};

/// Travel cost between two locations, in the matrix's native unit.
pub type Cost = u64;

/// A dense n×n cost matrix stored in row-major order.
///
/// Entries are non-negative integers and may be asymmetric.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::CostMatrix;
///
/// let m = CostMatrix::from_rows(vec![
///     vec![0, 5, 9],
///     vec![5, 0, 2],
///     vec![9, 3, 0],
/// ])
/// .unwrap();
/// assert_eq!(m.size(), 3);
/// assert_eq!(m.get(2, 1), 3);
///
/// let sub = m.sub_matrix(&[2, 0]).unwrap();
/// assert_eq!(sub.get(0, 1), 9);
/// assert_eq!(sub.get(1, 0), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<Cost>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a cost matrix from rows.
    ///
    /// Fails with [`Error::InvalidMatrix`] unless every row has as many
    /// entries as there are rows.
    pub fn from_rows(rows: Vec<Vec<Cost>>) -> Result<Self> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(Error::InvalidMatrix(format!(
                "row {i} has {} entries, matrix is not square ({size} rows)",
                row.len()
            )));
        }
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> Cost {
        self.data[from * self.size + to]
    }

    /// Sets the cost from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, cost: Cost) {
        self.data[from * self.size + to] = cost;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row `from` as a slice.
    pub fn row(&self, from: usize) -> &[Cost] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Extracts the matrix restricted to `indices`.
    ///
    /// Entry `(i, j)` of the result is entry `(indices[i], indices[j])` of
    /// `self`; order is preserved and duplicates are allowed. Fails with
    /// [`Error::IndexOutOfRange`] on the first out-of-bounds index.
    pub fn sub_matrix(&self, indices: &[usize]) -> Result<CostMatrix> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.size) {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.size,
            });
        }
        let data = indices
            .iter()
            .flat_map(|&i| indices.iter().map(move |&j| (i, j)))
            .map(|(i, j)| self.get(i, j))
            .collect();
        Ok(CostMatrix {
            data,
            size: indices.len(),
        })
    }
}
