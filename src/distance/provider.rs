//! Cost-matrix providers.
//!
//! The problem model never talks to a routing backend directly: it asks a
//! [`CostMatrixProvider`] for the table it needs when the caller did not
//! install one with [`Input::set_matrix`](crate::input::Input::set_matrix),
//! and for route geometry when geometry output is requested.

use super::{Cost, CostMatrix};
use crate::error::{Error, Result};
use crate::models::{Coordinates, Location};

/// Source of travel costs and route geometry.
///
/// Implementations must be `Send + Sync`: the model may be built on one
/// thread and solved on another.
pub trait CostMatrixProvider: Send + Sync {
    /// Returns the cost matrix over `locations`.
    ///
    /// Entry `(i, j)` of the result is the cost from `locations[i]` to
    /// `locations[j]`.
    fn cost_matrix(&self, locations: &[Location]) -> Result<CostMatrix>;

    /// Returns the polyline followed along `path`.
    ///
    /// `Ok(None)` means the provider cannot describe the path. The default
    /// joins the stop coordinates with straight segments and gives up when
    /// any stop lacks coordinates.
    fn route_geometry(&self, path: &[Location]) -> Result<Option<Vec<Coordinates>>> {
        Ok(path.iter().map(Location::coordinates).collect())
    }
}

/// A provider serving entries of a table computed ahead of time.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::{CostMatrix, CostMatrixProvider, PrecomputedMatrix};
/// use u_vrp::models::Location;
///
/// let table = CostMatrix::from_rows(vec![vec![0, 2, 7], vec![2, 0, 4], vec![7, 4, 0]]).unwrap();
/// let provider = PrecomputedMatrix::new(table);
/// let m = provider
///     .cost_matrix(&[Location::new(2), Location::new(0)])
///     .unwrap();
/// assert_eq!(m.get(0, 1), 7);
/// ```
#[derive(Debug, Clone)]
pub struct PrecomputedMatrix {
    table: CostMatrix,
}

impl PrecomputedMatrix {
    /// Wraps a full table indexed by location index.
    pub fn new(table: CostMatrix) -> Self {
        Self { table }
    }
}

impl CostMatrixProvider for PrecomputedMatrix {
    fn cost_matrix(&self, locations: &[Location]) -> Result<CostMatrix> {
        let indices: Vec<usize> = locations.iter().map(Location::index).collect();
        self.table.sub_matrix(&indices)
    }
}

/// A provider computing rounded straight-line costs from coordinates.
///
/// Costs are `round(distance * scale)`.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::{CostMatrixProvider, EuclideanMatrix};
/// use u_vrp::models::{Coordinates, Location};
///
/// let provider = EuclideanMatrix::new(1.0);
/// let m = provider
///     .cost_matrix(&[
///         Location::with_coordinates(0, Coordinates::new(0.0, 0.0)),
///         Location::with_coordinates(1, Coordinates::new(3.0, 4.0)),
///     ])
///     .unwrap();
/// assert_eq!(m.get(0, 1), 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EuclideanMatrix {
    scale: f64,
}

impl EuclideanMatrix {
    /// Creates a provider multiplying distances by `scale` before rounding.
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for EuclideanMatrix {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CostMatrixProvider for EuclideanMatrix {
    fn cost_matrix(&self, locations: &[Location]) -> Result<CostMatrix> {
        let points = locations
            .iter()
            .map(|l| l.coordinates().ok_or(Error::MissingCoordinates(l.index())))
            .collect::<Result<Vec<_>>>()?;

        let n = points.len();
        let mut m = CostMatrix::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = (points[i].distance_to(&points[j]) * self.scale).round();
                if !d.is_finite() || d < 0.0 {
                    return Err(Error::InvalidMatrix(format!(
                        "non-finite distance between locations {} and {}",
                        locations[i].index(),
                        locations[j].index()
                    )));
                }
                let c = d as Cost;
                m.set(i, j, c);
                m.set(j, i, c);
            }
        }
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: usize, lon: f64, lat: f64) -> Location {
        Location::with_coordinates(index, Coordinates::new(lon, lat))
    }

    #[test]
    fn test_precomputed_sub_table() {
        let table =
            CostMatrix::from_rows(vec![vec![0, 1, 2], vec![3, 0, 4], vec![5, 6, 0]]).expect("ok");
        let p = PrecomputedMatrix::new(table);
        let m = p
            .cost_matrix(&[Location::new(1), Location::new(2)])
            .expect("in range");
        assert_eq!(m.get(0, 1), 4);
        assert_eq!(m.get(1, 0), 6);
    }

    #[test]
    fn test_precomputed_out_of_range() {
        let p = PrecomputedMatrix::new(CostMatrix::new(2));
        assert!(matches!(
            p.cost_matrix(&[Location::new(5)]),
            Err(Error::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_euclidean_scaled() {
        let p = EuclideanMatrix::new(10.0);
        let m = p
            .cost_matrix(&[at(0, 0.0, 0.0), at(1, 0.0, 1.5)])
            .expect("coords");
        assert_eq!(m.get(0, 1), 15);
        assert_eq!(m.get(1, 0), 15);
        assert_eq!(m.get(1, 1), 0);
    }

    #[test]
    fn test_euclidean_missing_coordinates() {
        let p = EuclideanMatrix::default();
        let err = p
            .cost_matrix(&[at(0, 0.0, 0.0), Location::new(1)])
            .unwrap_err();
        assert_eq!(err, Error::MissingCoordinates(1));
    }

    #[test]
    fn test_default_geometry() {
        let p = EuclideanMatrix::default();
        let path = [at(0, 0.0, 0.0), at(1, 1.0, 1.0)];
        let g = p.route_geometry(&path).expect("ok").expect("has coords");
        assert_eq!(g.len(), 2);
        assert_eq!(g[1], Coordinates::new(1.0, 1.0));

        let partial = [at(0, 0.0, 0.0), Location::new(1)];
        assert!(p.route_geometry(&partial).expect("ok").is_none());
    }
}
