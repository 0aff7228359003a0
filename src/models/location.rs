//! Locations: a matrix index plus optional coordinates.

use serde::{Deserialize, Serialize};

/// Geographic (or planar) coordinates of a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Longitude (x).
    pub lon: f64,
    /// Latitude (y).
    pub lat: f64,
}

impl Coordinates {
    /// Creates coordinates from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Straight-line distance to another point.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let dx = self.lon - other.lon;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A place referenced by jobs and vehicles.
///
/// `index` addresses a row/column of the cost matrix. Coordinates are only
/// needed by providers that compute costs or geometry from positions.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Coordinates, Location};
///
/// let bare = Location::new(3);
/// assert_eq!(bare.index(), 3);
/// assert!(!bare.has_coordinates());
///
/// let placed = Location::with_coordinates(4, Coordinates::new(2.35, 48.85));
/// assert!(placed.has_coordinates());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    index: usize,
    coordinates: Option<Coordinates>,
}

impl Location {
    /// A location known only by its matrix index.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            coordinates: None,
        }
    }

    /// A location with both matrix index and coordinates.
    pub fn with_coordinates(index: usize, coordinates: Coordinates) -> Self {
        Self {
            index,
            coordinates: Some(coordinates),
        }
    }

    /// Matrix index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Coordinates, if known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Returns `true` if coordinates are known.
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }
}
