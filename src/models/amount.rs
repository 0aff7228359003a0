//! Multi-dimensional amount vectors (demands and capacities).

use std::ops::{Add, AddAssign, Index, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A fixed-dimension quantity vector.
///
/// Jobs carry their demand as an `Amount`, vehicles their capacity. All
/// comparisons are component-wise: `a.fits_in(&b)` holds when every
/// component of `a` is less than or equal to the matching one in `b`.
///
/// # Examples
///
/// ```
/// use u_vrp::models::Amount;
///
/// let demand = Amount::new(vec![4, 1]);
/// let capacity = Amount::new(vec![10, 1]);
/// assert!(demand.fits_in(&capacity));
/// assert!(!capacity.fits_in(&demand));
/// assert_eq!((demand.clone() + demand).as_slice(), &[8, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Vec<i64>);

impl Amount {
    /// Wraps the given components.
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// All-zero amount of the given dimension.
    pub fn zero(size: usize) -> Self {
        Self(vec![0; size])
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a zero-dimensional amount.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }

    /// Components as a slice.
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// Returns `true` if `self[d] <= other[d]` for every dimension.
    ///
    /// Amounts of different dimensions never fit.
    pub fn fits_in(&self, other: &Amount) -> bool {
        self.len() == other.len() && self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// Lowers each component to the matching one of `other`.
    pub fn min_assign(&mut self, other: &Amount) {
        for (a, &b) in self.0.iter_mut().zip(&other.0) {
            *a = (*a).min(b);
        }
    }
}

impl From<Vec<i64>> for Amount {
    fn from(values: Vec<i64>) -> Self {
        Self(values)
    }
}

impl Index<usize> for Amount {
    type Output = i64;

    fn index(&self, index: usize) -> &i64 {
        &self.0[index]
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a += b;
        }
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, rhs: &Amount) {
        for (a, &b) in self.0.iter_mut().zip(&rhs.0) {
            *a -= b;
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(mut self, rhs: Amount) -> Amount {
        self += &rhs;
        self
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(mut self, rhs: Amount) -> Amount {
        self -= &rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let a = Amount::zero(3);
        assert_eq!(a.len(), 3);
        assert!(a.is_zero());
        assert!(Amount::zero(0).is_empty());
    }

    #[test]
    fn test_fits_in() {
        let a = Amount::new(vec![1, 5]);
        assert!(a.fits_in(&Amount::new(vec![1, 5])));
        assert!(!a.fits_in(&Amount::new(vec![2, 4])));
        assert!(!a.fits_in(&Amount::new(vec![1])));
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Amount::new(vec![3, 4]);
        a += &Amount::new(vec![1, 1]);
        assert_eq!(a.as_slice(), &[4, 5]);
        a -= &Amount::new(vec![4, 0]);
        assert_eq!(a.as_slice(), &[0, 5]);
        assert_eq!(a[1], 5);
    }

    #[test]
    fn test_min_assign() {
        let mut lo = Amount::zero(2);
        lo.min_assign(&Amount::new(vec![-2, 3]));
        assert_eq!(lo.as_slice(), &[-2, 0]);
    }
}
