//! Vehicle type with start/end locations, capacity and skills.

use super::{Amount, Location, SkillSet};

/// A vehicle that services one route.
///
/// The route starts at `start` and, when `end` is set, finishes there;
/// otherwise the route is open and ends at the last job. A vehicle without
/// declared capacity is unconstrained in every amount dimension.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Amount, Location, Vehicle};
///
/// let v = Vehicle::new(0, Location::new(0))
///     .with_end(Location::new(0))
///     .with_capacity(Amount::new(vec![200]))
///     .with_skills([1]);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity().map(|c| c.as_slice()), Some(&[200][..]));
/// assert!(v.has_skill(1));
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: u64,
    start: Location,
    end: Option<Location>,
    capacity: Option<Amount>,
    skills: SkillSet,
}

impl Vehicle {
    /// Creates an open-ended, unconstrained vehicle with no skills.
    pub fn new(id: u64, start: Location) -> Self {
        Self {
            id,
            start,
            end: None,
            capacity: None,
            skills: SkillSet::new(),
        }
    }

    /// Sets the end location.
    pub fn with_end(mut self, end: Location) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: Amount) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the provided skills.
    pub fn with_skills<I: IntoIterator<Item = u32>>(mut self, skills: I) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }

    /// External id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Start location.
    pub fn start(&self) -> &Location {
        &self.start
    }

    /// End location, if the route is closed.
    pub fn end(&self) -> Option<&Location> {
        self.end.as_ref()
    }

    /// Declared capacity, `None` when unconstrained.
    pub fn capacity(&self) -> Option<&Amount> {
        self.capacity.as_ref()
    }

    /// Provided skills.
    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    /// Returns `true` if the vehicle provides the skill.
    pub fn has_skill(&self, skill: u32) -> bool {
        self.skills.contains(skill)
    }

    /// Returns `true` if `load` fits the capacity in every dimension.
    pub fn can_carry(&self, load: &Amount) -> bool {
        self.capacity.as_ref().is_none_or(|cap| load.fits_in(cap))
    }
}
