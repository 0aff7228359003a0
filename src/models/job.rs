//! Jobs: places to visit with a demand and required skills.

use super::{Amount, Location, SkillSet};

/// A job to be served by exactly one vehicle.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Amount, Job, Location};
///
/// let job = Job::new(17, Location::new(2))
///     .with_amount(Amount::new(vec![4]))
///     .with_skills([1, 3]);
/// assert_eq!(job.id(), 17);
/// assert_eq!(job.location().index(), 2);
/// assert_eq!(job.amount().as_slice(), &[4]);
/// assert!(job.skills().contains(3));
/// ```
#[derive(Debug, Clone)]
pub struct Job {
    id: u64,
    location: Location,
    amount: Amount,
    skills: SkillSet,
}

impl Job {
    /// Creates a job with no demand and no skill requirement.
    pub fn new(id: u64, location: Location) -> Self {
        Self {
            id,
            location,
            amount: Amount::default(),
            skills: SkillSet::new(),
        }
    }

    /// Sets the demand.
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }

    /// Sets the required skills.
    pub fn with_skills<I: IntoIterator<Item = u32>>(mut self, skills: I) -> Self {
        self.skills = skills.into_iter().collect();
        self
    }

    /// External id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Where the job takes place.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Demand.
    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    /// Skills a vehicle must have to serve this job.
    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }
}
