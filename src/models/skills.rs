//! Skill sets stored as bitsets.

const WORD_BITS: u32 = u64::BITS;

/// A set of small integer skill tags.
///
/// Stored as a growable bitset so that the superset test used by the
/// compatibility check costs one AND per 64 skills.
///
/// # Examples
///
/// ```
/// use u_vrp::models::SkillSet;
///
/// let vehicle: SkillSet = [1, 5, 70].into_iter().collect();
/// let job: SkillSet = [5, 70].into_iter().collect();
/// assert!(job.is_subset(&vehicle));
/// assert!(!vehicle.is_subset(&job));
/// assert!(SkillSet::new().is_subset(&job));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkillSet {
    words: Vec<u64>,
}

impl SkillSet {
    /// Creates an empty skill set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill.
    pub fn insert(&mut self, skill: u32) {
        let word = (skill / WORD_BITS) as usize;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (skill % WORD_BITS);
    }

    /// Returns `true` if the skill is in the set.
    pub fn contains(&self, skill: u32) -> bool {
        let word = (skill / WORD_BITS) as usize;
        self.words
            .get(word)
            .is_some_and(|w| w & (1 << (skill % WORD_BITS)) != 0)
    }

    /// Returns `true` if the set holds no skill.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of skills in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if every skill of `self` is also in `other`.
    pub fn is_subset(&self, other: &SkillSet) -> bool {
        self.words.iter().enumerate().all(|(i, &w)| {
            let theirs = other.words.get(i).copied().unwrap_or(0);
            w & !theirs == 0
        })
    }

    /// Iterates over the skills in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS)
                .filter(move |bit| w & (1 << bit) != 0)
                .map(move |bit| i as u32 * WORD_BITS + bit)
        })
    }
}

impl FromIterator<u32> for SkillSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}
