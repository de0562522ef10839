use std::fmt;

use serde::{Deserialize, Serialize};

use crate::figure::Construction;

/// Which quantity shape a lemma rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LemmaGroup {
    /// `S_ABY`
    Area,
    /// `P_ABY`
    LinearPythagoras,
    /// `P_AYB`
    MiddlePythagoras,
    /// `AY / CD` and `AY / CY`
    Ratio,
}

/// Construction kinds that can be eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionKind {
    Intersection,
    Foot,
    PRatio,
    TRatio,
}

impl ConstructionKind {
    /// `None` for free points.
    #[must_use]
    pub fn of(construction: &Construction) -> Option<Self> {
        match construction {
            Construction::Free => None,
            Construction::Intersection { .. } => Some(ConstructionKind::Intersection),
            Construction::Foot { .. } => Some(ConstructionKind::Foot),
            Construction::PRatio { .. } => Some(ConstructionKind::PRatio),
            Construction::TRatio { .. } => Some(ConstructionKind::TRatio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lemma {
    pub group: LemmaGroup,
    pub kind: ConstructionKind,
}

impl Lemma {
    #[must_use]
    pub fn new(group: LemmaGroup, kind: ConstructionKind) -> Self {
        Lemma { group, kind }
    }

    /// Slot in the usage vector
    #[must_use]
    pub fn index(self) -> usize {
        let group = match self.group {
            LemmaGroup::Area => 0,
            LemmaGroup::LinearPythagoras => 1,
            LemmaGroup::MiddlePythagoras => 2,
            LemmaGroup::Ratio => 3,
        };
        let kind = match self.kind {
            ConstructionKind::Intersection => 0,
            ConstructionKind::Foot => 1,
            ConstructionKind::PRatio => 2,
            ConstructionKind::TRatio => 3,
        };
        4 * group + kind
    }
}

impl fmt::Display for Lemma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?} (#{})", self.group, self.kind, self.index())
    }
}

pub const LEMMA_SLOTS: usize = 16;

/// How often each lemma fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LemmaUsage {
    counts: [usize; LEMMA_SLOTS],
}

impl LemmaUsage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, lemma: Lemma) {
        self.counts[lemma.index()] += 1;
    }

    #[must_use]
    pub fn count(&self, lemma: Lemma) -> usize {
        self.counts[lemma.index()]
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.counts
    }

    /// Add the counts of `other`, e.g. of a nested proof.
    pub fn merge(&mut self, other: &LemmaUsage) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
    }
}
