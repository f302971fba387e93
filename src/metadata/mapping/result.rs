use crate::metadata::token::Token;

/// The outcome of resolving one source entity against the target model.
///
/// Exactly three states exist, and they are mutually exclusive by
/// construction: a unique target never carries candidates, and an ambiguous
/// outcome always carries at least one. Consumers branch on the variant;
/// they must not assume a unique target exists just because the result is
/// not [`Mapping::Unmapped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// No plausible target entity was found; the source entity was likely
    /// removed between versions
    Unmapped,
    /// Exactly one target entity was judged equivalent
    Unique(Token),
    /// One or more target entities match by name and scope but fail a finer
    /// equivalence check; each carries the reason the match is imperfect
    Ambiguous(Vec<Candidate>),
}

/// A plausible-but-imperfect match, paired with why it is imperfect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The target entity that matched by name and scope
    pub target: Token,
    /// A human-readable description of the failed finer check
    pub reason: String,
}

impl Mapping {
    /// A unique target outcome
    #[must_use]
    pub fn unique(target: Token) -> Self {
        Mapping::Unique(target)
    }

    /// An ambiguous outcome with a single candidate
    #[must_use]
    pub fn candidate(target: Token, reason: impl Into<String>) -> Self {
        Mapping::Ambiguous(vec![Candidate {
            target,
            reason: reason.into(),
        }])
    }

    /// An ambiguous outcome from an already-collected candidate list
    ///
    /// # Panics
    /// The candidate list must be non-empty; an empty list is the
    /// [`Mapping::Unmapped`] state and constructing it here is a caller bug
    #[must_use]
    pub fn ambiguous(candidates: Vec<Candidate>) -> Self {
        assert!(
            !candidates.is_empty(),
            "an ambiguous mapping requires at least one candidate"
        );
        Mapping::Ambiguous(candidates)
    }

    /// The unique target, None for unmapped and ambiguous outcomes
    #[must_use]
    pub fn target(&self) -> Option<Token> {
        match self {
            Mapping::Unique(target) => Some(*target),
            _ => None,
        }
    }

    /// True when no target entity was found
    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        matches!(self, Mapping::Unmapped)
    }

    /// The candidates of an ambiguous outcome, empty otherwise
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Mapping::Ambiguous(candidates) => candidates,
            _ => &[],
        }
    }
}
