//! The outcome of filtering a single message.

use std::fmt;

/// Whether a message continues downstream.
///
/// Converts losslessly to and from `bool`, where `true` means retain.
///
/// # Examples
///
/// ```
/// use filter_processor::filter::domain::Verdict;
///
/// assert_eq!(Verdict::from(true), Verdict::Retain);
/// assert!(!bool::from(Verdict::Discard));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Forward the message.
    Retain,
    /// Drop the message.
    Discard,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Retain`].
    #[must_use]
    pub const fn is_retained(self) -> bool {
        matches!(self, Self::Retain)
    }

    /// Returns `true` for [`Verdict::Discard`].
    #[must_use]
    pub const fn is_discarded(self) -> bool {
        matches!(self, Self::Discard)
    }
}

impl From<bool> for Verdict {
    fn from(retain: bool) -> Self {
        if retain { Self::Retain } else { Self::Discard }
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> Self {
        verdict.is_retained()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => f.write_str("retain"),
            Self::Discard => f.write_str("discard"),
        }
    }
}
