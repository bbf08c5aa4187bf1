//! Tagged resolver results

/// Result of a public resolver lookup.
///
/// Lookups always produce a usable value. When live registry data cannot be
/// obtained, the value is a hardcoded default and the result is tagged
/// [`Outcome::Fallback`] so callers can tell the difference without
/// inspecting logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Data obtained from the remote source during this session.
    Live(T),
    /// Fixed default substituted after a fetch or parse failure.
    Fallback(T),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Live(v) | Outcome::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Live(v) | Outcome::Fallback(v) => v,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Outcome::Live(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    /// Transforms the carried value, preserving the tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Live(v) => Outcome::Live(f(v)),
            Outcome::Fallback(v) => Outcome::Fallback(f(v)),
        }
    }
}
