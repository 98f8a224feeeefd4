use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::ValueError;
use crate::property::keyword;

/// The kinds of change a function or variable suppression applies to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ChangeKind(u8);

impl ChangeKind {
    /// No change kind at all.
    pub const NONE: Self = Self(0);
    /// A change in the type of the artifact or of something it reaches.
    pub const SUBTYPE: Self = Self(1);
    /// The artifact was added.
    pub const ADDED: Self = Self(1 << 1);
    /// The artifact was deleted.
    pub const DELETED: Self = Self(1 << 2);
    /// Every kind of change.
    pub const ALL: Self = Self(Self::SUBTYPE.0 | Self::ADDED.0 | Self::DELETED.0);

    /// Returns `true` when `self` and `other` share a kind.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` when `self` includes every kind in `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub(crate) fn parse_function(text: &str) -> Result<Self, ValueError> {
        keyword(
            text,
            &[
                ("function-subtype-change", Self::SUBTYPE),
                ("added-function", Self::ADDED),
                ("deleted-function", Self::DELETED),
                ("all", Self::ALL),
            ],
            "function-subtype-change, added-function, deleted-function, all",
        )
    }

    pub(crate) fn parse_variable(text: &str) -> Result<Self, ValueError> {
        keyword(
            text,
            &[
                ("variable-subtype-change", Self::SUBTYPE),
                ("added-variable", Self::ADDED),
                ("deleted-variable", Self::DELETED),
                ("all", Self::ALL),
            ],
            "variable-subtype-change, added-variable, deleted-variable, all",
        )
    }
}

impl Default for ChangeKind {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ChangeKind {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChangeKind {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::SUBTYPE, "subtype-change"),
            (Self::ADDED, "added"),
            (Self::DELETED, "deleted"),
        ]
        .into_iter()
        .filter(|(kind, _)| self.contains(*kind))
        .map(|(_, name)| name)
        .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_algebra() {
        assert!(ChangeKind::ALL.contains(ChangeKind::ADDED | ChangeKind::DELETED));
        assert!(ChangeKind::ADDED.intersects(ChangeKind::ALL));
        assert!(!ChangeKind::ADDED.intersects(ChangeKind::DELETED));
        assert!(!ChangeKind::NONE.intersects(ChangeKind::ALL));
        assert_eq!(ChangeKind::default(), ChangeKind::ALL);
    }

    #[test]
    fn keywords_per_artifact() {
        assert_eq!(ChangeKind::parse_function("added-function"), Ok(ChangeKind::ADDED));
        assert_eq!(ChangeKind::parse_variable("deleted-variable"), Ok(ChangeKind::DELETED));
        assert!(ChangeKind::parse_function("added-variable").is_err());
        assert_eq!(ChangeKind::parse_variable("all"), Ok(ChangeKind::ALL));
    }

    #[test]
    fn display() {
        assert_eq!(ChangeKind::ALL.to_string(), "subtype-change|added|deleted");
        assert_eq!(ChangeKind::NONE.to_string(), "none");
    }
}
