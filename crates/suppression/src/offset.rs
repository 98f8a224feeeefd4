//! Bit offsets used by data member insertion ranges.

use std::fmt;
use std::str::FromStr;

use ini::{FunctionCallExpr, PropertyValue};
use ir::ClassType;

use crate::error::ValueError;

/// Sentinel bit offset denoting the end of a class.
pub const END: u64 = u64::MAX;

/// A boundary of an insertion range.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Offset {
    /// A literal bit offset.
    Bits(u64),
    /// The end of the class.
    End,
    /// `offset_of(member)`: where a data member starts.
    OffsetOf(String),
    /// `offset_after(member)`: where the data member following `member`
    /// starts, or the end of `member` when it is the last one.
    OffsetAfter(String),
}

impl Offset {
    /// Evaluates the offset against `class`.
    ///
    /// Returns `None` when a named member does not exist or is not laid out.
    pub fn eval(&self, class: &ClassType) -> Option<u64> {
        match self {
            Self::Bits(bits) => Some(*bits),
            Self::End => Some(END),
            Self::OffsetOf(member) => laid_out(class, member).map(|(_, m)| m.offset_in_bits()),
            Self::OffsetAfter(member) => {
                let (index, m) = laid_out(class, member)?;
                let next = class.data_members()[index + 1..]
                    .iter()
                    .find(|next| next.is_laid_out());
                Some(match next {
                    Some(next) => next.offset_in_bits(),
                    None => m.offset_in_bits() + m.ty().size_in_bits(),
                })
            }
        }
    }

    /// Returns `true` for [`Offset::End`].
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

fn laid_out<'a>(class: &'a ClassType, name: &str) -> Option<(usize, &'a ir::DataMember)> {
    class
        .data_members()
        .iter()
        .enumerate()
        .find(|(_, m)| m.name() == name)
        .filter(|(_, m)| m.is_laid_out())
}

impl FromStr for Offset {
    type Err = ValueError;

    /// Parses `end`, a decimal bit offset, `offset_of(member)` or
    /// `offset_after(member)`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let invalid = || ValueError::InvalidOffset(text.to_owned());
        if text == "end" {
            return Ok(Self::End);
        }
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return text.parse().map(Self::Bits).map_err(|_| invalid());
        }

        let call = FunctionCallExpr::parse(text).ok_or_else(invalid)?;
        let [member] = call.arguments() else {
            return Err(invalid());
        };
        match call.name() {
            "offset_of" => Ok(Self::OffsetOf(member.clone())),
            "offset_after" => Ok(Self::OffsetAfter(member.clone())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits(bits) => write!(f, "{bits}"),
            Self::End => f.write_str("end"),
            Self::OffsetOf(m) => write!(f, "offset_of({m})"),
            Self::OffsetAfter(m) => write!(f, "offset_after({m})"),
        }
    }
}

/// An inclusive range of bit offsets where data members may be inserted.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OffsetRange {
    begin: Offset,
    end: Offset,
}

impl OffsetRange {
    /// Creates a range.
    #[must_use]
    pub fn new(begin: Offset, end: Offset) -> Self {
        Self { begin, end }
    }

    /// A range holding the single offset `at`.
    #[must_use]
    pub fn at(at: Offset) -> Self {
        Self::new(at.clone(), at)
    }

    /// Returns the lower bound.
    pub fn begin(&self) -> &Offset {
        &self.begin
    }

    /// Returns the upper bound.
    pub fn end(&self) -> &Offset {
        &self.end
    }

    /// Parses the `{begin, end}` form of a property value.
    pub(crate) fn from_value(value: &PropertyValue) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidRange(value.to_string());
        let [PropertyValue::List(bounds)] = value.as_tuple().ok_or_else(invalid)? else {
            return Err(invalid());
        };
        let [begin, end] = bounds.as_slice() else {
            return Err(invalid());
        };
        Ok(Self::new(begin.parse()?, end.parse()?))
    }

    /// Parses the `{{begin, end}, ...}` form of a property value.
    pub(crate) fn list_from_value(value: &PropertyValue) -> Result<Vec<Self>, ValueError> {
        let ranges = value
            .as_tuple()
            .ok_or_else(|| ValueError::NotTuple(value.to_string()))?;
        ranges
            .iter()
            .map(|range| match range {
                PropertyValue::Tuple(_) => Self::from_value(range),
                other => Err(ValueError::InvalidRange(other.to_string())),
            })
            .collect()
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.begin, self.end)
    }
}
