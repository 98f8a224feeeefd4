//! Table-driven conversion of ini sections into suppressions.
//!
//! Each suppression kind declares a table of the properties it understands.
//! Reading a section checks it against the table (unknown, repeated and
//! identifying properties) and then applies the properties in table order,
//! so the result never depends on the order they were written in.

use ini::{Property, PropertyValue, Section};

use crate::base::SuppressionBase;
use crate::error::{SectionError, SectionErrorKind, SuppressionWarning, ValueError};
use crate::pattern::{Pattern, parse_boolean};

/// How a property value is stored into a suppression under construction.
pub(crate) enum Setter<T> {
    /// A single string.
    Text(fn(&mut T, String)),
    /// A single pattern; one that fails to compile is dropped with a warning.
    Pattern(fn(&mut T, Pattern)),
    /// A boolean.
    Flag(fn(&mut T, bool)),
    /// A string or a list, as words.
    Words(fn(&mut T, Vec<String>)),
    /// Anything else.
    Custom(fn(&mut T, &PropertyValue) -> Result<(), ValueError>),
}

pub(crate) struct PropertyInfo<T> {
    pub(crate) name: &'static str,
    /// The property alone identifies what the section suppresses.
    pub(crate) sufficient: bool,
    pub(crate) repeatable: bool,
    pub(crate) setter: Setter<T>,
}

/// Builds a [`PropertyInfo`] literal.
macro_rules! property {
    ($name:literal, $setter:expr) => {
        $crate::property::PropertyInfo {
            name: $name,
            sufficient: false,
            repeatable: false,
            setter: $setter,
        }
    };
    ($name:literal, $setter:expr, sufficient) => {
        $crate::property::PropertyInfo {
            name: $name,
            sufficient: true,
            repeatable: false,
            setter: $setter,
        }
    };
    ($name:literal, $setter:expr, sufficient, repeatable) => {
        $crate::property::PropertyInfo {
            name: $name,
            sufficient: true,
            repeatable: true,
            setter: $setter,
        }
    };
}
pub(crate) use property;

pub(crate) trait HasBase {
    fn base_mut(&mut self) -> &mut SuppressionBase;
}

/// The properties every kind shares.
///
/// `drop` precedes `drop_artifact` so that the latter wins when both are set.
fn base_properties<T: HasBase>(file_criteria_sufficient: bool) -> [PropertyInfo<T>; 7] {
    [
        PropertyInfo {
            name: "label",
            sufficient: false,
            repeatable: false,
            setter: Setter::Text(|s: &mut T, v| s.base_mut().label = v),
        },
        PropertyInfo {
            name: "file_name_regexp",
            sufficient: file_criteria_sufficient,
            repeatable: false,
            setter: Setter::Pattern(|s: &mut T, p| s.base_mut().file_name_regex = Some(p)),
        },
        PropertyInfo {
            name: "file_name_not_regexp",
            sufficient: file_criteria_sufficient,
            repeatable: false,
            setter: Setter::Pattern(|s: &mut T, p| s.base_mut().file_name_not_regex = Some(p)),
        },
        PropertyInfo {
            name: "soname_regexp",
            sufficient: file_criteria_sufficient,
            repeatable: false,
            setter: Setter::Pattern(|s: &mut T, p| s.base_mut().soname_regex = Some(p)),
        },
        PropertyInfo {
            name: "soname_not_regexp",
            sufficient: file_criteria_sufficient,
            repeatable: false,
            setter: Setter::Pattern(|s: &mut T, p| s.base_mut().soname_not_regex = Some(p)),
        },
        PropertyInfo {
            name: "drop",
            sufficient: false,
            repeatable: false,
            setter: Setter::Flag(|s: &mut T, b| s.base_mut().drops_artifact = b),
        },
        PropertyInfo {
            name: "drop_artifact",
            sufficient: false,
            repeatable: false,
            setter: Setter::Flag(|s: &mut T, b| s.base_mut().drops_artifact = b),
        },
    ]
}

/// Converts `section` using the shared properties followed by `kind_table`.
pub(crate) fn read_section<T: Default + HasBase>(
    section: &Section,
    kind_table: &[PropertyInfo<T>],
    file_criteria_sufficient: bool,
    warnings: &mut Vec<SuppressionWarning>,
) -> Result<T, SectionError> {
    let base = base_properties::<T>(file_criteria_sufficient);
    let table: Vec<&PropertyInfo<T>> = base.iter().chain(kind_table).collect();
    let fail = |kind| SectionError::new(section, kind);

    if let Some(unknown) = section
        .properties()
        .iter()
        .find(|p| !table.iter().any(|info| info.name == p.name()))
    {
        return Err(fail(SectionErrorKind::UnknownProperty {
            name: unknown.name().to_owned(),
            line: unknown.line(),
        }));
    }

    for info in table.iter().filter(|info| !info.repeatable) {
        let mut occurrences = section.properties_named(info.name);
        if let (Some(first), Some(second)) = (occurrences.next(), occurrences.next()) {
            return Err(fail(SectionErrorKind::RepeatedProperty {
                name: info.name.to_owned(),
                line: second.line(),
                first_line: first.line(),
            }));
        }
    }

    if !table
        .iter()
        .any(|info| info.sufficient && section.find_property(info.name).is_some())
    {
        let expected: Vec<&str> = table
            .iter()
            .filter(|info| info.sufficient)
            .map(|info| info.name)
            .collect();
        return Err(fail(SectionErrorKind::MissingSufficientProperty {
            expected: expected.join(", "),
        }));
    }

    let mut target = T::default();
    for info in &table {
        for property in section.properties_named(info.name) {
            apply(info, property, &mut target, section, warnings).map_err(|source| {
                fail(SectionErrorKind::InvalidValue {
                    name: info.name.to_owned(),
                    line: property.line(),
                    source,
                })
            })?;
        }
    }
    Ok(target)
}

fn apply<T>(
    info: &PropertyInfo<T>,
    property: &Property,
    target: &mut T,
    section: &Section,
    warnings: &mut Vec<SuppressionWarning>,
) -> Result<(), ValueError> {
    let value = property.value();
    match info.setter {
        Setter::Text(set) => set(target, simple(value)?.to_owned()),
        Setter::Pattern(set) => {
            let text = simple(value)?;
            match Pattern::compile(text) {
                Some(pattern) => set(target, pattern),
                None => {
                    warnings.push(SuppressionWarning::PatternDropped {
                        section: section.name().to_owned(),
                        line: property.line(),
                        property: info.name.to_owned(),
                        pattern: text.to_owned(),
                    });
                }
            }
        }
        Setter::Flag(set) => {
            let text = simple(value)?;
            let flag =
                parse_boolean(text).ok_or_else(|| ValueError::InvalidBoolean(text.to_owned()))?;
            set(target, flag);
        }
        Setter::Words(set) => {
            let words = value
                .to_words()
                .ok_or_else(|| ValueError::NotWords(value.to_string()))?;
            set(target, words.into_iter().filter(|w| !w.is_empty()).collect());
        }
        Setter::Custom(set) => set(target, value)?,
    }
    Ok(())
}

/// Returns the value as a single string.
pub(crate) fn simple(value: &PropertyValue) -> Result<&str, ValueError> {
    value
        .as_str()
        .ok_or_else(|| ValueError::NotSimple(value.to_string()))
}

/// Matches `text` against a fixed vocabulary.
pub(crate) fn keyword<K: Copy>(
    text: &str,
    vocabulary: &[(&str, K)],
    expected: &'static str,
) -> Result<K, ValueError> {
    vocabulary
        .iter()
        .find(|(word, _)| *word == text)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| ValueError::UnknownKeyword {
            value: text.to_owned(),
            expected,
        })
}
