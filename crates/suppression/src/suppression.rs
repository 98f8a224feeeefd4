use ini::Section;
use ir::{Diff, DiffContext};

use crate::base::SuppressionBase;
use crate::error::{SectionError, SectionErrorKind, SuppressionWarning};
use crate::file_suppression::FileSuppression;
use crate::function_suppression::FunctionSuppression;
use crate::type_suppression::TypeSuppression;
use crate::variable_suppression::VariableSuppression;

/// One suppression specification, of any kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Suppression {
    /// `[suppress_type]`.
    Type(TypeSuppression),
    /// `[suppress_function]`.
    Function(FunctionSuppression),
    /// `[suppress_variable]`.
    Variable(VariableSuppression),
    /// `[suppress_file]`.
    File(FileSuppression),
}

impl Suppression {
    /// Converts one ini section.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] for an unknown section name, an unknown or
    /// repeated property, a section with no identifying property, or a value
    /// that cannot be converted. Invalid patterns are not errors: they are
    /// dropped and reported in `warnings`.
    pub fn from_section(
        section: &Section,
        warnings: &mut Vec<SuppressionWarning>,
    ) -> Result<Self, SectionError> {
        match section.name() {
            "suppress_type" => TypeSuppression::from_section(section, warnings).map(Self::Type),
            "suppress_function" => {
                FunctionSuppression::from_section(section, warnings).map(Self::Function)
            }
            "suppress_variable" => {
                VariableSuppression::from_section(section, warnings).map(Self::Variable)
            }
            "suppress_file" => FileSuppression::from_section(section, warnings).map(Self::File),
            _ => Err(SectionError::new(section, SectionErrorKind::UnknownSection)),
        }
    }

    /// Returns the section name of this kind.
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Type(_) => "suppress_type",
            Self::Function(_) => "suppress_function",
            Self::Variable(_) => "suppress_variable",
            Self::File(_) => "suppress_file",
        }
    }

    /// Returns the shared state.
    pub fn base(&self) -> &SuppressionBase {
        match self {
            Self::Type(s) => &s.base,
            Self::Function(s) => &s.base,
            Self::Variable(s) => &s.base,
            Self::File(s) => &s.base,
        }
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        self.base().label()
    }

    /// Returns `true` if matched artifacts are to be dropped from the IR.
    pub fn drops_artifact_from_ir(&self) -> bool {
        self.base().drops_artifact_from_ir()
    }

    /// Returns `true` for suppressions generated by tooling.
    pub fn is_artificial(&self) -> bool {
        self.base().is_artificial()
    }

    /// Returns `true` if this suppression hides the change carried by `diff`.
    ///
    /// File suppressions act before comparison and hide no diff.
    pub fn suppresses_diff(&self, diff: &Diff, ctxt: Option<&DiffContext>) -> bool {
        match self {
            Self::Type(s) => s.suppresses_diff(diff, ctxt),
            Self::Function(s) => s.suppresses_diff(diff, ctxt),
            Self::Variable(s) => s.suppresses_diff(diff, ctxt),
            Self::File(_) => false,
        }
    }

    /// Returns the type suppression, if this is one.
    pub fn as_type(&self) -> Option<&TypeSuppression> {
        match self {
            Self::Type(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the function suppression, if this is one.
    pub fn as_function(&self) -> Option<&FunctionSuppression> {
        match self {
            Self::Function(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the variable suppression, if this is one.
    pub fn as_variable(&self) -> Option<&VariableSuppression> {
        match self {
            Self::Variable(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the file suppression, if this is one.
    pub fn as_file(&self) -> Option<&FileSuppression> {
        match self {
            Self::File(s) => Some(s),
            _ => None,
        }
    }
}

impl From<TypeSuppression> for Suppression {
    fn from(s: TypeSuppression) -> Self {
        Self::Type(s)
    }
}

impl From<FunctionSuppression> for Suppression {
    fn from(s: FunctionSuppression) -> Self {
        Self::Function(s)
    }
}

impl From<VariableSuppression> for Suppression {
    fn from(s: VariableSuppression) -> Self {
        Self::Variable(s)
    }
}

impl From<FileSuppression> for Suppression {
    fn from(s: FileSuppression) -> Self {
        Self::File(s)
    }
}
