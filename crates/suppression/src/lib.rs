#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `suppression` reads ABI change suppression specifications and answers,
//! for a diff node or an artifact met while reading a binary, whether a
//! specification hides it. Four kinds of specification exist, one per ini
//! section name: `[suppress_type]`, `[suppress_function]`,
//! `[suppress_variable]` and `[suppress_file]`.
//!
//! # Design
//!
//! - Each kind declares a table of the properties it understands. A section
//!   is checked against its table (unknown properties, repetitions, at least
//!   one identifying property) and then applied in table order, so the result
//!   is independent of the order properties were written in.
//! - [`Suppression`] is the closed sum of the four kinds. [`SuppressionSet`]
//!   is an immutable, cheaply cloneable ordered collection answering the
//!   aggregate queries ([`SuppressionSet::function_is_suppressed`],
//!   [`SuppressionSet::type_is_suppressed`], ...).
//! - Evaluation never mutates anything: the comparison context is passed
//!   explicitly as an optional [`ir::DiffContext`].
//!
//! # Invariants
//!
//! - Patterns use search semantics; anchor them to match whole names.
//! - Within a specification every present criterion must hold. Across a set,
//!   an artifact is suppressed when any member suppresses it.
//! - A specification with no file or soname pattern applies to every binary.
//! - `drop` without a name, symbol or location criterion is reset with a
//!   warning, so a section cannot drop everything by accident.
//!
//! # Errors
//!
//! Reading yields a [`ReadReport`]: rejected sections ([`SectionError`])
//! contribute nothing while their siblings are kept, and patterns that fail
//! to compile are dropped with a [`SuppressionWarning`]. [`ReadError`]
//! reports inputs that cannot be read or tokenized at all.
//!
//! # Examples
//!
//! ```
//! use suppression::{TypeVerdict, read_suppressions_from_str};
//!
//! let report = read_suppressions_from_str(
//!     "[suppress_type]\n  name_regexp = ^priv_\n\n[suppress_function]\n  symbol_name = init_internal\n",
//! )
//! .unwrap();
//! assert!(report.succeeded());
//!
//! let set = report.suppressions();
//! assert_eq!(set.type_is_suppressed("priv_state", None, false), TypeVerdict::Suppressed);
//! assert!(set.function_is_suppressed("", "init_internal", false));
//! assert!(!set.function_is_suppressed("", "init_public", false));
//! ```
//!
//! # Tracing
//!
//! With the `tracing` feature, reading and evaluation emit debug events under
//! the `abi::suppression` target; see [`debug_suppr`].

mod base;
mod change_kind;
pub mod debug_suppr;
mod error;
mod file_suppression;
mod function_suppression;
pub mod generate;
mod offset;
mod pattern;
mod property;
mod reader;
mod set;
mod suppression;
mod type_suppression;
mod variable_suppression;

pub use base::SuppressionBase;
pub use change_kind::ChangeKind;
pub use error::{ReadError, SectionError, SectionErrorKind, SuppressionWarning, ValueError};
pub use file_suppression::FileSuppression;
pub use function_suppression::{FunctionSuppression, ParameterSpec};
pub use generate::{
    KERNEL_ABI_WHITELIST_LABEL, kernel_abi_whitelist_suppressions,
    kernel_abi_whitelist_suppressions_from_files, private_types_suppression,
    private_types_suppression_from_dir,
};
pub use offset::{END, Offset, OffsetRange};
pub use pattern::{Pattern, escape, generate_from_strings, parse_boolean};
pub use reader::{
    ReadReport, read_suppression_files, read_suppressions, read_suppressions_from_file,
    read_suppressions_from_reader, read_suppressions_from_str,
};
pub use set::{SuppressionSet, TypeVerdict};
pub use suppression::Suppression;
pub use type_suppression::{PRIVATE_TYPES_LABEL, ReachKind, TypeKind, TypeSuppression};
pub use variable_suppression::VariableSuppression;
