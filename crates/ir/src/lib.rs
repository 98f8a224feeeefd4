#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `ir` is the slice of the ABI model that suppression evaluation reads:
//! types with their layout, function and variable declarations, ELF symbols
//! with aliases, source locations, and the diff nodes pairing two versions
//! of an artifact. Readers and the diff engine build these values; nothing
//! here mutates them afterwards.
//!
//! # Design
//!
//! - [`Type`] is a closed enum shared through [`TypeRef`] (`Arc<Type>`).
//! - [`Diff`] is a closed enum; wrapper diffs own the diff they wrap, so
//!   peeling qualifiers or typedefs always terminates.
//! - [`DiffContext`] names the two binaries under comparison by path and
//!   SONAME.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use ir::{BuiltinType, ClassKind, ClassType, DataMember, Type};
//!
//! let int = Arc::new(Type::Builtin(BuiltinType::new("int", 32)));
//! let foo = Type::Class(
//!     ClassType::new(ClassKind::Struct, "Foo")
//!         .with_scope("ns")
//!         .with_size_in_bits(64)
//!         .with_data_member(DataMember::new("a", Arc::clone(&int), 0))
//!         .with_data_member(DataMember::new("b", int, 32)),
//! );
//! assert_eq!(foo.name(), "ns::Foo");
//! assert!(foo.is_struct());
//! ```

mod decls;
mod diff;
mod location;
mod symbol;
mod types;

pub use decls::{FunctionDecl, VarDecl};
pub use diff::{
    ClassDiff, CorpusInfo, Diff, DiffContext, EnumDiff, FunctionDeclDiff, TypePair, VarDiff,
    WrapperDiff,
};
pub use location::Location;
pub use symbol::{ElfSymbol, SymbolKind};
pub use types::{
    ArrayType, BuiltinType, ClassKind, ClassType, DataMember, EnumType, Enumerator, FunctionType,
    Parameter, PointerType, QualifiedType, ReferenceType, Type, TypeRef, TypedefType,
    peel_typedef,
};
