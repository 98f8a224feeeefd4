#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `ini` tokenizes the ini-style documents that carry ABI suppression
//! specifications. It knows nothing about what the sections mean: it yields
//! named sections holding ordered, possibly repeated properties whose values
//! are simple strings, lists, or brace-delimited tuples.
//!
//! # Format
//!
//! ```ini
//! # comment
//! [suppress_type]
//!   name = Foo
//!   changed_enumerators = LAST, MAX
//!   has_data_member_inserted_between = {offset_of(a), end}
//!
//! [abi_whitelist]
//!   some_symbol
//! ```
//!
//! # Invariants
//!
//! - Lines are trimmed; blank lines and lines starting with `#` or `;` are
//!   skipped.
//! - Sections and properties keep input order, and both may repeat.
//! - A line without `=` inside a section is a property with an empty value.
//!
//! # Errors
//!
//! [`ConfigError`] reports I/O failures and malformed input (a property before
//! the first section, an unterminated header, an unclosed tuple or quote),
//! with the 1-based line number and, for [`Config::from_file`], the path.
//!
//! # Examples
//!
//! ```
//! use ini::{Config, PropertyValue};
//!
//! let config = Config::parse("[suppress_type]\nname = Foo\n").unwrap();
//! let section = &config.sections()[0];
//! assert_eq!(section.name(), "suppress_type");
//! assert_eq!(
//!     section.find_property("name").map(|p| p.value()),
//!     Some(&PropertyValue::String("Foo".into()))
//! );
//! ```

mod document;
mod error;
mod expr;
mod value;

pub use document::{Config, Property, Section};
pub use error::{ConfigError, ConfigErrorKind};
pub use expr::FunctionCallExpr;
pub use value::PropertyValue;
