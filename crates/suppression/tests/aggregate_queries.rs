//! Integration tests for the queries a binary reader and a diff reporter put
//! to a whole set of suppressions.

use ir::{
    CorpusInfo, Diff, ElfSymbol, FunctionDecl, FunctionType, Location, SymbolKind, VarDecl, VarDiff,
};
use suppression::{
    ChangeKind, ReadError, SuppressionSet, TypeVerdict, private_types_suppression,
    read_suppression_files, read_suppressions_from_file, read_suppressions_from_str,
};
use test_support::{
    builtin, int, method, pointer_to, struct_type, suppression_file, void_function,
};

fn read(text: &str) -> SuppressionSet {
    read_suppressions_from_str(text)
        .unwrap()
        .into_result()
        .unwrap()
}

// ============================================================================
// Reader queries
// ============================================================================

/// Functions are matched by name or by linkage name.
#[test]
fn function_query_by_name_or_linkage_name() {
    let set = read(
        "[suppress_function]\nname_regexp = ^internal_\n\
         [suppress_function]\nsymbol_name = _Z5helperv\n",
    );
    assert!(set.function_is_suppressed("internal_init", "", false));
    assert!(set.function_is_suppressed("helper", "_Z5helperv", false));
    assert!(!set.function_is_suppressed("public_init", "public_init", false));
    assert!(!set.function_is_suppressed("", "", false));
}

/// Only dropping suppressions count when the reader asks for them.
#[test]
fn require_drop_filters_members() {
    let set = read(
        "[suppress_variable]\nname = kept_var\n\
         [suppress_variable]\nname = dropped_var\ndrop = yes\n",
    );
    assert!(set.variable_is_suppressed("kept_var", "", false));
    assert!(!set.variable_is_suppressed("kept_var", "", true));
    assert!(set.variable_is_suppressed("dropped_var", "", true));
}

/// Type verdicts tell user suppressions from the private-types one.
#[test]
fn type_verdicts() {
    let user = read("[suppress_type]\nname = Internal\n");
    let set = user.merge(&SuppressionSet::new(vec![
        private_types_suppression(["/inc/api.h"]).into(),
    ]));

    assert_eq!(set.type_is_suppressed("Internal", None, false), TypeVerdict::Suppressed);

    let private = Location::new("/src/impl.h", 3, 1);
    let verdict = set.type_is_suppressed("Impl", Some(&private), false);
    assert_eq!(verdict, TypeVerdict::SuppressedAsPrivate);
    assert!(verdict.is_suppressed() && verdict.is_private());

    let public = Location::new("/inc/api.h", 3, 1);
    assert_eq!(set.type_is_suppressed("Api", Some(&public), false), TypeVerdict::Kept);

    let system = Location::new("/usr/include/stdio.h", 3, 1);
    assert_eq!(set.type_is_suppressed("FILE", Some(&system), true), TypeVerdict::Kept);
}

/// ELF symbols are dropped only by dropping suppressions of their kind.
#[test]
fn elf_symbol_suppression() {
    let set = read(
        "[suppress_function]\nsymbol_name_regexp = ^__internal\ndrop = yes\n\
         [suppress_variable]\nsymbol_name = debug_flags\n",
    );
    assert!(set.is_elf_symbol_suppressed("__internal_fn", SymbolKind::Function));
    assert!(!set.is_elf_symbol_suppressed("__internal_fn", SymbolKind::Variable));
    assert!(!set.is_elf_symbol_suppressed("debug_flags", SymbolKind::Variable));
    assert!(!set.is_elf_symbol_suppressed("__internal_fn", SymbolKind::Other));
}

/// File suppressions compare the base name of the path.
#[test]
fn file_query_uses_base_name() {
    let set = read("[suppress_file]\nlabel = test binaries\nfile_name_regexp = ^test_\n");
    let hit = set.file_is_suppressed("/opt/bin/test_runner").unwrap();
    assert_eq!(hit.base().label(), "test binaries");
    assert!(set.file_is_suppressed("/opt/test_dir/runner").is_none());
    assert!(set.file_is_suppressed("").is_none());
}

/// Members whose binary criteria rule a corpus out are filtered away.
#[test]
fn applicable_to_corpus() {
    let set = read(
        "[suppress_type]\nname = A\nsoname_regexp = ^libfoo\n\
         [suppress_type]\nname = B\nsoname_regexp = ^libbar\n\
         [suppress_type]\nname = C\n",
    );
    let foo = set.applicable_to(&CorpusInfo::new("/usr/lib/libfoo.so.1", "libfoo.so.1"));
    let names: Vec<_> = foo
        .iter()
        .filter_map(|s| s.as_type())
        .map(|s| s.type_name())
        .collect();
    assert_eq!(names, ["A", "C"]);
}

// ============================================================================
// Functions and variables
// ============================================================================

/// `change_kind` restricts a suppression to additions, deletions or changes.
#[test]
fn function_change_kinds() {
    let set = read("[suppress_function]\nname = f\nchange_kind = added-function\n");
    let s = set.suppressions()[0].as_function().unwrap();
    let f = void_function("f", None);
    assert!(s.suppresses_function(&f, ChangeKind::ADDED, None));
    assert!(!s.suppresses_function(&f, ChangeKind::DELETED, None));
    assert!(!s.suppresses_function(&f, ChangeKind::SUBTYPE, None));
}

/// Parameters are counted from the first explicit one.
#[test]
fn parameter_specs_skip_this() {
    let class = struct_type("C", &[("x", 0)]);
    let m = method(&class, "set", &[int(), pointer_to(builtin("char", 8))]);

    let set = read("[suppress_function]\nparameter = '1 char*\n");
    let s = set.suppressions()[0].as_function().unwrap();
    assert!(s.suppresses_function(&m, ChangeKind::SUBTYPE, None));

    let set = read("[suppress_function]\nparameter = '0 /^unsigned/\n");
    let s = set.suppressions()[0].as_function().unwrap();
    assert!(!s.suppresses_function(&m, ChangeKind::SUBTYPE, None));
}

/// Every listed parameter constraint must hold.
#[test]
fn repeated_parameter_specs() {
    let class = struct_type("C", &[("x", 0)]);
    let m = method(&class, "set", &[int(), int()]);
    let set = read("[suppress_function]\nparameter = '0 int\nparameter = '1 long\n");
    let s = set.suppressions()[0].as_function().unwrap();
    assert_eq!(s.parameter_specs().len(), 2);
    assert!(!s.suppresses_function(&m, ChangeKind::SUBTYPE, None));
}

/// A function without return type returns `void`.
#[test]
fn void_return_type() {
    let set = read("[suppress_function]\nreturn_type_name = void\n");
    let s = set.suppressions()[0].as_function().unwrap();
    assert!(s.suppresses_function(&void_function("f", None), ChangeKind::SUBTYPE, None));

    let returns_int = FunctionDecl::new("g", FunctionType::new(Some(int())));
    assert!(!s.suppresses_function(&returns_int, ChangeKind::SUBTYPE, None));
}

/// Added or deleted symbols without debug information are matched by name
/// and version.
#[test]
fn symbol_only_changes() {
    let set = read("[suppress_function]\nsymbol_name_regexp = ^old_\nsymbol_version = V1\n");
    let s = set.suppressions()[0].as_function().unwrap();
    let v1 = ElfSymbol::function("old_api").with_version("V1");
    let v2 = ElfSymbol::function("old_api").with_version("V2");
    assert!(s.suppresses_function_symbol(&v1, ChangeKind::DELETED, None));
    assert!(!s.suppresses_function_symbol(&v2, ChangeKind::DELETED, None));
    let variable = ElfSymbol::variable("old_api");
    assert!(!s.suppresses_function_symbol(&variable, ChangeKind::ADDED, None));
}

/// A suppression about names alone says nothing of symbol-only changes.
#[test]
fn name_only_suppression_ignores_symbols() {
    let set = read("[suppress_function]\nname = old_api\n");
    let s = set.suppressions()[0].as_function().unwrap();
    let symbol = ElfSymbol::function("old_api");
    assert!(!s.suppresses_function_symbol(&symbol, ChangeKind::ADDED, None));
}

/// A variable diff is hidden when either version is selected.
#[test]
fn variable_diff() {
    let set = read("[suppress_variable]\nname_regexp = ^cache_\ntype_name = int\n");
    let old = VarDecl::new("cache_size", int());
    let new = VarDecl::new("cache_size", builtin("long", 64));
    assert!(set.suppresses_diff(&Diff::Var(VarDiff::new(old, new.clone())), None));
    assert!(!set.suppresses_diff(&Diff::Var(VarDiff::new(new.clone(), new)), None));
}

// ============================================================================
// Files
// ============================================================================

/// Suppressions are read from files on disk.
#[test]
fn reads_suppression_file() {
    let file = suppression_file("# generated\n[suppress_function]\n  name = f\n");
    let report = read_suppressions_from_file(file.path()).unwrap();
    assert!(report.succeeded());
    assert!(report.suppressions().function_is_suppressed("f", "", false));
}

/// Several files are read in order, rejected sections included.
#[test]
fn reads_several_files() {
    let first = suppression_file("[suppress_type]\nname = A\n");
    let second =
        suppression_file("[suppress_type]\nlabel = only a label\n[suppress_type]\nname = B\n");
    let report = read_suppression_files([first.path(), second.path()]).unwrap();

    assert_eq!(report.errors().len(), 1);
    let names: Vec<_> = report
        .suppressions()
        .iter()
        .filter_map(|s| s.as_type())
        .map(|s| s.type_name())
        .collect();
    assert_eq!(names, ["A", "B"]);
    assert!(matches!(report.into_result(), Err(ReadError::Sections(errors)) if errors.len() == 1));
}

/// A missing file aborts reading with the document error.
#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_suppressions_from_file(&dir.path().join("absent.abignore")).unwrap_err();
    assert!(matches!(err, ReadError::Config(_)));
}
