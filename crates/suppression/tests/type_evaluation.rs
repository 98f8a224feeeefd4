//! Integration tests for type suppressions evaluated against diff trees.

use ir::{Diff, FunctionDeclDiff};
use suppression::{SuppressionSet, read_suppressions_from_str};
use test_support::{
    class_diff, const_diff, context, enum_diff, foo_context, method, pointer_diff,
    reference_diff, struct_at, struct_type, typedef_diff,
};

fn read(text: &str) -> SuppressionSet {
    read_suppressions_from_str(text)
        .unwrap()
        .into_result()
        .unwrap()
}

fn foo_change() -> Diff {
    class_diff(
        struct_type("Foo", &[("a", 0)]),
        struct_type("Foo", &[("a", 0), ("b", 32)]),
    )
}

// ============================================================================
// Reach kinds
// ============================================================================

/// `pointer` applies only to changes seen through a pointer.
#[test]
fn pointer_reach() {
    let set = read("[suppress_type]\nname = Foo\naccessed_through = pointer\n");
    assert!(set.suppresses_diff(&pointer_diff(foo_change()), None));
    assert!(!set.suppresses_diff(&foo_change(), None));
    assert!(!set.suppresses_diff(&reference_diff(foo_change()), None));
}

/// Qualifiers between the pointer and the pointee are looked through.
#[test]
fn pointer_reach_peels_qualifiers() {
    let set = read("[suppress_type]\nname = Foo\naccessed_through = pointer\n");
    assert!(set.suppresses_diff(&pointer_diff(const_diff(foo_change())), None));
}

/// `reference-or-pointer` accepts both wrappers.
#[test]
fn reference_or_pointer_reach() {
    let set = read("[suppress_type]\nname = Foo\naccessed_through = reference-or-pointer\n");
    assert!(set.suppresses_diff(&pointer_diff(foo_change()), None));
    assert!(set.suppresses_diff(&reference_diff(foo_change()), None));
    assert!(!set.suppresses_diff(&foo_change(), None));
}

/// `direct` is the same as no reach constraint on the changed type itself.
#[test]
fn direct_reach() {
    let set = read("[suppress_type]\nname = Foo\naccessed_through = direct\n");
    assert!(set.suppresses_diff(&foo_change(), None));
}

// ============================================================================
// Typedefs
// ============================================================================

/// A typedef is looked through when its own name does not match.
#[test]
fn typedef_is_peeled() {
    let set = read("[suppress_type]\nname = Foo\n");
    assert!(set.suppresses_diff(&typedef_diff("foo_t", foo_change()), None));

    let by_kind = read("[suppress_type]\ntype_kind = struct\nname = Foo\n");
    assert!(by_kind.suppresses_diff(&typedef_diff("foo_t", foo_change()), None));
}

/// Insertion ranges apply to the class behind a peeled typedef.
#[test]
fn insertion_ranges_apply_behind_typedef() {
    let set = read("[suppress_type]\nname = Foo\nhas_data_member_inserted_at = 0\n");
    assert!(!set.suppresses_diff(&typedef_diff("foo_t", foo_change()), None));
}

// ============================================================================
// Enumerators
// ============================================================================

/// A changed enumerator value is tolerated only when listed.
#[test]
fn changed_enumerators_must_be_listed() {
    let diff = enum_diff("E", &[("A", 0), ("B", 1)], &[("A", 0), ("B", 2)]);

    let unlisted = read("[suppress_type]\nname = E\n");
    assert!(!unlisted.suppresses_diff(&diff, None));

    let listed = read("[suppress_type]\ntype_kind = enum\nname = E\nchanged_enumerators = B\n");
    assert!(listed.suppresses_diff(&diff, None));

    let other = read("[suppress_type]\ntype_kind = enum\nname = E\nchanged_enumerators = A\n");
    assert!(!other.suppresses_diff(&diff, None));
}

/// The list is ignored unless the suppression is about enums.
#[test]
fn changed_enumerators_need_enum_kind() {
    let diff = enum_diff("E", &[("A", 0), ("B", 1)], &[("A", 0), ("B", 2)]);
    let set = read("[suppress_type]\nname = E\nchanged_enumerators = B\n");
    assert!(set.suppressions()[0].as_type().unwrap().changed_enumerator_names().is_empty());
    assert!(!set.suppresses_diff(&diff, None));
}

/// Deleting an enumerator puts the diff outside the enumerator rule.
#[test]
fn deleted_enumerator_skips_the_rule() {
    let diff = enum_diff("E", &[("A", 0), ("B", 1), ("C", 2)], &[("A", 0), ("B", 5)]);
    let set = read("[suppress_type]\nname = E\n");
    assert!(set.suppresses_diff(&diff, None));
}

// ============================================================================
// Virtual member functions
// ============================================================================

/// A vtable change of a member function is judged on its class.
#[test]
fn virtual_member_change_routes_to_class() {
    let class = struct_type("Widget", &[("x", 0)]);
    let diff = Diff::FunctionDecl(FunctionDeclDiff::new(
        method(&class, "draw", &[]).with_vtable_offset(1),
        method(&class, "draw", &[]).with_vtable_offset(2),
    ));

    assert!(read("[suppress_type]\nname = Widget\n").suppresses_diff(&diff, None));
    assert!(!read("[suppress_type]\nname = Gadget\n").suppresses_diff(&diff, None));
}

/// A non-virtual member function change is not a type change.
#[test]
fn non_virtual_member_change_is_ignored() {
    let class = struct_type("Widget", &[("x", 0)]);
    let diff = Diff::FunctionDecl(FunctionDeclDiff::new(
        method(&class, "draw", &[]),
        method(&class, "draw", &[]),
    ));
    assert!(!read("[suppress_type]\nname = Widget\n").suppresses_diff(&diff, None));
}

// ============================================================================
// Binaries and locations
// ============================================================================

/// Soname and file name patterns restrict the compared binaries.
#[test]
fn binary_criteria_follow_the_context() {
    let by_soname = read("[suppress_type]\nname = Foo\nsoname_regexp = ^libfoo\\.so\n");
    let bar = context(
        ("/usr/lib/libbar.so.1.0", "libbar.so.1"),
        ("/usr/lib/libbar.so.1.1", "libbar.so.1"),
    );
    assert!(by_soname.suppresses_diff(&foo_change(), Some(&foo_context())));
    assert!(!by_soname.suppresses_diff(&foo_change(), Some(&bar)));
    assert!(by_soname.suppresses_diff(&foo_change(), None));

    let not_foo = read("[suppress_type]\nname = Foo\nfile_name_not_regexp = libfoo\n");
    assert!(!not_foo.suppresses_diff(&foo_change(), Some(&foo_context())));
    assert!(not_foo.suppresses_diff(&foo_change(), Some(&bar)));
}

/// Types declared in a kept source file are never suppressed.
#[test]
fn kept_locations_are_exempt() {
    let set = read("[suppress_type]\nname_regexp = ^S$\nsource_location_not_in = public.h\n");

    let public = class_diff(struct_at("S", "/inc/public.h"), struct_at("S", "/inc/public.h"));
    assert!(!set.suppresses_diff(&public, None));

    let private = class_diff(struct_at("S", "/src/private.h"), struct_at("S", "/src/private.h"));
    assert!(set.suppresses_diff(&private, None));
}

/// Kept locations may also be given as a path pattern.
#[test]
fn kept_location_pattern() {
    let set = read("[suppress_type]\nsource_location_not_regexp = ^/inc/\n");

    let public = class_diff(struct_at("S", "/inc/a.h"), struct_at("S", "/inc/a.h"));
    assert!(!set.suppresses_diff(&public, None));

    let private = class_diff(struct_at("S", "/src/a.h"), struct_at("S", "/src/a.h"));
    assert!(set.suppresses_diff(&private, None));
}
