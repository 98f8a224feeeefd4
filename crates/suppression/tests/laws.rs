//! Property tests for laws every suppression set obeys, whatever its members.

use proptest::prelude::*;
use suppression::{
    ChangeKind, FunctionSuppression, Offset, OffsetRange, Pattern, SuppressionBase,
    SuppressionSet, TypeSuppression, VariableSuppression, generate_from_strings,
    read_suppressions_from_str,
};
use test_support::{
    class_diff, foo_context, function_symbol, struct_insertion_diff, struct_type, void_function,
};

const MEMBER_NAMES: [&str; 5] = ["a", "b", "c", "d", "e"];

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

fn type_sections() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            name().prop_map(|n| format!("[suppress_type]\nname = {n}\n")),
            name().prop_map(|n| format!("[suppress_type]\nname_regexp = ^{n}\n")),
            name().prop_map(|n| {
                format!("[suppress_type]\ntype_kind = struct\nname_not_regexp = ^{n}$\n")
            }),
        ],
        0..6,
    )
}

fn same_struct_diff(name: &str) -> ir::Diff {
    class_diff(struct_type(name, &[("x", 0)]), struct_type(name, &[("x", 0)]))
}

fn binary_only_base() -> SuppressionBase {
    SuppressionBase::default()
        .with_file_name_regex(Pattern::compile("libfoo").unwrap())
        .with_soname_regex(Pattern::compile("^libfoo").unwrap())
}

// ============================================================================
// Set laws
// ============================================================================

proptest! {
    /// Reading the same text twice yields equal sets giving equal answers.
    #[test]
    fn reading_is_deterministic(sections in type_sections(), subject in name()) {
        let text = sections.concat();
        let first = read_suppressions_from_str(&text).unwrap().into_suppressions();
        let second = read_suppressions_from_str(&text).unwrap().into_suppressions();
        prop_assert_eq!(&first, &second);

        let diff = same_struct_diff(&subject);
        prop_assert_eq!(first.suppresses_diff(&diff, None), second.suppresses_diff(&diff, None));
        prop_assert_eq!(first.suppresses_diff(&diff, None), first.suppresses_diff(&diff, None));
    }

    /// The order of members never changes an answer.
    #[test]
    fn member_order_is_irrelevant(sections in type_sections(), subject in name()) {
        let set = read_suppressions_from_str(&sections.concat()).unwrap().into_suppressions();
        let reversed: SuppressionSet = set.iter().rev().cloned().collect();

        let diff = same_struct_diff(&subject);
        prop_assert_eq!(set.suppresses_diff(&diff, None), reversed.suppresses_diff(&diff, None));
        prop_assert_eq!(
            set.type_is_suppressed(&subject, None, false),
            reversed.type_is_suppressed(&subject, None, false)
        );
    }

    /// Merging is a union: a merged set suppresses exactly what either part
    /// suppresses.
    #[test]
    fn merge_is_union(left in type_sections(), right in type_sections(), subject in name()) {
        let left = read_suppressions_from_str(&left.concat()).unwrap().into_suppressions();
        let right = read_suppressions_from_str(&right.concat()).unwrap().into_suppressions();
        let merged = left.merge(&right);
        prop_assert_eq!(merged.len(), left.len() + right.len());

        let diff = same_struct_diff(&subject);
        prop_assert_eq!(
            merged.suppresses_diff(&diff, None),
            left.suppresses_diff(&diff, None) || right.suppresses_diff(&diff, None)
        );
    }

    /// Suppressions restricted only to binaries suppress nothing.
    #[test]
    fn binary_only_suppressions_are_inert(subject in name(), symbol in name()) {
        let ctxt = foo_context();
        let ty = TypeSuppression::new().with_base(binary_only_base());
        let function = FunctionSuppression::new().with_base(binary_only_base());
        let variable = VariableSuppression::new().with_base(binary_only_base());

        let diff = same_struct_diff(&subject);
        prop_assert!(!ty.suppresses_diff(&diff, Some(&ctxt)));
        prop_assert!(!ty.matches_type_name_or_location(&subject, None));

        let decl = void_function(&subject, Some(function_symbol(&symbol, &[])));
        prop_assert!(!function.suppresses_function(&decl, ChangeKind::ALL, Some(&ctxt)));
        prop_assert!(!function.matches_name(&subject));
        prop_assert!(!function.matches_symbol_name(&symbol));
        prop_assert!(!variable.matches_name(&subject));
        prop_assert!(!variable.matches_symbol_name(&symbol));

        let set = SuppressionSet::new(vec![ty.into(), function.into(), variable.into()]);
        prop_assert!(!set.suppresses_diff(&diff, Some(&ctxt)));
        prop_assert!(!set.function_is_suppressed(&subject, &symbol, false));
        prop_assert!(!set.variable_is_suppressed(&subject, &symbol, false));
        prop_assert!(!set.type_is_suppressed(&subject, None, false).is_suppressed());
    }
}

// ============================================================================
// Patterns and offsets
// ============================================================================

proptest! {
    /// A generated alternation matches exactly the listed strings.
    #[test]
    fn generated_pattern_matches_exactly(
        listed in prop::collection::btree_set("[ -~]{1,10}", 1..6),
        probe in "[ -~]{1,10}",
    ) {
        let pattern = Pattern::compile(&generate_from_strings(&listed)).unwrap();
        for s in &listed {
            prop_assert!(pattern.is_match(s), "{}", s);
        }
        prop_assert_eq!(pattern.is_match(&probe), listed.contains(&probe));
    }

    /// `{end, end}` tolerates exactly the members appended after the last one.
    #[test]
    fn end_range_tolerates_appended_members(count in 1usize..=5, inserted in 0u64..512) {
        let members: Vec<(&str, u64)> = MEMBER_NAMES[..count]
            .iter()
            .zip((0u64..).step_by(64))
            .map(|(n, off)| (*n, off))
            .collect();
        let last = members[count - 1].1;
        let diff = struct_insertion_diff("S", &members, &[("x", inserted)]);

        let s = TypeSuppression::new()
            .with_name("S")
            .with_insertion_range(OffsetRange::new(Offset::End, Offset::End));
        prop_assert_eq!(s.suppresses_diff(&diff, None), inserted > last);
    }
}
