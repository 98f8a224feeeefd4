//! Fixtures shared by the workspace test suites.
//!
//! Builders here favour brevity over generality: members are `int`s unless a
//! type is given, sizes are derived from the last member, and contexts
//! describe two fictitious shared objects.

use std::io::Write;
use std::sync::Arc;

use ir::{
    BuiltinType, ClassDiff, ClassKind, ClassType, CorpusInfo, DataMember, Diff, DiffContext,
    ElfSymbol, EnumDiff, EnumType, FunctionDecl, FunctionType, Location, Parameter, PointerType,
    QualifiedType, ReferenceType, Type, TypeRef, TypePair, TypedefType, WrapperDiff,
};

/// Returns a 32-bit `int`.
pub fn int() -> TypeRef {
    builtin("int", 32)
}

/// Returns a builtin type.
pub fn builtin(name: &str, size_in_bits: u64) -> TypeRef {
    Arc::new(Type::Builtin(BuiltinType::new(name, size_in_bits)))
}

/// Builds a class-like type whose members are `int`s at the given bit offsets.
///
/// The size is the last offset plus 32, or 0 with no members.
pub fn class_like(kind: ClassKind, name: &str, members: &[(&str, u64)]) -> ClassType {
    let size = members.last().map_or(0, |(_, off)| off + 32);
    members.iter().fold(
        ClassType::new(kind, name).with_size_in_bits(size),
        |class, (member, offset)| class.with_data_member(DataMember::new(*member, int(), *offset)),
    )
}

/// Returns a struct of `int` members.
pub fn struct_type(name: &str, members: &[(&str, u64)]) -> TypeRef {
    Arc::new(Type::Class(class_like(ClassKind::Struct, name, members)))
}

/// Returns a union with no members.
pub fn union_type(name: &str) -> TypeRef {
    Arc::new(Type::Class(ClassType::new(ClassKind::Union, name).with_size_in_bits(32)))
}

/// Returns a struct declared at `path:1:1`.
pub fn struct_at(name: &str, path: &str) -> TypeRef {
    Arc::new(Type::Class(
        class_like(ClassKind::Struct, name, &[("x", 0)]).with_location(Location::new(path, 1, 1)),
    ))
}

/// Returns a class with no location, as an opaque type is seen.
pub fn opaque_class(name: &str) -> TypeRef {
    Arc::new(Type::Class(ClassType::new(ClassKind::Class, name)))
}

/// Returns a 32-bit enum with the given enumerators.
pub fn enum_type(name: &str, enumerators: &[(&str, i64)]) -> TypeRef {
    Arc::new(Type::Enum(enumerators.iter().fold(
        EnumType::new(name, 32),
        |e, (n, v)| e.with_enumerator(*n, *v),
    )))
}

/// Returns `typedef underlying name`.
pub fn typedef(name: &str, underlying: TypeRef) -> TypeRef {
    Arc::new(Type::Typedef(TypedefType::new(name, underlying)))
}

/// Returns a 64-bit pointer to `pointee`.
pub fn pointer_to(pointee: TypeRef) -> TypeRef {
    Arc::new(Type::Pointer(PointerType::new(pointee, 64)))
}

/// Returns an lvalue reference to `referenced`.
pub fn reference_to(referenced: TypeRef) -> TypeRef {
    Arc::new(Type::Reference(ReferenceType::new(referenced, true, 64)))
}

/// Returns `const underlying`.
pub fn const_of(underlying: TypeRef) -> TypeRef {
    Arc::new(Type::Qualified(QualifiedType::constant(underlying)))
}

/// Returns a diff of two builtin types.
pub fn base_diff(first: TypeRef, second: TypeRef) -> Diff {
    Diff::Base(TypePair::new(first, second))
}

/// Returns a class diff with no recorded member changes.
pub fn class_diff(first: TypeRef, second: TypeRef) -> Diff {
    Diff::Class(ClassDiff::new(first, second))
}

/// Returns the diff of a struct that gained `inserted` members.
///
/// The old version has `members`; the new one has both, ordered by offset.
pub fn struct_insertion_diff(
    name: &str,
    members: &[(&str, u64)],
    inserted: &[(&str, u64)],
) -> Diff {
    let mut all: Vec<(&str, u64)> = members.iter().chain(inserted).copied().collect();
    all.sort_by_key(|(_, off)| *off);
    let first = struct_type(name, members);
    let second = struct_type(name, &all);
    let diff = inserted.iter().fold(ClassDiff::new(first, second), |d, (n, off)| {
        d.with_inserted_data_member(DataMember::new(*n, int(), *off))
    });
    Diff::Class(diff)
}

/// Returns an enum diff computed from two enumerator lists.
pub fn enum_diff(name: &str, first: &[(&str, i64)], second: &[(&str, i64)]) -> Diff {
    Diff::Enum(EnumDiff::new(enum_type(name, first), enum_type(name, second)))
}

/// Wraps `underlying` in a pointer diff of pointers to its subjects.
pub fn pointer_diff(underlying: Diff) -> Diff {
    let (f, s) = subjects(&underlying);
    Diff::Pointer(WrapperDiff::new(pointer_to(f), pointer_to(s), underlying))
}

/// Wraps `underlying` in a reference diff.
pub fn reference_diff(underlying: Diff) -> Diff {
    let (f, s) = subjects(&underlying);
    Diff::Reference(WrapperDiff::new(reference_to(f), reference_to(s), underlying))
}

/// Wraps `underlying` in a `const` qualified diff.
pub fn const_diff(underlying: Diff) -> Diff {
    let (f, s) = subjects(&underlying);
    Diff::Qualified(WrapperDiff::new(const_of(f), const_of(s), underlying))
}

/// Wraps `underlying` in a typedef diff named `name`.
pub fn typedef_diff(name: &str, underlying: Diff) -> Diff {
    let (f, s) = subjects(&underlying);
    Diff::Typedef(WrapperDiff::new(typedef(name, f), typedef(name, s), underlying))
}

fn subjects(diff: &Diff) -> (TypeRef, TypeRef) {
    let (f, s) = diff
        .type_subjects()
        .expect("fixture wrappers take type diffs");
    (Arc::clone(f), Arc::clone(s))
}

/// Returns a context comparing two versions of `libfoo.so.1` under `/usr/lib`.
pub fn foo_context() -> DiffContext {
    context(("/usr/lib/libfoo.so.1.0", "libfoo.so.1"), ("/usr/lib/libfoo.so.1.1", "libfoo.so.1"))
}

/// Returns a context from `(path, soname)` pairs.
pub fn context(first: (&str, &str), second: (&str, &str)) -> DiffContext {
    DiffContext::new(
        CorpusInfo::new(first.0, first.1),
        CorpusInfo::new(second.0, second.1),
    )
}

/// Returns a function symbol with aliases.
pub fn function_symbol(name: &str, aliases: &[&str]) -> ElfSymbol {
    aliases
        .iter()
        .fold(ElfSymbol::function(name), |s, a| s.with_alias(*a))
}

/// Returns `void name()` bound to `symbol`.
pub fn void_function(name: &str, symbol: Option<ElfSymbol>) -> FunctionDecl {
    let decl = FunctionDecl::new(name, FunctionType::new(None));
    match symbol {
        Some(sym) => decl.with_symbol(sym),
        None => decl,
    }
}

/// Returns a method of `class` taking `params` after the implicit `this`.
pub fn method(class: &TypeRef, name: &str, params: &[TypeRef]) -> FunctionDecl {
    let mut ty = FunctionType::new(None)
        .with_class_type(Arc::clone(class))
        .with_parameter(Parameter::artificial("this", pointer_to(Arc::clone(class))));
    for (i, p) in params.iter().enumerate() {
        ty = ty.with_parameter(Parameter::new(format!("p{i}"), Arc::clone(p)));
    }
    FunctionDecl::new(name, ty).with_scope(class.name())
}

/// Writes `contents` to a fresh temporary file.
pub fn suppression_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".abignore")
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}
