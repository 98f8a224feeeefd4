use crate::location::Location;
use crate::symbol::ElfSymbol;
use crate::types::{FunctionType, TypeRef, scoped};

/// A function or method declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionDecl {
    name: String,
    scope: Option<String>,
    ty: FunctionType,
    symbol: Option<ElfSymbol>,
    location: Option<Location>,
    vtable_offset: Option<u64>,
}

impl FunctionDecl {
    /// Creates a non-virtual declaration with no symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FunctionType) -> Self {
        Self {
            name: name.into(),
            scope: None,
            ty,
            symbol: None,
            location: None,
            vtable_offset: None,
        }
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Binds the declaration to an ELF symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: ElfSymbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Marks the declaration as a virtual member function at `vtable_offset`.
    #[must_use]
    pub fn with_vtable_offset(mut self, vtable_offset: u64) -> Self {
        self.vtable_offset = Some(vtable_offset);
        self
    }

    /// Returns the unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the qualified name, e.g. `ns::C::f`.
    pub fn qualified_name(&self) -> String {
        scoped(self.scope.as_deref(), &self.name)
    }

    /// Returns the function type.
    pub fn ty(&self) -> &FunctionType {
        &self.ty
    }

    /// Returns the ELF symbol the declaration is bound to.
    pub fn symbol(&self) -> Option<&ElfSymbol> {
        self.symbol.as_ref()
    }

    /// Returns the declaration location.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Returns `true` for member functions.
    pub fn is_member_function(&self) -> bool {
        self.ty.class_type().is_some()
    }

    /// Returns the enclosing class of a member function.
    pub fn class_type(&self) -> Option<&TypeRef> {
        self.ty.class_type()
    }

    /// Returns `true` for virtual member functions.
    pub fn is_virtual(&self) -> bool {
        self.vtable_offset.is_some()
    }

    /// Returns the vtable slot of a virtual member function.
    pub fn vtable_offset(&self) -> Option<u64> {
        self.vtable_offset
    }
}

/// A variable declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VarDecl {
    name: String,
    scope: Option<String>,
    ty: TypeRef,
    symbol: Option<ElfSymbol>,
    location: Option<Location>,
}

impl VarDecl {
    /// Creates a declaration with no symbol.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            scope: None,
            ty,
            symbol: None,
            location: None,
        }
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Binds the declaration to an ELF symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: ElfSymbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    /// Sets the declaration location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the qualified name.
    pub fn qualified_name(&self) -> String {
        scoped(self.scope.as_deref(), &self.name)
    }

    /// Returns the declared type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Returns the ELF symbol the declaration is bound to.
    pub fn symbol(&self) -> Option<&ElfSymbol> {
        self.symbol.as_ref()
    }

    /// Returns the declaration location.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{BuiltinType, ClassKind, ClassType, Type};

    #[test]
    fn qualified_names() {
        let f = FunctionDecl::new("f", FunctionType::new(None)).with_scope("ns::C");
        assert_eq!(f.qualified_name(), "ns::C::f");
        let v = VarDecl::new("v", Arc::new(Type::Builtin(BuiltinType::new("int", 32))));
        assert_eq!(v.qualified_name(), "v");
    }

    #[test]
    fn member_and_virtual_flags() {
        let class = Arc::new(Type::Class(ClassType::new(ClassKind::Class, "C")));
        let method = FunctionDecl::new("m", FunctionType::new(None).with_class_type(class))
            .with_vtable_offset(2);
        assert!(method.is_member_function());
        assert!(method.is_virtual());
        assert_eq!(method.vtable_offset(), Some(2));

        let free = FunctionDecl::new("f", FunctionType::new(None));
        assert!(!free.is_member_function());
        assert!(!free.is_virtual());
    }
}
