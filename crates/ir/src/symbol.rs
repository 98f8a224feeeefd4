/// What an ELF symbol designates.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// `STT_FUNC` and friends.
    Function,
    /// `STT_OBJECT`, `STT_TLS` and friends.
    Variable,
    /// Anything else.
    Other,
}

/// An ELF symbol together with the other names aliasing its address.
///
/// The alias list never contains the symbol's own name.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElfSymbol {
    name: String,
    version: String,
    kind: SymbolKind,
    aliases: Vec<String>,
}

impl ElfSymbol {
    /// Creates an unversioned symbol without aliases.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            kind,
            aliases: Vec::new(),
        }
    }

    /// Creates a function symbol.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Function)
    }

    /// Creates a variable symbol.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Variable)
    }

    /// Sets the version string (e.g. `GLIBC_2.2.5`).
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds an alias. Adding the symbol's own name or a duplicate is a no-op.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        if alias != self.name && !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self
    }

    /// Returns the symbol name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the version string, empty when unversioned.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the symbol kind.
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Returns `true` for function symbols.
    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }

    /// Returns `true` for variable symbols.
    pub fn is_variable(&self) -> bool {
        self.kind == SymbolKind::Variable
    }

    /// Returns the other names sharing this symbol's address.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns `true` if at least one alias exists.
    pub fn has_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Returns `true` if `name` is this symbol's name or one of its aliases.
    pub fn alias_from_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}
