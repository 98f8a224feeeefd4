use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::value::{PropertyValue, parse_value};

/// A parsed ini-style document: an ordered sequence of sections.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Config {
    sections: Vec<Section>,
}

/// One `[name]` section and its properties, in input order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    name: String,
    line: usize,
    properties: Vec<Property>,
}

/// One `key = value` line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    name: String,
    line: usize,
    value: PropertyValue,
}

impl Config {
    /// Parses a document held in memory.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Parser::new(input).parse()
    }

    /// Reads and parses a document from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .map_err(|e| ConfigError::io_error(None, e))?;
        Self::parse(&input)
    }

    /// Reads and parses a document from disk.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|e| ConfigError::io_error(Some(path), e))?;
        Self::parse(&input).map_err(|e| e.with_path(path))
    }

    /// Returns the sections in input order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the sections carrying `name`.
    pub fn sections_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections.iter().filter(move |s| s.name == name)
    }

    /// Returns `true` if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line: 0,
            properties: Vec::new(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push(Property {
            name: name.into(),
            line: 0,
            value,
        });
        self
    }

    /// Returns the section name without brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line of the section header, or 0 for sections built in code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the properties in input order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns the first property called `name`.
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns every property called `name`, in input order.
    pub fn properties_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }
}

impl Property {
    /// Returns the property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the line the property appeared on, or 0 when built in code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the parsed value.
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }
}

struct Parser<'a> {
    input: &'a str,
    line_number: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            line_number: 0,
        }
    }

    fn parse(&mut self) -> Result<Config, ConfigError> {
        let mut sections: Vec<Section> = Vec::new();

        for line in self.input.lines() {
            self.line_number += 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                sections.push(self.section_header(header)?);
                continue;
            }

            let Some(section) = sections.last_mut() else {
                return Err(ConfigError::syntax_error(
                    self.line_number,
                    "property outside of any section",
                ));
            };

            let (name, value) = match trimmed.split_once('=') {
                Some((name, value)) => (name.trim(), parse_value(value, self.line_number)?),
                None => (trimmed, PropertyValue::String(String::new())),
            };
            if name.is_empty() {
                return Err(ConfigError::syntax_error(
                    self.line_number,
                    "property name must be non-empty",
                ));
            }

            section.properties.push(Property {
                name: name.to_owned(),
                line: self.line_number,
                value,
            });
        }

        Ok(Config { sections })
    }

    fn section_header(&self, header: &str) -> Result<Section, ConfigError> {
        let (name, trailing) = header.split_once(']').ok_or_else(|| {
            ConfigError::syntax_error(self.line_number, "unterminated section header")
        })?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::syntax_error(
                self.line_number,
                "section name must be non-empty",
            ));
        }

        let trailing = trailing.trim();
        if !trailing.is_empty() && !trailing.starts_with('#') && !trailing.starts_with(';') {
            return Err(ConfigError::syntax_error(
                self.line_number,
                "unexpected content after section header",
            ));
        }

        Ok(Section {
            name: name.to_owned(),
            line: self.line_number,
            properties: Vec::new(),
        })
    }
}
