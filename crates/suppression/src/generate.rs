//! Suppressions generated by tooling rather than written by users.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Config;

use crate::base::SuppressionBase;
use crate::debug_suppr::trace_generated;
use crate::error::ReadError;
use crate::function_suppression::FunctionSuppression;
use crate::pattern::{Pattern, generate_from_strings};
use crate::set::SuppressionSet;
use crate::type_suppression::{PRIVATE_TYPES_LABEL, TypeSuppression};
use crate::variable_suppression::VariableSuppression;

/// Label shared by the suppressions generated from kernel ABI whitelists.
pub const KERNEL_ABI_WHITELIST_LABEL: &str = "kernel ABI whitelist";

const SYSTEM_HEADERS: &str = "^/usr/include/";

/// Builds the suppression hiding types not defined in `public_headers`.
///
/// Types defined in a public header (compared by base name or full path) or
/// under `/usr/include/` are kept; every other type, including opaque
/// classes with no location, is dropped from the IR.
pub fn private_types_suppression<I, P>(public_headers: I) -> TypeSuppression
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut suppression = TypeSuppression::new().with_base(
        SuppressionBase::default()
            .with_label(PRIVATE_TYPES_LABEL)
            .artificial()
            .with_drops_artifact(true),
    );
    for header in public_headers {
        if let Some(name) = header.as_ref().file_name().and_then(|n| n.to_str()) {
            suppression = suppression.with_source_location_to_keep(name);
        }
    }
    if let Some(system) = Pattern::compile(SYSTEM_HEADERS) {
        suppression = suppression.with_source_location_to_keep_regex(system);
    }
    trace_generated(PRIVATE_TYPES_LABEL, suppression.source_locations_to_keep().len());
    suppression
}

/// Builds the private-types suppression from every file under `headers_dir`.
///
/// # Errors
///
/// Returns the first I/O error met while walking the directory.
pub fn private_types_suppression_from_dir(headers_dir: &Path) -> io::Result<TypeSuppression> {
    let mut headers = Vec::new();
    collect_files(headers_dir, &mut headers)?;
    headers.sort();
    Ok(private_types_suppression(headers))
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), out)?;
        } else if file_type.is_file() {
            out.push(entry.path());
        }
    }
    Ok(())
}

/// Returns the names listed in the whitelist sections of `config`: sections
/// whose name ends in `whitelist` or `stablelist`, one bare name per line.
pub fn whitelisted_symbols(config: &Config) -> impl Iterator<Item = &str> {
    config
        .sections()
        .iter()
        .filter(|s| s.name().ends_with("whitelist") || s.name().ends_with("stablelist"))
        .flat_map(|s| s.properties())
        .map(ini::Property::name)
        .filter(|name| !name.is_empty())
}

/// Builds the suppressions dropping every function and variable symbol that
/// no whitelist lists.
///
/// Yields one function and one variable suppression sharing
/// [`KERNEL_ABI_WHITELIST_LABEL`], whose `symbol_name_not_regexp` matches
/// exactly the sorted, deduplicated whitelisted names. No whitelist yields no
/// suppression.
pub fn kernel_abi_whitelist_suppressions<'a, I>(whitelists: I) -> SuppressionSet
where
    I: IntoIterator<Item = &'a Config>,
{
    let mut whitelists = whitelists.into_iter().peekable();
    if whitelists.peek().is_none() {
        return SuppressionSet::default();
    }

    let names: BTreeSet<&str> = whitelists.flat_map(whitelisted_symbols).collect();
    let Some(kept) = Pattern::compile(&generate_from_strings(&names)) else {
        // Escaped alternations only fail past the compiled size limit.
        return SuppressionSet::default();
    };
    let base = SuppressionBase::default()
        .with_label(KERNEL_ABI_WHITELIST_LABEL)
        .with_drops_artifact(true);
    trace_generated(KERNEL_ABI_WHITELIST_LABEL, names.len());

    [
        FunctionSuppression::new()
            .with_base(base.clone())
            .with_symbol_name_not_regex(kept.clone())
            .into(),
        VariableSuppression::new()
            .with_base(base)
            .with_symbol_name_not_regex(kept)
            .into(),
    ]
    .into_iter()
    .collect()
}

/// Reads whitelist files and builds their suppressions.
///
/// # Errors
///
/// Returns [`ReadError::Config`] for the first file that cannot be read or
/// tokenized.
pub fn kernel_abi_whitelist_suppressions_from_files<I, P>(
    paths: I,
) -> Result<SuppressionSet, ReadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let configs = paths
        .into_iter()
        .map(|path| Config::from_file(path.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(kernel_abi_whitelist_suppressions(&configs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_sections_only() {
        let config = Config::parse(
            "[abi_whitelist]\n  sym_a\n  sym_b\n[other]\n  ignored\n[vendor_stablelist]\n  sym_c\n",
        )
        .unwrap();
        let names: Vec<&str> = whitelisted_symbols(&config).collect();
        assert_eq!(names, ["sym_a", "sym_b", "sym_c"]);
    }

    #[test]
    fn no_whitelist_no_suppression() {
        assert!(kernel_abi_whitelist_suppressions(&[]).is_empty());
    }

    #[test]
    fn private_types_keeps_base_names() {
        let s = private_types_suppression(["/src/include/public.h", "api/other.h"]);
        assert!(s.is_private_type_suppression());
        assert!(s.base().is_artificial());
        assert!(s.base().drops_artifact_from_ir());
        assert!(s.source_locations_to_keep().contains("public.h"));
        assert!(s.source_locations_to_keep().contains("other.h"));
        assert!(s.source_location_to_keep_regex().is_some());
    }
}
