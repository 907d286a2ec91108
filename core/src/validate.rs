//! Definition validation.
//!
//! Checks the structural invariants of a command before it joins the tree:
//! flag, alias, argument and command names are well formed, and no alias is
//! claimed by two flags of the same command (own and inherited global flags
//! together).
//!
//! # Examples
//!
//! ```
//! use argtree_core::validate::validate_name;
//! use argtree_core::{DefinitionError, NameKind};
//!
//! assert!(validate_name(NameKind::Flag, "verbose", Some("\\")).is_ok());
//! assert!(matches!(
//!     validate_name(NameKind::Flag, "--verbose", None),
//!     Err(DefinitionError::LeadingDash { .. })
//! ));
//! ```

use std::collections::HashMap;

use crate::error::{DefinitionError, NameKind};
use crate::flags::FlagTable;

/// Validates one flag, alias, argument or command name.
///
/// Names must be non-empty, contain no space or `=`, not start with `-`,
/// and not end with the boolean negation suffix when one is configured.
pub fn validate_name(
    kind: NameKind,
    name: &str,
    negation_suffix: Option<&str>,
) -> Result<(), DefinitionError> {
    if name.is_empty() {
        return Err(DefinitionError::EmptyName(kind));
    }

    let owned = || name.to_string();

    if name.contains(' ') {
        return Err(DefinitionError::ContainsSpace { kind, name: owned() });
    }

    if name.starts_with('-') {
        return Err(DefinitionError::LeadingDash { kind, name: owned() });
    }

    if name.contains('=') {
        return Err(DefinitionError::ContainsEquals { kind, name: owned() });
    }

    if let Some(suffix) = negation_suffix.filter(|suffix| name.ends_with(suffix)) {
        return Err(DefinitionError::NegationSuffix {
            kind,
            name: owned(),
            suffix: suffix.to_string(),
        });
    }

    Ok(())
}

/// Validates the combined flag set of one command.
///
/// Every flag name and alias must be well formed, and each alias may belong
/// to only one visible flag. A global flag shadowed by an own flag of the
/// same name is not visible and is skipped.
pub fn validate_flags(
    flags: &FlagTable,
    global_flags: &FlagTable,
    negation_suffix: Option<&str>,
) -> Result<(), DefinitionError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for (name, schema) in flags.iter().chain(global_flags.iter()) {
        validate_name(NameKind::Flag, name, negation_suffix)?;
        for alias in &schema.meta().aliases {
            validate_name(NameKind::Alias, alias, negation_suffix)?;
        }
    }

    let visible = flags.iter().chain(
        global_flags
            .iter()
            .filter(|(name, _)| flags.get(name).is_none()),
    );

    for (name, schema) in visible {
        for alias in &schema.meta().aliases {
            if let Some(first) = owners.insert(alias, name) {
                return Err(DefinitionError::DuplicateAlias {
                    alias: alias.clone(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
        }
    }

    Ok(())
}
