//! Parsing policies.
//!
//! [`System`] is the process-wide policy shared by every command of one
//! tree. [`CommandConfig`] is per command; a child starts from its parent's
//! config with a [`ConfigPatch`] applied on top.
//!
//! Both deserialize with every field optional, so a policy can be embedded
//! in whatever configuration format the host program already uses:
//!
//! ```
//! use argtree_core::System;
//!
//! let system: System = serde_json::from_str(r#"{ "split_list_by_comma": true }"#).unwrap();
//! assert!(system.split_list_by_comma);
//! assert!(system.allow_equal_assign);
//! ```

use serde::{Deserialize, Serialize};

/// Process-wide parsing policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct System {
    /// Accept `--key=value` and `-k=value`.
    pub allow_equal_assign: bool,
    /// Suffix that forces a boolean flag to `false` (e.g. `--color\`).
    pub boolean_negation_suffix: Option<String>,
    /// A repeated list flag keeps accumulating values.
    pub allow_duplicate_flag_for_list: bool,
    /// A repeated list flag discards the values gathered so far.
    pub overwrite_duplicate_flag_for_list: bool,
    /// A repeated primitive flag starts over instead of failing.
    pub allow_duplicate_flag_for_primitive: bool,
    /// Several values for a primitive flag keep the last one instead of failing.
    pub allow_multiple_values_for_primitive: bool,
    /// List flag values are re-split on commas.
    pub split_list_by_comma: bool,
    /// Unknown flags, and the values following them, are dropped.
    pub skip_unknown_flag: bool,
    /// Positional tokens left after binding are ignored instead of failing.
    pub allow_extra_arguments: bool,
    /// [`Cli::start`](crate::Cli::start) returns errors instead of exiting.
    pub do_not_exit_on_error: bool,
}

impl Default for System {
    fn default() -> Self {
        Self {
            allow_equal_assign: true,
            boolean_negation_suffix: Some("\\".to_string()),
            allow_duplicate_flag_for_list: true,
            overwrite_duplicate_flag_for_list: false,
            allow_duplicate_flag_for_primitive: false,
            allow_multiple_values_for_primitive: false,
            split_list_by_comma: false,
            skip_unknown_flag: false,
            allow_extra_arguments: false,
            do_not_exit_on_error: false,
        }
    }
}

impl System {
    /// Returns the negation suffix, treating an empty string as unset.
    pub fn negation_suffix(&self) -> Option<&str> {
        self.boolean_negation_suffix
            .as_deref()
            .filter(|suffix| !suffix.is_empty())
    }
}

/// Per-command behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Intercept `--help`/`-h` and `--help-usage`/`-hu`.
    pub help: bool,
    /// Split off everything after [`trailing_args_separator`](Self::trailing_args_separator).
    pub enable_trailing_args: bool,
    pub trailing_args_separator: String,
    /// Do not inherit the parent's global flags.
    pub skip_global_flags: bool,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            help: true,
            enable_trailing_args: false,
            trailing_args_separator: "--".to_string(),
            skip_global_flags: false,
        }
    }
}

impl CommandConfig {
    /// Returns a copy with every field set in `patch` overridden.
    ///
    /// # Examples
    ///
    /// ```
    /// use argtree_core::{CommandConfig, ConfigPatch};
    ///
    /// let parent = CommandConfig::default();
    /// let child = parent.merged(&ConfigPatch {
    ///     enable_trailing_args: Some(true),
    ///     ..Default::default()
    /// });
    /// assert!(child.enable_trailing_args);
    /// assert_eq!(child.trailing_args_separator, "--");
    /// ```
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        Self {
            help: patch.help.unwrap_or(self.help),
            enable_trailing_args: patch
                .enable_trailing_args
                .unwrap_or(self.enable_trailing_args),
            trailing_args_separator: patch
                .trailing_args_separator
                .clone()
                .unwrap_or_else(|| self.trailing_args_separator.clone()),
            skip_global_flags: patch.skip_global_flags.unwrap_or(self.skip_global_flags),
        }
    }

    /// Returns the separator when trailing arguments are enabled.
    pub fn trailing_separator(&self) -> Option<&str> {
        self.enable_trailing_args
            .then_some(self.trailing_args_separator.as_str())
    }
}

/// Overrides applied to the inherited [`CommandConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub help: Option<bool>,
    pub enable_trailing_args: Option<bool>,
    pub trailing_args_separator: Option<String>,
    pub skip_global_flags: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_suffix_is_disabled() {
        let system = System {
            boolean_negation_suffix: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(system.negation_suffix(), None);
        assert_eq!(System::default().negation_suffix(), Some("\\"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let parent = CommandConfig {
            help: false,
            ..Default::default()
        };
        let child = parent.merged(&ConfigPatch {
            trailing_args_separator: Some("-".into()),
            ..Default::default()
        });

        assert!(!child.help);
        assert_eq!(child.trailing_args_separator, "-");
        assert_eq!(child.trailing_separator(), None);
    }

    #[test]
    fn test_config_patch_from_json() {
        let patch: ConfigPatch = serde_json::from_str(r#"{"skip_global_flags": true}"#).unwrap();
        assert_eq!(patch.skip_global_flags, Some(true));
        assert_eq!(patch.help, None);
    }
}
