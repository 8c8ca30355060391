// crates/patch_directory/src/config.rs

use anyhow::{Context, Result};
use std::path::PathBuf;

use insert_pragma::DeclarationMatcher;
use pragma_marker::{COPY_WITH_PATTERN, DEFAULT_TARGET_DIR, PRAGMA_MARKER, TARGET_DIR_ENV, TARGET_EXTENSION};

use crate::{ErrorPolicy, PassConfig};

/// Centralized runtime configuration composed from CLI + environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub target_dir: PathBuf,
    pub extension: String,
    pub marker: String,
    pub pattern: String,
    pub check: bool,            // report only, exit 1 when something would change
    pub keep_going: bool,       // ErrorPolicy::Skip instead of Abort
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            extension: TARGET_EXTENSION.to_string(),
            marker: PRAGMA_MARKER.to_string(),
            pattern: COPY_WITH_PATTERN.to_string(),
            check: false,
            keep_going: false,
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Builds the pass configuration, compiling the declaration pattern.
    pub fn to_pass_config(&self) -> Result<PassConfig> {
        let matcher = DeclarationMatcher::new(&self.pattern)
            .with_context(|| format!("Invalid declaration pattern '{}'", self.pattern))?;
        Ok(PassConfig {
            dir: self.target_dir.clone(),
            extension: self.extension.clone(),
            marker: self.marker.clone(),
            matcher,
            dry_run: self.check,
            policy: if self.keep_going {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            },
        })
    }
}

/// Picks the directory to patch: the command line wins, then
/// `PRAGMA_PATCH_DIR`, then the built-in default.
pub fn resolve_target_dir(cli_dir: Option<&str>, env_dir: Option<String>) -> PathBuf {
    cli_dir
        .map(PathBuf::from)
        .or_else(|| env_dir.filter(|d| !d.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR))
}

/// Reads `PRAGMA_PATCH_DIR` from the process environment.
pub fn target_dir_from_env() -> Option<String> {
    std::env::var(TARGET_DIR_ENV).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_dir_takes_precedence() {
        let dir = resolve_target_dir(Some("cli/dir"), Some("env/dir".to_string()));
        assert_eq!(dir, PathBuf::from("cli/dir"));
    }

    #[test]
    fn test_env_dir_used_without_cli() {
        let dir = resolve_target_dir(None, Some("env/dir".to_string()));
        assert_eq!(dir, PathBuf::from("env/dir"));
    }

    #[test]
    fn test_blank_env_falls_back_to_default() {
        assert_eq!(resolve_target_dir(None, Some("  ".to_string())), PathBuf::from(DEFAULT_TARGET_DIR));
        assert_eq!(resolve_target_dir(None, None), PathBuf::from(DEFAULT_TARGET_DIR));
    }

    #[test]
    fn test_keep_going_selects_skip_policy() {
        let config = AppConfig {
            keep_going: true,
            check: true,
            ..AppConfig::default()
        };
        let pass = config.to_pass_config().unwrap();
        assert_eq!(pass.policy, ErrorPolicy::Skip);
        assert!(pass.dry_run);
        assert_eq!(pass.dir, PathBuf::from(DEFAULT_TARGET_DIR));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let config = AppConfig {
            pattern: "(".to_string(),
            ..AppConfig::default()
        };
        let err = config.to_pass_config().unwrap_err();
        assert!(err.to_string().contains("Invalid declaration pattern"));
    }
}
