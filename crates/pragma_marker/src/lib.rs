// crates/pragma_marker/src/lib.rs

//! Literals shared by the patching tool‑chain.

/// The annotation line inserted ahead of every `copyWith` getter.
pub const PRAGMA_MARKER: &str = "@pragma('vm:prefer-inline')";

/// File extension (without the dot) of the generated sources we patch.
pub const TARGET_EXTENSION: &str = "dart";

/// Directory patched when neither the command line nor the environment names one.
pub const DEFAULT_TARGET_DIR: &str = "generator/test/src/examples";

/// Environment variable that overrides [`DEFAULT_TARGET_DIR`].
pub const TARGET_DIR_ENV: &str = "PRAGMA_PATCH_DIR";

/// A getter named `copyWith` with an expression body.
///
/// Group 1 is the indent, group 2 the declaration head and group 3 whatever
/// trails the `=>`. The indent must be non-empty.
pub const COPY_WITH_PATTERN: &str = r"^(\s+)(.+ get copyWith =>)(.*)$";
