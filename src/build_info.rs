//! Build information module
//!
//! Compile-time constants shown by `health-cli --version`.

use serde::Serialize;

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("HEALTH_CLI_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Package description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information structure for serialization
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    /// Get the current build info
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    /// Multi-line version text for `--version`
    pub fn long_version(&self) -> String {
        format!("{}\ncompiled: {}\n{}", self.version, self.build_timestamp, self.description)
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_starts_with_package_version() {
        let info = BuildInfo::current();
        assert!(info.long_version().starts_with(VERSION));
        assert_eq!(info.name, "health-cli");
    }
}
