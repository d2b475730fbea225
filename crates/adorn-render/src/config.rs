//! Renderer configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Asciidoctor safe mode, restricting what a document may read or include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeMode {
    Unsafe,
    #[default]
    Safe,
    Server,
    Secure,
}

impl SafeMode {
    /// The value passed to `-S`.
    pub fn as_str(self) -> &'static str {
        match self {
            SafeMode::Unsafe => "unsafe",
            SafeMode::Safe => "safe",
            SafeMode::Server => "server",
            SafeMode::Secure => "secure",
        }
    }
}

impl fmt::Display for SafeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved settings for invoking the renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Executable name or path (bare names are looked up on `PATH`)
    pub command: String,

    /// Safe mode passed with `-S`
    pub safe_mode: SafeMode,

    /// Base directory for includes and relative paths, passed with `-B`
    pub base_dir: PathBuf,

    /// Document attributes, each passed as `-a key=value`
    pub attributes: BTreeMap<String, String>,

    /// Ruby libraries to load, each passed with `-r`
    pub requires: Vec<String>,

    /// Abort the build on render failure instead of emitting a placeholder
    pub fail_on_error: bool,

    /// Pass `--trace` for backtraces on renderer errors
    pub trace: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: "asciidoctor".to_string(),
            safe_mode: SafeMode::default(),
            base_dir: PathBuf::from("docs"),
            attributes: BTreeMap::new(),
            requires: Vec::new(),
            fail_on_error: true,
            trace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_flag_values() {
        assert_eq!(SafeMode::Unsafe.to_string(), "unsafe");
        assert_eq!(SafeMode::Secure.as_str(), "secure");
        assert_eq!(SafeMode::default(), SafeMode::Safe);
    }

    #[test]
    fn defaults_fail_fast() {
        let config = RenderConfig::default();
        assert_eq!(config.command, "asciidoctor");
        assert!(config.fail_on_error);
        assert!(!config.trace);
    }
}
