//! Renderer backends.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::RenderConfig;

/// Errors that can occur while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Asciidoctor not found: '{command}'. Install with: gem install asciidoctor")]
    NotFound { command: String },

    #[error("Asciidoctor failed for {}:\n{stderr}", path.display())]
    Failed {
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    /// Whether the failure came from the renderer itself, as opposed to
    /// reading the source. Only renderer failures may degrade to a
    /// placeholder page.
    pub fn is_renderer_failure(&self) -> bool {
        matches!(self, RenderError::NotFound { .. } | RenderError::Failed { .. })
    }
}

/// Something that turns an AsciiDoc source file into an HTML fragment.
pub trait Backend: Send + Sync {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Render `source` to an embeddable HTML fragment.
    fn convert(&self, source: &Path) -> Result<String, RenderError>;
}

/// The `asciidoctor` command-line renderer.
#[derive(Debug, Clone)]
pub struct Asciidoctor {
    config: RenderConfig,
}

impl Asciidoctor {
    /// Create a backend for the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments (excluding the executable) for `source`.
    ///
    /// Output is the embeddable HTML5 body (`-s`) written to stdout.
    pub fn args(&self, source: &Path) -> Vec<OsString> {
        let config = &self.config;
        let mut args: Vec<OsString> = vec![
            "-S".into(),
            config.safe_mode.as_str().into(),
            "-b".into(),
            "html5".into(),
            "-s".into(),
            "-B".into(),
            config.base_dir.clone().into(),
        ];

        for require in &config.requires {
            args.push("-r".into());
            args.push(require.into());
        }

        for (key, value) in &config.attributes {
            args.push("-a".into());
            args.push(format!("{key}={value}").into());
        }

        if config.trace {
            args.push("--trace".into());
        }

        args.push("-o".into());
        args.push("-".into());
        args.push(source.into());
        args
    }
}

impl Backend for Asciidoctor {
    fn name(&self) -> &'static str {
        "asciidoctor"
    }

    fn convert(&self, source: &Path) -> Result<String, RenderError> {
        let args = self.args(source);
        tracing::debug!("Running {} {:?}", self.config.command, args);

        let output = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    RenderError::NotFound {
                        command: self.config.command.clone(),
                    }
                }
                _ => RenderError::Io {
                    path: source.to_path_buf(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                path: source.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn builds_invocation() {
        let mut config = RenderConfig {
            base_dir: PathBuf::from("/site/docs"),
            requires: vec!["asciidoctor-diagram".to_string()],
            trace: true,
            ..Default::default()
        };
        config
            .attributes
            .insert("icons".to_string(), "font".to_string());
        config
            .attributes
            .insert("source-highlighter".to_string(), "highlight.js".to_string());

        let args = as_strings(Asciidoctor::new(config).args(Path::new("/site/docs/index.adoc")));

        assert_eq!(
            args,
            vec![
                "-S",
                "safe",
                "-b",
                "html5",
                "-s",
                "-B",
                "/site/docs",
                "-r",
                "asciidoctor-diagram",
                "-a",
                "icons=font",
                "-a",
                "source-highlighter=highlight.js",
                "--trace",
                "-o",
                "-",
                "/site/docs/index.adoc",
            ]
        );
    }

    #[test]
    fn omits_optional_flags() {
        let args = as_strings(Asciidoctor::new(RenderConfig::default()).args(Path::new("a.adoc")));
        assert!(!args.contains(&"--trace".to_string()));
        assert!(!args.contains(&"-r".to_string()));
        assert!(!args.contains(&"-a".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("a.adoc"));
    }

    #[test]
    fn reports_missing_executable() {
        let backend = Asciidoctor::new(RenderConfig {
            command: "adorn-test-no-such-renderer".to_string(),
            ..Default::default()
        });

        let err = backend.convert(Path::new("index.adoc")).unwrap_err();

        assert!(matches!(err, RenderError::NotFound { .. }));
        assert!(err.is_renderer_failure());
        assert!(err.to_string().contains("adorn-test-no-such-renderer"));
    }

    #[cfg(unix)]
    #[test]
    fn reports_non_zero_exit() {
        let backend = Asciidoctor::new(RenderConfig {
            command: "false".to_string(),
            ..Default::default()
        });

        let err = backend.convert(Path::new("index.adoc")).unwrap_err();

        assert!(matches!(err, RenderError::Failed { .. }));
        assert!(err.to_string().starts_with("Asciidoctor failed for index.adoc"));
    }
}
