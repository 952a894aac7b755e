//! Command-line options shared by `run`, `pp`, `lex` and `parse`.

use std::ffi::OsStr;
use std::path::PathBuf;

use dbs_diagnostic::emitter::ColorMode;
use dbs_preproc::PreprocessorConfig;

/// Environment variable holding extra include directories.
pub const INCLUDE_PATH_VAR: &str = "DBS_INCLUDE_PATH";

/// Include directory searched last, relative to the working directory.
pub const DEFAULT_INCLUDE_DIR: &str = "includes";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("missing file path")]
    MissingFile,
    #[error("`{0}` expects a value")]
    MissingValue(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid color mode `{0}` (expected auto, always or never)")]
    InvalidColor(String),
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub file: PathBuf,
    /// `-I` directories in command-line order.
    pub include_paths: Vec<PathBuf>,
    /// `-D` macros; a bare `-D NAME` defines `NAME` as `1`.
    pub defines: Vec<(String, String)>,
    /// Print the UI backend calls after `run`.
    pub trace_ui: bool,
    pub color: ColorMode,
}

impl Options {
    /// Parse the arguments following the command name.
    pub fn parse(args: &[String]) -> Result<Self, OptionsError> {
        let mut file = None;
        let mut include_paths = Vec::new();
        let mut defines = Vec::new();
        let mut trace_ui = false;
        let mut color = ColorMode::Auto;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-I" || arg == "-D" {
                let value = iter
                    .next()
                    .ok_or_else(|| OptionsError::MissingValue(arg.clone()))?;
                if arg == "-I" {
                    include_paths.push(PathBuf::from(value));
                } else {
                    defines.push(split_define(value));
                }
            } else if let Some(dir) = arg.strip_prefix("-I") {
                include_paths.push(PathBuf::from(dir));
            } else if let Some(define) = arg.strip_prefix("-D") {
                defines.push(split_define(define));
            } else if arg == "--trace-ui" {
                trace_ui = true;
            } else if let Some(mode) = arg.strip_prefix("--color=") {
                color = ColorMode::parse(mode)
                    .ok_or_else(|| OptionsError::InvalidColor(mode.to_string()))?;
            } else if arg.starts_with('-') {
                return Err(OptionsError::UnknownOption(arg.clone()));
            } else if file.is_none() {
                file = Some(PathBuf::from(arg));
            } else {
                return Err(OptionsError::UnexpectedArgument(arg.clone()));
            }
        }

        Ok(Options {
            file: file.ok_or(OptionsError::MissingFile)?,
            include_paths,
            defines,
            trace_ui,
            color,
        })
    }

    /// Preprocessor settings: `-I` directories, then the entries of
    /// `env_paths` (a platform path list), then [`DEFAULT_INCLUDE_DIR`].
    pub fn preprocessor_config(&self, env_paths: Option<&OsStr>) -> PreprocessorConfig {
        let mut config = PreprocessorConfig::default();
        for dir in &self.include_paths {
            config = config.with_include_path(dir.clone());
        }
        if let Some(paths) = env_paths {
            for dir in std::env::split_paths(paths) {
                if !dir.as_os_str().is_empty() {
                    config = config.with_include_path(dir);
                }
            }
        }
        config = config.with_include_path(DEFAULT_INCLUDE_DIR);
        for (name, body) in &self.defines {
            config = config.with_define(name.clone(), body.clone());
        }
        config
    }
}

fn split_define(text: &str) -> (String, String) {
    match text.split_once('=') {
        Some((name, body)) => (name.to_string(), body.to_string()),
        None => (text.to_string(), "1".to_string()),
    }
}
