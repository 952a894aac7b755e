//! Preprocessor configuration.

use std::path::PathBuf;

/// Default bound on macro-expansion passes per line.
pub const DEFAULT_MAX_EXPANSION_PASSES: usize = 50;

#[derive(Clone, Debug)]
pub struct PreprocessorConfig {
    /// Directories searched for `#include` targets after the including
    /// file's own directory, in order.
    pub include_paths: Vec<PathBuf>,
    /// Object-like macros defined before the first line is read
    /// (`-D NAME=value`). An empty body still counts as defined.
    pub defines: Vec<(String, String)>,
    /// Passes over one line before expansion is declared runaway.
    pub max_expansion_passes: usize,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            include_paths: Vec::new(),
            defines: Vec::new(),
            max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
        }
    }
}

impl PreprocessorConfig {
    #[must_use]
    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_define(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.defines.push((name.into(), body.into()));
        self
    }
}
