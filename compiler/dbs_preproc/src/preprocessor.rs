//! File-level preprocessing: directives, includes and the line map.

use std::fs;
use std::path::{Path, PathBuf};

use dbs_diagnostic::Origin;

use crate::conditional::{CondKind, CondStack};
use crate::directive::{parse_directive, Directive};
use crate::error::PreprocessError;
use crate::macros::{ExpandError, MacroTable};
use crate::PreprocessorConfig;

/// Preprocessed program text plus where each output line came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preprocessed {
    pub text: String,
    /// `origins[i]` is the source of output line `i + 1`.
    pub origins: Vec<Origin>,
}

impl Preprocessed {
    /// Source file and line of 1-based output line `out_line`.
    pub fn origin(&self, out_line: usize) -> Option<&Origin> {
        self.origins.get(out_line.checked_sub(1)?)
    }

    fn push_line(&mut self, line: &str, file: &Path, line_no: u32) {
        self.text.push_str(line);
        self.text.push('\n');
        self.origins.push(Origin {
            file: file.display().to_string(),
            line: line_no,
        });
    }
}

/// Text macro preprocessor.
///
/// Macros persist across files: a `#define` in an included file is visible
/// to the includer afterwards, and to later `process` calls on the same
/// preprocessor.
pub struct Preprocessor {
    config: PreprocessorConfig,
    macros: MacroTable,
    /// Files currently being processed, outermost first.
    include_stack: Vec<PathBuf>,
}

impl Preprocessor {
    pub fn new(config: PreprocessorConfig) -> Self {
        let mut macros = MacroTable::default();
        for (name, body) in &config.defines {
            macros.define(name, None, body);
        }
        Preprocessor {
            config,
            macros,
            include_stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Define an object-like macro.
    pub fn define(&mut self, name: &str, body: &str) {
        self.macros.define(name, None, body);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.is_defined(name)
    }

    pub fn process(&mut self, path: &Path) -> Result<String, PreprocessError> {
        self.process_mapped(path).map(|out| out.text)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn process_mapped(&mut self, path: &Path) -> Result<Preprocessed, PreprocessError> {
        let entry = canonical(path);
        let source = read_source(&entry)?;
        self.process_source(&entry, &source)
    }

    /// Process `source` as if it were the contents of `path`.
    ///
    /// `path` names the file in origins and errors and anchors relative
    /// includes; it need not exist.
    pub fn process_source(
        &mut self,
        path: &Path,
        source: &str,
    ) -> Result<Preprocessed, PreprocessError> {
        let mut out = Preprocessed::default();
        self.process_file(path, source, &mut out)?;
        tracing::debug!(lines = out.origins.len(), "preprocessing complete");
        Ok(out)
    }

    /// Expand macros in one line with the macros defined so far.
    pub fn expand_line(&self, line: &str) -> Result<String, PreprocessError> {
        self.expand_at(line, Path::new("<input>"), 1)
    }

    fn process_file(
        &mut self,
        file: &Path,
        source: &str,
        out: &mut Preprocessed,
    ) -> Result<(), PreprocessError> {
        if self.include_stack.iter().any(|open| open == file) {
            let mut chain = self.include_stack.clone();
            chain.push(file.to_path_buf());
            return Err(PreprocessError::CircularInclude { chain });
        }
        self.include_stack.push(file.to_path_buf());
        let result = self.process_lines(file, source, out);
        self.include_stack.pop();
        result
    }

    fn process_lines(
        &mut self,
        file: &Path,
        source: &str,
        out: &mut Preprocessed,
    ) -> Result<(), PreprocessError> {
        let mut conds = CondStack::new(file);
        for (idx, raw) in source.lines().enumerate() {
            let line_no = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            match parse_directive(raw) {
                Some(Directive::Include(name)) => {
                    if conds.is_active() {
                        let target = self.resolve_include(file, name, line_no)?;
                        tracing::debug!(
                            target = %target.display(),
                            from = %file.display(),
                            line = line_no,
                            "include"
                        );
                        let included = read_source(&target)?;
                        self.process_file(&target, &included, out)?;
                    }
                }
                Some(Directive::Define { name, tail }) => {
                    if conds.is_active() {
                        self.define_directive(name, tail, file, line_no)?;
                    }
                }
                Some(Directive::Ifdef(name)) => {
                    conds.open(CondKind::Ifdef, name, self.is_defined(name), line_no);
                }
                Some(Directive::Ifndef(name)) => {
                    conds.open(CondKind::Ifndef, name, self.is_defined(name), line_no);
                }
                Some(Directive::Else) => conds.flip_else(line_no)?,
                Some(Directive::Endif) => conds.close(line_no)?,
                None => {
                    if conds.is_active() {
                        let expanded = self.expand_at(raw, file, line_no)?;
                        out.push_line(&expanded, file, line_no);
                    }
                }
            }
        }
        conds.finish()
    }

    fn define_directive(
        &mut self,
        name: &str,
        tail: &str,
        file: &Path,
        line: u32,
    ) -> Result<(), PreprocessError> {
        let Some(after_open) = tail.strip_prefix('(') else {
            tracing::debug!(name, body = tail, "define");
            self.macros.define(name, None, tail);
            return Ok(());
        };
        let Some(close) = after_open.find(')') else {
            return Err(PreprocessError::MalformedDefine {
                file: file.to_path_buf(),
                line,
            });
        };
        let params_part = after_open[..close].trim();
        let params: Vec<String> = if params_part.is_empty() {
            Vec::new()
        } else {
            params_part.split(',').map(|p| p.trim().to_string()).collect()
        };
        let body = after_open[close + 1..].trim_start();
        tracing::debug!(name, ?params, body, "define");
        self.macros.define(name, Some(params), body);
        Ok(())
    }

    fn resolve_include(
        &self,
        file: &Path,
        name: &str,
        line: u32,
    ) -> Result<PathBuf, PreprocessError> {
        let own_dir = file.parent().unwrap_or(Path::new("")).to_path_buf();
        let mut searched = Vec::new();
        for dir in std::iter::once(own_dir).chain(self.config.include_paths.iter().cloned()) {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Ok(canonical(&candidate));
            }
            searched.push(dir);
        }
        Err(PreprocessError::IncludeNotFound {
            name: name.to_string(),
            from: file.to_path_buf(),
            line,
            searched,
        })
    }

    fn expand_at(&self, line: &str, file: &Path, line_no: u32) -> Result<String, PreprocessError> {
        self.macros
            .expand_line(line, self.config.max_expansion_passes)
            .map_err(|err| match err {
                ExpandError::Arity {
                    name,
                    expected,
                    found,
                } => PreprocessError::MacroArity {
                    name,
                    expected,
                    found,
                    file: file.to_path_buf(),
                    line: line_no,
                },
                ExpandError::Limit { passes } => PreprocessError::ExpansionLimit {
                    passes,
                    file: file.to_path_buf(),
                    line: line_no,
                },
            })
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read_source(path: &Path) -> Result<String, PreprocessError> {
    let bytes = fs::read(path).map_err(|source| PreprocessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
