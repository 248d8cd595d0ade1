use gofold_common::{Diagnostic, SourceId, SourceMap, SymbolInterner};
use gofold_config::{GofoldConfig, ModeSetting, OutputFormat, RedeclarationSetting};
use gofold_consteval::{
    render_json, render_text, EvalOptions, Evaluation, Evaluator, FormatOptions, Mode,
    Redeclaration,
};
use gofold_hir::{Module, Program};
use gofold_tac::TacProgram;
use miette::{IntoDiagnostic, NamedSource, Report, Result};
use std::path::{Path, PathBuf};

/// Outcome of checking one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: PathBuf,
    pub ok: bool,
}

/// Outcome of [`Driver::check_files`].
pub struct CheckReport {
    pub files: Vec<FileStatus>,
    pub evaluation: Evaluation,
    /// Files that could not be read or parsed.
    pub failures: Vec<Report>,
}

impl CheckReport {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.ok).count()
    }
}

/// Orchestrates parsing, evaluation and rendering for a set of Go files.
pub struct Driver {
    source_map: SourceMap,
    interner: SymbolInterner,
    config: GofoldConfig,
}

impl Driver {
    pub fn new() -> Self {
        Self::with_config(GofoldConfig::default())
    }

    pub fn with_config(config: GofoldConfig) -> Self {
        Self {
            source_map: SourceMap::new(),
            interner: SymbolInterner::new(),
            config,
        }
    }

    /// Read a file into the source map.
    pub fn add_file(&self, path: impl AsRef<Path>) -> Result<SourceId> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
        self.source_map.add_file(path, content)
    }

    /// Parse a single source file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Module> {
        let source_id = self.add_file(path)?;
        self.parse_source(source_id)
    }

    fn parse_source(&self, source_id: SourceId) -> Result<Module> {
        let source = self
            .source_map
            .get(source_id)
            .ok_or_else(|| miette::miette!("Source file not found"))?;
        let module = gofold_frontend_go::parse_file(&source, &self.interner)?;
        tracing::info!(file = %source.path.display(), consts = module.const_specs().count(), "parsed");
        Ok(module)
    }

    /// Parse every file into one program. Constants of all files share
    /// one package scope.
    pub fn parse_program<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Program> {
        let mut program = Program::new();
        for path in paths {
            program.add_module(self.parse_file(path)?);
        }
        Ok(program)
    }

    pub fn evaluate(&self, program: &Program) -> Evaluation {
        let evaluation = Evaluator::new(&self.interner, self.eval_options()).evaluate(program);
        tracing::info!(
            constants = evaluation.table.len(),
            diagnostics = evaluation.diagnostics.len(),
            "evaluated constants"
        );
        evaluation
    }

    pub fn evaluate_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Evaluation> {
        let program = self.parse_program(paths)?;
        Ok(self.evaluate(&program))
    }

    /// Check files that form one package. A file fails when it cannot be
    /// read or parsed, or when an error diagnostic points into it.
    pub fn check_files<P: AsRef<Path>>(&self, paths: &[P]) -> CheckReport {
        let mut program = Program::new();
        let mut failures = Vec::new();
        let mut parsed = Vec::with_capacity(paths.len());

        for path in paths {
            let module = self
                .add_file(path)
                .and_then(|id| self.parse_source(id).map(|module| (id, module)));
            match module {
                Ok((id, module)) => {
                    program.add_module(module);
                    parsed.push(Some(id));
                }
                Err(report) => {
                    failures.push(report);
                    parsed.push(None);
                }
            }
        }

        let evaluation = self.evaluate(&program);
        let files = paths
            .iter()
            .zip(parsed)
            .map(|(path, id)| FileStatus {
                path: path.as_ref().to_path_buf(),
                ok: id.is_some_and(|id| evaluation.errors().all(|d| d.source() != Some(id))),
            })
            .collect();

        CheckReport {
            files,
            evaluation,
            failures,
        }
    }

    /// Render the constant table in the configured output format.
    pub fn render(&self, evaluation: &Evaluation) -> Result<String> {
        let opts = self.format_options();
        match self.config.output.format {
            OutputFormat::Table => Ok(render_text(&evaluation.table, &self.source_map, &opts)),
            OutputFormat::Json => {
                render_json(&evaluation.table, &self.source_map, &opts).into_diagnostic()
            }
        }
    }

    /// Unfolded three-address code for one file.
    pub fn tac(&self, path: impl AsRef<Path>) -> Result<TacProgram> {
        let module = self.parse_file(path)?;
        gofold_tac::lower_module(&module, &self.interner)
    }

    /// Three-address code with every constant folded to its value.
    pub fn tac_folded(&self, path: impl AsRef<Path>) -> Result<(TacProgram, Evaluation)> {
        let evaluation = self.evaluate_files(&[path])?;
        let tac = gofold_tac::fold_table(&evaluation.table, &self.format_options());
        Ok((tac, evaluation))
    }

    /// Attach the source snippet a diagnostic points into.
    pub fn report(&self, diagnostic: &Diagnostic) -> Report {
        let report = Report::new(diagnostic.clone());
        match diagnostic.source().and_then(|id| self.source_map.get(id)) {
            Some(file) => report.with_source_code(NamedSource::new(file.name(), file.content)),
            None => report,
        }
    }

    pub fn eval_options(&self) -> EvalOptions {
        let evaluator = &self.config.evaluator;
        EvalOptions {
            mode: match evaluator.mode {
                ModeSetting::Lenient => Mode::Lenient,
                ModeSetting::Go => Mode::Go,
            },
            int_size: evaluator.int_size,
            max_shift: evaluator.max_shift,
            redeclaration: match evaluator.redeclaration {
                RedeclarationSetting::Warn => Redeclaration::Warn,
                RedeclarationSetting::Error => Redeclaration::Error,
            },
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            float_digits: self.config.output.float_digits,
            machine_floats: self.config.evaluator.mode == ModeSetting::Go,
        }
    }

    pub fn config(&self) -> &GofoldConfig {
        &self.config
    }

    pub fn interner(&self) -> &SymbolInterner {
        &self.interner
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn go_file(src: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".go").unwrap();
        write!(file, "{src}").unwrap();
        file
    }

    #[test]
    fn test_parse_go_file() {
        let file = go_file("package main\n\nconst x = 42\n\nfunc main() { y := x }\n");
        let driver = Driver::new();
        let module = driver.parse_file(file.path()).unwrap();
        assert_eq!(module.items.len(), 1);
    }

    #[test]
    fn test_rejects_non_go_file() {
        let mut file = NamedTempFile::with_suffix(".rs").unwrap();
        writeln!(file, "fn main() {{}}").unwrap();
        assert!(Driver::new().parse_file(file.path()).is_err());
    }

    #[test]
    fn test_options_follow_config() {
        let config = GofoldConfig::from_toml("[evaluator]\nmode = \"go\"\nint_size = 32\n").unwrap();
        let driver = Driver::with_config(config);
        let opts = driver.eval_options();
        assert_eq!(opts.mode, Mode::Go);
        assert_eq!(opts.int_size, 32);
        assert!(opts.redeclaration_is_error());
        assert!(driver.format_options().machine_floats);
    }

    #[test]
    fn test_report_carries_source() {
        let file = go_file("package main\nconst x int8 = 300\n");
        let driver = Driver::new();
        let evaluation = driver.evaluate_files(&[file.path()]).unwrap();
        let diag = evaluation.errors().next().unwrap();
        let report = driver.report(diag);
        assert_eq!(report.to_string(), "constant 300 overflows int8");
        assert!(report.source_code().is_some());
    }
}
