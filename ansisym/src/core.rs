//! Generation entry points shared by the CLI and library users.
//! Loads a part, validates it and renders its symbols.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostics::{Aborted, Diagnostic, Diagnostics, Origin, SeverityCounts};
use crate::engine::{EngineError, SymbolEngine, SymbolFile};
use crate::font::FontCache;
use crate::input::PartSource;
use crate::model::Part;

#[derive(Debug, thiserror::Error)]
pub enum AnsisymError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Aborted(#[from] Aborted),
    #[error("Engine error: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for AnsisymError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Aborted(aborted) => AnsisymError::Aborted(aborted),
            other => AnsisymError::Engine(other),
        }
    }
}

/// Options for generation runs.
#[derive(Clone, Debug, Default)]
pub struct GenerateOptions {
    /// Treat warnings as blocking.
    pub strict_mode: bool,
    /// Block names to keep; empty keeps every block.
    pub blocks: Vec<String>,
}

/// Symbols and diagnostics of one part.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub symbols: Vec<SymbolFile>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: SeverityCounts,
}

impl GenerationResult {
    pub fn has_fatal(&self) -> bool {
        self.stats.fatal > 0 || self.stats.panic > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.stats.warning > 0
    }

    pub fn total_diagnostics(&self) -> usize {
        self.stats.total()
    }

    fn from_sink(file: Option<PathBuf>, symbols: Vec<SymbolFile>, sink: Diagnostics) -> Self {
        Self {
            file,
            symbols,
            stats: sink.counts(),
            diagnostics: sink.into_entries(),
        }
    }
}

/// Recursively discover JSON part descriptions in a directory.
pub fn discover_part_files(dir: &Path) -> Result<Vec<PathBuf>, AnsisymError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), AnsisymError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "target" {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    Ok(())
}

/// Core generation API used by the CLI.
pub struct AnsisymCore;

impl AnsisymCore {
    /// Read a JSON part description, reporting model construction problems
    /// into `sink`.
    pub fn load_part(path: &Path, sink: &mut Diagnostics) -> Result<Part, AnsisymError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_part(&text, sink)
    }

    pub fn parse_part(json: &str, sink: &mut Diagnostics) -> Result<Part, AnsisymError> {
        let source = PartSource::from_json(json)?;
        Ok(source.build(sink))
    }

    /// Validate without rendering.
    pub fn check(part: &Part) -> Diagnostics {
        let mut sink = Diagnostics::new();
        part.validate(&mut sink);
        sink
    }

    /// Validate `part` and, if nothing blocks, render its symbols.
    pub fn generate(part: &Part, options: &GenerateOptions) -> Result<GenerationResult, AnsisymError> {
        let mut sink = Diagnostics::new();
        let symbols = Self::generate_into(part, options, &mut sink)?;
        Ok(GenerationResult::from_sink(None, symbols, sink))
    }

    /// Load, validate and render one JSON part description.
    pub fn generate_file(path: &Path, options: &GenerateOptions) -> Result<GenerationResult, AnsisymError> {
        let mut sink = Diagnostics::new();
        let part = Self::load_part(path, &mut sink)?;
        let symbols = Self::generate_into(&part, options, &mut sink)?;
        Ok(GenerationResult::from_sink(Some(path.to_path_buf()), symbols, sink))
    }

    /// Parse, validate and render a JSON part description held in memory.
    pub fn generate_json(json: &str, options: &GenerateOptions) -> Result<GenerationResult, AnsisymError> {
        let mut sink = Diagnostics::new();
        let part = Self::parse_part(json, &mut sink)?;
        let symbols = Self::generate_into(&part, options, &mut sink)?;
        Ok(GenerationResult::from_sink(None, symbols, sink))
    }

    /// Generate every part description found under `dir`.
    pub fn generate_dir(dir: &Path, options: &GenerateOptions) -> Result<Vec<GenerationResult>, AnsisymError> {
        discover_part_files(dir)?
            .iter()
            .map(|path| Self::generate_file(path, options))
            .collect()
    }

    fn generate_into(
        part: &Part,
        options: &GenerateOptions,
        sink: &mut Diagnostics,
    ) -> Result<Vec<SymbolFile>, AnsisymError> {
        for name in &options.blocks {
            let known = part
                .normal_blocks()
                .any(|b| b.packages.iter().any(|p| &p.name == name));
            if !known {
                return Err(AnsisymError::Input(format!("no block named {}", name)));
            }
        }

        part.validate(sink);
        let counts = sink.counts();
        if sink.has_fatal_errors() {
            tracing::info!("Generation skipped: {} fatal diagnostic(s)", counts.fatal + counts.panic);
            return Ok(Vec::new());
        }
        if options.strict_mode && counts.warning > 0 {
            sink.info(
                "strict_mode",
                format!("{} warning(s) treated as errors.", counts.warning),
                Origin::NONE,
            );
            tracing::info!("Generation skipped: {} warning(s) in strict mode", counts.warning);
            return Ok(Vec::new());
        }

        let mut fonts = FontCache::new();
        let mut symbols = SymbolEngine::run(part, &mut fonts, sink)?;
        if !options.blocks.is_empty() {
            symbols.retain(|s| options.blocks.contains(&s.block));
        }
        tracing::info!(
            "Generated {} symbol(s) for {}",
            symbols.len(),
            part.attrs.get("device").map_or("part", |a| a.value.as_str())
        );
        Ok(symbols)
    }

    /// Write each symbol to `<dir>/<block>.sym`, returning the paths written.
    pub fn write_symbols(symbols: &[SymbolFile], dir: &Path) -> Result<Vec<PathBuf>, AnsisymError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let path = dir.join(symbol.file_name());
            std::fs::write(&path, symbol.to_string())?;
            written.push(path);
        }
        Ok(written)
    }
}
