//! Ansisym - ANSI-style schematic symbol generator for gEDA/gschem
//!
//! This library lays out rectangular logic symbols (bands of pins, glyphs
//! and spacers stacked inside a box, with an optional neck) and renders them
//! as gschem `.sym` files. Parts are validated before layout, so a symbol is
//! only produced for a structurally sound description.
//!
//! # Quick Start
//!
//! ```no_run
//! use ansisym::{AnsisymCore, GenerateOptions};
//! use std::path::Path;
//!
//! let result = AnsisymCore::generate_file(
//!     Path::new("7400.json"),
//!     &GenerateOptions::default(),
//! ).unwrap();
//!
//! for diagnostic in &result.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! for symbol in &result.symbols {
//!     println!("{}:\n{}", symbol.file_name(), symbol);
//! }
//! ```
//!
//! # Features
//!
//! - **Part model**: attributes, directives, blocks, bands and tiles with
//!   structural validation and pin coverage checks
//! - **Layout**: grid-snapped minimum sizes, neck outlines, pin decorations
//! - **Slotting**: `numslots`, `slotdef` and `slot` attributes per package
//! - **JSON input**: part descriptions loaded with serde

pub mod core;
pub mod diagnostics;
pub mod engine;
pub mod font;
pub mod geometry;
pub mod input;
pub mod model;

// Re-export main types
pub use core::{
    discover_part_files, AnsisymCore, AnsisymError, GenerateOptions, GenerationResult,
};
pub use diagnostics::{Aborted, Diagnostic, Diagnostics, Severity, SeverityCounts};
pub use engine::{EngineError, Stage, SymbolEngine, SymbolFile};
pub use font::{FontCache, FontMetrics};
pub use input::PartSource;
pub use model::Part;

/// Parse a JSON part description and generate its symbols (convenience wrapper).
pub fn generate_from_json(
    json: &str,
    options: &GenerateOptions,
) -> Result<GenerationResult, AnsisymError> {
    AnsisymCore::generate_json(json, options)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::model::{
        Attr, AttrDict, Band, Block, DirectiveDict, Glyph, GlyphicTile, NormalBlock, PackageBlock, Part,
        PinFlag, PinTile, SpacerTile, Tile, UnusedBlock,
    };
    pub use crate::{
        AnsisymCore, AnsisymError, Diagnostic, Diagnostics, GenerateOptions, GenerationResult,
        Severity, SymbolFile,
    };
}
