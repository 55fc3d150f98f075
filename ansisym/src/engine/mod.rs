//! Layout and rendering of gschem symbols.
//!
//! [`SymbolEngine`] builds a view tree over a validated [`Part`] and walks
//! it through the layout stages in order:
//!
//! 1. [`SymbolEngine::measure`]: minimum sizes, bottom-up.
//! 2. [`SymbolEngine::place`]: absolute coordinates, pin sequence numbers,
//!    slot attributes and attribute text positions.
//! 3. [`SymbolEngine::render`]: one [`SymbolFile`] per block name.
//!
//! The engine does not validate. Running it on a part that failed
//! validation gives meaningless geometry but never panics.

mod art;
mod measure;
mod outline;
pub mod pins;
mod place;
mod render;
pub mod view;

use std::fmt;

use serde::Serialize;

use crate::diagnostics::{Aborted, Diagnostics};
use crate::font::{FontCache, FontMetrics};
use crate::model::{AttrDict, DirectiveDict, Part};

pub use pins::PinMap;
pub use view::{BlockView, NormalBlockView};

/// Length of a pin line.
pub const PIN_LENGTH: i32 = 300;
pub const MIN_WORD_SPACE: i32 = 100;
pub const LETTER_SPACE: i32 = 10;
/// Space between a glyphic tile and the band edge it is anchored to.
pub const GLYPH_MARGIN: i32 = 15;
/// Horizontal inset of a neck band from the block sides.
pub const NECK_INDENT: i32 = 200;
/// Distance of the refdes text above the block.
pub const REFDES_OFFSET: i32 = 25;
pub const INVERT_LENGTH: i32 = 150;
pub const INVERT_HEIGHT: i32 = 75;
/// gschem file format version line.
pub const FILE_VERSION: &str = "v 20100214 1";

/// Progress of a view tree through the layout stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Unmeasured,
    Measured,
    Placed,
    Rendered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unmeasured => "unmeasured",
            Stage::Measured => "measured",
            Stage::Placed => "placed",
            Stage::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot {step} a view tree that is {found}; it must be {expected}")]
    OutOfOrder {
        step: &'static str,
        expected: Stage,
        found: Stage,
    },
    #[error(transparent)]
    Aborted(#[from] Aborted),
}

/// Read-only state handed down while laying out one block.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub directives: &'a DirectiveDict,
    pub attrs: &'a AttrDict,
    pub text_font: &'a FontMetrics,
    pub pin_font: &'a FontMetrics,
    /// Reference name of the enclosing block.
    pub block: &'a str,
}

/// A rendered `.sym` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolFile {
    /// Block name; also the file stem.
    pub block: String,
    pub package: String,
    pub lines: Vec<String>,
}

impl SymbolFile {
    pub fn file_name(&self) -> String {
        format!("{}.sym", self.block)
    }
}

impl fmt::Display for SymbolFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Lays out and renders the blocks of one part.
pub struct SymbolEngine<'p> {
    part: &'p Part,
    text_font: FontMetrics,
    pin_font: FontMetrics,
    blocks: Vec<BlockView<'p>>,
    stage: Stage,
}

impl<'p> SymbolEngine<'p> {
    pub fn new(part: &'p Part, fonts: &mut FontCache) -> Self {
        let directives = &part.directives;
        let font_name = directives.font_name();
        Self {
            part,
            text_font: fonts.get(&font_name, directives.text_font_size()),
            pin_font: fonts.get(&font_name, directives.pin_font_size()),
            blocks: part.blocks.iter().map(BlockView::new).collect(),
            stage: Stage::Unmeasured,
        }
    }

    /// Measure, place and render in one go.
    pub fn run(
        part: &'p Part,
        fonts: &mut FontCache,
        sink: &mut Diagnostics,
    ) -> Result<Vec<SymbolFile>, EngineError> {
        let mut engine = Self::new(part, fonts);
        engine.measure()?;
        engine.place(sink)?;
        engine.render(sink)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn blocks(&self) -> &[BlockView<'p>] {
        &self.blocks
    }

    fn enter(&mut self, step: &'static str, expected: Stage) -> Result<(), EngineError> {
        if self.stage != expected {
            return Err(EngineError::OutOfOrder {
                step,
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }

    /// Compute minimum sizes of every view.
    pub fn measure(&mut self) -> Result<(), EngineError> {
        self.enter("measure", Stage::Unmeasured)?;
        let Self {
            part,
            text_font,
            pin_font,
            blocks,
            ..
        } = self;
        for view in blocks.iter_mut() {
            if let BlockView::Normal(block) = view {
                let ctx = LayoutContext {
                    directives: &part.directives,
                    attrs: &part.attrs,
                    text_font,
                    pin_font,
                    block: block.name(),
                };
                block.measure(&ctx);
            }
        }
        self.stage = Stage::Measured;
        Ok(())
    }

    /// Assign coordinates, pin sequence numbers and slot attributes.
    pub fn place(&mut self, sink: &mut Diagnostics) -> Result<(), EngineError> {
        self.enter("place", Stage::Measured)?;
        let directives = &self.part.directives;
        let widest = self
            .blocks
            .iter()
            .filter_map(BlockView::as_normal)
            .map(|b| b.min_width)
            .max()
            .unwrap_or(0);
        let shared_width = if directives.same_width() {
            crate::geometry::grid_up(widest)
        } else {
            0
        };
        let min_width = directives.min_width().max(shared_width);

        let Self { part, blocks, .. } = self;
        for view in blocks.iter_mut() {
            if let BlockView::Normal(block) = view {
                block.place(min_width);
                block.sequence_pins();
                block.layout_attrs(&part.attrs, sink)?;
                tracing::debug!(
                    "Placed block {} at {:?} with {} band(s)",
                    block.name(),
                    block.rect,
                    block.bands.len()
                );
            }
        }
        self.stage = Stage::Placed;
        Ok(())
    }

    /// Render one symbol file per block name, in block order.
    pub fn render(&mut self, sink: &mut Diagnostics) -> Result<Vec<SymbolFile>, EngineError> {
        self.enter("render", Stage::Placed)?;
        let mut files = Vec::new();
        for block in self.blocks.iter().filter_map(BlockView::as_normal) {
            let ctx = LayoutContext {
                directives: &self.part.directives,
                attrs: &self.part.attrs,
                text_font: &self.text_font,
                pin_font: &self.pin_font,
                block: block.name(),
            };
            for pb in &block.block.packages {
                let lines = block.render(&pb.package, &ctx, sink)?;
                files.push(SymbolFile {
                    block: pb.name.clone(),
                    package: pb.package.clone(),
                    lines,
                });
            }
        }
        self.stage = Stage::Rendered;
        Ok(files)
    }
}

#[cfg(test)]
mod tests;
