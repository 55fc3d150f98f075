//! Bottom-up minimum sizes.

use super::art::{self, InsideArt};
use super::view::{BandView, GlyphView, GlyphicView, NormalBlockView, PinView, Size, TileView};
use super::{LayoutContext, LETTER_SPACE, MIN_WORD_SPACE, NECK_INDENT};
use crate::geometry::{grid_up, GRID_SPACING};
use crate::model::{BandKind, Glyph};

/// Space between a pin's near end and its label.
const PIN_NAME_INDENT: i32 = 25;
/// Minimum height of pin and glyphic tiles.
const TILE_HEIGHT: i32 = 2 * GRID_SPACING;

impl NormalBlockView<'_> {
    pub(crate) fn measure(&mut self, ctx: &LayoutContext<'_>) {
        let mut after_neck = false;
        for band in &mut self.bands {
            band.measure(ctx, after_neck);
            after_neck = band.band.is_neck();
        }
        self.min_width = self.bands.iter().map(|b| b.min.w).max().unwrap_or(0);
    }
}

impl BandView<'_> {
    fn measure(&mut self, ctx: &LayoutContext<'_>, after_neck: bool) {
        for tile in self.tiles_mut() {
            tile.measure(ctx);
        }
        let l = self.left.min();
        let c = self.center.min();
        let r = self.right.min();
        let min = match self.band.kind {
            BandKind::Io { .. } => {
                let w = if c.w > 0 {
                    2 * l.w.max(r.w) + 2 * MIN_WORD_SPACE + c.w
                } else {
                    l.w + r.w + MIN_WORD_SPACE
                };
                Size::new(w, l.h.max(c.h).max(r.h))
            }
            BandKind::Neck { .. } => Size::new(c.w + 2 * (NECK_INDENT + MIN_WORD_SPACE), c.h),
            BandKind::Separator { wide } => Size::new(0, if wide { TILE_HEIGHT } else { 0 }),
            BandKind::Top { .. } => Size::new(MIN_WORD_SPACE + c.w, GRID_SPACING + c.h),
            BandKind::Bottom => Size::new(0, if after_neck { 0 } else { GRID_SPACING }),
            BandKind::Text { .. } => Size::new(c.w + 2 * MIN_WORD_SPACE, c.h.max(TILE_HEIGHT)),
        };
        self.min = Size::new(min.w, grid_up(min.h));
    }
}

impl TileView<'_> {
    fn measure(&mut self, ctx: &LayoutContext<'_>) {
        match self {
            TileView::Empty | TileView::Spacer(_) => {}
            TileView::Pin(pin) => pin.measure(ctx),
            TileView::Glyphic(tile) => tile.measure(ctx),
        }
    }
}

impl PinView<'_> {
    fn measure(&mut self, ctx: &LayoutContext<'_>) {
        let w = ctx.pin_font.measure(&self.tile.name) + PIN_NAME_INDENT + self.art_width();
        self.min = Size::new(w, TILE_HEIGHT);
    }

    /// Width taken inside the block by clock, Schmitt or tristate art.
    pub(crate) fn art_width(&self) -> i32 {
        InsideArt::of(self.tile).map_or(0, InsideArt::width)
    }
}

impl GlyphicView<'_> {
    fn measure(&mut self, ctx: &LayoutContext<'_>) {
        for glyph in &mut self.glyphs {
            glyph.measure(ctx);
        }
        let gaps = self.glyphs.len().saturating_sub(1) as i32;
        let w = self.glyphs.iter().map(|g| g.width).sum::<i32>() + gaps * LETTER_SPACE;
        self.min = Size::new(w, TILE_HEIGHT);
    }
}

impl GlyphView<'_> {
    fn measure(&mut self, ctx: &LayoutContext<'_>) {
        self.width = match self.glyph {
            Glyph::Graphic(kind) => art::graphic(*kind).width,
            glyph => glyph.resolve(ctx.attrs).map_or(0, |text| ctx.text_font.measure(text)),
        };
    }
}
