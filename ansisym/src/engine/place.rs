//! Top-down placement.

use super::art;
use super::view::{BandView, GlyphicView, NormalBlockView, Placement, TileView};
use super::{GLYPH_MARGIN, LETTER_SPACE, PIN_LENGTH};
use crate::font::LETTER_HEIGHT;
use crate::geometry::{grid_up, Rect};
use crate::model::Glyph;

impl NormalBlockView<'_> {
    /// Stack the bands upward from the baseline in reverse order and
    /// stretch them to the block width.
    pub(crate) fn place(&mut self, min_width: i32) {
        let x = PIN_LENGTH;
        let width = grid_up(self.min_width).max(min_width);
        let mut y = 0;
        for band in self.bands.iter_mut().rev() {
            let rect = Rect::new(x, y, width, band.min.h);
            band.place(rect);
            y = rect.top();
        }
        self.rect = Some(Rect::new(x, 0, width, y));
    }
}

impl BandView<'_> {
    fn place(&mut self, rect: Rect) {
        self.rect = Some(rect);
        let kerning = self.up_kerning();
        for tile in self.tiles_mut() {
            tile.place(rect, kerning);
        }
    }
}

impl TileView<'_> {
    fn place(&mut self, band: Rect, kerning: i32) {
        match self {
            TileView::Empty => {}
            TileView::Pin(pin) => {
                let x = match pin.placement {
                    Placement::Right => band.right(),
                    _ => band.x - PIN_LENGTH,
                };
                pin.rect = Some(Rect::new(x, band.middle_y(), PIN_LENGTH, 0));
            }
            TileView::Glyphic(tile) => tile.place(band, kerning),
            TileView::Spacer(spacer) => {
                let w = spacer.tile.width;
                spacer.rect = Some(Rect::new(band.middle_x() - w / 2, band.y, w, spacer.tile.height));
            }
        }
    }
}

impl GlyphicView<'_> {
    fn place(&mut self, band: Rect, kerning: i32) {
        let total = self.min.w;
        let x = match self.placement {
            Placement::Left => band.x + GLYPH_MARGIN,
            Placement::Right => band.right() - GLYPH_MARGIN - total,
            Placement::Center => band.middle_x() - total / 2,
        };
        let rect = Rect::new(x, band.y + kerning, total, band.h);
        self.rect = Some(rect);

        let mut cursor = x;
        for glyph in &mut self.glyphs {
            let (y, h) = match glyph.glyph {
                Glyph::Graphic(kind) => {
                    let art = art::graphic(*kind);
                    (rect.y + art.base + (rect.h - art.height) / 2, art.height)
                }
                _ => (rect.y + (rect.h - LETTER_HEIGHT) / 2, LETTER_HEIGHT),
            };
            let placed = Rect::new(cursor, y, glyph.width, h);
            glyph.rect = Some(placed);
            cursor = placed.right() + LETTER_SPACE;
        }
    }
}
