//! Serialization of placed views into `.sym` records.

use super::art;
use super::view::{BandView, GlyphicView, NormalBlockView, PinView, TileView};
use super::{LayoutContext, FILE_VERSION, PIN_LENGTH, REFDES_OFFSET};
use crate::diagnostics::{Aborted, Diagnostics, Origin};
use crate::geometry::{Dash, Point, Stroke};
use crate::model::{BandKind, Glyph};

/// gEDA color indices.
const COLOR_ATTRIBUTE: i32 = 5;
const COLOR_TEXT: i32 = 9;

/// gEDA text alignments.
const ALIGN_LOWER_LEFT: i32 = 0;
const ALIGN_MIDDLE_LEFT: i32 = 1;
const ALIGN_LOWER_MIDDLE: i32 = 3;
const ALIGN_LOWER_RIGHT: i32 = 6;
const ALIGN_MIDDLE_RIGHT: i32 = 7;

/// Font size of part attributes and the refdes.
const ATTR_SIZE: i32 = 10;

const PIN_TEXT_GAP: i32 = 15;
const PIN_NUMBER_OFFSET: i32 = 175;
const PIN_TYPE_OFFSET: i32 = 1200;

const SPACER_LINE_WIDTH: i32 = 5;
const SPACER_DASH: Dash = Dash::new(2, 20, 20);

/// `T x y color size visibility show angle alignment lines`
fn text_record(at: Point, color: i32, size: i32, visible: bool, show: i32, align: i32) -> String {
    format!(
        "T {} {} {} {} {} {} 0 {} 1",
        at.x, at.y, color, size, visible as i32, show, align
    )
}

impl NormalBlockView<'_> {
    /// Lines of the symbol file for `package`.
    pub(crate) fn render(
        &self,
        package: &str,
        ctx: &LayoutContext<'_>,
        sink: &mut Diagnostics,
    ) -> Result<Vec<String>, Aborted> {
        let mut lines = vec![FILE_VERSION.to_string()];

        let mut strokes = self.outline();
        for band in &self.bands {
            strokes.extend(band.strokes(package, ctx));
        }
        lines.extend(strokes.iter().map(|s| s.render(Point::ORIGIN)));

        for attr in self.attrs.get(package).into_iter().flatten() {
            lines.push(text_record(attr.at, COLOR_ATTRIBUTE, ATTR_SIZE, false, 0, ALIGN_LOWER_LEFT));
            lines.push(format!("{}={}", attr.name, attr.value));
        }

        for band in &self.bands {
            band.render(package, ctx, sink, &mut lines)?;
        }
        tracing::trace!("Rendered {} line(s) for {} in {}", lines.len(), self.name(), package);
        Ok(lines)
    }
}

impl BandView<'_> {
    fn strokes(&self, package: &str, ctx: &LayoutContext<'_>) -> Vec<Stroke> {
        let Some(rect) = self.rect else {
            return Vec::new();
        };
        if let BandKind::Separator { wide } = self.band.kind {
            let y = rect.y + if wide { rect.h / 2 } else { 0 };
            return vec![Stroke::new(Point::new(rect.x, y), Point::new(rect.right(), y))];
        }
        let mut out = Vec::new();
        for tile in self.tiles() {
            match tile {
                TileView::Empty => {}
                TileView::Pin(pin) => out.extend(pin.strokes(package, ctx.directives.bidir_style())),
                TileView::Glyphic(glyphic) => out.extend(glyphic.strokes()),
                TileView::Spacer(spacer) if ctx.directives.show_spacers() => {
                    let Some(lo) = spacer.rect else { continue };
                    let dashed = |a: Point, b: Point| {
                        Stroke::new(a, b).with_width(SPACER_LINE_WIDTH).dashed(SPACER_DASH)
                    };
                    let p1 = lo.origin();
                    let p2 = p1 + Point::new(lo.w, 0);
                    let p3 = p2 + Point::new(0, lo.h);
                    let p4 = p1 + Point::new(0, lo.h);
                    out.push(dashed(p1, p2));
                    out.push(dashed(p3, p4));
                    if lo.x != rect.x {
                        out.push(dashed(p2, p3));
                        out.push(dashed(p4, p1));
                    }
                }
                TileView::Spacer(_) => {}
            }
        }
        out
    }

    fn render(
        &self,
        package: &str,
        ctx: &LayoutContext<'_>,
        sink: &mut Diagnostics,
        lines: &mut Vec<String>,
    ) -> Result<(), Aborted> {
        if let (BandKind::Top { .. }, Some(rect)) = (&self.band.kind, self.rect) {
            if let Some(refdes) = ctx.attrs.get("refdes").filter(|a| !a.is_referenced_by(ctx.block)) {
                let at = Point::new(rect.middle_x(), rect.top() + REFDES_OFFSET);
                lines.push(text_record(at, COLOR_ATTRIBUTE, ATTR_SIZE, true, 1, ALIGN_LOWER_MIDDLE));
                lines.push(format!("refdes={}", refdes.value));
            }
        }
        for tile in self.tiles() {
            match tile {
                TileView::Pin(pin) => pin.render(package, ctx, sink, lines)?,
                TileView::Glyphic(glyphic) => glyphic.render(ctx, lines),
                TileView::Empty | TileView::Spacer(_) => {}
            }
        }
        Ok(())
    }
}

impl GlyphicView<'_> {
    fn strokes(&self) -> Vec<Stroke> {
        let mut out = Vec::new();
        for glyph in &self.glyphs {
            if let (Some(kind), Some(rect)) = (glyph.graphic(), glyph.rect) {
                let origin = rect.origin();
                out.extend(art::graphic(kind).strokes.iter().map(|s| s.displaced(origin)));
            }
        }
        out
    }

    fn render(&self, ctx: &LayoutContext<'_>, lines: &mut Vec<String>) {
        let single = self.is_single_glyph();
        for glyph in &self.glyphs {
            let Some(rect) = glyph.rect else { continue };
            let (at, align) = if single {
                (Point::new(rect.middle_x(), rect.y), ALIGN_LOWER_MIDDLE)
            } else {
                (rect.origin(), ALIGN_LOWER_LEFT)
            };
            let body = match glyph.glyph {
                Glyph::Text(text) => text.clone(),
                Glyph::Ref { attr, .. } => match ctx.attrs.get(attr) {
                    Some(a) => format!("{}={}", a.name, a.value),
                    None => continue,
                },
                Glyph::Graphic(_) => continue,
            };
            lines.push(text_record(at, COLOR_TEXT, ctx.text_font.size(), true, 1, align));
            lines.push(body);
        }
    }
}

impl PinView<'_> {
    fn render(
        &self,
        package: &str,
        ctx: &LayoutContext<'_>,
        sink: &mut Diagnostics,
        lines: &mut Vec<String>,
    ) -> Result<(), Aborted> {
        if self.tile.is_shadow(package) {
            return Ok(());
        }
        let Some(rect) = self.rect else {
            return Ok(());
        };
        let Some(&seq) = self.pinseq.get(package) else {
            return Err(sink.panic(
                "pin_map",
                format!("Pin '{}' has no sequence number in package {}.", self.tile.name, package),
                Origin::block(ctx.block),
            ));
        };
        let left = self.is_left();
        let (near, far) = if left { (rect.right(), rect.x) } else { (rect.x, rect.right()) };
        let y = rect.y;
        let sign = if left { -1 } else { 1 };
        let pin_size = ctx.pin_font.size();
        let text_size = ctx.text_font.size();

        lines.push(format!("P {} {} {} {} 1 0 0", far, y, near, y));
        lines.push("{".to_string());
        if !self.tile.is_anonymous() {
            let x = near - sign * (PIN_TEXT_GAP + self.art_width());
            let align = if left { ALIGN_MIDDLE_LEFT } else { ALIGN_MIDDLE_RIGHT };
            lines.push(text_record(Point::new(x, y), COLOR_ATTRIBUTE, pin_size, true, 1, align));
            lines.push(format!("pinlabel={}", self.tile.name));
        }
        if let Some(number) = self.tile.pin_list(package).first() {
            let at = Point::new(near + sign * PIN_NUMBER_OFFSET, y + PIN_TEXT_GAP);
            let align = if left { ALIGN_LOWER_RIGHT } else { ALIGN_LOWER_LEFT };
            lines.push(text_record(at, COLOR_ATTRIBUTE, pin_size, true, 1, align));
            lines.push(format!("pinnumber={}", number));
        }
        let hidden_align = if left { ALIGN_MIDDLE_RIGHT } else { ALIGN_MIDDLE_LEFT };
        let at = Point::new(near + sign * PIN_LENGTH, y);
        lines.push(text_record(at, COLOR_ATTRIBUTE, text_size, false, 0, hidden_align));
        lines.push(format!("pinseq={}", seq));
        let at = Point::new(near + sign * PIN_TYPE_OFFSET, y + PIN_TEXT_GAP);
        lines.push(text_record(at, COLOR_ATTRIBUTE, text_size, false, 0, hidden_align));
        lines.push(format!("pintype={}", self.resolved_type()));
        lines.push("}".to_string());
        Ok(())
    }
}
