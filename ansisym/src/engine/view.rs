//! The view tree: one node per model node, holding layout state.
//!
//! Views borrow the model. Sizes are filled in by measurement, rectangles by
//! placement; `None` means not placed yet.

use std::collections::BTreeMap;

use super::pins::PinMap;
use crate::geometry::{Point, Rect};
use crate::model::{
    Band, BandKind, Block, Glyph, GlyphicTile, GraphicKind, NormalBlock, PinTile, PinType,
    SpacerTile, Tile, UnusedBlock,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Position of a tile within its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Left,
    Center,
    Right,
}

/// A laid-out attribute text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrView {
    pub name: String,
    pub value: String,
    pub at: Point,
}

#[derive(Debug)]
pub enum BlockView<'p> {
    Normal(NormalBlockView<'p>),
    /// Unused blocks take part in validation only.
    Unused(&'p UnusedBlock),
}

impl<'p> BlockView<'p> {
    pub fn new(block: &'p Block) -> Self {
        match block {
            Block::Normal(b) => BlockView::Normal(NormalBlockView::new(b)),
            Block::Unused(u) => BlockView::Unused(u),
        }
    }

    pub fn as_normal(&self) -> Option<&NormalBlockView<'p>> {
        match self {
            BlockView::Normal(b) => Some(b),
            BlockView::Unused(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct NormalBlockView<'p> {
    pub block: &'p NormalBlock,
    pub bands: Vec<BandView<'p>>,
    /// Widest band minimum, before grid snapping.
    pub min_width: i32,
    pub rect: Option<Rect>,
    pub pin_maps: BTreeMap<String, PinMap>,
    /// Attribute texts per package, in render order.
    pub attrs: BTreeMap<String, Vec<AttrView>>,
}

impl<'p> NormalBlockView<'p> {
    pub fn new(block: &'p NormalBlock) -> Self {
        Self {
            block,
            bands: block.bands.iter().map(BandView::new).collect(),
            min_width: 0,
            rect: None,
            pin_maps: BTreeMap::new(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &'p str {
        self.block.reference_name()
    }

    /// The neck band and whether it sits directly above the bottom band.
    pub fn find_neck(&self) -> Option<(&BandView<'p>, bool)> {
        let index = self.bands.iter().position(|b| b.band.is_neck())?;
        let at_bottom = self
            .bands
            .get(index + 1)
            .is_some_and(|b| b.band.is_bottom());
        Some((&self.bands[index], at_bottom))
    }
}

#[derive(Debug)]
pub struct BandView<'p> {
    pub band: &'p Band,
    pub left: TileView<'p>,
    pub center: TileView<'p>,
    pub right: TileView<'p>,
    /// Minimum size; the height is grid snapped.
    pub min: Size,
    pub rect: Option<Rect>,
}

impl<'p> BandView<'p> {
    pub fn new(band: &'p Band) -> Self {
        let (left, center, right) = match &band.kind {
            BandKind::Io {
                left,
                center,
                right,
            } => (
                TileView::new(left, Placement::Left),
                TileView::new(center, Placement::Center),
                TileView::new(right, Placement::Right),
            ),
            BandKind::Top { center } | BandKind::Neck { center } | BandKind::Text { center, .. } => {
                (TileView::Empty, TileView::new(center, Placement::Center), TileView::Empty)
            }
            BandKind::Bottom | BandKind::Separator { .. } => {
                (TileView::Empty, TileView::Empty, TileView::Empty)
            }
        };
        Self {
            band,
            left,
            center,
            right,
            min: Size::default(),
            rect: None,
        }
    }

    pub fn up_kerning(&self) -> i32 {
        match self.band.kind {
            BandKind::Text { up_kerning, .. } => up_kerning,
            _ => 0,
        }
    }

    pub fn tiles(&self) -> [&TileView<'p>; 3] {
        [&self.left, &self.center, &self.right]
    }

    pub fn tiles_mut(&mut self) -> [&mut TileView<'p>; 3] {
        [&mut self.left, &mut self.center, &mut self.right]
    }

    /// Pins on the block edges, left then right.
    pub fn pins(&self) -> impl Iterator<Item = &PinView<'p>> {
        [&self.left, &self.right].into_iter().filter_map(TileView::as_pin)
    }
}

#[derive(Debug)]
pub enum TileView<'p> {
    Empty,
    Pin(PinView<'p>),
    Glyphic(GlyphicView<'p>),
    Spacer(SpacerView),
}

impl<'p> TileView<'p> {
    /// View of `tile` at `placement`. A pin away from the block edges gets
    /// no view.
    pub fn new(tile: &'p Tile, placement: Placement) -> Self {
        match tile {
            Tile::Empty => TileView::Empty,
            Tile::Pin(p) if placement != Placement::Center => TileView::Pin(PinView::new(p, placement)),
            Tile::Pin(_) => TileView::Empty,
            Tile::Glyphic(g) => TileView::Glyphic(GlyphicView::new(g, placement)),
            Tile::Spacer(s) => TileView::Spacer(SpacerView::new(*s)),
        }
    }

    pub fn as_pin(&self) -> Option<&PinView<'p>> {
        match self {
            TileView::Pin(p) => Some(p),
            _ => None,
        }
    }

    pub fn min(&self) -> Size {
        match self {
            TileView::Empty => Size::default(),
            TileView::Pin(p) => p.min,
            TileView::Glyphic(g) => g.min,
            TileView::Spacer(s) => Size::new(s.tile.width, s.tile.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TileView::Empty)
    }
}

#[derive(Debug)]
pub struct PinView<'p> {
    pub tile: &'p PinTile,
    pub placement: Placement,
    /// Type inferred from the flags; `None` leaves it to the placement.
    pub pin_type: Option<PinType>,
    pub min: Size,
    pub rect: Option<Rect>,
    /// Sequence number per package.
    pub pinseq: BTreeMap<String, u32>,
}

impl<'p> PinView<'p> {
    pub fn new(tile: &'p PinTile, placement: Placement) -> Self {
        Self {
            tile,
            placement,
            pin_type: tile.infer_type(),
            min: Size::default(),
            rect: None,
            pinseq: BTreeMap::new(),
        }
    }

    pub fn is_left(&self) -> bool {
        self.placement == Placement::Left
    }

    /// The `pintype` value: the inferred type, else in on the left and out
    /// on the right.
    pub fn resolved_type(&self) -> PinType {
        self.pin_type.unwrap_or(if self.is_left() {
            PinType::In
        } else {
            PinType::Out
        })
    }
}

#[derive(Debug)]
pub struct GlyphicView<'p> {
    pub tile: &'p GlyphicTile,
    pub placement: Placement,
    pub glyphs: Vec<GlyphView<'p>>,
    pub min: Size,
    pub rect: Option<Rect>,
}

impl<'p> GlyphicView<'p> {
    pub fn new(tile: &'p GlyphicTile, placement: Placement) -> Self {
        Self {
            tile,
            placement,
            glyphs: tile.glyphs.iter().map(GlyphView::new).collect(),
            min: Size::default(),
            rect: None,
        }
    }

    pub fn is_single_glyph(&self) -> bool {
        self.glyphs.len() == 1
    }
}

#[derive(Debug)]
pub struct GlyphView<'p> {
    pub glyph: &'p Glyph,
    pub width: i32,
    pub rect: Option<Rect>,
}

impl<'p> GlyphView<'p> {
    pub fn new(glyph: &'p Glyph) -> Self {
        Self {
            glyph,
            width: 0,
            rect: None,
        }
    }

    pub fn graphic(&self) -> Option<GraphicKind> {
        match self.glyph {
            Glyph::Graphic(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SpacerView {
    pub tile: SpacerTile,
    pub rect: Option<Rect>,
}

impl SpacerView {
    pub fn new(tile: SpacerTile) -> Self {
        Self { tile, rect: None }
    }
}
