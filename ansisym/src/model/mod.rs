//! The part model and its validation rules.
//!
//! A [`Part`] is built once (by the JSON loader or by hand) and is read-only
//! afterwards. [`Part::validate`] walks the whole tree without stopping at
//! the first failure.

pub mod attr;
pub mod band;
pub mod block;
pub mod directive;
pub mod glyph;
pub mod part;
pub mod tile;

pub use attr::{Attr, AttrDict};
pub use band::{Band, BandKind};
pub use block::{Block, NormalBlock, PackageBlock, UnusedBlock};
pub use directive::{Directive, DirectiveDict, DirectiveError, DirectiveKind, DirectiveValue};
pub use glyph::{Glyph, GlyphicTile, GraphicKind};
pub use part::{Part, RECOMMENDED_ATTRS, REQUIRED_ATTRS};
pub use tile::{PinFlag, PinTile, PinType, SpacerTile, Tile};
