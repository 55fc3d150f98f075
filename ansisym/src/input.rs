//! JSON part descriptions.
//!
//! A [`PartSource`] mirrors the part model with plain serde types. Glyphic
//! tiles are written as template strings and pin flags with their source
//! symbols, so building the model from it reports the same problems a
//! symbol source would.
//!
//! ```json
//! {
//!   "attrs": [{"name": "refdes", "value": "U?"}, {"name": "device", "value": "7404"}],
//!   "directives": {"minwidth": 400, "showspacers": null},
//!   "blocks": [
//!     {"kind": "block", "packages": [{"package": "DIP14", "name": "7404-1"}],
//!      "bands": [
//!        {"band": "top", "center": "1"},
//!        {"band": "io", "left": {"name": "A", "pins": {"DIP14": [1]}},
//!                       "right": {"name": "Y", "flags": ["~"], "pins": {"DIP14": [2]}}},
//!        {"band": "bottom"}
//!      ]},
//!     {"kind": "unused", "package": "DIP14", "pins": [3, 4]}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Origin};
use crate::model::{
    Attr, AttrDict, Band, BandKind, Block, DirectiveDict, DirectiveValue, GlyphicTile, NormalBlock,
    PackageBlock, Part, PinFlag, PinTile, SpacerTile, Tile, UnusedBlock,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSource {
    #[serde(default)]
    pub attrs: Vec<AttrSource>,
    /// Directive name to value; `null` sets a flag directive.
    #[serde(default)]
    pub directives: BTreeMap<String, Option<DirectiveValue>>,
    #[serde(default)]
    pub blocks: Vec<BlockSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrSource {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    pub package: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockSource {
    Block {
        packages: Vec<PackageSource>,
        #[serde(default)]
        bands: Vec<BandSource>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
    },
    Unused {
        package: String,
        pins: Vec<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSource {
    #[serde(flatten)]
    pub kind: BandKindSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "band", rename_all = "lowercase")]
pub enum BandKindSource {
    Top {
        #[serde(default)]
        center: Option<TileSource>,
    },
    Bottom,
    Io {
        #[serde(default)]
        left: Option<TileSource>,
        #[serde(default)]
        center: Option<TileSource>,
        #[serde(default)]
        right: Option<TileSource>,
    },
    Neck {
        #[serde(default)]
        center: Option<TileSource>,
    },
    Separator {
        #[serde(default)]
        wide: bool,
    },
    Text {
        #[serde(default)]
        center: Option<TileSource>,
        #[serde(default)]
        kerning: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileSource {
    /// Glyph template such as `"&ge&1"` or `"@device@"`.
    Glyphs(String),
    Pin {
        #[serde(default)]
        name: String,
        #[serde(default)]
        flags: Vec<String>,
        pins: BTreeMap<String, Vec<u32>>,
    },
    Spacer {
        width: i32,
        #[serde(default)]
        height: i32,
    },
}

impl PartSource {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the part model, reporting problems found while building.
    pub fn build(&self, sink: &mut Diagnostics) -> Part {
        let mut attrs = AttrDict::new();
        for a in &self.attrs {
            if attrs.contains(&a.name) {
                sink.warning(
                    "attr_duplicate",
                    format!("Attribute {} given more than once; last value kept.", a.name),
                    Origin::NONE.at_line(a.line),
                );
            }
            attrs.add(Attr::new(a.name.clone(), &a.value));
        }

        let mut directives = DirectiveDict::new();
        for (name, value) in &self.directives {
            let raw = value.as_ref().map(DirectiveValue::to_string);
            directives.apply(name, raw.as_deref(), sink, Origin::NONE);
        }

        let blocks = self
            .blocks
            .iter()
            .map(|b| b.build(&mut attrs, sink))
            .collect();
        Part::new(attrs, blocks, directives)
    }
}

impl BlockSource {
    fn build(&self, attrs: &mut AttrDict, sink: &mut Diagnostics) -> Block {
        match self {
            BlockSource::Block {
                packages,
                bands,
                line,
            } => {
                let packages: Vec<PackageBlock> = packages
                    .iter()
                    .map(|p| PackageBlock::new(p.package.clone(), p.name.clone()))
                    .collect();
                let reference = packages.first().map(|p| p.name.clone()).unwrap_or_default();
                let bands = bands
                    .iter()
                    .map(|b| b.build(attrs, &reference, sink))
                    .collect();
                let mut block = NormalBlock::new(packages, bands);
                block.line = *line;
                Block::Normal(block)
            }
            BlockSource::Unused {
                package,
                pins,
                line,
            } => {
                let mut block = UnusedBlock::new(package.clone(), pins.clone());
                block.line = *line;
                Block::Unused(block)
            }
        }
    }
}

impl BandSource {
    fn build(&self, attrs: &mut AttrDict, block: &str, sink: &mut Diagnostics) -> Band {
        let origin = Origin::block(block).at_line(self.line);
        let mut tile = |source: &Option<TileSource>| match source {
            Some(t) => t.build(attrs, block, sink, origin),
            None => Tile::Empty,
        };
        let kind = match &self.kind {
            BandKindSource::Top { center } => BandKind::Top {
                center: tile(center),
            },
            BandKindSource::Bottom => BandKind::Bottom,
            BandKindSource::Io {
                left,
                center,
                right,
            } => BandKind::Io {
                left: tile(left),
                center: tile(center),
                right: tile(right),
            },
            BandKindSource::Neck { center } => BandKind::Neck {
                center: tile(center),
            },
            BandKindSource::Separator { wide } => BandKind::Separator { wide: *wide },
            BandKindSource::Text { center, kerning } => BandKind::Text {
                center: tile(center),
                up_kerning: *kerning,
            },
        };
        Band {
            kind,
            line: self.line,
        }
    }
}

impl TileSource {
    fn build(&self, attrs: &mut AttrDict, block: &str, sink: &mut Diagnostics, origin: Origin<'_>) -> Tile {
        match self {
            TileSource::Glyphs(template) => {
                GlyphicTile::from_template(template, attrs, block, sink, origin).into()
            }
            TileSource::Pin { name, flags, pins } => {
                let mut parsed = Vec::new();
                for flag in flags {
                    match flag.parse::<PinFlag>() {
                        Ok(f) => parsed.push(f),
                        Err(e) => sink.fatal("pin_flag", e.to_string(), origin),
                    }
                }
                PinTile::new(name.clone(), parsed, pins.clone()).into()
            }
            TileSource::Spacer { width, height } => SpacerTile::new(*width, *height).into(),
        }
    }
}
