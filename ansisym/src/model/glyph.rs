//! Glyphs and glyphic tiles.
//!
//! A glyphic tile is built from a template string. Plain text becomes text
//! glyphs; `&name&` selects a canned graphic and `@name@` shows the value of
//! a part attribute. `&&` is a literal ampersand.

use std::fmt;

use super::attr::AttrDict;
use crate::diagnostics::{Diagnostics, Origin};

/// The canned stroke graphics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicKind {
    Tristate,
    Driver,
    GreaterEqual,
    /// Layout test pattern.
    Testbox,
}

impl GraphicKind {
    pub const ALL: [GraphicKind; 4] = [
        GraphicKind::Tristate,
        GraphicKind::Driver,
        GraphicKind::GreaterEqual,
        GraphicKind::Testbox,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GraphicKind::Tristate => "tristate",
            GraphicKind::Driver => "driver",
            GraphicKind::GreaterEqual => "ge",
            GraphicKind::Testbox => "testbox",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.name() == name)
    }
}

impl fmt::Display for GraphicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Glyph {
    /// Literal text.
    Text(String),
    /// The value of attribute `attr`, claimed by block `block`.
    Ref { attr: String, block: String },
    Graphic(GraphicKind),
}

impl Glyph {
    pub fn text(s: impl Into<String>) -> Self {
        Glyph::Text(s.into())
    }

    /// Text shown by a text or reference glyph.
    pub fn resolve<'a>(&'a self, attrs: &'a AttrDict) -> Option<&'a str> {
        match self {
            Glyph::Text(s) => Some(s),
            Glyph::Ref { attr, .. } => attrs.get(attr).map(|a| a.value.as_str()),
            Glyph::Graphic(_) => None,
        }
    }
}

/// Attributes that can not be shown through a reference glyph.
const UNREFERENCEABLE: [&str; 1] = ["device"];

/// One piece of a template after escape splitting.
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'t> {
    Literal(String),
    Graphic(&'t str),
    Reference(&'t str),
}

/// Split `template` on `&name&` and `@name@`. `&&` becomes a literal `&`
/// that merges with surrounding text. Unpaired markers stay literal.
fn split_template(template: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut rest = template;
    while let Some(c) = rest.chars().next() {
        let close = match c {
            '&' | '@' => rest[1..].find(c).map(|i| i + 1),
            _ => None,
        };
        match close {
            Some(1) if c == '&' => {
                text.push('&');
                rest = &rest[2..];
            }
            Some(end) if end > 1 => {
                if !text.is_empty() {
                    chunks.push(Chunk::Literal(std::mem::take(&mut text)));
                }
                let name = &rest[1..end];
                chunks.push(if c == '&' {
                    Chunk::Graphic(name)
                } else {
                    Chunk::Reference(name)
                });
                rest = &rest[end + 1..];
            }
            _ => {
                text.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !text.is_empty() {
        chunks.push(Chunk::Literal(text));
    }
    chunks
}

/// A tile holding a row of glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphicTile {
    pub glyphs: Vec<Glyph>,
}

impl GlyphicTile {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        Self { glyphs }
    }

    /// Build a tile from a template, claiming referenced attributes for
    /// `block`. Problems are reported and the offending piece is dropped.
    pub fn from_template(
        template: &str,
        attrs: &mut AttrDict,
        block: &str,
        sink: &mut Diagnostics,
        origin: Origin<'_>,
    ) -> Self {
        let mut glyphs = Vec::new();
        for chunk in split_template(template) {
            match chunk {
                Chunk::Literal(text) => glyphs.push(Glyph::Text(text)),
                Chunk::Graphic(name) => match GraphicKind::from_name(name) {
                    Some(kind) => glyphs.push(Glyph::Graphic(kind)),
                    None => sink.fatal(
                        "glyph_escape",
                        format!("Invalid glyph escape: &{}&", name),
                        origin,
                    ),
                },
                Chunk::Reference(name) => {
                    let Some(attr) = attrs.get_mut(name) else {
                        sink.fatal(
                            "attr_undefined",
                            format!("Attribute \"{}\" not defined.", name),
                            origin,
                        );
                        continue;
                    };
                    if attr.is_referenced_by(block) {
                        sink.fatal(
                            "attr_referenced",
                            format!(
                                "Attribute \"{}\" already referenced by block: {}",
                                name, block
                            ),
                            origin,
                        );
                    } else if UNREFERENCEABLE.contains(&name) {
                        sink.warning(
                            "attr_unreferenceable",
                            format!(
                                "'{}' attributes can not be @referenced@, value substituted as plain text.",
                                name
                            ),
                            origin,
                        );
                        glyphs.push(Glyph::Text(attr.value.clone()));
                    } else {
                        attr.add_reference(block);
                        glyphs.push(Glyph::Ref {
                            attr: name.to_string(),
                            block: block.to_string(),
                        });
                    }
                }
            }
        }
        Self { glyphs }
    }

    pub fn is_single_glyph(&self) -> bool {
        self.glyphs.len() == 1
    }

    pub fn validate(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let mut valid = true;
        for glyph in &self.glyphs {
            if let Glyph::Text(s) = glyph {
                if s.is_empty() {
                    sink.fatal("glyph_empty", "Empty text glyph.", origin);
                    valid = false;
                }
            }
        }
        valid
    }
}
