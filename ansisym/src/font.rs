//! Text measurement for layout.
//!
//! Only widths are measured. Glyph outlines are never rendered; gschem draws
//! the text itself, so layout just needs to know how much room a string takes.

use std::collections::HashMap;

/// Layout height of one text line. Height is not measured from the font.
pub const LETTER_HEIGHT: i32 = 130;

/// gschem text size to layout units, per font unit of advance width.
const GSCHEM_SCALE: f64 = 10000.0 / 555.0;

/// Advance widths (1/1000 em) for printable ASCII, 0x20 through 0x7E.
/// Metric-compatible with Arial and Helvetica.
const SANS_ADVANCE: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Fixed-pitch advance used for monospace families.
const MONO_ADVANCE: u16 = 600;

/// Advance for characters outside the table.
const FALLBACK_ADVANCE: u16 = 556;

/// Resolved advance-width source for a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvanceTable {
    Proportional(&'static [u16; 95]),
    Monospace(u16),
}

impl AdvanceTable {
    fn resolve(family: &str) -> Self {
        let lower = family.to_ascii_lowercase();
        if lower.contains("mono") || lower.contains("courier") {
            return AdvanceTable::Monospace(MONO_ADVANCE);
        }
        if !matches!(
            lower.as_str(),
            "arial" | "helvetica" | "sans" | "sans-serif" | "liberation sans" | "dejavu sans"
        ) {
            tracing::warn!(
                "No metrics for font family '{}', measuring with sans-serif widths",
                family
            );
        }
        AdvanceTable::Proportional(&SANS_ADVANCE)
    }

    fn advance(&self, c: char) -> u32 {
        match self {
            AdvanceTable::Monospace(w) => *w as u32,
            AdvanceTable::Proportional(table) => {
                let code = c as u32;
                if (0x20..0x7f).contains(&code) {
                    table[(code - 0x20) as usize] as u32
                } else {
                    FALLBACK_ADVANCE as u32
                }
            }
        }
    }
}

/// Enough font information to measure text for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    name: String,
    size: i32,
    table: AdvanceTable,
}

impl FontMetrics {
    pub fn new(name: impl Into<String>, size: i32) -> Self {
        let name = name.into();
        let table = AdvanceTable::resolve(&name);
        Self { name, size, table }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Layout width of `text` in gschem units.
    pub fn measure(&self, text: &str) -> i32 {
        let em_units: u32 = text.chars().map(|c| self.table.advance(c)).sum();
        let scale = self.size as f64 * GSCHEM_SCALE / 1000.0;
        (em_units as f64 * scale) as i32
    }
}

/// Per-run cache of resolved font metrics keyed by (name, size).
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: HashMap<(String, i32), FontMetrics>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics for `name` at `size`, resolving them on first use.
    pub fn get(&mut self, name: &str, size: i32) -> FontMetrics {
        self.fonts
            .entry((name.to_string(), size))
            .or_insert_with(|| FontMetrics::new(name, size))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
