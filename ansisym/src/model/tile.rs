//! Tiles: the left/center/right regions of a band.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::glyph::GlyphicTile;
use crate::diagnostics::{Diagnostics, Origin};

/// Electrical and decoration flags of a pin, written with their source
/// symbols (`~`, `^`, `%`, `!tri`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PinFlag {
    #[serde(rename = "~")]
    Invert,
    #[serde(rename = "^")]
    Clock,
    #[serde(rename = "%")]
    Bidirectional,
    #[serde(rename = "!tri")]
    Tristate,
    #[serde(rename = "!trin")]
    TristateInput,
    #[serde(rename = "!pas")]
    Passive,
    #[serde(rename = "!tp")]
    TotemPole,
    #[serde(rename = "!oc")]
    OpenCollector,
    #[serde(rename = "!oe")]
    OpenEmitter,
    #[serde(rename = "!in")]
    In,
    #[serde(rename = "!out")]
    Out,
    #[serde(rename = "!pwr")]
    Power,
    #[serde(rename = "!st")]
    Schmitt,
}

impl PinFlag {
    pub const ALL: [PinFlag; 13] = [
        PinFlag::Invert,
        PinFlag::Clock,
        PinFlag::Bidirectional,
        PinFlag::Tristate,
        PinFlag::TristateInput,
        PinFlag::Passive,
        PinFlag::TotemPole,
        PinFlag::OpenCollector,
        PinFlag::OpenEmitter,
        PinFlag::In,
        PinFlag::Out,
        PinFlag::Power,
        PinFlag::Schmitt,
    ];

    /// At most one of these may be set on a pin.
    const MUTEX: [PinFlag; 6] = [
        PinFlag::Tristate,
        PinFlag::Passive,
        PinFlag::TotemPole,
        PinFlag::OpenCollector,
        PinFlag::OpenEmitter,
        PinFlag::Power,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            PinFlag::Invert => "~",
            PinFlag::Clock => "^",
            PinFlag::Bidirectional => "%",
            PinFlag::Tristate => "!tri",
            PinFlag::TristateInput => "!trin",
            PinFlag::Passive => "!pas",
            PinFlag::TotemPole => "!tp",
            PinFlag::OpenCollector => "!oc",
            PinFlag::OpenEmitter => "!oe",
            PinFlag::In => "!in",
            PinFlag::Out => "!out",
            PinFlag::Power => "!pwr",
            PinFlag::Schmitt => "!st",
        }
    }

    /// Flags that may not be combined with this one.
    fn conflicts(&self) -> &'static [PinFlag] {
        match self {
            PinFlag::Schmitt | PinFlag::Clock => &[PinFlag::Out, PinFlag::Power],
            PinFlag::Bidirectional => &[PinFlag::In, PinFlag::Out, PinFlag::Power],
            _ => &[],
        }
    }
}

impl fmt::Display for PinFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid pin type")]
pub struct InvalidPinFlag(pub String);

impl FromStr for PinFlag {
    type Err = InvalidPinFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PinFlag::ALL
            .iter()
            .copied()
            .find(|f| f.symbol() == s)
            .ok_or_else(|| InvalidPinFlag(s.to_string()))
    }
}

/// gEDA `pintype` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinType {
    Clk,
    Tri,
    Io,
    Pas,
    Tp,
    Oc,
    Oe,
    In,
    Out,
    Pwr,
}

impl PinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinType::Clk => "clk",
            PinType::Tri => "tri",
            PinType::Io => "io",
            PinType::Pas => "pas",
            PinType::Tp => "tp",
            PinType::Oc => "oc",
            PinType::Oe => "oe",
            PinType::In => "in",
            PinType::Out => "out",
            PinType::Pwr => "pwr",
        }
    }
}

impl fmt::Display for PinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pin names treated as power pins when no flag says otherwise.
const POWER_ALIASES: [&str; 4] = ["vcc", "gnd", "vss", "vdd"];

/// An I/O pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTile {
    /// Pin label. Empty for anonymous pins.
    pub name: String,
    #[serde(default)]
    pub flags: BTreeSet<PinFlag>,
    /// Physical pin numbers per package; one entry per slot. `0` marks a
    /// shadow pin.
    pub pins: BTreeMap<String, Vec<u32>>,
}

impl PinTile {
    pub fn new<F, P, S>(name: impl Into<String>, flags: F, pins: P) -> Self
    where
        F: IntoIterator<Item = PinFlag>,
        P: IntoIterator<Item = (S, Vec<u32>)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            flags: flags.into_iter().collect(),
            pins: pins.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn has(&self, flag: PinFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Number of slots: the common length of the per-package pin lists, or
    /// `None` if the lengths differ or there are no lists.
    pub fn num_slots(&self) -> Option<usize> {
        let mut lengths = self.pins.values().map(Vec::len);
        let first = lengths.next()?;
        lengths.all(|n| n == first).then_some(first)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.pins.keys().map(String::as_str)
    }

    /// Physical pin numbers used in `package`, shadow pins included.
    pub fn pins_used(&self, package: &str) -> BTreeSet<u32> {
        self.pins
            .get(package)
            .map(|l| l.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Pin number list for `package`.
    pub fn pin_list(&self, package: &str) -> &[u32] {
        self.pins.get(package).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if this pin has no physical pin in `package`. Pins with no list
    /// for the package count as shadow pins.
    pub fn is_shadow(&self, package: &str) -> bool {
        self.pin_list(package).first().map_or(true, |&n| n == 0)
    }

    pub fn is_power_alias(&self) -> bool {
        let lower = self.name.to_lowercase();
        POWER_ALIASES.iter().any(|alias| lower.starts_with(alias))
    }

    /// Electrical type from the flags, falling back to the power aliases.
    /// `None` means the side of the block decides (left in, right out).
    pub fn infer_type(&self) -> Option<PinType> {
        let order = [
            (PinFlag::Clock, PinType::Clk),
            (PinFlag::Tristate, PinType::Tri),
            (PinFlag::TristateInput, PinType::Tri),
            (PinFlag::Bidirectional, PinType::Io),
            (PinFlag::Passive, PinType::Pas),
            (PinFlag::TotemPole, PinType::Tp),
            (PinFlag::OpenCollector, PinType::Oc),
            (PinFlag::OpenEmitter, PinType::Oe),
            (PinFlag::In, PinType::In),
            (PinFlag::Out, PinType::Out),
        ];
        if let Some((_, t)) = order.iter().find(|(flag, _)| self.has(*flag)) {
            return Some(*t);
        }
        if self.has(PinFlag::Power) || self.is_power_alias() {
            return Some(PinType::Pwr);
        }
        None
    }

    pub fn validate(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let mut valid = true;
        match self.num_slots() {
            Some(1) => {}
            Some(0) => {
                sink.fatal(
                    "pin_slots",
                    format!("Pin '{}' has an empty pin number list.", self.name),
                    origin,
                );
                valid = false;
            }
            Some(_) => {
                if self.pins.values().any(|l| l.contains(&0)) {
                    sink.fatal("shadow_pin_slot", "Shadow pins not allowed in slots.", origin);
                    valid = false;
                }
            }
            None => {
                sink.fatal("pin_slots", "Package slot counts differ.", origin);
                valid = false;
            }
        }
        let exclusive = PinFlag::MUTEX.iter().filter(|f| self.has(**f)).count();
        if exclusive > 1 {
            sink.fatal("pin_flag_mutex", "Mutually-exclusive pin flag conflict.", origin);
            valid = false;
        }
        for flag in &self.flags {
            let clashing: Vec<String> = flag
                .conflicts()
                .iter()
                .filter(|other| self.has(**other))
                .map(PinFlag::to_string)
                .collect();
            if !clashing.is_empty() {
                sink.fatal(
                    "pin_flag_conflict",
                    format!("Pin flag conflict: {} with {}.", flag, clashing.join(" ")),
                    origin,
                );
                valid = false;
            }
        }
        valid
    }
}

/// Forces space in the layout. Nothing is drawn unless spacers are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacerTile {
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

impl SpacerTile {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        if self.width <= 0 || self.height < 0 {
            sink.fatal(
                "spacer_size",
                format!("Spacer size {}x{} is not allowed.", self.width, self.height),
                origin,
            );
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Pin(PinTile),
    Glyphic(GlyphicTile),
    Spacer(SpacerTile),
}

impl Tile {
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    pub fn as_pin(&self) -> Option<&PinTile> {
        match self {
            Tile::Pin(p) => Some(p),
            _ => None,
        }
    }

    /// Slot count of a pin tile; `Some(0)` for tiles without pins.
    pub fn num_slots(&self) -> Option<usize> {
        match self {
            Tile::Pin(p) => p.num_slots(),
            _ => Some(0),
        }
    }

    pub fn pins_used(&self, package: &str) -> BTreeSet<u32> {
        match self {
            Tile::Pin(p) => p.pins_used(package),
            _ => BTreeSet::new(),
        }
    }

    pub fn validate(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        match self {
            Tile::Empty => true,
            Tile::Pin(p) => p.validate(sink, origin),
            Tile::Glyphic(g) => g.validate(sink, origin),
            Tile::Spacer(s) => s.validate(sink, origin),
        }
    }
}

impl From<PinTile> for Tile {
    fn from(p: PinTile) -> Self {
        Tile::Pin(p)
    }
}

impl From<GlyphicTile> for Tile {
    fn from(g: GlyphicTile) -> Self {
        Tile::Glyphic(g)
    }
}

impl From<SpacerTile> for Tile {
    fn from(s: SpacerTile) -> Self {
        Tile::Spacer(s)
    }
}
