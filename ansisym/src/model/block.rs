//! Blocks: the boxes a part is drawn as, one symbol file per package.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::band::Band;
use crate::diagnostics::{Diagnostics, Origin};

/// The name a block gets in one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBlock {
    pub package: String,
    pub name: String,
}

impl PackageBlock {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalBlock {
    pub packages: Vec<PackageBlock>,
    pub bands: Vec<Band>,
    pub line: Option<usize>,
}

impl NormalBlock {
    pub fn new(packages: Vec<PackageBlock>, bands: Vec<Band>) -> Self {
        Self {
            packages,
            bands,
            line: None,
        }
    }

    /// The first block name; identifies the block in attribute claims.
    pub fn reference_name(&self) -> &str {
        self.packages.first().map_or("", |p| p.name.as_str())
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.iter().map(|p| p.package.as_str())
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p.package == package)
    }

    /// Slot count: the largest positive band count, 1 when no band has pins.
    pub fn num_slots(&self) -> usize {
        self.bands
            .iter()
            .filter_map(Band::num_slots)
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Physical pins used in `package`, without shadow pins.
    pub fn pins_used(&self, package: &str) -> BTreeSet<u32> {
        let mut used: BTreeSet<u32> = self.bands.iter().flat_map(|b| b.pins_used(package)).collect();
        used.remove(&0);
        used
    }

    pub fn validate(&self, sink: &mut Diagnostics) -> bool {
        let name = self.reference_name();
        let origin = Origin::block(name).at_line(self.line);
        let mut valid = true;

        if self.packages.is_empty() {
            sink.fatal("block_packages", "Block has no package/name pairs.", origin);
            valid = false;
        }
        let mut seen = HashSet::new();
        for p in &self.packages {
            if !seen.insert(p.name.as_str()) {
                sink.fatal(
                    "block_name_duplicate",
                    format!("Block name '{}' given more than once.", p.name),
                    origin,
                );
                valid = false;
            }
        }

        valid &= self.validate_band_order(sink, origin);
        valid &= self.validate_slots(sink, origin);
        valid &= self.validate_pin_usage(sink, origin);

        for band in &self.bands {
            valid &= band.validate(sink, origin);
        }
        valid
    }

    fn validate_band_order(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let mut valid = true;
        let mut fail = |sink: &mut Diagnostics, message: &str| {
            sink.fatal("band_order", message, origin);
            valid = false;
        };
        if !self.bands.first().is_some_and(Band::is_top) {
            fail(sink, "First band must be a top band.");
        }
        if !self.bands.last().is_some_and(Band::is_bottom) {
            fail(sink, "Last band must be a bottom band.");
        }
        match self.bands.iter().filter(|b| b.is_top()).count() {
            0 => fail(sink, "Missing top band."),
            1 => {}
            _ => fail(sink, "More than one top band."),
        }
        match self.bands.iter().filter(|b| b.is_bottom()).count() {
            0 => fail(sink, "Missing bottom band."),
            1 => {}
            _ => fail(sink, "More than one bottom band."),
        }
        if self.bands.iter().filter(|b| b.is_neck()).count() > 1 {
            fail(sink, "More than one neck band.");
        }
        valid
    }

    fn validate_slots(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let slots = self.num_slots();
        let mut valid = true;
        for band in &self.bands {
            let mismatch = match band.num_slots() {
                None => true,
                Some(0) => false,
                Some(n) => n != slots,
            };
            if mismatch {
                sink.fatal(
                    "slot_mismatch",
                    format!("Slot mismatch in {} band; block has {} slot(s).", band.name(), slots),
                    origin.at_line(band.line),
                );
                valid = false;
            }
        }
        valid
    }

    fn validate_pin_usage(&self, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let mut valid = true;
        for package in self.package_names() {
            for band in &self.bands {
                for pin in band.edge_pins() {
                    if !pin.pins.contains_key(package) {
                        sink.fatal(
                            "pin_package",
                            format!("Pin '{}' has no pin numbers for package {}.", pin.name, package),
                            origin.at_line(band.line),
                        );
                        valid = false;
                    }
                }
            }

            // reported once, at the band of the second use
            let mut uses: BTreeMap<u32, usize> = BTreeMap::new();
            for band in &self.bands {
                for pin in band.edge_pins() {
                    for &n in pin.pin_list(package).iter().filter(|&&n| n != 0) {
                        let count = uses.entry(n).or_insert(0);
                        *count += 1;
                        if *count == 2 {
                            sink.fatal(
                                "pin_reuse",
                                format!("Pin {} used more than once in package {}.", n, package),
                                origin.at_line(band.line),
                            );
                            valid = false;
                        }
                    }
                }
            }
        }
        valid
    }
}

/// Pins of a package that are deliberately left unconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedBlock {
    pub package: String,
    pub pins: Vec<u32>,
    pub line: Option<usize>,
}

impl UnusedBlock {
    pub fn new(package: impl Into<String>, pins: Vec<u32>) -> Self {
        Self {
            package: package.into(),
            pins,
            line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Normal(NormalBlock),
    Unused(UnusedBlock),
}

impl Block {
    pub fn as_normal(&self) -> Option<&NormalBlock> {
        match self {
            Block::Normal(b) => Some(b),
            Block::Unused(_) => None,
        }
    }

    pub fn package_names(&self) -> Vec<&str> {
        match self {
            Block::Normal(b) => b.package_names().collect(),
            Block::Unused(u) => vec![u.package.as_str()],
        }
    }

    /// Physical pins accounted for in `package`, without shadow pins.
    pub fn pins_used(&self, package: &str) -> BTreeSet<u32> {
        match self {
            Block::Normal(b) => b.pins_used(package),
            Block::Unused(u) if u.package == package => {
                u.pins.iter().copied().filter(|&n| n != 0).collect()
            }
            Block::Unused(_) => BTreeSet::new(),
        }
    }

    pub fn validate(&self, sink: &mut Diagnostics) -> bool {
        match self {
            Block::Normal(b) => b.validate(sink),
            Block::Unused(_) => true,
        }
    }
}

impl From<NormalBlock> for Block {
    fn from(b: NormalBlock) -> Self {
        Block::Normal(b)
    }
}

impl From<UnusedBlock> for Block {
    fn from(u: UnusedBlock) -> Self {
        Block::Unused(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tile::{PinFlag, PinTile, Tile};

    fn pin(name: &str, u1: Vec<u32>) -> Tile {
        PinTile::new(name, [PinFlag::In], [("U1", u1)]).into()
    }

    fn block(bands: Vec<Band>) -> NormalBlock {
        NormalBlock::new(vec![PackageBlock::new("U1", "gate")], bands)
    }

    #[test]
    fn test_well_formed_block() {
        let b = block(vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", vec![1]), Tile::Empty, pin("Y", vec![2])),
            Band::bottom(),
        ]);
        let mut sink = Diagnostics::new();
        assert!(b.validate(&mut sink));
        assert!(sink.is_empty());
        assert_eq!(b.reference_name(), "gate");
        assert_eq!(b.pins_used("U1"), BTreeSet::from([1, 2]));
        assert_eq!(b.num_slots(), 1);
    }

    #[test]
    fn test_band_order_violations_reported_independently() {
        let b = block(vec![Band::bottom(), Band::neck(Tile::Empty), Band::neck(Tile::Empty)]);
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        // first not top, last not bottom, no top, more than one neck
        assert_eq!(sink.with_rule("band_order").count(), 4);

        let b = block(vec![Band::top(Tile::Empty), Band::top(Tile::Empty), Band::bottom(), Band::bottom()]);
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        assert_eq!(sink.with_rule("band_order").count(), 2);
    }

    #[test]
    fn test_every_colliding_pin_reported() {
        let b = block(vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", vec![1]), Tile::Empty, pin("B", vec![2])),
            Band::io(pin("C", vec![1]), Tile::Empty, pin("D", vec![2])),
            Band::io(pin("E", vec![0]), Tile::Empty, pin("F", vec![0])),
            Band::bottom(),
        ]);
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        let messages: Vec<_> = sink.with_rule("pin_reuse").map(|d| d.message.clone()).collect();
        assert_eq!(
            messages,
            [
                "Pin 1 used more than once in package U1.",
                "Pin 2 used more than once in package U1."
            ]
        );
    }

    #[test]
    fn test_pin_reuse_within_band_and_tile() {
        let b = block(vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", vec![1]), Tile::Empty, pin("B", vec![1])).at_line(4),
            Band::io(pin("C", vec![2, 2]), Tile::Empty, pin("D", vec![3, 1])),
            Band::bottom(),
        ]);
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        let reuse: Vec<_> = sink.with_rule("pin_reuse").collect();
        assert_eq!(reuse.len(), 2);
        assert_eq!(reuse[0].message, "Pin 1 used more than once in package U1.");
        assert_eq!(reuse[0].line, Some(4));
        assert_eq!(reuse[1].message, "Pin 2 used more than once in package U1.");
    }

    #[test]
    fn test_slot_mismatch() {
        let b = block(vec![
            Band::top(Tile::Empty),
            Band::io(pin("A", vec![1, 4]), Tile::Empty, pin("Y", vec![3, 6])),
            Band::io(pin("B", vec![2]), Tile::Empty, Tile::Empty).at_line(5),
            Band::bottom(),
        ]);
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        assert_eq!(b.num_slots(), 2);
        let d = sink.with_rule("slot_mismatch").next().unwrap();
        assert_eq!(d.line, Some(5));
        assert_eq!(sink.with_rule("slot_mismatch").count(), 1);
    }

    #[test]
    fn test_missing_package_list_and_pairs() {
        let b = NormalBlock::new(
            vec![PackageBlock::new("U1", "a"), PackageBlock::new("U2", "a")],
            vec![
                Band::top(Tile::Empty),
                Band::io(pin("A", vec![1]), Tile::Empty, Tile::Empty),
                Band::bottom(),
            ],
        );
        let mut sink = Diagnostics::new();
        assert!(!b.validate(&mut sink));
        assert_eq!(sink.with_rule("pin_package").count(), 1);
        assert_eq!(sink.with_rule("block_name_duplicate").count(), 1);

        let empty = NormalBlock::new(vec![], vec![Band::top(Tile::Empty), Band::bottom()]);
        let mut sink = Diagnostics::new();
        assert!(!empty.validate(&mut sink));
        assert_eq!(sink.with_rule("block_packages").count(), 1);
    }

    #[test]
    fn test_unused_block_pins() {
        let u = Block::from(UnusedBlock::new("U1", vec![7, 0, 8]));
        assert_eq!(u.pins_used("U1"), BTreeSet::from([7, 8]));
        assert!(u.pins_used("U2").is_empty());
        assert!(u.validate(&mut Diagnostics::new()));
    }
}
