//! Pin sequence numbers, slot attributes and attribute text layout.

use std::collections::BTreeMap;

use super::view::{AttrView, NormalBlockView, TileView};
use crate::diagnostics::{Aborted, Diagnostics, Origin};
use crate::geometry::{Point, GRID_SPACING};
use crate::model::AttrDict;

/// Sequence number to physical pin list, for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinMap {
    entries: BTreeMap<u32, Vec<u32>>,
}

impl PinMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, seq: u32, pins: Vec<u32>) {
        self.entries.insert(seq, pins);
    }

    pub fn get(&self, seq: u32) -> Option<&[u32]> {
        self.entries.get(&seq).map(Vec::as_slice)
    }

    /// Number of sequenced pins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Physical pins of `slot` (1-based) in sequence order, or the first
    /// sequence number that has no pin for the slot.
    pub fn slot_pins(&self, slot: usize) -> Result<Vec<u32>, u32> {
        (1..=self.entries.len() as u32)
            .map(|seq| {
                self.get(seq)
                    .and_then(|pins| pins.get(slot - 1))
                    .copied()
                    .ok_or(seq)
            })
            .collect()
    }
}

impl NormalBlockView<'_> {
    /// Number the non-shadow pins of every package: bands top to bottom,
    /// left pin before right pin.
    pub(crate) fn sequence_pins(&mut self) {
        let block = self.block;
        let mut maps = BTreeMap::new();
        for package in block.package_names() {
            if maps.contains_key(package) {
                continue;
            }
            let mut map = PinMap::new();
            let mut seq = 1;
            for band in &mut self.bands {
                for tile in [&mut band.left, &mut band.right] {
                    let TileView::Pin(pin) = tile else {
                        continue;
                    };
                    if pin.tile.is_shadow(package) {
                        continue;
                    }
                    pin.pinseq.insert(package.to_string(), seq);
                    map.insert(seq, pin.tile.pin_list(package).to_vec());
                    seq += 1;
                }
            }
            maps.insert(package.to_string(), map);
        }
        self.pin_maps = maps;
    }

    /// `numslots`, `slotdef` and `slot` attributes for `package`; empty for
    /// single-slot blocks.
    pub(crate) fn slot_attrs(
        &self,
        package: &str,
        sink: &mut Diagnostics,
    ) -> Result<Vec<(String, String)>, Aborted> {
        let slots = self.block.num_slots();
        if slots < 2 {
            return Ok(Vec::new());
        }
        let origin = Origin::block(self.name()).at_line(self.block.line);
        let Some(map) = self.pin_maps.get(package) else {
            return Err(sink.panic(
                "pin_map",
                format!("No pin map for package {}.", package),
                origin,
            ));
        };
        let mut attrs = vec![("numslots".to_string(), slots.to_string())];
        for slot in 1..=slots {
            let pins = map.slot_pins(slot).map_err(|seq| {
                sink.panic(
                    "pin_map",
                    format!("Pin sequence {} has no pin for slot {} in package {}.", seq, slot, package),
                    origin,
                )
            })?;
            let list: Vec<String> = pins.iter().map(u32::to_string).collect();
            attrs.push(("slotdef".to_string(), format!("{}:{}", slot, list.join(","))));
        }
        attrs.push(("slot".to_string(), "1".to_string()));
        Ok(attrs)
    }

    /// Lay out the hidden attribute texts of every package, stacked upward
    /// from one step above the block's top-right corner. The last attribute
    /// sits lowest.
    pub(crate) fn layout_attrs(&mut self, attrs: &AttrDict, sink: &mut Diagnostics) -> Result<(), Aborted> {
        let Some(rect) = self.rect else {
            return Ok(());
        };
        let block = self.name();
        let shared: Vec<(String, String)> = attrs
            .iter()
            .filter(|a| a.name != "refdes" && !a.is_referenced_by(block))
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();

        let step = 2 * GRID_SPACING;
        let mut laid_out = BTreeMap::new();
        let packages: Vec<String> = self.pin_maps.keys().cloned().collect();
        for package in packages {
            let mut list = shared.clone();
            list.extend(self.slot_attrs(&package, sink)?);
            let n = list.len() as i32;
            let views = list
                .into_iter()
                .enumerate()
                .map(|(i, (name, value))| AttrView {
                    name,
                    value,
                    at: Point::new(rect.right(), rect.top() + step * (n - i as i32)),
                })
                .collect();
            laid_out.insert(package, views);
        }
        self.attrs = laid_out;
        Ok(())
    }
}
