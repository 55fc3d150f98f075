use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::attr::AttrDict;
use super::block::{Block, NormalBlock};
use super::directive::DirectiveDict;
use crate::diagnostics::{Diagnostics, Origin};

/// Attributes every symbol must carry.
pub const REQUIRED_ATTRS: [&str; 2] = ["refdes", "device"];

/// Attributes a distributable symbol should carry.
pub const RECOMMENDED_ATTRS: [&str; 5] = ["copyright", "author", "uselicense", "distlicense", "description"];

/// A complete part: attributes, blocks and layout directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    pub attrs: AttrDict,
    pub blocks: Vec<Block>,
    pub directives: DirectiveDict,
}

impl Part {
    pub fn new(attrs: AttrDict, blocks: Vec<Block>, directives: DirectiveDict) -> Self {
        Self {
            attrs,
            blocks,
            directives,
        }
    }

    pub fn normal_blocks(&self) -> impl Iterator<Item = &NormalBlock> {
        self.blocks.iter().filter_map(Block::as_normal)
    }

    /// Every package named by any block, sorted.
    pub fn packages(&self) -> BTreeSet<&str> {
        self.blocks.iter().flat_map(Block::package_names).collect()
    }

    /// Run every validation rule, reporting into `sink`. Returns false if
    /// any rule failed.
    pub fn validate(&self, sink: &mut Diagnostics) -> bool {
        let mut valid = true;

        for name in REQUIRED_ATTRS {
            if !self.attrs.contains(name) {
                sink.fatal(
                    "attr_required",
                    format!("Required attribute {} not found.", name),
                    Origin::NONE,
                );
                valid = false;
            }
        }
        for name in RECOMMENDED_ATTRS {
            if !self.attrs.contains(name) {
                sink.warning(
                    "attr_recommended",
                    format!("Standard attribute {} not found.", name),
                    Origin::NONE,
                );
            }
        }
        if let Some(device) = self.attrs.get("device") {
            if device.value != device.value.to_uppercase() {
                sink.warning(
                    "device_case",
                    format!("Device name '{}' should be upper case.", device.value),
                    Origin::NONE,
                );
            }
        }
        let style = self.directives.bidir_style();
        if !(0..=1).contains(&style) {
            sink.warning(
                "bidirstyle_unsupported",
                format!("Unsupported bidirstyle {}; bidirectional pins get no decoration.", style),
                Origin::NONE,
            );
        }

        valid &= self.validate_block_names(sink);
        valid &= self.validate_pin_coverage(sink);
        valid &= self.validate_pin_owners(sink);

        for block in &self.blocks {
            valid &= block.validate(sink);
        }
        valid
    }

    /// Block names are unique across blocks.
    fn validate_block_names(&self, sink: &mut Diagnostics) -> bool {
        let mut owner: HashMap<&str, usize> = HashMap::new();
        let mut valid = true;
        for (index, block) in self.normal_blocks().enumerate() {
            let names: BTreeSet<&str> = block.packages.iter().map(|p| p.name.as_str()).collect();
            for name in names {
                if let Some(&first) = owner.get(name) {
                    if first != index {
                        sink.fatal(
                            "block_name_duplicate",
                            format!("Block name '{}' used by more than one block.", name),
                            Origin::block(block.reference_name()).at_line(block.line),
                        );
                        valid = false;
                    }
                } else {
                    owner.insert(name, index);
                }
            }
        }
        valid
    }

    /// Per package, pins 1..max are all used or declared unused.
    fn validate_pin_coverage(&self, sink: &mut Diagnostics) -> bool {
        let mut valid = true;
        for package in self.packages() {
            let used: BTreeSet<u32> = self.blocks.iter().flat_map(|b| b.pins_used(package)).collect();
            let max = used.last().copied().unwrap_or(0);
            for n in (1..=max).filter(|n| !used.contains(n)) {
                sink.fatal(
                    "pin_coverage",
                    format!("Pin {} not used by package {}.", n, package),
                    Origin::NONE,
                );
                valid = false;
            }
        }
        valid
    }

    /// Per package, a physical pin belongs to at most one block.
    fn validate_pin_owners(&self, sink: &mut Diagnostics) -> bool {
        let mut valid = true;
        for package in self.packages() {
            let mut owners: BTreeMap<u32, usize> = BTreeMap::new();
            for n in self.blocks.iter().flat_map(|b| b.pins_used(package)) {
                *owners.entry(n).or_insert(0) += 1;
            }
            for (n, _) in owners.iter().filter(|&(_, &count)| count > 1) {
                sink.fatal(
                    "pin_reuse",
                    format!("Pin {} used by more than one block in package {}.", n, package),
                    Origin::NONE,
                );
                valid = false;
            }
        }
        valid
    }
}
