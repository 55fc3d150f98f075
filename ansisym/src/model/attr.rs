use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named symbol attribute such as `refdes` or `footprint`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
    /// Reference names of blocks that show this attribute through a
    /// reference glyph.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    referenced_by: BTreeSet<String>,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
            referenced_by: BTreeSet::new(),
        }
    }

    /// True if `block` already shows this attribute through a reference glyph.
    pub fn is_referenced_by(&self, block: &str) -> bool {
        self.referenced_by.contains(block)
    }

    /// Record a claim by `block`. Returns false if the block already holds one.
    pub fn add_reference(&mut self, block: &str) -> bool {
        self.referenced_by.insert(block.to_string())
    }

    pub fn referenced_by(&self) -> impl Iterator<Item = &str> {
        self.referenced_by.iter().map(String::as_str)
    }
}

/// Attributes of a part, unique by name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrDict {
    attrs: Vec<Attr>,
}

impl AttrDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `attr`, replacing any attribute of the same name in place.
    pub fn add(&mut self, attr: Attr) {
        match self.attrs.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => *existing = attr,
            None => self.attrs.push(attr),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Attr> {
        self.attrs.iter_mut().find(|a| a.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl FromIterator<Attr> for AttrDict {
    fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
        let mut dict = AttrDict::new();
        for attr in iter {
            dict.add(attr);
        }
        dict
    }
}

impl<'a> IntoIterator for &'a AttrDict {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_replaces_in_place() {
        let mut dict: AttrDict = [Attr::new("refdes", "U?"), Attr::new("device", "7400")]
            .into_iter()
            .collect();
        dict.add(Attr::new("refdes", "IC?"));
        let names: Vec<_> = dict.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["refdes", "device"]);
        assert_eq!(dict.get("refdes").unwrap().value, "IC?");
    }

    #[test]
    fn test_reference_claims_per_block() {
        let mut attr = Attr::new("footprint", "DIP14");
        assert!(!attr.is_referenced_by("blk"));
        assert!(attr.add_reference("blk"));
        assert!(!attr.add_reference("blk"));
        assert!(attr.add_reference("other"));
        assert_eq!(attr.referenced_by().collect::<Vec<_>>(), ["blk", "other"]);
    }
}
