//! Layout directives (`%name value` lines in a symbol source).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Origin};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("{0} is not a valid directive name")]
    Unknown(String),
    #[error("invalid value '{value}' for directive {name}: expected {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("value {value} for directive {name} is out of range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Upper bound for length directives, in drawing units.
pub const MAX_LENGTH: i64 = 1_000_000;
/// Upper bound for font size directives.
pub const MAX_FONT_SIZE: i64 = 1_000;

/// The recognized directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    BidirStyle,
    FontName,
    MinWidth,
    PinFontSize,
    SameWidth,
    ShowSpacers,
    TextFontSize,
}

/// Declared type of a directive's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Int,
    Str,
    Bool,
}

impl DirectiveKind {
    pub fn describe(&self) -> &'static str {
        match self {
            DirectiveKind::Int => "an integer",
            DirectiveKind::Str => "a string",
            DirectiveKind::Bool => "a boolean",
        }
    }
}

impl Directive {
    /// All directives, alphabetical by name.
    pub const ALL: [Directive; 7] = [
        Directive::BidirStyle,
        Directive::FontName,
        Directive::MinWidth,
        Directive::PinFontSize,
        Directive::SameWidth,
        Directive::ShowSpacers,
        Directive::TextFontSize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Directive::BidirStyle => "bidirstyle",
            Directive::FontName => "fontname",
            Directive::MinWidth => "minwidth",
            Directive::PinFontSize => "pinfontsize",
            Directive::SameWidth => "samewidth",
            Directive::ShowSpacers => "showspacers",
            Directive::TextFontSize => "textfontsize",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::FontName => DirectiveKind::Str,
            Directive::SameWidth | Directive::ShowSpacers => DirectiveKind::Bool,
            _ => DirectiveKind::Int,
        }
    }

    /// Accepted values of an integer directive; `None` accepts any integer.
    pub fn range(&self) -> Option<RangeInclusive<i64>> {
        match self {
            Directive::MinWidth => Some(0..=MAX_LENGTH),
            Directive::PinFontSize | Directive::TextFontSize => Some(1..=MAX_FONT_SIZE),
            _ => None,
        }
    }

    pub fn default_value(&self) -> DirectiveValue {
        match self {
            Directive::BidirStyle => DirectiveValue::Int(1),
            Directive::FontName => DirectiveValue::Str("Arial".to_string()),
            Directive::MinWidth => DirectiveValue::Int(0),
            Directive::PinFontSize => DirectiveValue::Int(8),
            Directive::SameWidth => DirectiveValue::Bool(false),
            Directive::ShowSpacers => DirectiveValue::Bool(false),
            Directive::TextFontSize => DirectiveValue::Int(10),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Directive::BidirStyle => "Decoration style for bidirectional pins (0 = none, 1 = arrows)",
            Directive::FontName => "Font family used for text measurement",
            Directive::MinWidth => "Minimum block width",
            Directive::PinFontSize => "Font size of pin labels and numbers",
            Directive::SameWidth => "Give every block the width of the widest one",
            Directive::ShowSpacers => "Draw dashed outlines around spacer tiles",
            Directive::TextFontSize => "Font size of block text",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for DirectiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveValue::Int(n) => write!(f, "{}", n),
            DirectiveValue::Bool(b) => write!(f, "{}", b),
            DirectiveValue::Str(s) => f.write_str(s),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl DirectiveValue {
    /// Coerce to the declared type of `directive` and check its range.
    fn coerce(self, directive: Directive) -> Result<DirectiveValue, DirectiveError> {
        let value = self.coerce_kind(directive)?;
        if let (DirectiveValue::Int(n), Some(range)) = (&value, directive.range()) {
            if !range.contains(n) {
                return Err(DirectiveError::OutOfRange {
                    name: directive.name(),
                    value: *n,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(value)
    }

    fn coerce_kind(self, directive: Directive) -> Result<DirectiveValue, DirectiveError> {
        let invalid = |value: String| DirectiveError::InvalidValue {
            name: directive.name(),
            value,
            expected: directive.kind().describe(),
        };
        match (directive.kind(), self) {
            (DirectiveKind::Int, DirectiveValue::Int(n)) => Ok(DirectiveValue::Int(n)),
            (DirectiveKind::Int, DirectiveValue::Bool(b)) => Ok(DirectiveValue::Int(b as i64)),
            (DirectiveKind::Int, DirectiveValue::Str(s)) => {
                s.trim().parse().map(DirectiveValue::Int).map_err(|_| invalid(s))
            }
            (DirectiveKind::Bool, DirectiveValue::Bool(b)) => Ok(DirectiveValue::Bool(b)),
            (DirectiveKind::Bool, DirectiveValue::Int(n)) => Ok(DirectiveValue::Bool(n != 0)),
            (DirectiveKind::Bool, DirectiveValue::Str(s)) => {
                parse_bool(&s).map(DirectiveValue::Bool).ok_or_else(|| invalid(s))
            }
            (DirectiveKind::Str, value) => Ok(DirectiveValue::Str(value.to_string())),
        }
    }
}

fn default_int(directive: Directive) -> i64 {
    match directive.default_value() {
        DirectiveValue::Int(n) => n,
        _ => 0,
    }
}

/// Directive settings of a part. Unset directives read as their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveDict {
    values: BTreeMap<Directive, DirectiveValue>,
}

impl DirectiveDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(name: &str) -> bool {
        Directive::from_name(name).is_some()
    }

    /// Set a directive by name, coercing the value to the declared type.
    pub fn set(&mut self, name: &str, value: DirectiveValue) -> Result<(), DirectiveError> {
        let directive =
            Directive::from_name(name).ok_or_else(|| DirectiveError::Unknown(name.to_string()))?;
        self.insert(directive, value)
    }

    pub fn insert(&mut self, directive: Directive, value: DirectiveValue) -> Result<(), DirectiveError> {
        let value = value.coerce(directive)?;
        self.values.insert(directive, value);
        Ok(())
    }

    /// Set a directive from source text, reporting problems instead of
    /// returning them. A bare directive (no value) means `true`.
    ///
    /// Unknown names are ignored with a warning; values that do not coerce are
    /// fatal.
    pub fn apply(&mut self, name: &str, raw: Option<&str>, sink: &mut Diagnostics, origin: Origin<'_>) -> bool {
        let value = match raw {
            Some(text) => DirectiveValue::Str(text.to_string()),
            None => DirectiveValue::Bool(true),
        };
        match self.set(name, value) {
            Ok(()) => true,
            Err(e @ DirectiveError::Unknown(_)) => {
                sink.warning("directive_unknown", format!("{} - ignored.", e), origin);
                false
            }
            Err(e) => {
                sink.fatal("directive_value", e.to_string(), origin);
                false
            }
        }
    }

    pub fn get(&self, directive: Directive) -> DirectiveValue {
        self.values
            .get(&directive)
            .cloned()
            .unwrap_or_else(|| directive.default_value())
    }

    /// True if the directive was set explicitly.
    pub fn is_set(&self, directive: Directive) -> bool {
        self.values.contains_key(&directive)
    }

    fn int(&self, directive: Directive) -> i64 {
        match self.get(directive) {
            DirectiveValue::Int(n) => n,
            DirectiveValue::Bool(b) => b as i64,
            DirectiveValue::Str(_) => default_int(directive),
        }
    }

    /// Integer value as a drawing-plane quantity. Stored values are range
    /// checked on insert, so the default only stands in for unreachable
    /// overflow.
    fn int32(&self, directive: Directive) -> i32 {
        i32::try_from(self.int(directive))
            .or_else(|_| i32::try_from(default_int(directive)))
            .unwrap_or(0)
    }

    fn flag(&self, directive: Directive) -> bool {
        matches!(self.get(directive), DirectiveValue::Bool(true))
    }

    pub fn bidir_style(&self) -> i64 {
        self.int(Directive::BidirStyle)
    }

    pub fn font_name(&self) -> String {
        self.get(Directive::FontName).to_string()
    }

    pub fn min_width(&self) -> i32 {
        self.int32(Directive::MinWidth)
    }

    pub fn pin_font_size(&self) -> i32 {
        self.int32(Directive::PinFontSize)
    }

    pub fn text_font_size(&self) -> i32 {
        self.int32(Directive::TextFontSize)
    }

    pub fn same_width(&self) -> bool {
        self.flag(Directive::SameWidth)
    }

    pub fn show_spacers(&self) -> bool {
        self.flag(Directive::ShowSpacers)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Directive, &DirectiveValue)> {
        self.values.iter().map(|(d, v)| (*d, v))
    }
}
