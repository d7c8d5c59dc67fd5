//! Labelled palettes with a fixed step schema per kind.
//!
//! A palette is an ordered list of colors keyed by step labels (`B0`, `B10`,
//! ...). The order encodes the lightness or hue progression and is kept in
//! serialization.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::color::Rgb;
use crate::error::PaletteError;

/// Which label schema a palette follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKind {
    /// 16 colors, `B0`..`B150`, black to white.
    Gradient,
    /// 12 colors, `B10`..`B120`.
    Group,
    /// 16 colors, `B10`..`B160`.
    Syntax,
    /// `n` colors, `B0`..`B{10(n-1)}`.
    Steps(usize),
}

impl PaletteKind {
    /// Number of colors this kind holds.
    pub fn len(self) -> usize {
        match self {
            PaletteKind::Gradient | PaletteKind::Syntax => 16,
            PaletteKind::Group => 12,
            PaletteKind::Steps(n) => n,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    fn first_step(self) -> usize {
        match self {
            PaletteKind::Gradient | PaletteKind::Steps(_) => 0,
            PaletteKind::Group | PaletteKind::Syntax => 10,
        }
    }

    /// Label for position `index`, or `None` past the end.
    pub fn label(self, index: usize) -> Option<String> {
        (index < self.len()).then(|| format!("B{}", self.first_step() + 10 * index))
    }

    /// All labels in order.
    pub fn labels(self) -> Vec<String> {
        (0..self.len())
            .map(|i| format!("B{}", self.first_step() + 10 * i))
            .collect()
    }
}

/// An ordered, labelled set of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    kind: PaletteKind,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Wraps `colors` under the label schema of `kind`.
    ///
    /// Fails with `InvalidParameter` when the number of colors does not match
    /// the kind, or when there are no colors at all.
    pub fn new(kind: PaletteKind, colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::InvalidParameter(
                "palette requires at least 1 color".to_string(),
            ));
        }
        if colors.len() != kind.len() {
            return Err(PaletteError::InvalidParameter(format!(
                "{kind:?} palette needs {} colors, got {}",
                kind.len(),
                colors.len()
            )));
        }
        Ok(Self { kind, colors })
    }

    /// Parses each hex string and wraps the result like [`Palette::new`].
    pub fn from_hex<S: AsRef<str>>(kind: PaletteKind, hexes: &[S]) -> Result<Self, PaletteError> {
        let colors = hexes
            .iter()
            .map(|h| Rgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kind, colors)
    }

    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Looks up a color by step label, e.g. `"B40"`.
    pub fn get(&self, label: &str) -> Option<Rgb> {
        let step: usize = label.strip_prefix('B')?.parse().ok()?;
        let offset = step.checked_sub(self.kind.first_step())?;
        if offset % 10 != 0 {
            return None;
        }
        self.colors.get(offset / 10).copied()
    }

    /// `(label, color)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (String, Rgb)> + '_ {
        self.kind.labels().into_iter().zip(self.colors.iter().copied())
    }

    pub fn labels(&self) -> Vec<String> {
        self.kind.labels()
    }

    /// Colors as uppercase `#RRGGBB` strings.
    pub fn hexes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.colors.len()))?;
        for (label, color) in self.iter() {
            map.serialize_entry(&label, &color)?;
        }
        map.end()
    }
}
