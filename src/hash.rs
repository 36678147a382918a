//! Interned SVG tag and attribute names.
//!
//! The lexer resolves every tag and attribute name it sees against this table,
//! so the rewriter can dispatch on a small `Copy` enum instead of comparing bytes.
//! Names the minifier has no rules for resolve to `None`.

use phf::phf_map;

/// A known SVG tag or attribute name.
///
/// Tags and attributes share one namespace: `Hash::Style` is both the `<style>`
/// element and the `style` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hash {
    A,
    Color,
    ContentStyleType,
    D,
    Defs,
    FloodColor,
    Fill,
    G,
    Height,
    Id,
    LightingColor,
    Line,
    Marker,
    Mask,
    Metadata,
    MissingGlyph,
    Path,
    Pattern,
    Points,
    Polygon,
    Polyline,
    Rect,
    Rx,
    Ry,
    StopColor,
    Stroke,
    Style,
    Svg,
    Switch,
    Symbol,
    Version,
    ViewBox,
    Width,
    X,
    X1,
    X2,
    Y,
    Y1,
    Y2,
}

static NAMES: phf::Map<&'static str, Hash> = phf_map! {
    "a" => Hash::A,
    "color" => Hash::Color,
    "contentStyleType" => Hash::ContentStyleType,
    "d" => Hash::D,
    "defs" => Hash::Defs,
    "flood-color" => Hash::FloodColor,
    "fill" => Hash::Fill,
    "g" => Hash::G,
    "height" => Hash::Height,
    "id" => Hash::Id,
    "lighting-color" => Hash::LightingColor,
    "line" => Hash::Line,
    "marker" => Hash::Marker,
    "mask" => Hash::Mask,
    "metadata" => Hash::Metadata,
    "missing-glyph" => Hash::MissingGlyph,
    "path" => Hash::Path,
    "pattern" => Hash::Pattern,
    "points" => Hash::Points,
    "polygon" => Hash::Polygon,
    "polyline" => Hash::Polyline,
    "rect" => Hash::Rect,
    "rx" => Hash::Rx,
    "ry" => Hash::Ry,
    "stop-color" => Hash::StopColor,
    "stroke" => Hash::Stroke,
    "style" => Hash::Style,
    "svg" => Hash::Svg,
    "switch" => Hash::Switch,
    "symbol" => Hash::Symbol,
    "version" => Hash::Version,
    "viewBox" => Hash::ViewBox,
    "width" => Hash::Width,
    "x" => Hash::X,
    "x1" => Hash::X1,
    "x2" => Hash::X2,
    "y" => Hash::Y,
    "y1" => Hash::Y1,
    "y2" => Hash::Y2,
};

impl Hash {
    /// Resolve a tag or attribute name. Lookup is case-sensitive, like SVG.
    pub fn from_name(name: &[u8]) -> Option<Hash> {
        std::str::from_utf8(name)
            .ok()
            .and_then(|name| NAMES.get(name).copied())
    }

    /// Containers that can be dropped when they have no content.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Hash::A
                | Hash::Defs
                | Hash::G
                | Hash::Marker
                | Hash::Mask
                | Hash::MissingGlyph
                | Hash::Pattern
                | Hash::Switch
                | Hash::Symbol
        )
    }

    /// Attributes whose value is a color.
    pub fn is_color_attr(self) -> bool {
        matches!(
            self,
            Hash::Color
                | Hash::Fill
                | Hash::Stroke
                | Hash::StopColor
                | Hash::FloodColor
                | Hash::LightingColor
        )
    }

    /// Basic shapes that have a shorter path equivalent.
    pub fn is_shape(self) -> bool {
        matches!(self, Hash::Line | Hash::Rect | Hash::Polygon | Hash::Polyline)
    }
}
