//! Basic shapes rewritten as `<path>` elements.
//!
//! A converter runs right after the shape's start tag was shifted. It reads the
//! geometry attributes through [`TokenBuffer::attributes`], overwrites the first
//! of them with a `d` attribute and deletes the rest, so the rewriter emits the
//! element as a path without the old attributes.

use std::io::BufRead;

use log::trace;

use crate::buffer::{AttrLookup, TokenBuffer};
use crate::escape::{is_whitespace, normalize_whitespace};
use crate::hash::Hash;
use crate::number::{is_number, minify_number, number_len};
use crate::path::shorten_path_data;

const RECT_ATTRS: [Hash; 6] = [
    Hash::X,
    Hash::Y,
    Hash::Width,
    Hash::Height,
    Hash::Rx,
    Hash::Ry,
];

/// What a converter did to the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Left as is.
    Unchanged,
    /// The start tag must be written as `<path`; attributes were rewritten.
    Path,
    /// The shape renders nothing and the whole element must be dropped.
    Suppressed,
}

/// Convert the shape whose start tag was just shifted.
pub fn convert<R: BufRead>(
    tag: Hash,
    tb: &mut TokenBuffer<R>,
    buf: &mut String,
    precision: Option<u8>,
) -> Shape {
    let shape = match tag {
        Hash::Line => shorten_line(tb, buf, precision),
        Hash::Rect => shorten_rect(tb, buf, precision),
        Hash::Polygon => shorten_poly(tb, buf, precision, true),
        Hash::Polyline => shorten_poly(tb, buf, precision, false),
        _ => Shape::Unchanged,
    };
    trace!("{tag:?}: {shape:?}");
    shape
}

fn shorten_line<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    buf: &mut String,
    precision: Option<u8>,
) -> Shape {
    let lookup = tb.attributes(&[Hash::X1, Hash::Y1, Hash::X2, Hash::Y2]);
    if lookup.replacement.is_none() {
        return Shape::Unchanged;
    }
    let Some(coords) = plain_numbers(tb, &lookup.found[..4]) else {
        return Shape::Unchanged;
    };
    let [x1, y1, x2, y2] = [0, 1, 2, 3].map(|i| or_zero(&coords[i]));

    let d = [&b"M"[..], x1, &b" "[..], y1, &b"L"[..], x2, &b" "[..], y2, &b"z"[..]].concat();
    replace_with_path(tb, &lookup, &d, buf, precision)
}

fn shorten_rect<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    buf: &mut String,
    precision: Option<u8>,
) -> Shape {
    let lookup = tb.attributes(&RECT_ATTRS);
    let coords = match rect_geometry(tb, &lookup) {
        Ok(coords) => coords,
        Err(shape) => return shape,
    };
    let [x, y, w, h] = [0, 1, 2, 3].map(|i| or_zero(&coords[i]));

    let d = [
        &b"M"[..],
        x,
        &b" "[..],
        y,
        &b"h"[..],
        w,
        &b"v"[..],
        h,
        &b"H"[..],
        x,
        &b"z"[..],
    ]
    .concat();
    replace_with_path(tb, &lookup, &d, buf, precision)
}

/// Whether the `<rect>` whose start tag sits at index `start` of the queue
/// renders nothing, so that [`convert`] would suppress it.
pub fn is_empty_rect<R: BufRead>(tb: &mut TokenBuffer<R>, start: usize) -> bool {
    let lookup = tb.attributes_at(start + 1, &RECT_ATTRS);
    matches!(rect_geometry(tb, &lookup), Err(Shape::Suppressed))
}

/// Canonical `x`, `y`, `width` and `height` of a rect, or what to do with it
/// when it has no path form.
fn rect_geometry<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    lookup: &AttrLookup,
) -> Result<Vec<Option<Vec<u8>>>, Shape> {
    if lookup.found[4].is_some() || lookup.found[5].is_some() {
        return Err(Shape::Unchanged);
    }
    let coords = plain_numbers(tb, &lookup.found[..4]).ok_or(Shape::Unchanged)?;

    // A zero or negative size disables rendering of the element.
    if coords[2..]
        .iter()
        .map(or_zero)
        .any(|v| v == b"0" || v.starts_with(b"-"))
    {
        return Err(Shape::Suppressed);
    }
    Ok(coords)
}

fn shorten_poly<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    buf: &mut String,
    precision: Option<u8>,
    close: bool,
) -> Shape {
    let lookup = tb.attributes(&[Hash::Points]);
    let Some(i) = lookup.found[0] else {
        return Shape::Unchanged;
    };
    let Some(points) = parse_points(tb.peek(i).attr_inner()) else {
        return Shape::Unchanged;
    };

    let mut d = Vec::new();
    for (n, point) in points.iter().enumerate() {
        d.extend_from_slice(match n {
            0 => b"M",
            2 => b"L",
            _ => b" ",
        });
        d.extend_from_slice(point);
    }
    if close {
        d.push(b'z');
    }
    replace_with_path(tb, &lookup, &d, buf, precision)
}

/// Canonical numbers of a list of points, or `None` unless it holds a whole,
/// non-zero number of coordinate pairs.
fn parse_points(points: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut numbers = Vec::new();
    let mut i = 0;
    loop {
        while i < points.len() && (is_whitespace(points[i]) || points[i] == b',') {
            i += 1;
        }
        if i == points.len() {
            break;
        }
        let n = number_len(&points[i..]);
        if n == 0 {
            return None;
        }
        numbers.push(minify_number(&points[i..i + n]));
        i += n;
    }

    (!numbers.is_empty() && numbers.len() % 2 == 0).then_some(numbers)
}

/// Canonical values of the attributes at `found`, `None` for missing ones.
/// Fails if any value is not a plain number.
fn plain_numbers<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    found: &[Option<usize>],
) -> Option<Vec<Option<Vec<u8>>>> {
    found
        .iter()
        .map(|i| match *i {
            None => Some(None),
            Some(i) => {
                let val = normalize_whitespace(tb.peek(i).attr_inner());
                is_number(&val).then(|| Some(minify_number(&val)))
            }
        })
        .collect()
}

fn or_zero(coord: &Option<Vec<u8>>) -> &[u8] {
    coord.as_deref().unwrap_or(b"0")
}

fn replace_with_path<R: BufRead>(
    tb: &mut TokenBuffer<R>,
    lookup: &AttrLookup,
    d: &[u8],
    buf: &mut String,
    precision: Option<u8>,
) -> Shape {
    let Some(replacement) = lookup.replacement else {
        return Shape::Unchanged;
    };
    if !shorten_path_data(d, precision, buf) {
        return Shape::Unchanged;
    }

    for &i in lookup.found.iter().flatten() {
        if i != replacement {
            tb.delete(i);
        }
    }
    tb.replace(replacement, b"d", buf.as_bytes());
    Shape::Path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, Token, TokenType};

    /// Run the converter on `src` and collect the attributes left to emit.
    fn run(src: &str) -> (Shape, Vec<(String, String)>) {
        let mut tb = TokenBuffer::new(Lexer::new(src.as_bytes()));
        let start = tb.shift();
        let mut buf = String::new();
        let shape = convert(start.hash.unwrap(), &mut tb, &mut buf, None);

        let mut attrs = Vec::new();
        loop {
            let t: Token = tb.shift();
            if t.kind != TokenType::Attribute {
                break;
            }
            if !t.deleted {
                attrs.push((
                    String::from_utf8(t.text.clone()).unwrap(),
                    String::from_utf8(t.attr_inner().to_vec()).unwrap(),
                ));
            }
        }
        (shape, attrs)
    }

    fn attr(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_line() {
        let (shape, attrs) = run(r#"<line stroke="red" x1="0" y1="0" x2="10" y2="10.0"/>"#);
        assert_eq!(shape, Shape::Path);
        assert_eq!(attrs, [attr("stroke", "red"), attr("d", "M0 0 10 10z")]);
    }

    #[test]
    fn test_line_defaults_to_zero() {
        let (shape, attrs) = run(r#"<line x2="5"/>"#);
        assert_eq!(shape, Shape::Path);
        assert_eq!(attrs, [attr("d", "M0 0 5 0z")]);
    }

    #[test]
    fn test_line_with_units_is_unchanged() {
        let (shape, attrs) = run(r#"<line x1="10%" x2="5"/>"#);
        assert_eq!(shape, Shape::Unchanged);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_rect() {
        let (shape, attrs) = run(r#"<rect x="1" y="2" width="30" height="40" fill="blue"/>"#);
        assert_eq!(shape, Shape::Path);
        assert_eq!(attrs, [attr("d", "M1 2h30v40H1z"), attr("fill", "blue")]);
    }

    #[test]
    fn test_rounded_rect_is_unchanged() {
        let (shape, attrs) = run(r#"<rect width="30" height="40" rx="5"/>"#);
        assert_eq!(shape, Shape::Unchanged);
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_degenerate_rect() {
        assert_eq!(run(r#"<rect width="0" height="40"/>"#).0, Shape::Suppressed);
        assert_eq!(run(r#"<rect width="10"/>"#).0, Shape::Suppressed);
        assert_eq!(run(r#"<rect width="-1" height="40"/>"#).0, Shape::Suppressed);
        assert_eq!(run("<rect/>").0, Shape::Suppressed);
    }

    #[test]
    fn test_empty_rect_ahead() {
        let mut tb = TokenBuffer::new(Lexer::new(
            r#"<g><rect width="0" height="4"/><rect width="2" height="4"/><rect rx="1"/></g>"#
                .as_bytes(),
        ));
        tb.shift();
        tb.shift();
        assert!(is_empty_rect(&mut tb, 0));
        assert!(!is_empty_rect(&mut tb, 4));
        // Rounded rects are never dropped.
        assert!(!is_empty_rect(&mut tb, 8));
        assert_eq!(tb.shift().hash, Some(Hash::Rect));
    }

    #[test]
    fn test_polygon_and_polyline() {
        let (shape, attrs) = run(r#"<polygon points="0,0 10,0 10,10"/>"#);
        assert_eq!(shape, Shape::Path);
        assert_eq!(attrs, [attr("d", "M0 0 10 0 10 10z")]);

        let (shape, attrs) = run(r#"<polyline points=" 1.50 2 3-4 "/>"#);
        assert_eq!(shape, Shape::Path);
        assert_eq!(attrs, [attr("d", "M1.5 2 3-4")]);
    }

    #[test]
    fn test_malformed_points_are_unchanged() {
        assert_eq!(run(r#"<polygon points=""/>"#).0, Shape::Unchanged);
        assert_eq!(run(r#"<polygon points="1 2 3"/>"#).0, Shape::Unchanged);
        assert_eq!(run(r#"<polygon points="1 2 a b"/>"#).0, Shape::Unchanged);
        assert_eq!(run("<polyline/>").0, Shape::Unchanged);
    }
}
