//! Built-in CSS minifier for `<style>` content and `style` attributes.
//!
//! This is a lexical pass, not a CSS parser: comments go, whitespace is dropped
//! wherever punctuation makes it redundant, and a `;` right before `}` is removed.
//! Strings are copied verbatim. For inline declaration lists (`inline=1`) color
//! values are shortened as well.

use std::io::{BufRead, Read, Write};

use crate::color::shorten_color;
use crate::error::SvgError;
use crate::escape::is_whitespace;
use crate::registry::{Minify, Params, Registry};

const COLOR_PROPERTIES: [&[u8]; 6] = [
    b"fill",
    b"stroke",
    b"color",
    b"stop-color",
    b"flood-color",
    b"lighting-color",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl Minify for CssMinifier {
    fn minify(
        &self,
        _registry: &Registry,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
        params: &Params,
    ) -> Result<(), SvgError> {
        let mut css = Vec::new();
        input.read_to_end(&mut css)?;

        let minified = if params.get("inline").is_some_and(|v| v == "1") {
            minify_inline(&css)
        } else {
            minify_stylesheet(&css, false)
        };
        out.write_all(&minified)?;
        Ok(())
    }
}

/// Minify a declaration list such as `fill: #FF0000; stroke: none;`.
pub fn minify_inline(style: &[u8]) -> Vec<u8> {
    let compact = minify_stylesheet(style, true);

    let mut out = Vec::with_capacity(compact.len());
    for decl in split_declarations(&compact) {
        if decl.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(b';');
        }
        match decl.iter().position(|&c| c == b':') {
            Some(i) if COLOR_PROPERTIES.contains(&&decl[..i]) => {
                out.extend_from_slice(&decl[..=i]);
                out.extend_from_slice(&shorten_color(&decl[i + 1..]));
            }
            _ => out.extend_from_slice(decl),
        }
    }
    out
}

/// Strip comments and redundant whitespace from a stylesheet.
///
/// Outside of blocks a space before `:` is kept, since `a :hover` and `a:hover`
/// select different elements.
pub fn minify_stylesheet(css: &[u8], inline: bool) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(css.len());
    let mut depth = 0usize;
    let mut pending_space = false;
    let mut i = 0;

    while i < css.len() {
        let c = css[i];

        if css[i..].starts_with(b"/*") {
            i = css[i + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(css.len(), |end| i + 2 + end + 2);
            pending_space = !out.is_empty();
            continue;
        }
        if is_whitespace(c) {
            pending_space = !out.is_empty();
            i += 1;
            continue;
        }

        let in_block = inline || depth > 0;
        if pending_space {
            let last = out.last().copied().unwrap_or(b'{');
            if !is_separator(last, true) && !is_separator(c, in_block) {
                out.push(b' ');
            }
            pending_space = false;
        }

        match c {
            b'"' | b'\'' => {
                i = copy_string(css, i, &mut out);
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if out.last() == Some(&b';') {
                    out.pop();
                }
            }
            _ => {}
        }
        out.push(c);
        i += 1;
    }

    if inline && out.last() == Some(&b';') {
        out.pop();
    }
    out
}

fn is_separator(c: u8, in_block: bool) -> bool {
    matches!(c, b'{' | b'}' | b';' | b',' | b'>') || (in_block && c == b':')
}

/// Copy the string starting at `css[start]` into `out`; returns the index after it.
fn copy_string(css: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let quote = css[start];
    let mut i = start + 1;
    while i < css.len() {
        match css[i] {
            b'\\' => i += 2,
            c if c == quote => {
                i += 1;
                break;
            }
            _ => i += 1,
        }
    }
    let end = i.min(css.len());
    out.extend_from_slice(&css[start..end]);
    end
}

/// Split at `;` outside of strings and parentheses.
fn split_declarations(css: &[u8]) -> Vec<&[u8]> {
    let mut decls = Vec::new();
    let mut quote = None;
    let mut parens = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < css.len() {
        let c = css[i];
        match quote {
            Some(_) if c == b'\\' => i += 1,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b';' if parens == 0 => {
                    decls.push(&css[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    decls.push(&css[start..]);
    decls
}
