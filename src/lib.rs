//! svgpress - A streaming SVG minifier
//!
//! svgpress rewrites SVG markup token by token: redundant markup is dropped,
//! basic shapes become path data, and numbers, colors and styles are written in
//! their shortest form. Only as much of the document is buffered as the
//! rewrites need to look ahead.

mod buffer;
mod color;
mod css;
mod error;
mod escape;
mod hash;
mod lexer;
mod minify;
mod number;
mod path;
mod registry;
mod shape;

use std::io::{BufRead, Write};

pub use css::{CssMinifier, minify_inline, minify_stylesheet};
pub use error::*;
pub use minify::SvgMinifier;
pub use path::{Command, Path, parse_path, serialize_path};
pub use registry::{Minify, Params, Registry};

/// Minify the SVG read from `input` into `out`.
///
/// Style content is handed to the minifiers in `registry`; see
/// [`Registry::with_defaults`].
pub fn minify<R: BufRead, W: Write>(
    registry: &Registry,
    out: W,
    input: R,
    options: &Options,
) -> Result<(), SvgError> {
    minify::Rewriter::new(registry, out, input, *options).run()
}

/// Minify an SVG string with the built-in minifiers and default settings.
pub fn minify_str(svg: &str) -> Result<String, SvgError> {
    let mut out = Vec::with_capacity(svg.len());
    minify(
        &Registry::with_defaults(),
        &mut out,
        svg.as_bytes(),
        &Options::default(),
    )?;
    // Input bytes are copied or replaced by ASCII, never split.
    Ok(String::from_utf8(out).map_err(|e| e.utf8_error())?)
}

/// Minification options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Decimal places for path coordinates. `None` keeps every significant
    /// digit and only drops redundant ones.
    pub precision: Option<u8>,
}
