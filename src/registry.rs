//! Sub-minifiers by media type.
//!
//! The SVG minifier hands `<style>` content and `style` attributes to whatever is
//! registered for their media type. A media type may carry parameters
//! (`text/css;inline=1`); they are split off and given to the minifier, while the
//! bare mimetype is the lookup key.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::css::CssMinifier;
use crate::error::SvgError;
use crate::minify::SvgMinifier;

/// Media type parameters, e.g. `inline=1`.
pub type Params = HashMap<String, String>;

/// A minifier for one kind of content.
pub trait Minify: Send + Sync {
    /// Minify `input` into `out`. Nested content can be handed to `registry`.
    fn minify(
        &self,
        registry: &Registry,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
        params: &Params,
    ) -> Result<(), SvgError>;
}

/// Minifiers keyed by mimetype.
#[derive(Default)]
pub struct Registry {
    minifiers: HashMap<String, Box<dyn Minify>>,
}

impl Registry {
    /// An empty registry: all nested content passes through unminified.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in CSS and SVG minifiers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add("text/css", CssMinifier);
        registry.add("image/svg+xml", SvgMinifier::default());
        registry
    }

    pub fn add(&mut self, mimetype: &str, minifier: impl Minify + 'static) {
        self.minifiers
            .insert(mimetype.to_ascii_lowercase(), Box::new(minifier));
    }

    /// Minify `input` with the minifier registered for `media_type`.
    ///
    /// Fails with [`SvgError::NotRegistered`], before writing anything, when no
    /// minifier handles the mimetype.
    pub fn minify(
        &self,
        media_type: &str,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
    ) -> Result<(), SvgError> {
        let (mimetype, params) = parse_media_type(media_type);
        match self.minifiers.get(&mimetype) {
            Some(minifier) => minifier.minify(self, out, input, &params),
            None => Err(SvgError::NotRegistered(mimetype)),
        }
    }
}

/// Split a media type into its lower-cased mimetype and parameters.
pub fn parse_media_type(media_type: &str) -> (String, Params) {
    let mut parts = media_type.split(';');
    let mimetype = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let params = parts
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((key.trim().to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect();
    (mimetype, params)
}

/// Canonical form of a media type: lower-cased mimetype and parameter names, no
/// whitespace around separators.
pub fn content_type(media_type: &[u8]) -> Vec<u8> {
    let media_type = String::from_utf8_lossy(media_type);
    let mut out = String::with_capacity(media_type.len());
    for (i, part) in media_type.split(';').enumerate() {
        let part = part.trim();
        if i == 0 {
            out.push_str(&part.to_ascii_lowercase());
            continue;
        }
        out.push(';');
        match part.split_once('=') {
            Some((key, value)) => {
                out.push_str(&key.trim().to_ascii_lowercase());
                out.push('=');
                out.push_str(value.trim());
            }
            None => out.push_str(part),
        }
    }
    out.into_bytes()
}
