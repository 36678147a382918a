//! The rewriting pass: one token in, the shortest equivalent bytes out.

use std::borrow::Cow;
use std::io::{BufRead, Write};

use log::{debug, trace};

use crate::Options;
use crate::buffer::TokenBuffer;
use crate::color::shorten_color;
use crate::error::SvgError;
use crate::escape::{escape_attr_val, escape_cdata_val, is_all_whitespace, normalize_whitespace};
use crate::hash::Hash;
use crate::lexer::{Lexer, Token, TokenType};
use crate::number::shorten_dimension;
use crate::path::shorten_path_data;
use crate::registry::{Minify, Params, Registry, content_type};
use crate::shape::{self, Shape};

const DEFAULT_STYLE_TYPE: &str = "text/css";

/// The SVG minifier as a registry entry, so SVG nested in other documents can be
/// minified too.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgMinifier {
    pub options: Options,
}

impl SvgMinifier {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

impl Minify for SvgMinifier {
    fn minify(
        &self,
        registry: &Registry,
        out: &mut dyn Write,
        input: &mut dyn BufRead,
        _params: &Params,
    ) -> Result<(), SvgError> {
        Rewriter::new(registry, out, input, self.options).run()
    }
}

/// Drives the token stream to the output.
pub(crate) struct Rewriter<'a, R, W> {
    registry: &'a Registry,
    out: W,
    tb: TokenBuffer<R>,
    options: Options,

    /// Tag of the innermost start tag seen, until its end tag.
    tag: Option<Hash>,
    /// The attributes being processed belong to the root `<svg>`.
    in_root: bool,
    seen_root: bool,
    /// Shape that was rewritten to `<path` and whose end tag is still to come.
    retarget: Option<Hash>,

    style_type: String,
    inline_style_type: String,

    escape_buf: Vec<u8>,
    attr_buf: Vec<u8>,
    path_buf: String,
}

impl<'a, R: BufRead, W: Write> Rewriter<'a, R, W> {
    pub(crate) fn new(registry: &'a Registry, out: W, input: R, options: Options) -> Self {
        Self {
            registry,
            out,
            tb: TokenBuffer::new(Lexer::new(input)),
            options,
            tag: None,
            in_root: false,
            seen_root: false,
            retarget: None,
            style_type: DEFAULT_STYLE_TYPE.to_string(),
            inline_style_type: format!("{DEFAULT_STYLE_TYPE};inline=1"),
            escape_buf: Vec::with_capacity(64),
            attr_buf: Vec::with_capacity(64),
            path_buf: String::with_capacity(64),
        }
    }

    pub(crate) fn run(mut self) -> Result<(), SvgError> {
        loop {
            let mut t = self.tb.shift();
            if t.kind == TokenType::CData && escape_cdata_val(&t.text, &mut self.escape_buf) {
                t.kind = TokenType::Text;
                t.data.clear();
                t.data.extend_from_slice(&self.escape_buf);
            }

            match t.kind {
                TokenType::Error => return self.tb.finish(),
                TokenType::Text => self.text(&t.data)?,
                TokenType::CData => self.cdata(&t)?,
                TokenType::StartTagPI => self.tb.skip_pi(),
                TokenType::StartTag => self.start_tag(t)?,
                TokenType::Attribute => self.attribute(&t)?,
                TokenType::StartTagClose => self.start_tag_close(&t)?,
                TokenType::StartTagCloseVoid => {
                    self.in_root = false;
                    self.tag = None;
                    if t.hash.is_some() && t.hash == self.retarget {
                        self.retarget = None;
                    }
                    self.out.write_all(&t.data)?;
                }
                TokenType::EndTag => self.end_tag(&t)?,
                TokenType::Comment | TokenType::DocType | TokenType::StartTagClosePI => {}
            }
        }
    }

    fn text(&mut self, data: &[u8]) -> Result<(), SvgError> {
        let text = normalize_whitespace(data);
        if self.tag == Some(Hash::Style) && !text.is_empty() {
            return self.minify_style(&text);
        }
        self.out.write_all(&text)?;
        Ok(())
    }

    fn cdata(&mut self, t: &Token) -> Result<(), SvgError> {
        if self.tag != Some(Hash::Style) {
            self.out.write_all(&t.data)?;
            return Ok(());
        }
        self.out.write_all(b"<![CDATA[")?;
        self.minify_style(&t.text)?;
        self.out.write_all(b"]]>")?;
        Ok(())
    }

    /// Stylesheet content under the current style type, as is when no minifier
    /// handles it.
    fn minify_style(&mut self, css: &[u8]) -> Result<(), SvgError> {
        match self
            .registry
            .minify(&self.style_type, &mut self.out, &mut &css[..])
        {
            Err(SvgError::NotRegistered(mimetype)) => {
                trace!("no minifier for {mimetype}, keeping stylesheet");
                self.out.write_all(css)?;
                Ok(())
            }
            result => result,
        }
    }

    fn start_tag(&mut self, mut t: Token) -> Result<(), SvgError> {
        self.tag = t.hash;
        self.in_root = !self.seen_root && t.hash == Some(Hash::Svg);
        self.seen_root = true;

        if let Some(tag) = t.hash {
            if tag.is_container() && self.skip_empty_container(tag, &t.text) {
                return Ok(());
            }
            if tag == Hash::Metadata {
                debug!("dropping <metadata>");
                self.tb.skip_tag(tag);
                return Ok(());
            }
            if tag.is_shape() {
                let precision = self.options.precision;
                match shape::convert(tag, &mut self.tb, &mut self.path_buf, precision) {
                    Shape::Unchanged => {}
                    Shape::Path => {
                        t.data.clear();
                        t.data.extend_from_slice(b"<path");
                        self.tag = Some(Hash::Path);
                        self.retarget = Some(tag);
                    }
                    Shape::Suppressed => {
                        debug!("dropping empty <{}>", String::from_utf8_lossy(&t.text));
                        self.tb.skip_tag(tag);
                        return Ok(());
                    }
                }
            }
        }

        self.out.write_all(&t.data)?;
        Ok(())
    }

    /// Drop the container that was just opened if nothing but attributes and
    /// blank content precede its end. Containers with an `id` are kept.
    fn skip_empty_container(&mut self, tag: Hash, name: &[u8]) -> bool {
        let mut i = 0;
        let end = loop {
            let next = self.tb.peek(i);
            let (kind, hash) = (next.kind, next.hash);
            match kind {
                TokenType::Attribute if hash == Some(Hash::Id) => return false,
                TokenType::Attribute => i += 1,
                TokenType::StartTagCloseVoid => break i,
                TokenType::StartTagClose => {
                    let j = self.blank_len(i + 1);
                    let next = self.tb.peek(j);
                    if next.kind != TokenType::EndTag || next.hash != Some(tag) {
                        return false;
                    }
                    break j;
                }
                _ => return false,
            }
        };

        debug!("dropping empty <{}>", String::from_utf8_lossy(name));
        self.tb.skip(end + 1);
        true
    }

    /// Number of tokens from `start` on that minify to nothing: whitespace,
    /// comments, metadata, empty rects and whole empty containers.
    fn blank_len(&mut self, start: usize) -> usize {
        let mut i = start;
        let mut end = start;
        let mut open = 0usize;
        loop {
            let next = self.tb.peek(i);
            let (kind, hash) = (next.kind, next.hash);
            let blank_text = kind == TokenType::Text && is_all_whitespace(&next.data);
            let container = hash.is_some_and(Hash::is_container);
            match kind {
                TokenType::Text if blank_text => {}
                TokenType::Comment => {}
                TokenType::StartTag if container => open += 1,
                TokenType::StartTag
                    if hash == Some(Hash::Metadata)
                        || (hash == Some(Hash::Rect) && shape::is_empty_rect(&mut self.tb, i)) =>
                {
                    match hash.and_then(|tag| self.element_end(tag, i)) {
                        Some(e) => i = e,
                        None => return end,
                    }
                }
                TokenType::Attribute if open > 0 && hash != Some(Hash::Id) => {}
                TokenType::StartTagClose if open > 0 => {}
                TokenType::StartTagCloseVoid | TokenType::EndTag if open > 0 && container => {
                    open -= 1
                }
                _ => return end,
            }
            i += 1;
            if open == 0 {
                end = i;
            }
        }
    }

    /// Index of the end tag or void close of the `tag` element opened at `start`.
    fn element_end(&mut self, tag: Hash, start: usize) -> Option<usize> {
        let mut i = start + 1;
        loop {
            let next = self.tb.peek(i);
            match next.kind {
                TokenType::EndTag | TokenType::StartTagCloseVoid if next.hash == Some(tag) => {
                    return Some(i);
                }
                TokenType::Error => return None,
                _ => i += 1,
            }
        }
    }

    fn attribute(&mut self, t: &Token) -> Result<(), SvgError> {
        if t.deleted || t.attr_val.len() < 2 {
            return Ok(());
        }
        let attr = t.hash;
        if self.in_root && attr == Some(Hash::Version) {
            return Ok(());
        }

        let val = normalize_whitespace(t.attr_inner());
        self.out.write_all(b" ")?;
        self.out.write_all(&t.text)?;
        self.out.write_all(b"=")?;

        let val: Cow<'_, [u8]> = match attr {
            Some(Hash::ContentStyleType) if self.in_root => {
                let media_type = content_type(&val);
                self.style_type = String::from_utf8_lossy(&media_type).into_owned();
                self.inline_style_type = format!("{};inline=1", self.style_type);
                Cow::Owned(media_type)
            }
            Some(Hash::Style) => {
                self.attr_buf.clear();
                match self.registry.minify(
                    &self.inline_style_type,
                    &mut self.attr_buf,
                    &mut val.as_slice(),
                ) {
                    Ok(()) => Cow::Borrowed(self.attr_buf.as_slice()),
                    Err(e) => {
                        trace!("keeping style attribute: {e}");
                        Cow::Owned(val)
                    }
                }
            }
            Some(Hash::D) => {
                if shorten_path_data(&val, self.options.precision, &mut self.path_buf) {
                    Cow::Borrowed(self.path_buf.as_bytes())
                } else {
                    Cow::Owned(val)
                }
            }
            Some(Hash::ViewBox) => Cow::Owned(shorten_view_box(&val)),
            Some(a) if a.is_color_attr() && !val.is_empty() => Cow::Owned(shorten_color(&val)),
            _ => match shorten_dimension(&val) {
                Some((dim, n)) if n == val.len() => Cow::Owned(dim),
                _ => Cow::Owned(val),
            },
        };

        escape_attr_val(&val, &mut self.escape_buf);
        self.out.write_all(&self.escape_buf)?;
        Ok(())
    }

    fn start_tag_close(&mut self, t: &Token) -> Result<(), SvgError> {
        self.in_root = false;

        let n = self.blank_len(0);
        let empty = {
            let next = self.tb.peek(n);
            next.kind == TokenType::EndTag && next.text == t.text
        };

        if !empty {
            self.out.write_all(&t.data)?;
            return Ok(());
        }
        self.tb.skip(n + 1);
        if t.hash.is_some() && t.hash == self.retarget {
            self.retarget = None;
        }
        self.tag = None;
        self.out.write_all(b"/>")?;
        Ok(())
    }

    fn end_tag(&mut self, t: &Token) -> Result<(), SvgError> {
        self.tag = None;
        if t.hash.is_some() && t.hash == self.retarget {
            self.retarget = None;
            self.out.write_all(b"</path>")?;
            return Ok(());
        }

        let name_end = 2 + t.text.len();
        if t.data.len() > name_end + 1 {
            self.out.write_all(&t.data[..name_end])?;
            self.out.write_all(b">")?;
        } else {
            self.out.write_all(&t.data)?;
        }
        Ok(())
    }
}

/// Shorten the numbers of a `viewBox`. Separators become single spaces; whatever
/// does not parse as four numbers is appended as is.
fn shorten_view_box(val: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(val.len());
    let mut j = 0;
    for i in 0..4 {
        if i > 0 {
            let sep = val[j..]
                .iter()
                .take_while(|&&c| c == b' ' || c == b',')
                .count();
            if sep == 0 {
                break;
            }
            out.push(b' ');
            j += sep;
        }
        match shorten_dimension(&val[j..]) {
            Some((dim, n)) => {
                out.extend_from_slice(&dim);
                j += n;
            }
            None => break,
        }
    }
    out.extend_from_slice(&val[j..]);
    out
}
