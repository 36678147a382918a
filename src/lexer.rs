//! XML tokenizer.
//!
//! quick-xml reports whole tags; the rewriter needs to look at (and rewrite) the
//! pieces of a tag separately. [`Lexer`] splits every quick-xml event into the
//! finer token grammar below, resolving tag and attribute names to [`Hash`]es on
//! the way.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::SvgError;
use crate::hash::Hash;

/// Grammar category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenType {
    /// End of input or a tokenizer error; see [`Lexer::take_err`].
    #[default]
    Error,
    Text,
    CData,
    Comment,
    DocType,
    /// `<?target`, including the XML declaration.
    StartTagPI,
    /// `?>`
    StartTagClosePI,
    /// `<name`
    StartTag,
    /// ` name="value"`
    Attribute,
    /// `>`
    StartTagClose,
    /// `/>`
    StartTagCloseVoid,
    /// `</name>`
    EndTag,
}

/// One lexical unit of the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    /// Interned tag or attribute name. Close tokens carry the hash of their tag.
    pub hash: Option<Hash>,
    /// Bytes that reproduce the token.
    pub data: Vec<u8>,
    /// Tag or attribute name; CDATA content for CDATA tokens.
    pub text: Vec<u8>,
    /// Attribute value including its quotes.
    pub attr_val: Vec<u8>,
    /// Set on attributes that must not be emitted.
    pub deleted: bool,
}

impl Token {
    fn new(kind: TokenType, hash: Option<Hash>, data: Vec<u8>, text: Vec<u8>) -> Self {
        Self {
            kind,
            hash,
            data,
            text,
            ..Default::default()
        }
    }

    /// Attribute value without its quotes.
    pub fn attr_inner(&self) -> &[u8] {
        match self.attr_val.len() {
            n if n >= 2 => &self.attr_val[1..n - 1],
            _ => &[],
        }
    }
}

/// Streaming tokenizer over any buffered reader.
pub struct Lexer<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: VecDeque<Token>,
    err: Option<SvgError>,
    done: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        // Mismatched end tags are passed through.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            err: None,
            done: false,
        }
    }

    /// Next token. After the input is exhausted, or after an error, every call
    /// returns an [`TokenType::Error`] token.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            if self.done {
                return Token::default();
            }
            self.read();
        }
    }

    /// The error that ended tokenizing, or `None` at a clean end of input.
    pub fn take_err(&mut self) -> Option<SvgError> {
        self.err.take()
    }

    fn read(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        let result = match self.reader.read_event_into(&mut buf) {
            Ok(event) => self.push_event(event),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            self.err = Some(e);
            self.done = true;
        }
        self.buf = buf;
    }

    fn push_event(&mut self, event: Event<'_>) -> Result<(), SvgError> {
        match event {
            Event::Start(e) => self.push_start_tag(&e, false)?,
            Event::Empty(e) => self.push_start_tag(&e, true)?,
            Event::End(e) => {
                let name = e.name().as_ref().to_vec();
                let data = [&b"</"[..], name.as_slice(), &b">"[..]].concat();
                self.push(TokenType::EndTag, Hash::from_name(&name), data, name);
            }
            Event::Text(e) => self.push(TokenType::Text, None, e.to_vec(), Vec::new()),
            Event::CData(e) => {
                let data = [&b"<![CDATA["[..], &e[..], &b"]]>"[..]].concat();
                self.push(TokenType::CData, None, data, e.to_vec());
            }
            Event::Comment(e) => {
                let data = [&b"<!--"[..], &e[..], &b"-->"[..]].concat();
                self.push(TokenType::Comment, None, data, Vec::new());
            }
            Event::DocType(e) => {
                let data = [&b"<!DOCTYPE "[..], &e[..], &b">"[..]].concat();
                self.push(TokenType::DocType, None, data, Vec::new());
            }
            Event::Decl(_) => self.push_pi(b"xml".to_vec()),
            Event::PI(e) => self.push_pi(e.target().to_vec()),
            Event::Eof => self.done = true,
        }
        Ok(())
    }

    fn push_start_tag(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), SvgError> {
        let name = e.name().as_ref().to_vec();
        let hash = Hash::from_name(&name);
        let data = [&b"<"[..], name.as_slice()].concat();
        self.push(TokenType::StartTag, hash, data, name.clone());

        for attr in e.attributes().with_checks(false) {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = attr.key.as_ref();
            let quote = if attr.value.contains(&b'"') { b'\'' } else { b'"' };

            let mut attr_val = Vec::with_capacity(attr.value.len() + 2);
            attr_val.push(quote);
            attr_val.extend_from_slice(&attr.value);
            attr_val.push(quote);
            let data = [&b" "[..], key, &b"="[..], attr_val.as_slice()].concat();

            self.pending.push_back(Token {
                kind: TokenType::Attribute,
                hash: Hash::from_name(key),
                data,
                text: key.to_vec(),
                attr_val,
                deleted: false,
            });
        }

        if empty {
            self.push(TokenType::StartTagCloseVoid, hash, b"/>".to_vec(), name);
        } else {
            self.push(TokenType::StartTagClose, hash, b">".to_vec(), name);
        }
        Ok(())
    }

    fn push_pi(&mut self, target: Vec<u8>) {
        let data = [&b"<?"[..], target.as_slice()].concat();
        self.push(TokenType::StartTagPI, None, data, target);
        self.push(TokenType::StartTagClosePI, None, b"?>".to_vec(), Vec::new());
    }

    fn push(&mut self, kind: TokenType, hash: Option<Hash>, data: Vec<u8>, text: Vec<u8>) {
        self.pending.push_back(Token::new(kind, hash, data, text));
    }
}
