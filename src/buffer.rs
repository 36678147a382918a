//! Lookahead over the token stream.

use std::io::BufRead;

use crate::error::SvgError;
use crate::hash::Hash;
use crate::lexer::{Lexer, Token, TokenType};

/// Most attributes a single [`TokenBuffer::attributes`] call can look up.
pub const MAX_ATTR_LOOKUP: usize = 6;

/// Result of [`TokenBuffer::attributes`]: queue indices (as passed to
/// [`TokenBuffer::peek`]) of the requested attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttrLookup {
    /// Per requested name, the index of the live attribute token.
    pub found: [Option<usize>; MAX_ATTR_LOOKUP],
    /// The first requested attribute in document order; a converter overwrites it
    /// with the attribute it synthesizes.
    pub replacement: Option<usize>,
}

/// Tokens that were read ahead but not yet shifted, in document order.
///
/// `peek(i)` keeps returning the same token until the next `shift`, so indices
/// handed out by [`TokenBuffer::attributes`] stay valid until then.
pub struct TokenBuffer<R> {
    lexer: Lexer<R>,
    buf: Vec<Token>,
    pos: usize,
}

impl<R: BufRead> TokenBuffer<R> {
    pub fn new(lexer: Lexer<R>) -> Self {
        Self {
            lexer,
            buf: Vec::with_capacity(8),
            pos: 0,
        }
    }

    /// Remove and return the next token.
    pub fn shift(&mut self) -> Token {
        if self.pos == self.buf.len() {
            return self.lexer.next_token();
        }

        let token = std::mem::take(&mut self.buf[self.pos]);
        self.pos += 1;
        if self.pos == self.buf.len() {
            self.buf.clear();
            self.pos = 0;
        }
        token
    }

    /// The token `n` positions ahead of the next [`shift`](Self::shift).
    pub fn peek(&mut self, n: usize) -> &Token {
        let i = self.pos + n;
        while i >= self.buf.len() {
            let token = self.lexer.next_token();
            self.buf.push(token);
        }
        &self.buf[i]
    }

    /// Look up attributes of the start tag that was just shifted.
    ///
    /// Scans the attribute tokens up to the first token of any other kind without
    /// consuming anything. Deleted attributes are ignored; for repeated names the
    /// first occurrence wins.
    pub fn attributes(&mut self, names: &[Hash]) -> AttrLookup {
        self.attributes_at(0, names)
    }

    /// Like [`attributes`](Self::attributes), for a start tag further ahead whose
    /// first attribute sits at index `start`. Indices stay relative to the cursor.
    pub fn attributes_at(&mut self, start: usize, names: &[Hash]) -> AttrLookup {
        debug_assert!(names.len() <= MAX_ATTR_LOOKUP);

        let mut lookup = AttrLookup::default();
        let mut i = start;
        loop {
            let token = self.peek(i);
            if token.kind != TokenType::Attribute {
                break;
            }
            if !token.deleted
                && let Some(j) = names.iter().position(|&name| Some(name) == token.hash)
                && lookup.found[j].is_none()
            {
                lookup.found[j] = Some(i);
                lookup.replacement.get_or_insert(i);
            }
            i += 1;
        }
        lookup
    }

    /// Mark the attribute at index `i` as not to be emitted.
    pub fn delete(&mut self, i: usize) {
        self.entry(i).deleted = true;
    }

    /// Overwrite the attribute at index `i` with `name="value"`.
    ///
    /// The replaced token loses its hash, so the rewriter emits the value as is.
    pub fn replace(&mut self, i: usize, name: &[u8], value: &[u8]) {
        let token = self.entry(i);
        token.hash = None;
        token.deleted = false;
        token.text = name.to_vec();
        token.attr_val.clear();
        token.attr_val.push(b'"');
        token.attr_val.extend_from_slice(value);
        token.attr_val.push(b'"');
    }

    /// Shift tokens until the end tag (or void close) of `tag`, or an error.
    pub fn skip_tag(&mut self, tag: Hash) {
        loop {
            let token = self.shift();
            match token.kind {
                TokenType::EndTag | TokenType::StartTagCloseVoid if token.hash == Some(tag) => {
                    break;
                }
                TokenType::Error => break,
                _ => {}
            }
        }
    }

    /// Shift tokens through the end of the current processing instruction.
    pub fn skip_pi(&mut self) {
        loop {
            match self.shift().kind {
                TokenType::StartTagClosePI | TokenType::Error => break,
                _ => {}
            }
        }
    }

    /// Drop the next `n` tokens.
    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            self.shift();
        }
    }

    /// Outcome of an error token: `Ok` at the end of input, else the tokenizer
    /// error.
    pub fn finish(&mut self) -> Result<(), SvgError> {
        match self.lexer.take_err() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn entry(&mut self, i: usize) -> &mut Token {
        self.peek(i);
        &mut self.buf[self.pos + i]
    }
}
