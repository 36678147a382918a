//! Whitespace handling and escaping for text, CDATA and attribute values.

const CDATA_MARKERS_LEN: usize = b"<![CDATA[]]>".len();

const QUOTE_ENTITIES: [(&[u8], u8); 6] = [
    (b"&quot;", b'"'),
    (b"&#34;", b'"'),
    (b"&#x22;", b'"'),
    (b"&apos;", b'\''),
    (b"&#39;", b'\''),
    (b"&#x27;", b'\''),
];

pub fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

pub fn is_all_whitespace(b: &[u8]) -> bool {
    b.iter().all(|&c| is_whitespace(c))
}

/// Trim both ends and collapse every internal whitespace run to a single space.
pub fn normalize_whitespace(b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(b.len());
    let mut pending_space = false;
    for &c in b {
        if is_whitespace(c) {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(b' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

fn quote_entity(b: &[u8]) -> Option<(u8, usize)> {
    QUOTE_ENTITIES
        .iter()
        .find(|(entity, _)| b.starts_with(entity))
        .map(|&(entity, quote)| (quote, entity.len()))
}

/// Quote an attribute value into `buf`.
///
/// Picks whichever quote character occurs less often in the value (counting quote
/// entities) and escapes only that one. Entities for the other quote are written
/// as the literal character. `val` is raw attribute text, so other entities are
/// left alone.
pub fn escape_attr_val(val: &[u8], buf: &mut Vec<u8>) {
    let mut singles = 0;
    let mut doubles = 0;
    let mut i = 0;
    while i < val.len() {
        let (quote, n) = match val[i] {
            b'&' => quote_entity(&val[i..]).unwrap_or((0, 1)),
            c => (c, 1),
        };
        match quote {
            b'"' => doubles += 1,
            b'\'' => singles += 1,
            _ => {}
        }
        i += n;
    }

    let (quote, escaped): (u8, &[u8]) = if doubles > singles {
        (b'\'', b"&#39;")
    } else {
        (b'"', b"&#34;")
    };

    buf.clear();
    buf.reserve(val.len() + 2);
    buf.push(quote);
    let mut i = 0;
    while i < val.len() {
        let c = val[i];
        if c == b'&' {
            if let Some((q, n)) = quote_entity(&val[i..]) {
                if q == quote {
                    buf.extend_from_slice(escaped);
                } else {
                    buf.push(q);
                }
                i += n;
                continue;
            }
        }
        if c == quote {
            buf.extend_from_slice(escaped);
        } else {
            buf.push(c);
        }
        i += 1;
    }
    buf.push(quote);
}

/// Escape CDATA content as plain text into `buf`.
///
/// Returns `false`, leaving `buf` in an unspecified state, when escaping would
/// grow the content by more than the CDATA markers it replaces.
pub fn escape_cdata_val(content: &[u8], buf: &mut Vec<u8>) -> bool {
    let mut growth = 0;
    for &c in content {
        growth += match c {
            b'<' => 3,
            b'&' => 4,
            _ => 0,
        };
        if growth > CDATA_MARKERS_LEN {
            return false;
        }
    }

    buf.clear();
    buf.reserve(content.len() + growth);
    for &c in content {
        match c {
            b'<' => buf.extend_from_slice(b"&lt;"),
            b'&' => buf.extend_from_slice(b"&amp;"),
            _ => buf.push(c),
        }
    }
    true
}
