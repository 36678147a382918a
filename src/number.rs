//! Numeric canonicalization for attribute values.

/// Length of the decimal literal at the start of `b`, or 0 if there is none.
///
/// Accepts an optional sign, digits with an optional fraction, and an exponent
/// only when digits follow the `e`, so `1em` reads as `1` plus a unit.
pub fn number_len(b: &[u8]) -> usize {
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        let mut j = i + 1;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        let frac = j - i - 1;
        if digits > 0 || frac > 0 {
            i = j;
            digits += frac;
        }
    }
    if digits == 0 {
        return 0;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && matches!(b[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Split a dimension like `10.5px` into the lengths of its number and unit.
///
/// The unit is either `%` or a run of ASCII letters. Returns `(0, 0)` when `b`
/// does not start with a number. A dot only belongs to the number when a digit
/// follows it, so `1.png` is the number `1` and not `1.` with unit `png`.
pub fn dimension(b: &[u8]) -> (usize, usize) {
    let mut n = number_len(b);
    if n == 0 {
        return (0, 0);
    }
    if let Some(dot) = b[..n].iter().position(|&c| c == b'.')
        && !b.get(dot + 1).is_some_and(u8::is_ascii_digit)
    {
        n = dot;
    }
    let rest = &b[n..];
    let m = if rest.first() == Some(&b'%') {
        1
    } else {
        rest.iter().take_while(|c| c.is_ascii_alphabetic()).count()
    };
    (n, m)
}

/// Canonicalize a decimal literal: drop a `+` sign, leading zeros of the integer
/// part, trailing zeros of the fraction and zero exponents.
///
/// `0.50` becomes `.5`, `-0.0` becomes `0`. Input that is not exactly one number
/// is returned unchanged.
pub fn minify_number(num: &[u8]) -> Vec<u8> {
    if num.is_empty() || number_len(num) != num.len() {
        return num.to_vec();
    }

    let (neg, rest) = match num[0] {
        b'-' => (true, &num[1..]),
        b'+' => (false, &num[1..]),
        _ => (false, num),
    };
    let (mantissa, exp) = match rest.iter().position(|&c| c == b'e' || c == b'E') {
        Some(i) => (&rest[..i], Some(&rest[i + 1..])),
        None => (rest, None),
    };
    let (int, frac) = match mantissa.iter().position(|&c| c == b'.') {
        Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
        None => (mantissa, &[][..]),
    };

    let int = &int[int.iter().position(|&c| c != b'0').unwrap_or(int.len())..];
    let frac = &frac[..frac.iter().rposition(|&c| c != b'0').map_or(0, |i| i + 1)];
    if int.is_empty() && frac.is_empty() {
        return b"0".to_vec();
    }

    let mut out = Vec::with_capacity(num.len());
    if neg {
        out.push(b'-');
    }
    out.extend_from_slice(int);
    if !frac.is_empty() {
        out.push(b'.');
        out.extend_from_slice(frac);
    }

    if let Some(exp) = exp {
        let (exp_neg, digits) = match exp.first() {
            Some(b'-') => (true, &exp[1..]),
            Some(b'+') => (false, &exp[1..]),
            _ => (false, exp),
        };
        let digits = &digits[digits.iter().position(|&c| c != b'0').unwrap_or(digits.len())..];
        if !digits.is_empty() {
            out.push(b'e');
            if exp_neg {
                out.push(b'-');
            }
            out.extend_from_slice(digits);
        }
    }
    out
}

/// Shorten the dimension at the start of `b`.
///
/// The number is canonicalized, a `px` unit is dropped, other units are
/// lower-cased and a zero loses its unit entirely. Returns the shortened bytes and
/// how many input bytes they replace, or `None` if `b` has no leading number.
pub fn shorten_dimension(b: &[u8]) -> Option<(Vec<u8>, usize)> {
    let (n, m) = dimension(b);
    if n == 0 {
        return None;
    }

    let mut num = minify_number(&b[..n]);
    if num != b"0" {
        let unit = &b[n..n + m];
        if !unit.eq_ignore_ascii_case(b"px") {
            num.extend(unit.iter().map(u8::to_ascii_lowercase));
        }
    }
    Some((num, n + m))
}

/// Whether `b` is exactly one plain number, with no unit.
pub fn is_number(b: &[u8]) -> bool {
    !b.is_empty() && number_len(b) == b.len()
}
