//! SVG path data parsing and minification.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html

use log::trace;

use crate::error::SvgError;
use crate::number::{minify_number, number_len};

/// A parsed SVG path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub commands: Vec<Command>,
}

/// A path command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// M/m - Move to
    MoveTo { rel: bool, x: f64, y: f64 },
    /// L/l - Line to
    LineTo { rel: bool, x: f64, y: f64 },
    /// H/h - Horizontal line to
    HorizontalTo { rel: bool, x: f64 },
    /// V/v - Vertical line to
    VerticalTo { rel: bool, y: f64 },
    /// C/c - Cubic bezier
    CurveTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// S/s - Smooth cubic bezier
    SmoothCurveTo {
        rel: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Q/q - Quadratic bezier
    QuadTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    /// T/t - Smooth quadratic bezier
    SmoothQuadTo { rel: bool, x: f64, y: f64 },
    /// A/a - Arc
    Arc {
        rel: bool,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    /// Z/z - Close path
    ClosePath,
}

/// Parse SVG path data.
pub fn parse_path(d: &str) -> Result<Path, SvgError> {
    let mut parser = PathParser::new(d);
    parser.parse()
}

/// Shorten path data into `buf`.
///
/// Returns `false` when `d` does not parse as path data; `buf` is then left empty
/// and the caller keeps the original value.
pub fn shorten_path_data(d: &[u8], precision: Option<u8>, buf: &mut String) -> bool {
    buf.clear();
    let Ok(d) = std::str::from_utf8(d) else {
        return false;
    };
    match parse_path(d) {
        Ok(path) => {
            serialize_path(&path, precision, buf);
            true
        }
        Err(e) => {
            trace!("keeping path data as is: {e}");
            false
        }
    }
}

/// Serialize path data into `out`, using as few separators and command letters as
/// the grammar allows.
pub fn serialize_path(path: &Path, precision: Option<u8>, out: &mut String) {
    let mut w = PathWriter {
        out,
        precision,
        prev: None,
        closed: false,
    };

    for cmd in &path.commands {
        match *cmd {
            Command::MoveTo { rel, x, y } => w.command(if rel { 'm' } else { 'M' }, &[x, y]),
            Command::LineTo { rel, x, y } => w.command(if rel { 'l' } else { 'L' }, &[x, y]),
            Command::HorizontalTo { rel, x } => w.command(if rel { 'h' } else { 'H' }, &[x]),
            Command::VerticalTo { rel, y } => w.command(if rel { 'v' } else { 'V' }, &[y]),
            Command::CurveTo {
                rel,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => w.command(if rel { 'c' } else { 'C' }, &[x1, y1, x2, y2, x, y]),
            Command::SmoothCurveTo { rel, x2, y2, x, y } => {
                w.command(if rel { 's' } else { 'S' }, &[x2, y2, x, y])
            }
            Command::QuadTo { rel, x1, y1, x, y } => {
                w.command(if rel { 'q' } else { 'Q' }, &[x1, y1, x, y])
            }
            Command::SmoothQuadTo { rel, x, y } => {
                w.command(if rel { 't' } else { 'T' }, &[x, y])
            }
            Command::Arc {
                rel,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let flag = |f: bool| if f { 1.0 } else { 0.0 };
                w.command(
                    if rel { 'a' } else { 'A' },
                    &[rx, ry, x_axis_rotation, flag(large_arc), flag(sweep), x, y],
                )
            }
            Command::ClosePath => w.command('z', &[]),
        }
    }
}

struct PathWriter<'a> {
    out: &'a mut String,
    precision: Option<u8>,
    prev: Option<char>,
    /// The last thing written is a number that can not take another `.`.
    closed: bool,
}

impl PathWriter<'_> {
    fn command(&mut self, cmd: char, args: &[f64]) {
        // Repeated commands may omit their letter; after M (m) the implicit
        // command is L (l). Movetos and closepaths are always written.
        let implicit = match self.prev {
            Some('M') => cmd == 'L',
            Some('m') => cmd == 'l',
            Some(prev) => prev == cmd && !matches!(cmd, 'M' | 'm' | 'z'),
            None => false,
        };
        if !implicit {
            self.out.push(cmd);
            self.closed = false;
        }
        for &arg in args {
            self.number(arg);
        }
        self.prev = Some(cmd);
    }

    fn number(&mut self, n: f64) {
        let formatted = format_number(n, self.precision);
        let last = self.out.chars().next_back();
        let first = formatted.chars().next();
        // `.5.5` reads as two numbers, `5.5` does not.
        if let (Some(last), Some(first)) = (last, first)
            && (last.is_ascii_digit() || last == '.')
            && (first.is_ascii_digit() || (first == '.' && !self.closed))
        {
            self.out.push(' ');
        }
        self.closed = formatted.contains(['.', 'e']);
        self.out.push_str(&formatted);
    }
}

/// Format a number as briefly as possible.
///
/// With a precision the number is rounded to that many decimal places first;
/// without one the shortest representation that reads back as the same `f64` is
/// used.
pub fn format_number(n: f64, precision: Option<u8>) -> String {
    if n == 0.0 {
        return "0".into();
    }

    let Some(precision) = precision else {
        let mut buf = ryu::Buffer::new();
        let shortest = minify_number(buf.format_finite(n).as_bytes());
        return String::from_utf8_lossy(&shortest).into_owned();
    };

    // Round to precision
    let factor = 10f64.powi(precision as i32);
    let rounded = (n * factor).round() / factor;

    // Format with precision then trim trailing zeros
    let s = format!("{:.prec$}", rounded, prec = precision as usize);
    String::from_utf8_lossy(&minify_number(s.as_bytes())).into_owned()
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Path, SvgError> {
        let mut commands = Vec::new();
        let mut last_cmd: Option<char> = None;

        self.skip_whitespace();

        while !self.is_eof() {
            let cmd = if let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
                self.next();
                last_cmd = Some(c);
                c
            } else {
                // Implicit command - repeat last command
                // After M, implicit command is L; after m, it's l
                match last_cmd {
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some('z' | 'Z') => {
                        return Err(SvgError::InvalidPath(
                            "Expected command letter after closepath".into(),
                        ));
                    }
                    Some(c) => c,
                    None => {
                        return Err(SvgError::InvalidPath(
                            "Expected command letter".into(),
                        ))
                    }
                }
            };

            let parsed = self.parse_command(cmd)?;
            commands.push(parsed);
            self.skip_whitespace_and_comma();
        }

        Ok(Path { commands })
    }

    fn parse_command(&mut self, cmd: char) -> Result<Command, SvgError> {
        let rel = cmd.is_ascii_lowercase();

        match cmd.to_ascii_lowercase() {
            'm' => {
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::MoveTo { rel, x, y })
            }
            'l' => {
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::LineTo { rel, x, y })
            }
            'h' => {
                let x = self.parse_number()?;
                Ok(Command::HorizontalTo { rel, x })
            }
            'v' => {
                let y = self.parse_number()?;
                Ok(Command::VerticalTo { rel, y })
            }
            'c' => {
                let x1 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y1 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let x2 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y2 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::CurveTo {
                    rel,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                })
            }
            's' => {
                let x2 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y2 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::SmoothCurveTo { rel, x2, y2, x, y })
            }
            'q' => {
                let x1 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y1 = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::QuadTo { rel, x1, y1, x, y })
            }
            't' => {
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::SmoothQuadTo { rel, x, y })
            }
            'a' => {
                let rx = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let ry = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let x_axis_rotation = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let large_arc = self.parse_flag()?;
                self.skip_whitespace_and_comma();
                let sweep = self.parse_flag()?;
                self.skip_whitespace_and_comma();
                let x = self.parse_number()?;
                self.skip_whitespace_and_comma();
                let y = self.parse_number()?;
                Ok(Command::Arc {
                    rel,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                })
            }
            'z' => Ok(Command::ClosePath),
            _ => Err(SvgError::InvalidPath(format!(
                "Unknown command: {}",
                cmd
            ))),
        }
    }

    fn parse_number(&mut self) -> Result<f64, SvgError> {
        self.skip_whitespace_and_comma();

        let len = number_len(&self.input.as_bytes()[self.pos..]);
        if len == 0 {
            return Err(SvgError::InvalidPath("Expected number".into()));
        }
        let s = &self.input[self.pos..self.pos + len];
        self.pos += len;

        match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(SvgError::InvalidPath(format!("Invalid number: {}", s))),
        }
    }

    fn parse_flag(&mut self) -> Result<bool, SvgError> {
        self.skip_whitespace_and_comma();
        match self.next() {
            Some('0') => Ok(false),
            Some('1') => Ok(true),
            Some(c) => Err(SvgError::InvalidPath(format!(
                "Expected flag (0 or 1), got: {}",
                c
            ))),
            None => Err(SvgError::InvalidPath("Expected flag".into())),
        }
    }

    fn skip_whitespace(&mut self) {
        while self
            .peek()
            .map(|c| c.is_ascii_whitespace())
            .unwrap_or(false)
        {
            self.next();
        }
    }

    fn skip_whitespace_and_comma(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.next();
        }
        self.skip_whitespace();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let path = parse_path("M10 20 L30 40").unwrap();
        assert_eq!(path.commands.len(), 2);
    }

    #[test]
    fn test_parse_relative_path() {
        let path = parse_path("m10,20 l30,40").unwrap();
        assert_eq!(path.commands.len(), 2);
        assert!(matches!(path.commands[0], Command::MoveTo { rel: true, .. }));
    }

    #[test]
    fn test_parse_implicit_lineto() {
        let path = parse_path("M10 20 30 40").unwrap();
        assert_eq!(path.commands.len(), 2);
        assert!(matches!(path.commands[1], Command::LineTo { .. }));
    }

    #[test]
    fn test_parse_arc() {
        let path = parse_path("A 10 20 30 1 0 40 50").unwrap();
        assert_eq!(path.commands.len(), 1);
        if let Command::Arc {
            large_arc, sweep, ..
        } = &path.commands[0]
        {
            assert!(*large_arc);
            assert!(!*sweep);
        } else {
            panic!("Expected Arc command");
        }
    }

    #[test]
    fn test_parse_compact_numbers() {
        let path = parse_path("M.5.5l-1-1e1").unwrap();
        assert_eq!(
            path.commands,
            vec![
                Command::MoveTo {
                    rel: false,
                    x: 0.5,
                    y: 0.5
                },
                Command::LineTo {
                    rel: true,
                    x: -1.0,
                    y: -10.0
                },
            ]
        );
    }

    #[test]
    fn test_parse_rejects_numbers_after_close() {
        assert!(parse_path("M0 0z 5 5").is_err());
        assert!(parse_path("none").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, Some(2)), "0");
        assert_eq!(format_number(1.0, Some(2)), "1");
        assert_eq!(format_number(1.5, Some(2)), "1.5");
        assert_eq!(format_number(0.5, Some(2)), ".5");
        assert_eq!(format_number(-0.5, Some(2)), "-.5");
        assert_eq!(format_number(1.234, Some(2)), "1.23");
        assert_eq!(format_number(1.2389, Some(2)), "1.24"); // rounding
        assert_eq!(format_number(1e20, Some(2)), "100000000000000000000");
    }

    #[test]
    fn test_format_number_lossless() {
        assert_eq!(format_number(10.0, None), "10");
        assert_eq!(format_number(-0.0, None), "0");
        assert_eq!(format_number(0.125, None), ".125");
        assert_eq!(format_number(-1.5, None), "-1.5");
        assert_eq!(format_number(123.456789, None), "123.456789");
    }

    fn shorten(d: &str, precision: Option<u8>) -> String {
        let path = parse_path(d).unwrap();
        let mut out = String::new();
        serialize_path(&path, precision, &mut out);
        out
    }

    #[test]
    fn test_serialize_path() {
        // implicit L after M, so "30 40" follows
        assert_eq!(shorten("M 10.00 20.00 L 30.00 40.00 Z", Some(0)), "M10 20 30 40z");
        assert_eq!(shorten("M 10.00 20.00 L 30.00 40.00 Z", None), "M10 20 30 40z");
    }

    #[test]
    fn test_serialize_compact() {
        // A second dot starts a new number; -.5 doesn't need space before -
        assert_eq!(shorten("M 0.5 0.5 L -0.5 -0.5", Some(1)), "M.5.5-.5-.5");
        assert_eq!(shorten("M 5 0.5 L 1.5 0.25", None), "M5 .5 1.5.25");
        assert_eq!(shorten("M 1e21 0.5", None), "M1e21.5");
    }

    #[test]
    fn test_serialize_keeps_consecutive_movetos() {
        assert_eq!(shorten("M0 0 M10 10", None), "M0 0M10 10");
        assert_eq!(shorten("M0 0h10h5v5z", None), "M0 0h10 5v5z");
    }

    #[test]
    fn test_serialize_arc() {
        assert_eq!(
            shorten("M 50 100 A 50 50 0 1 1 150 100", None),
            "M50 100A50 50 0 1 1 150 100"
        );
    }

    #[test]
    fn test_shorten_path_data() {
        let mut buf = String::new();
        assert!(shorten_path_data(b"M 0 0 L 10 10 z", None, &mut buf));
        assert_eq!(buf, "M0 0 10 10z");
        assert!(!shorten_path_data(b"M 0 0 L 10", None, &mut buf));
        assert!(buf.is_empty());
    }
}
