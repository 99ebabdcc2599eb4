//! SVG path data: parsing, compact serialization, and shape conversion.
//!
//! Path syntax: https://www.w3.org/TR/SVG/paths.html

use crate::error::Error;

/// Default coordinate precision (decimal places) for serialized path data.
pub const DEFAULT_PRECISION: u8 = 3;

/// A parsed SVG path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub commands: Vec<Command>,
}

/// A path command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// M/m
    MoveTo { rel: bool, x: f64, y: f64 },
    /// L/l
    LineTo { rel: bool, x: f64, y: f64 },
    /// H/h
    HorizontalTo { rel: bool, x: f64 },
    /// V/v
    VerticalTo { rel: bool, y: f64 },
    /// C/c
    CurveTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// S/s
    SmoothCurveTo {
        rel: bool,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    /// Q/q
    QuadTo {
        rel: bool,
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    /// T/t
    SmoothQuadTo { rel: bool, x: f64, y: f64 },
    /// A/a
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
    /// Z/z
    ClosePath,
}

/// Parse SVG path data.
pub fn parse_path(d: &str) -> Result<Path, Error> {
    PathParser::new(d).parse()
}

/// Serialize path data in compact form at the given precision.
///
/// Serialization is format-stable: re-parsing and re-serializing the output
/// reproduces it byte for byte.
pub fn serialize_path(path: &Path, precision: u8) -> String {
    let mut w = PathWriter::new(precision);

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
            } => w.arc(
                if rel { 'a' } else { 'A' },
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            ),
            Command::ClosePath => w.close(),
        }
    }

    w.finish()
}

/// Format a coordinate at the given precision, in the compact form SVG
/// allows: no trailing zeros, no leading zero before the decimal point.
pub fn format_number(value: f64, precision: u8) -> String {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        return "0".into();
    }

    let mut buffer = ryu::Buffer::new();
    let mut s = buffer.format(rounded).to_string();

    if let Some(stripped) = s.strip_suffix(".0") {
        s.truncate(stripped.len());
    }
    if let Some(stripped) = s.strip_prefix("0.") {
        s = format!(".{stripped}");
    } else if let Some(stripped) = s.strip_prefix("-0.") {
        s = format!("-.{stripped}");
    }

    s
}

/// Incremental writer that merges repeated command letters and omits
/// separators wherever the path grammar allows.
struct PathWriter {
    out: String,
    prev: Option<char>,
    precision: u8,
}

impl PathWriter {
    fn new(precision: u8) -> Self {
        Self {
            out: String::new(),
            prev: None,
            precision,
        }
    }

    fn command(&mut self, cmd: char, args: &[f64]) {
        if self.needs_letter(cmd) {
            self.out.push(cmd);
        }
        for &arg in args {
            let formatted = format_number(arg, self.precision);
            self.push_token(&formatted);
        }
        self.prev = Some(cmd);
    }

    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        cmd: char,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) {
        if self.needs_letter(cmd) {
            self.out.push(cmd);
        }
        for value in [rx, ry, x_axis_rotation] {
            let formatted = format_number(value, self.precision);
            self.push_token(&formatted);
        }
        for flag in [large_arc, sweep] {
            self.push_token(if flag { "1" } else { "0" });
        }
        for value in [x, y] {
            let formatted = format_number(value, self.precision);
            self.push_token(&formatted);
        }
        self.prev = Some(cmd);
    }

    fn close(&mut self) {
        self.out.push('z');
        self.prev = Some('z');
    }

    /// Coordinates after M continue as L (after m, as l); otherwise a letter
    /// is only needed when the command changes.
    fn needs_letter(&self, cmd: char) -> bool {
        match self.prev {
            None => true,
            Some('M') if cmd == 'L' => false,
            Some('m') if cmd == 'l' => false,
            Some(prev) => prev != cmd,
        }
    }

    fn push_token(&mut self, token: &str) {
        if let (Some(last), Some(first)) = (self.out.chars().last(), token.chars().next())
            && (last.is_ascii_digit() || last == '.')
            && (first.is_ascii_digit() || first == '.')
        {
            self.out.push(' ');
        }
        self.out.push_str(token);
    }

    fn finish(self) -> String {
        self.out
    }
}

// Shape-to-path builders, all in absolute coordinates.

/// Path equivalent of `<rect>`, with rounded corners when rx/ry are positive.
pub fn rect_path(x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) -> Path {
    if rx <= 0.0 || ry <= 0.0 {
        return Path {
            commands: vec![
                Command::MoveTo { rel: false, x, y },
                Command::HorizontalTo {
                    rel: false,
                    x: x + width,
                },
                Command::VerticalTo {
                    rel: false,
                    y: y + height,
                },
                Command::HorizontalTo { rel: false, x },
                Command::ClosePath,
            ],
        };
    }

    let rx = rx.min(width / 2.0);
    let ry = ry.min(height / 2.0);
    let corner = |x, y| Command::Arc {
        rel: false,
        rx,
        ry,
        x_axis_rotation: 0.0,
        large_arc: false,
        sweep: true,
        x,
        y,
    };
    Path {
        commands: vec![
            Command::MoveTo {
                rel: false,
                x: x + rx,
                y,
            },
            Command::HorizontalTo {
                rel: false,
                x: x + width - rx,
            },
            corner(x + width, y + ry),
            Command::VerticalTo {
                rel: false,
                y: y + height - ry,
            },
            corner(x + width - rx, y + height),
            Command::HorizontalTo { rel: false, x: x + rx },
            corner(x, y + height - ry),
            Command::VerticalTo {
                rel: false,
                y: y + ry,
            },
            corner(x + rx, y),
            Command::ClosePath,
        ],
    }
}

/// Path equivalent of `<circle>`.
pub fn circle_path(cx: f64, cy: f64, r: f64) -> Path {
    ellipse_path(cx, cy, r, r)
}

/// Path equivalent of `<ellipse>`: two half-turn arcs.
pub fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> Path {
    let half = |x| Command::Arc {
        rel: false,
        rx,
        ry,
        x_axis_rotation: 0.0,
        large_arc: true,
        sweep: false,
        x,
        y: cy,
    };
    Path {
        commands: vec![
            Command::MoveTo {
                rel: false,
                x: cx - rx,
                y: cy,
            },
            half(cx + rx),
            half(cx - rx),
            Command::ClosePath,
        ],
    }
}

/// Path equivalent of `<line>`.
pub fn line_path(x1: f64, y1: f64, x2: f64, y2: f64) -> Path {
    Path {
        commands: vec![
            Command::MoveTo {
                rel: false,
                x: x1,
                y: y1,
            },
            Command::LineTo {
                rel: false,
                x: x2,
                y: y2,
            },
        ],
    }
}

/// Path equivalent of `<polyline>` (open) or `<polygon>` (closed).
pub fn poly_path(points: &[(f64, f64)], close: bool) -> Path {
    let mut commands = Vec::with_capacity(points.len() + 1);
    for (i, &(x, y)) in points.iter().enumerate() {
        commands.push(if i == 0 {
            Command::MoveTo { rel: false, x, y }
        } else {
            Command::LineTo { rel: false, x, y }
        });
    }
    if close && !points.is_empty() {
        commands.push(Command::ClosePath);
    }
    Path { commands }
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Path, Error> {
        let mut commands = Vec::new();
        let mut last_cmd: Option<char> = None;

        self.skip_separators();

        while !self.is_eof() {
            let cmd = if self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
                let c = self.next().unwrap();
                last_cmd = Some(c);
                c
            } else {
                // Implicit repeat; after M coordinates continue as L
                match last_cmd {
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some(c) => c,
                    None => return Err(Error::InvalidPath("expected command letter".into())),
                }
            };

            commands.push(self.command(cmd)?);
            self.skip_separators();
        }

        Ok(Path { commands })
    }

    fn command(&mut self, cmd: char) -> Result<Command, Error> {
        let rel = cmd.is_ascii_lowercase();

        Ok(match cmd.to_ascii_lowercase() {
            'm' => {
                let [x, y] = self.numbers()?;
                Command::MoveTo { rel, x, y }
            }
            'l' => {
                let [x, y] = self.numbers()?;
                Command::LineTo { rel, x, y }
            }
            'h' => {
                let [x] = self.numbers()?;
                Command::HorizontalTo { rel, x }
            }
            'v' => {
                let [y] = self.numbers()?;
                Command::VerticalTo { rel, y }
            }
            'c' => {
                let [x1, y1, x2, y2, x, y] = self.numbers()?;
                Command::CurveTo {
                    rel,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
            }
            's' => {
                let [x2, y2, x, y] = self.numbers()?;
                Command::SmoothCurveTo { rel, x2, y2, x, y }
            }
            'q' => {
                let [x1, y1, x, y] = self.numbers()?;
                Command::QuadTo { rel, x1, y1, x, y }
            }
            't' => {
                let [x, y] = self.numbers()?;
                Command::SmoothQuadTo { rel, x, y }
            }
            'a' => {
                let [rx, ry, x_axis_rotation] = self.numbers()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let [x, y] = self.numbers()?;
                Command::Arc {
                    rel,
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                }
            }
            'z' => Command::ClosePath,
            _ => return Err(Error::InvalidPath(format!("unknown command: {}", cmd))),
        })
    }

    fn numbers<const N: usize>(&mut self) -> Result<[f64; N], Error> {
        let mut out = [0.0; N];
        for slot in &mut out {
            *slot = self.number()?;
        }
        Ok(out)
    }

    fn number(&mut self) -> Result<f64, Error> {
        self.skip_separators();

        let start = self.pos;

        if matches!(self.peek(), Some('-') | Some('+')) {
            self.next();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next();
        }
        if self.peek() == Some('.') {
            self.next();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.next();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            self.next();
            if matches!(self.peek(), Some('-') | Some('+')) {
                self.next();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.next();
            }
        }

        let s = &self.input[start..self.pos];
        if s.is_empty() {
            return Err(Error::InvalidPath("expected number".into()));
        }

        s.parse()
            .map_err(|_| Error::InvalidPath(format!("invalid number: {}", s)))
    }

    fn flag(&mut self) -> Result<bool, Error> {
        self.skip_separators();
        match self.next() {
            Some('0') => Ok(false),
            Some('1') => Ok(true),
            Some(c) => Err(Error::InvalidPath(format!(
                "expected flag (0 or 1), got: {}",
                c
            ))),
            None => Err(Error::InvalidPath("expected flag".into())),
        }
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.next();
        }
        if self.peek() == Some(',') {
            self.next();
            while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                self.next();
            }
        }
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
    fn test_parse_relative_and_implicit() {
        let path = parse_path("m10,20 30,40").unwrap();
        assert_eq!(path.commands.len(), 2);
        assert!(matches!(path.commands[0], Command::MoveTo { rel: true, .. }));
        assert!(matches!(path.commands[1], Command::LineTo { rel: true, .. }));
    }

    #[test]
    fn test_parse_arc_flags() {
        let path = parse_path("A 10 20 30 1 0 40 50").unwrap();
        assert_eq!(path.commands.len(), 1);
        let Command::Arc {
            large_arc, sweep, ..
        } = &path.commands[0]
        else {
            panic!("expected arc");
        };
        assert!(*large_arc);
        assert!(!*sweep);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_path("M 10").is_err());
        assert!(parse_path("X 1 2").is_err());
        assert!(parse_path("10 20").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, 2), "0");
        assert_eq!(format_number(-0.0001, 2), "0");
        assert_eq!(format_number(1.0, 2), "1");
        assert_eq!(format_number(1.5, 2), "1.5");
        assert_eq!(format_number(0.5, 2), ".5");
        assert_eq!(format_number(-0.5, 2), "-.5");
        assert_eq!(format_number(1.234, 2), "1.23");
        assert_eq!(format_number(1.235, 2), "1.24");
    }

    #[test]
    fn test_serialize_merges_letters() {
        let path = parse_path("M 10.00 20.00 L 30.00 40.00 Z").unwrap();
        assert_eq!(serialize_path(&path, 0), "M10 20 30 40z");
    }

    #[test]
    fn test_serialize_compact_separators() {
        let path = parse_path("M 0.5 0.5 L -0.5 -0.5").unwrap();
        assert_eq!(serialize_path(&path, 1), "M.5 .5-.5-.5");
    }

    #[test]
    fn test_serialize_stable() {
        let d = "M10.123 20.987c1.5.5 2 1-3.25 4.75zm5-5h2.5v-2.5a2 2 0 1 0 4 0z";
        let once = serialize_path(&parse_path(d).unwrap(), 3);
        let twice = serialize_path(&parse_path(&once).unwrap(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rect_path() {
        let d = serialize_path(&rect_path(2.0, 2.0, 20.0, 20.0, 0.0, 0.0), 3);
        assert_eq!(d, "M2 2H22V22H2z");
    }

    #[test]
    fn test_rounded_rect_path_clamps_radius() {
        let path = rect_path(0.0, 0.0, 10.0, 10.0, 20.0, 20.0);
        let Command::MoveTo { x, .. } = path.commands[0] else {
            panic!("expected move");
        };
        assert_eq!(x, 5.0); // radius clamped to half the width
    }

    #[test]
    fn test_circle_path() {
        let d = serialize_path(&circle_path(12.0, 12.0, 5.0), 3);
        assert_eq!(d, "M7 12A5 5 0 1 0 17 12 5 5 0 1 0 7 12z");
    }

    #[test]
    fn test_poly_path() {
        let d = serialize_path(&poly_path(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)], true), 3);
        assert_eq!(d, "M0 0 4 0 2 3z");
    }
}
