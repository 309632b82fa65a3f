use std::fmt;

const PREAMBLE: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>"#;
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Bitmap reference drawn beneath everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    /// Relative file name of the raster.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub style: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: &'static str,
    /// Shown as a tooltip by most viewers.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Image(Image),
    Line(Line),
    Rect(Rect),
}

/// An SVG document in pixel units. Shapes are painted in insertion order,
/// so the first shape pushed ends up at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub width: u32,
    pub height: u64,
    shapes: Vec<Shape>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Line(line) => Some(line),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &Rect> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Rect(rect) => Some(rect),
            _ => None,
        })
    }
}

impl fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{PREAMBLE}")?;
        writeln!(
            f,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}">"#,
            w = self.width,
            h = self.height,
        )?;
        for shape in self.shapes() {
            writeln!(f, "{shape}")?;
        }
        writeln!(f, "</svg>")
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Image(img) => write!(
                f,
                r#"<image width="{}" height="{}" style="opacity:{}" xlink:href="{}"/>"#,
                img.width,
                img.height,
                img.opacity,
                Escaped(&img.href),
            ),
            Shape::Line(line) => write!(
                f,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="{}"/>"#,
                line.x1,
                line.y1,
                line.x2,
                line.y2,
                Escaped(line.style),
            ),
            Shape::Rect(rect) => {
                write!(
                    f,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" style="{}""#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    Escaped(rect.style),
                )?;
                match &rect.title {
                    Some(title) => write!(f, "><title>{}</title></rect>", Escaped(title)),
                    None => write!(f, "/>"),
                }
            }
        }
    }
}

/// XML-escapes text and attribute values while formatting.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                c => fmt::Write::write_char(f, c)?,
            }
        }
        Ok(())
    }
}
