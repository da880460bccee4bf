//! Scene documents: loading shapes, window and viewport from XML, and writing
//! the current window back.
//!
//! ```xml
//! <dados>
//!   <viewport><vpmin x="0" y="0"/><vpmax x="800" y="600"/></viewport>
//!   <window><wmin x="0" y="0"/><wmax x="10" y="10"/></window>
//!   <ponto x="1" y="2" cor="red"/>
//!   <reta cor="blue"><ponto x="0" y="0"/><ponto x="5" y="5"/></reta>
//!   <poligono cor="green"><ponto x="1" y="1"/>...</poligono>
//! </dados>
//! ```
//!
//! Parsing streams the document with `quick-xml`; unknown elements are
//! skipped. Saving streams the source document through a writer and only
//! touches the `x`/`y` attributes of `window/wmin` and `window/wmax`.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::{info, warn};

use crate::colors;
use crate::error::{LoadError, SaveError};
use crate::geometry::{ClipRegion, Geometry, Point, Segment, Shape};

/// The shapes of a scene in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Everything a scene document defines.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFile {
    pub scene: Scene,
    /// Initial window in world coordinates (no rotation).
    pub window: ClipRegion,
    /// Viewport in device coordinates.
    pub viewport: ClipRegion,
}

/// Reads and parses the scene document at `path`.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneFile, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SceneFile = text.parse()?;
    info!(
        path = %path.display(),
        shapes = file.scene.len(),
        "loaded scene"
    );
    Ok(file)
}

/// Shape element currently collecting `<ponto>` children.
struct OpenShape {
    element: &'static str,
    color: Option<u32>,
    points: Vec<Point>,
}

impl OpenShape {
    fn finish(self) -> Result<Shape, LoadError> {
        let found = self.points.len();
        match self.element {
            "reta" => match self.points.as_slice() {
                [start, end] => Ok(Shape::new(
                    Geometry::Segment(Segment::new(*start, *end)),
                    self.color,
                )),
                _ => Err(LoadError::VertexCount {
                    element: "reta",
                    expected: "exactly 2",
                    found,
                }),
            },
            _ => {
                if found < 3 {
                    return Err(LoadError::VertexCount {
                        element: "poligono",
                        expected: "at least 3",
                        found,
                    });
                }
                Ok(Shape::polygon(self.points, self.color))
            }
        }
    }
}

#[derive(Default)]
struct Corners {
    min: Option<Point>,
    max: Option<Point>,
}

impl Corners {
    fn region(&self, element: &'static str) -> Result<ClipRegion, LoadError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Ok(ClipRegion::new(min, max)),
            _ => Err(LoadError::MissingElement(element)),
        }
    }
}

impl FromStr for SceneFile {
    type Err = LoadError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut scene = Scene::default();
        let mut window = Corners::default();
        let mut viewport = Corners::default();
        let mut window_seen = false;
        let mut viewport_seen = false;

        // Element names from the root down to the current element
        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut open: Option<OpenShape> = None;

        loop {
            let (element, is_empty) = match reader.read_event()? {
                Event::Start(e) => (e, false),
                Event::Empty(e) => (e, true),
                Event::End(e) => {
                    if matches!(e.name().as_ref(), b"reta" | b"poligono") {
                        if let Some(shape) = open.take() {
                            scene.push(shape.finish()?);
                        }
                    }
                    path.pop();
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            let name = element.name().as_ref().to_vec();
            let parent = path.last().map(Vec::as_slice);

            match (parent, name.as_slice()) {
                (_, b"window") => window_seen = true,
                (_, b"viewport") => viewport_seen = true,
                (Some(b"window"), b"wmin") => window.min = Some(read_point(&element)?),
                (Some(b"window"), b"wmax") => window.max = Some(read_point(&element)?),
                (Some(b"viewport"), b"vpmin") => viewport.min = Some(read_point(&element)?),
                (Some(b"viewport"), b"vpmax") => viewport.max = Some(read_point(&element)?),
                (Some(b"reta" | b"poligono"), b"ponto") => {
                    if let Some(shape) = open.as_mut() {
                        shape.points.push(read_point(&element)?);
                    }
                }
                (_, b"ponto") => {
                    let p = read_point(&element)?;
                    scene.push(Shape::point(p, read_color(&element)?));
                }
                (_, b"reta" | b"poligono") => {
                    let shape = OpenShape {
                        element: if name == b"reta" { "reta" } else { "poligono" },
                        color: read_color(&element)?,
                        points: Vec::new(),
                    };
                    if is_empty {
                        scene.push(shape.finish()?);
                    } else {
                        open = Some(shape);
                    }
                }
                _ => {}
            }

            if !is_empty {
                path.push(name);
            }
        }

        if !window_seen {
            return Err(LoadError::MissingElement("window"));
        }
        if !viewport_seen {
            return Err(LoadError::MissingElement("viewport"));
        }

        Ok(SceneFile {
            scene,
            window: window.region("window")?,
            viewport: viewport.region("viewport")?,
        })
    }
}

fn element_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn attribute(element: &BytesStart, key: &'static str) -> Result<Option<String>, LoadError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn read_coordinate(element: &BytesStart, key: &'static str) -> Result<f64, LoadError> {
    let raw = attribute(element, key)?.ok_or_else(|| LoadError::MissingAttribute {
        element: element_name(element),
        attribute: key,
    })?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LoadError::InvalidNumber {
            element: element_name(element),
            attribute: key,
            value: raw,
        }),
    }
}

fn read_point(element: &BytesStart) -> Result<Point, LoadError> {
    Ok(Point::new(
        read_coordinate(element, "x")?,
        read_coordinate(element, "y")?,
    ))
}

/// Unknown colour names fall back to the default foreground.
fn read_color(element: &BytesStart) -> Result<Option<u32>, LoadError> {
    let Some(name) = attribute(element, "cor")? else {
        return Ok(None);
    };
    let color = colors::parse_color(&name);
    if color.is_none() {
        warn!(color = %name, element = %element_name(element), "unknown colour, using default");
    }
    Ok(color)
}

// =============================================================================
// Saving
// =============================================================================

/// Copies the document at `source` to `destination` with the window corners
/// replaced by `window`. Everything else in the document is kept as is.
pub fn save_window(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    window: &ClipRegion,
) -> Result<(), SaveError> {
    let (source, destination) = (source.as_ref(), destination.as_ref());
    let text = fs::read_to_string(source).map_err(|e| SaveError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let output = rewrite_window(&text, window)?;
    fs::write(destination, output).map_err(|e| SaveError::Write {
        path: destination.to_path_buf(),
        source: e,
    })?;
    info!(
        source = %source.display(),
        destination = %destination.display(),
        min_x = window.min().x,
        min_y = window.min().y,
        max_x = window.max().x,
        max_y = window.max().y,
        "saved window"
    );
    Ok(())
}

/// Rewrites the `x`/`y` attributes of `window/wmin` and `window/wmax` in
/// `text`. Fails with [`SaveError::MissingWindow`] unless both were found.
pub fn rewrite_window(text: &str, window: &ClipRegion) -> Result<String, SaveError> {
    let mut reader = Reader::from_str(text);
    let mut writer = Writer::new(Vec::new());
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut found = Found::default();

    loop {
        let in_window = path.last().map(Vec::as_slice) == Some(b"window".as_slice());
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                let e = if in_window { replace_corner(e, window, &mut found)? } else { e };
                path.push(e.name().as_ref().to_vec());
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) => {
                let e = if in_window { replace_corner(e, window, &mut found)? } else { e };
                writer.write_event(Event::Empty(e))?;
            }
            Event::End(e) => {
                path.pop();
                writer.write_event(Event::End(e))?;
            }
            other => writer.write_event(other)?,
        }
    }

    if !(found.min && found.max) {
        return Err(SaveError::MissingWindow);
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

#[derive(Default)]
struct Found {
    min: bool,
    max: bool,
}

fn replace_corner<'a>(
    element: BytesStart<'a>,
    window: &ClipRegion,
    found: &mut Found,
) -> Result<BytesStart<'a>, quick_xml::Error> {
    let corner = match element.name().as_ref() {
        b"wmin" => {
            found.min = true;
            window.min()
        }
        b"wmax" => {
            found.max = true;
            window.max()
        }
        _ => return Ok(element),
    };
    with_coordinates(&element, corner)
}

/// Copy of `element` with `x`/`y` set to `corner`, other attributes kept in
/// their original order.
fn with_coordinates(
    element: &BytesStart,
    corner: Point,
) -> Result<BytesStart<'static>, quick_xml::Error> {
    let (x, y) = (corner.x.to_string(), corner.y.to_string());
    let mut replaced = BytesStart::new(String::from_utf8_lossy(element.name().as_ref()).into_owned());
    let (mut has_x, mut has_y) = (false, false);

    for attr in element.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"x" => {
                has_x = true;
                replaced.push_attribute(("x", x.as_str()));
            }
            b"y" => {
                has_y = true;
                replaced.push_attribute(("y", y.as_str()));
            }
            _ => replaced.push_attribute(attr),
        }
    }
    if !has_x {
        replaced.push_attribute(("x", x.as_str()));
    }
    if !has_y {
        replaced.push_attribute(("y", y.as_str()));
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0"?>
<dados>
  <!-- sample -->
  <viewport>
    <vpmin x="0" y="0"/>
    <vpmax x="800" y="600"/>
  </viewport>
  <window>
    <wmin x="0" y="0"/>
    <wmax x="10" y="10"/>
  </window>
  <ponto x="1" y="2" cor="red"/>
  <reta cor="blue">
    <ponto x="0" y="0"/>
    <ponto x="5" y="5"/>
  </reta>
  <poligono cor="green">
    <ponto x="1" y="1"/>
    <ponto x="4" y="1"/>
    <ponto x="2.5" y="3"/>
  </poligono>
  <legenda texto="ignored"/>
</dados>
"#;

    #[test]
    fn test_parse_document() {
        let file: SceneFile = DOCUMENT.parse().unwrap();
        assert_eq!(
            file.window,
            ClipRegion::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
        );
        assert_eq!(
            file.viewport,
            ClipRegion::new(Point::new(0.0, 0.0), Point::new(800.0, 600.0))
        );

        let shapes = file.scene.shapes();
        assert_eq!(shapes.len(), 3);
        assert_eq!(shapes[0], Shape::point(Point::new(1.0, 2.0), colors::parse_color("red")));
        assert_eq!(
            shapes[1],
            Shape::segment(Point::new(0.0, 0.0), Point::new(5.0, 5.0), colors::parse_color("blue"))
        );
        match &shapes[2].geometry {
            Geometry::Polygon(poly) => assert_eq!(poly.vertices()[2], Point::new(2.5, 3.0)),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_window_and_viewport_are_normalized() {
        let text = r#"<dados>
            <viewport><vpmin x="800" y="600"/><vpmax x="0" y="0"/></viewport>
            <window><wmin x="10" y="0"/><wmax x="0" y="10"/></window>
        </dados>"#;
        let file: SceneFile = text.parse().unwrap();
        assert_eq!(file.window.min(), Point::new(0.0, 0.0));
        assert_eq!(file.viewport.max(), Point::new(800.0, 600.0));
        assert!(file.scene.is_empty());
    }

    #[test]
    fn test_missing_window() {
        let text = r#"<dados><viewport><vpmin x="0" y="0"/><vpmax x="1" y="1"/></viewport></dados>"#;
        assert!(matches!(
            text.parse::<SceneFile>(),
            Err(LoadError::MissingElement("window"))
        ));
    }

    #[test]
    fn test_missing_corner() {
        let text = r#"<dados>
            <viewport><vpmin x="0" y="0"/><vpmax x="1" y="1"/></viewport>
            <window><wmin x="0" y="0"/></window>
        </dados>"#;
        assert!(matches!(
            text.parse::<SceneFile>(),
            Err(LoadError::MissingElement("window"))
        ));
    }

    #[test]
    fn test_bad_coordinates() {
        let missing = DOCUMENT.replace(r#"<ponto x="1" y="2" cor="red"/>"#, r#"<ponto x="1" cor="red"/>"#);
        assert!(matches!(
            missing.parse::<SceneFile>(),
            Err(LoadError::MissingAttribute { attribute: "y", .. })
        ));

        let garbage = DOCUMENT.replace(r#"x="2.5""#, r#"x="abc""#);
        match garbage.parse::<SceneFile>() {
            Err(LoadError::InvalidNumber { element, value, .. }) => {
                assert_eq!(element, "ponto");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_vertex_counts() {
        let short_line = DOCUMENT.replace(r#"<ponto x="5" y="5"/>"#, "");
        assert!(matches!(
            short_line.parse::<SceneFile>(),
            Err(LoadError::VertexCount { element: "reta", found: 1, .. })
        ));

        let short_polygon = DOCUMENT.replace(r#"<ponto x="2.5" y="3"/>"#, "");
        assert!(matches!(
            short_polygon.parse::<SceneFile>(),
            Err(LoadError::VertexCount { element: "poligono", found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_colour_uses_default() {
        let text = DOCUMENT.replace(r#"cor="red""#, r#"cor="ultraviolet""#);
        let file: SceneFile = text.parse().unwrap();
        assert_eq!(file.scene.shapes()[0].color, None);
    }

    #[test]
    fn test_malformed_xml() {
        let text = "<dados><window></dados>";
        assert!(text.parse::<SceneFile>().is_err());
    }

    #[test]
    fn test_rewrite_window_only_touches_corners() {
        let region = ClipRegion::new(Point::new(-2.5, 1.0), Point::new(7.5, 11.0));
        let output = rewrite_window(DOCUMENT, &region).unwrap();

        assert!(output.contains(r#"<wmin x="-2.5" y="1"/>"#));
        assert!(output.contains(r#"<wmax x="7.5" y="11"/>"#));
        // Unrelated content survives byte for byte
        assert!(output.contains("<!-- sample -->"));
        assert!(output.contains(r#"<vpmax x="800" y="600"/>"#));
        assert!(output.contains(r#"<ponto x="0" y="0"/>"#));
        assert!(output.contains(r#"<legenda texto="ignored"/>"#));

        let reloaded: SceneFile = output.parse().unwrap();
        let original: SceneFile = DOCUMENT.parse().unwrap();
        assert_eq!(reloaded.window, region);
        assert_eq!(reloaded.viewport, original.viewport);
        assert_eq!(reloaded.scene, original.scene);
    }

    #[test]
    fn test_rewrite_keeps_other_attributes_in_order() {
        let text = r#"<dados><window><wmin id="a" y="0" x="0"/><wmax x="1" y="1"></wmax></window></dados>"#;
        let region = ClipRegion::new(Point::new(3.0, 4.0), Point::new(5.0, 6.0));
        let output = rewrite_window(text, &region).unwrap();
        assert!(output.contains(r#"<wmin id="a" y="4" x="3"/>"#));
        assert!(output.contains(r#"<wmax x="5" y="6"></wmax>"#));
    }

    #[test]
    fn test_rewrite_requires_window() {
        let text = r#"<dados><viewport><vpmin x="0" y="0"/></viewport></dados>"#;
        let region = ClipRegion::new(Point::ZERO, Point::ONE);
        assert!(matches!(
            rewrite_window(text, &region),
            Err(SaveError::MissingWindow)
        ));
    }

    #[test]
    fn test_save_window_round_trip_through_files() {
        let dir = std::env::temp_dir().join(format!("viewclip-scene-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let source = dir.join("scene.xml");
        let destination = dir.join("output.xml");
        std::fs::write(&source, DOCUMENT).unwrap();

        let region = ClipRegion::new(Point::new(1.0, 1.0), Point::new(4.0, 3.0));
        save_window(&source, &destination, &region).unwrap();
        let reloaded = load_scene(&destination).unwrap();
        assert_eq!(reloaded.window, region);
        assert_eq!(reloaded.scene.len(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_scene("/definitely/not/here.xml").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
