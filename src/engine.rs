//! The viewing session.
//!
//! [`Session`] is the explicit context object of the viewer: it owns the
//! scene, the viewport, the navigation state and the configuration, and it
//! re-renders the main view and the overview after every change. A render
//! pass maps each shape into the window's local frame, clips it there and
//! maps the surviving pieces to device space as [`DrawCommand`]s.

use tracing::{debug, warn};

use crate::clipper::{Clipper, LineClipAlgorithm};
use crate::colors;
use crate::config::ViewerConfig;
use crate::error::{DegenerateWindowError, ViewError};
use crate::geometry::{ClipRegion, Geometry, Point, Window};
use crate::navigation::NavigationController;
use crate::overview::Overview;
use crate::scene::{Scene, SceneFile};
use crate::transform::ViewTransform;

/// A device-space shape ready to be painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point(Point),
    Line(Point, Point),
    /// Filled polygon.
    Polygon(Vec<Point>),
    /// Closed outline, not filled.
    Outline(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub color: u32,
}

/// Everything one view shows after a render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    viewport: ClipRegion,
    background: u32,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(viewport: ClipRegion, background: u32) -> Self {
        Self {
            viewport,
            background,
            commands: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &ClipRegion {
        &self.viewport
    }

    /// Pixel width needed to hold the viewport, counted from device x = 0.
    pub fn width(&self) -> u32 {
        self.viewport.max().x.ceil().max(1.0) as u32
    }

    /// Pixel height needed to hold the viewport, counted from device y = 0.
    pub fn height(&self) -> u32 {
        self.viewport.max().y.ceil().max(1.0) as u32
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, primitive: Primitive, color: u32) {
        self.commands.push(DrawCommand { primitive, color });
    }
}

/// Renders `scene` as seen through `window` onto `viewport`.
pub fn render_view(
    scene: &Scene,
    window: &Window,
    viewport: &ClipRegion,
    algorithm: LineClipAlgorithm,
    background: u32,
) -> Result<Frame, DegenerateWindowError> {
    let transform = ViewTransform::new(window, viewport)?;
    let clipper = Clipper::new(transform.clip_bounds(), algorithm);
    let mut frame = Frame::new(*viewport, background);

    for shape in scene.shapes() {
        let color = shape.color.unwrap_or(colors::FOREGROUND);
        let local = shape.geometry.map_points(|p| transform.world_to_window(p));
        for piece in clipper.clip_geometry(&local) {
            let device = piece.map_points(|p| transform.window_to_device(p));
            frame.push(to_primitive(device), color);
        }
    }

    Ok(frame)
}

fn to_primitive(geometry: Geometry) -> Primitive {
    match geometry {
        Geometry::Point(p) => Primitive::Point(p),
        Geometry::Segment(s) => Primitive::Line(s.start, s.end),
        Geometry::Polygon(poly) => Primitive::Polygon(poly.into_vertices()),
    }
}

/// One interactive navigation step, sized by the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Pan by whole pan steps along the window's own axes.
    Pan { x: f64, y: f64 },
    ZoomIn,
    ZoomOut,
    /// Rotate counter-clockwise by one rotation step.
    RotateLeft,
    /// Rotate clockwise by one rotation step.
    RotateRight,
}

/// The viewer state plus the most recent frames of both views.
pub struct Session {
    scene: Scene,
    viewport: ClipRegion,
    navigation: NavigationController,
    overview: Overview,
    config: ViewerConfig,
    main_frame: Frame,
    overview_frame: Frame,
}

impl Session {
    /// Starts a session on a loaded scene document. Nothing is rendered until
    /// [`Session::render`] is called.
    pub fn new(file: SceneFile, config: ViewerConfig) -> Self {
        Self::from_parts(
            file.scene,
            Window::from_region(&file.window),
            file.viewport,
            config,
        )
    }

    pub fn from_parts(
        scene: Scene,
        window: Window,
        viewport: ClipRegion,
        config: ViewerConfig,
    ) -> Self {
        let overview = Overview::with_size(
            config.overview_padding,
            config.overview_size.0,
            config.overview_size.1,
        );
        Self {
            scene,
            viewport,
            navigation: NavigationController::with_min_half_extent(window, config.min_half_extent),
            main_frame: Frame::new(viewport, colors::BACKGROUND),
            overview_frame: Frame::new(*overview.viewport(), colors::OVERVIEW_BACKGROUND),
            overview,
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &ClipRegion {
        &self.viewport
    }

    pub fn window(&self) -> &Window {
        self.navigation.window()
    }

    /// The window as persisted: center ± half-extents, rotation dropped.
    pub fn window_region(&self) -> ClipRegion {
        self.navigation.window().region()
    }

    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn main_frame(&self) -> &Frame {
        &self.main_frame
    }

    pub fn overview_frame(&self) -> &Frame {
        &self.overview_frame
    }

    pub fn line_clip(&self) -> LineClipAlgorithm {
        self.config.line_clip
    }

    /// Switches the line clipping algorithm and re-renders.
    pub fn set_line_clip(&mut self, algorithm: LineClipAlgorithm) -> Result<(), ViewError> {
        let previous = self.config.line_clip;
        self.config.line_clip = algorithm;
        if let Err(e) = self.render() {
            self.config.line_clip = previous;
            return Err(e.into());
        }
        Ok(())
    }

    /// Renders both views. On failure the previous frames are kept.
    pub fn render(&mut self) -> Result<(), DegenerateWindowError> {
        let window = *self.navigation.window();
        let main = render_view(
            &self.scene,
            &window,
            &self.viewport,
            self.config.line_clip,
            colors::BACKGROUND,
        )?;

        let overview_window = self.overview.window_for(&window);
        let mut overview = render_view(
            &self.scene,
            &overview_window,
            self.overview.viewport(),
            self.config.line_clip,
            colors::OVERVIEW_BACKGROUND,
        )?;
        self.push_footprint(&mut overview, &overview_window)?;

        debug!(
            main = main.commands().len(),
            overview = overview.commands().len(),
            algorithm = %self.config.line_clip,
            "rendered"
        );
        self.main_frame = main;
        self.overview_frame = overview;
        Ok(())
    }

    /// Outlines the main window on the overview, clipped like any polygon.
    fn push_footprint(
        &self,
        frame: &mut Frame,
        overview_window: &Window,
    ) -> Result<(), DegenerateWindowError> {
        let transform = ViewTransform::new(overview_window, self.overview.viewport())?;
        let clipper = Clipper::new(transform.clip_bounds(), self.config.line_clip);
        let footprint = Geometry::Polygon(self.overview.footprint(self.navigation.window()));
        let local = footprint.map_points(|p| transform.world_to_window(p));

        for piece in clipper.clip_geometry(&local) {
            if let Geometry::Polygon(poly) = piece.map_points(|p| transform.window_to_device(p)) {
                frame.push(Primitive::Outline(poly.into_vertices()), colors::FOOTPRINT);
            }
        }
        Ok(())
    }

    /// Runs a navigation step followed by a render pass. Either both succeed
    /// or the window is put back as it was.
    fn navigate(
        &mut self,
        action: &'static str,
        step: impl FnOnce(&mut NavigationController) -> Result<(), ViewError>,
    ) -> Result<(), ViewError> {
        let previous = *self.navigation.window();
        if let Err(e) = step(&mut self.navigation) {
            self.navigation.set_window(previous);
            warn!(action, error = %e, "navigation rejected");
            return Err(e);
        }
        if let Err(e) = self.render() {
            self.navigation.set_window(previous);
            warn!(action, error = %e, "render failed, window restored");
            return Err(e.into());
        }
        Ok(())
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), ViewError> {
        self.navigate("pan", |nav| {
            nav.pan(dx, dy);
            Ok(())
        })
    }

    /// Pans along the window's own axes.
    pub fn pan_local(&mut self, dx: f64, dy: f64) -> Result<(), ViewError> {
        self.navigate("pan", |nav| {
            nav.pan_local(dx, dy);
            Ok(())
        })
    }

    /// Pans by `steps` of the configured fraction of the window size, along
    /// the window's own axes.
    pub fn step_pan(&mut self, steps_x: f64, steps_y: f64) -> Result<(), ViewError> {
        let window = self.navigation.window();
        let fraction = self.config.pan_fraction;
        let dx = steps_x * fraction * 2.0 * window.half_width();
        let dy = steps_y * fraction * 2.0 * window.half_height();
        self.pan_local(dx, dy)
    }

    pub fn zoom(&mut self, factor: f64) -> Result<(), ViewError> {
        self.navigate("zoom", |nav| nav.zoom(factor).map_err(ViewError::from))
    }

    /// Shows less of the world by one configured step.
    pub fn zoom_in(&mut self) -> Result<(), ViewError> {
        self.zoom(1.0 / self.config.zoom_step)
    }

    /// Shows more of the world by one configured step.
    pub fn zoom_out(&mut self) -> Result<(), ViewError> {
        self.zoom(self.config.zoom_step)
    }

    pub fn rotate(&mut self, delta_degrees: f64) -> Result<(), ViewError> {
        self.navigate("rotate", |nav| {
            nav.rotate(delta_degrees);
            Ok(())
        })
    }

    pub fn apply(&mut self, step: Step) -> Result<(), ViewError> {
        match step {
            Step::Pan { x, y } => self.step_pan(x, y),
            Step::ZoomIn => self.zoom_in(),
            Step::ZoomOut => self.zoom_out(),
            Step::RotateLeft => self.rotate(self.config.rotate_step_degrees),
            Step::RotateRight => self.rotate(-self.config.rotate_step_degrees),
        }
    }
}
