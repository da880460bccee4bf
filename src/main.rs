use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use viewclip::clipper::LineClipAlgorithm;
use viewclip::config::ViewerConfig;
use viewclip::engine::Session;
use viewclip::{render, scene};

/// Where the interactive viewer saves when no `--save` target is given.
const DEFAULT_SAVE_TARGET: &str = "output.xml";

#[derive(Parser, Debug)]
#[command(name = "viewclip", version, about = "View a 2D scene through a movable, rotatable window")]
struct Args {
    /// Scene document to load
    scene: PathBuf,

    /// Line clipping algorithm: cohen-sutherland or liang-barsky
    #[arg(long, short, default_value_t = LineClipAlgorithm::default())]
    algorithm: LineClipAlgorithm,

    /// Pan the window by DX DY world units before rendering
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
    pan: Option<Vec<f64>>,

    /// Scale the window by this factor before rendering (> 1 shows more)
    #[arg(long)]
    zoom: Option<f64>,

    /// Rotate the window counter-clockwise by this many degrees
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<f64>,

    /// Write the main view and the overview to an image file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the scene document with the current window to this path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Open the interactive viewer
    #[arg(long, short)]
    interactive: bool,
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let file = scene::load_scene(&args.scene).map_err(|e| e.to_string())?;
    let config = ViewerConfig::default().with_line_clip(args.algorithm);
    let mut session = Session::new(file, config);
    session.render().map_err(|e| e.to_string())?;

    if let Some([dx, dy]) = args.pan.as_deref() {
        session.pan(*dx, *dy).map_err(|e| e.to_string())?;
    }
    if let Some(factor) = args.zoom {
        session.zoom(factor).map_err(|e| e.to_string())?;
    }
    if let Some(degrees) = args.rotate {
        session.rotate(degrees).map_err(|e| e.to_string())?;
    }

    info!(
        algorithm = %session.line_clip(),
        main = session.main_frame().commands().len(),
        overview = session.overview_frame().commands().len(),
        "scene rendered"
    );

    if let Some(path) = &args.snapshot {
        render::compose(session.main_frame(), session.overview_frame())
            .and_then(|canvas| canvas.save_png(path))
            .map_err(|e| e.to_string())?;
        info!(path = %path.display(), "snapshot written");
    }

    if let Some(destination) = &args.save {
        save(&args.scene, destination, &session)?;
    }

    if args.interactive {
        let destination = args
            .save
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_TARGET));
        run_interactive(&mut session, &args.scene, &destination)?;
    }

    Ok(())
}

fn save(source: &Path, destination: &Path, session: &Session) -> Result<(), String> {
    scene::save_window(source, destination, &session.window_region()).map_err(|e| e.to_string())
}

#[cfg(feature = "window")]
fn run_interactive(session: &mut Session, source: &Path, destination: &Path) -> Result<(), String> {
    viewclip::window::run(session, "viewclip", |session| {
        save(source, destination, session)
    })
}

#[cfg(not(feature = "window"))]
fn run_interactive(_session: &mut Session, _source: &Path, _destination: &Path) -> Result<(), String> {
    Err("interactive mode needs the `window` feature (cargo run --features window)".to_string())
}
