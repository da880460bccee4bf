//! Interactive SDL2 viewer.
//!
//! Shows the main view with the overview to its right and maps keys onto
//! session steps:
//!
//! | Key            | Action                          |
//! |----------------|---------------------------------|
//! | Arrows         | Pan (follows the rotation)      |
//! | Ctrl+Z         | Zoom in                         |
//! | Ctrl+X         | Zoom out                        |
//! | R / L          | Rotate counter-clockwise / clockwise |
//! | S              | Save the window                 |
//! | Escape         | Quit                            |

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use tracing::{info, warn};

use crate::engine::{Session, Step};
use crate::render;

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Step(Step),
    Save,
    Quit,
}

/// Maps a key press onto a command, if it has one.
pub fn key_command(keycode: Keycode, keymod: Mod) -> Option<Command> {
    let ctrl = keymod.intersects(Mod::LCTRLMOD | Mod::RCTRLMOD);
    let command = match keycode {
        Keycode::Escape => Command::Quit,
        Keycode::Left => Command::Step(Step::Pan { x: -1.0, y: 0.0 }),
        Keycode::Right => Command::Step(Step::Pan { x: 1.0, y: 0.0 }),
        Keycode::Up => Command::Step(Step::Pan { x: 0.0, y: 1.0 }),
        Keycode::Down => Command::Step(Step::Pan { x: 0.0, y: -1.0 }),
        Keycode::Z if ctrl => Command::Step(Step::ZoomIn),
        Keycode::X if ctrl => Command::Step(Step::ZoomOut),
        Keycode::R => Command::Step(Step::RotateLeft),
        Keycode::L => Command::Step(Step::RotateRight),
        Keycode::S if !ctrl => Command::Save,
        _ => return None,
    };
    Some(command)
}

/// Runs the viewer until the user quits. `save` is called for every save
/// request; its errors are logged and the viewer keeps running.
pub fn run(
    session: &mut Session,
    title: &str,
    mut save: impl FnMut(&Session) -> Result<(), String>,
) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let mut frame =
        render::compose(session.main_frame(), session.overview_frame()).map_err(|e| e.to_string())?;
    let (width, height) = (frame.width(), frame.height());

    let window = video_subsystem
        .window(title, width, height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;

    let mut dirty = true;
    loop {
        if dirty {
            texture
                .update(None, frame.as_bytes(), (width * 4) as usize)
                .map_err(|e| e.to_string())?;
            canvas.clear();
            canvas.copy(&texture, None, Some(Rect::new(0, 0, width, height)))?;
            canvas.present();
            dirty = false;
        }

        // Nothing changes between events, so block until the next one.
        let command = match event_pump.wait_event() {
            Event::Quit { .. } => Some(Command::Quit),
            Event::KeyDown {
                keycode: Some(keycode),
                keymod,
                ..
            } => key_command(keycode, keymod),
            Event::Window { .. } => {
                dirty = true;
                None
            }
            _ => None,
        };

        match command {
            Some(Command::Quit) => break,
            Some(Command::Save) => {
                if let Err(e) = save(session) {
                    warn!(error = %e, "save failed");
                }
            }
            Some(Command::Step(step)) => match session.apply(step) {
                Ok(()) => {
                    // The main viewport size is fixed, so the composed size is too.
                    frame = render::compose(session.main_frame(), session.overview_frame())
                        .map_err(|e| e.to_string())?;
                    dirty = true;
                }
                Err(e) => warn!(?step, error = %e, "step rejected"),
            },
            None => {}
        }
    }

    info!("viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_command(Keycode::Escape, Mod::NOMOD), Some(Command::Quit));
        assert_eq!(
            key_command(Keycode::Up, Mod::NOMOD),
            Some(Command::Step(Step::Pan { x: 0.0, y: 1.0 }))
        );
        assert_eq!(
            key_command(Keycode::Z, Mod::LCTRLMOD),
            Some(Command::Step(Step::ZoomIn))
        );
        assert_eq!(key_command(Keycode::Z, Mod::NOMOD), None);
        assert_eq!(
            key_command(Keycode::X, Mod::RCTRLMOD),
            Some(Command::Step(Step::ZoomOut))
        );
        assert_eq!(
            key_command(Keycode::R, Mod::NOMOD),
            Some(Command::Step(Step::RotateLeft))
        );
        assert_eq!(key_command(Keycode::S, Mod::NOMOD), Some(Command::Save));
        assert_eq!(key_command(Keycode::Q, Mod::NOMOD), None);
    }
}
