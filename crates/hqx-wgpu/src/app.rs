//! Application event handling
//!
//! Owns the winit application state: tracks keyboard modifiers, translates
//! key presses into viewer actions, and drives the render loop. All input and
//! rendering run on the event loop thread, so input processing for a frame
//! always completes before that frame's draw reads the selection.

use std::path::PathBuf;

use crate::viewer::ViewerContext;
use hqx_wgpu::{HqxError, ViewerAction, map_key};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{ModifiersState, PhysicalKey},
    window::WindowId,
};

/// Main viewer application structure
pub struct ViewerApp {
    /// Base directory of the filter asset pack
    assets_dir: PathBuf,
    /// The image file to display
    image_path: PathBuf,
    /// Keyboard modifiers state
    modifiers: ModifiersState,
    /// Window, GPU context and filter registry, built on resume
    context: Option<ViewerContext>,
    /// Initialization failure, reported by `main` after the loop exits
    error: Option<HqxError>,
}

impl ViewerApp {
    /// Creates a new viewer application instance
    pub fn new(assets_dir: PathBuf, image_path: PathBuf) -> Self {
        Self {
            assets_dir,
            image_path,
            modifiers: ModifiersState::default(),
            context: None,
            error: None,
        }
    }

    /// Returns the initialization error, if resource loading failed
    pub fn into_error(self) -> Option<HqxError> {
        self.error
    }
}

impl ApplicationHandler for ViewerApp {
    /// Builds the complete viewer context when the application becomes
    /// active. Any failure here is fatal: the error is recorded and the
    /// event loop exited.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        match ViewerContext::new(event_loop, &self.assets_dir, &self.image_path) {
            Ok(context) => {
                self.context = Some(context);

                println!();
                println!("Keyboard shortcuts:");
                println!("  - Esc: Quit");
                println!("  - 1-4: Select filter (1 = unfiltered) and zoom to that scale");
                println!("  - Shift+1-4: Select filter, keep the current window size");
                println!();
            }
            Err(err) => {
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            // Track modifier key state for the zoom-suppressing Shift
            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }

            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(keycode),
                    ..
                },
                ..
            } => match map_key(keycode, self.modifiers.shift_key()) {
                Some(ViewerAction::Close) => event_loop.exit(),
                Some(ViewerAction::SetFilter { index, zoom }) => {
                    if let Some(context) = self.context.as_mut() {
                        context.set_filter(index, zoom);
                    }
                }
                None => {}
            },

            WindowEvent::RedrawRequested => {
                if let Some(context) = self.context.as_mut() {
                    context.render();
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = self.context.as_mut() {
                    context.resize(new_size);
                }
            }

            _ => {}
        }
    }
}
