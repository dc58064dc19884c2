//! Windowed runner for one simulation bridge spawner.
//!
//! Each `RedrawRequested` event steps the simulation, runs the spawner's
//! frame update, draws its overlay into a [`DrawListSurface`], and renders
//! everything with the [`GpuRenderer`].
//!
//! Keys: `F1` toggles the overlay, `F2` toggles selection. Clicking the
//! entity-count field focuses it; typed characters, `Backspace` and
//! `Delete` (clear) edit it.
//!
//! This module is feature-gated behind `renderer`.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use vivarium_core::context::SceneContext;
use vivarium_core::record::EntitySimulation;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{WindowAttributes, WindowId};

use super::gpu::GpuRenderer;
use crate::batch::ParticleSystem;
use crate::bridge::SimulationBridgeSpawner;
use crate::overlay::{DrawListSurface, TextInput};
use crate::spawner::{RuntimeState, Spawner};

/// Run `spawner` in a window until it is closed.
///
/// The spawner is enabled on `context` and selected once the window and
/// renderer exist. Every frame `step` advances the simulation by the
/// elapsed seconds before the spawner syncs its particle buffer.
///
/// # Errors
///
/// Returns an error if the event loop cannot be created or if window or
/// renderer initialization fails.
pub fn run_windowed<S, F>(
    spawner: SimulationBridgeSpawner<S, ParticleSystem>,
    context: Rc<SceneContext>,
    step: F,
    window_title: &str,
    width: u32,
    height: u32,
) -> Result<(), anyhow::Error>
where
    S: EntitySimulation,
    F: FnMut(&mut S, f32),
{
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = App {
        spawner,
        context,
        step,
        state: AppState::Pending {
            title: window_title.to_owned(),
            width,
            height,
        },
        surface: DrawListSurface::new(Vec2::new(width as f32, height as f32)),
        cursor: Vec2::ZERO,
        last_frame: Instant::now(),
        frames: 0,
        init_failed: false,
    };
    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize windowed renderer (see logs for details)"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state machine
// ---------------------------------------------------------------------------

/// Window creation has to wait for `resumed`, so the renderer only exists
/// in `Running`.
enum AppState {
    Pending {
        title: String,
        width: u32,
        height: u32,
    },
    Running {
        renderer: GpuRenderer,
    },
    /// Placeholder while moving between states.
    Transitioning,
}

struct App<S, F> {
    spawner: SimulationBridgeSpawner<S, ParticleSystem>,
    context: Rc<SceneContext>,
    step: F,
    state: AppState,
    surface: DrawListSurface,
    cursor: Vec2,
    last_frame: Instant,
    frames: u64,
    init_failed: bool,
}

impl<S, F> App<S, F>
where
    S: EntitySimulation,
    F: FnMut(&mut S, f32),
{
    fn start(&mut self, event_loop: &ActiveEventLoop, title: String, width: u32, height: u32) {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window -- exiting");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };
        match pollster::block_on(GpuRenderer::new(window.clone())) {
            Ok(renderer) => {
                tracing::info!(width, height, "renderer window created");
                self.spawner.enable(Some(self.context.clone()));
                self.spawner.set_selected(true, RuntimeState::Playing);
                self.last_frame = Instant::now();
                window.request_redraw();
                self.state = AppState::Running { renderer };
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize renderer -- exiting");
                self.init_failed = true;
                event_loop.exit();
            }
        }
    }

    fn handle_key(&mut self, event: &winit::event::KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::F1) => {
                let visible = self.context.toggle_gui_visibility();
                tracing::debug!(visible, "overlay toggled");
            }
            Key::Named(NamedKey::F2) => {
                let selected = !self.spawner.is_selected();
                self.spawner.set_selected(selected, RuntimeState::Playing);
            }
            Key::Named(NamedKey::Backspace) => self.surface.push_input(TextInput::Backspace),
            Key::Named(NamedKey::Delete) => self.surface.push_input(TextInput::Clear),
            _ => {
                if let Some(text) = &event.text {
                    self.surface.type_str(text);
                }
            }
        }
    }
}

impl<S, F> ApplicationHandler for App<S, F>
where
    S: EntitySimulation,
    F: FnMut(&mut S, f32),
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        match std::mem::replace(&mut self.state, AppState::Transitioning) {
            AppState::Pending {
                title,
                width,
                height,
            } => self.start(event_loop, title, width, height),
            running @ AppState::Running { .. } => self.state = running,
            AppState::Transitioning => {
                tracing::warn!("resumed called during state transition");
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.surface.click(self.cursor),
            event => {
                let AppState::Running { renderer } = &mut self.state else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => {
                        tracing::info!(frames = self.frames, "window close requested -- shutting down");
                        self.spawner.disable();
                        event_loop.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        tracing::debug!(
                            width = new_size.width,
                            height = new_size.height,
                            "window resized"
                        );
                        renderer.resize(new_size);
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = now.duration_since(self.last_frame).as_secs_f32();
                        self.last_frame = now;

                        (self.step)(self.spawner.simulation_mut(), dt);
                        self.spawner.update();

                        let size = renderer.window().inner_size();
                        self.surface
                            .begin_frame(Vec2::new(size.width as f32, size.height as f32));
                        self.spawner.on_gui(&mut self.surface);
                        let overlay = self.surface.finish_frame();

                        match renderer.render(self.spawner.renderer(), &overlay) {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                let size = renderer.window().inner_size();
                                renderer.resize(size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                tracing::error!("GPU out of memory -- exiting");
                                event_loop.exit();
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "surface error during render");
                            }
                        }
                        self.frames += 1;
                        renderer.window().request_redraw();
                    }
                    _ => {}
                }
            }
        }
    }
}
