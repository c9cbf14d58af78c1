//! Core Engine struct and main game loop

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::core::{DebugInfo, Time};
use crate::input::{Input, KeyEdge};
use crate::renderer::Renderer;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
    /// Lock and hide the cursor on left click for mouse look; Escape releases it
    pub grab_cursor_on_click: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Showroom"),
            width: 1280,
            height: 720,
            vsync: true,
            grab_cursor_on_click: true,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set window dimensions
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable VSync
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Enable or disable click-to-grab mouse look
    pub fn with_cursor_grab(mut self, grab: bool) -> Self {
        self.grab_cursor_on_click = grab;
        self
    }
}

/// Game trait that users implement
pub trait Game: 'static {
    /// Called once when the engine starts
    fn init(&mut self, engine: &mut EngineContext);

    /// Called every frame for game logic updates
    fn update(&mut self, engine: &mut EngineContext);

    /// Called every frame for rendering
    fn render(&mut self, engine: &mut EngineContext);

    /// Called on every physical key press or release, key repeats excluded
    fn on_key(&mut self, _engine: &mut EngineContext, _key: KeyCode, _edge: KeyEdge) {}

    /// Called when the window is resized
    fn on_resize(&mut self, _engine: &mut EngineContext, _width: u32, _height: u32) {}

    /// Called when the game is shutting down
    fn shutdown(&mut self, _engine: &mut EngineContext) {}
}

/// Context passed to game callbacks
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Input state
    pub input: Input,
    /// Debug information and stats
    pub debug: DebugInfo,
    /// Renderer (available after initialization)
    renderer: Option<Renderer>,
    /// Window size
    window_size: PhysicalSize<u32>,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(width: u32, height: u32) -> Self {
        Self {
            time: Time::new(),
            input: Input::new(),
            debug: DebugInfo::new(),
            renderer: None,
            window_size: PhysicalSize::new(width, height),
            should_quit: false,
        }
    }

    /// Get the renderer, once the window exists
    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    /// Get the renderer mutably
    pub fn renderer_mut(&mut self) -> Option<&mut Renderer> {
        self.renderer.as_mut()
    }

    /// Get window width
    pub fn width(&self) -> u32 {
        self.window_size.width
    }

    /// Get window height
    pub fn height(&self) -> u32 {
        self.window_size.height
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct
pub struct Engine<G: Game> {
    config: EngineConfig,
    game: G,
    context: EngineContext,
    window: Option<Arc<Window>>,
    initialized: bool,
    /// Failure that stopped the event loop before the game could run
    startup_error: Option<Box<dyn std::error::Error>>,
}

impl<G: Game> Engine<G> {
    /// Create a new engine with the given game
    pub fn new(config: EngineConfig, game: G) -> Self {
        let context = EngineContext::new(config.width, config.height);
        Self {
            config,
            game,
            context,
            window: None,
            initialized: false,
            startup_error: None,
        }
    }

    /// Run the engine
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop, window, or renderer cannot start
    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        // No-op if the binary already installed a logger
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
        log::info!("Starting engine: {}", self.config.title);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Box<dyn std::error::Error>) {
        log::error!("Startup failed: {error}");
        self.startup_error = Some(error);
        event_loop.exit();
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let Some(window) = &self.window else {
            return;
        };

        if grab {
            let result = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = result {
                log::warn!("Cursor grab unavailable: {e}");
                return;
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("Cursor release failed: {e}");
        }

        window.set_cursor_visible(!grab);
        self.context.input.set_cursor_grabbed(grab);
        log::debug!("Cursor {}", if grab { "grabbed" } else { "released" });
    }
}

impl<G: Game> ApplicationHandler for Engine<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, Box::new(e)),
        };

        // Initialize renderer
        match pollster::block_on(Renderer::new(Arc::clone(&window), self.config.vsync)) {
            Ok(renderer) => self.context.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, Box::new(e)),
        }
        self.window = Some(window);

        // Initialize game
        if !self.initialized {
            self.game.init(&mut self.context);
            self.initialized = true;
            log::info!("Engine initialized successfully");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.game.shutdown(&mut self.context);
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    self.context.window_size = new_size;
                    if let Some(renderer) = &mut self.context.renderer {
                        renderer.resize(new_size.width, new_size.height);
                    }
                    self.game
                        .on_resize(&mut self.context, new_size.width, new_size.height);
                }
            }

            WindowEvent::Focused(false) => {
                if self.context.input.is_cursor_grabbed() {
                    self.set_cursor_grab(false);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return;
                };
                self.context.input.process_keyboard(key_code, event.state);

                if key_code == KeyCode::Escape
                    && event.state == ElementState::Pressed
                    && self.context.input.is_cursor_grabbed()
                {
                    self.set_cursor_grab(false);
                }

                if !event.repeat {
                    self.game
                        .on_key(&mut self.context, key_code, KeyEdge::from(event.state));
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.context.input.process_mouse_button(button, state);

                if self.config.grab_cursor_on_click
                    && button == MouseButton::Left
                    && state == ElementState::Pressed
                    && !self.context.input.is_cursor_grabbed()
                {
                    self.set_cursor_grab(true);
                }
            }

            WindowEvent::RedrawRequested => {
                // Update time
                self.context.time.update();

                // Update debug stats
                if let Some(report) = self.context.debug.record_frame(self.context.time.delta()) {
                    log::debug!("{report}");
                }

                // Update game logic
                self.game.update(&mut self.context);

                // Check if should quit
                if self.context.should_quit() {
                    self.game.shutdown(&mut self.context);
                    event_loop.exit();
                    return;
                }

                // Render
                self.game.render(&mut self.context);

                // Clear per-frame input state
                self.context.input.update();

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.context
                .input
                .process_mouse_delta(Vec2::new(dx as f32, dy as f32));
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
