//! Window and event loop.

use std::path::PathBuf;
use std::sync::Arc;

use orrery_config::{CliArgs, Config};
use orrery_input::{KeyboardState, MovementKeys, apply_input};
use orrery_render::{SurfaceError, SurfaceWrapper};
use orrery_scene::{Camera, SolarSystem};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::renderer::{SceneRenderer, SetupError};
use crate::scene::build_camera;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("GPU out of memory")]
    OutOfMemory,
}

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Where `config.ron` came from, for F5 reloads.
pub struct ConfigSource {
    pub dir: PathBuf,
    /// Command-line overrides re-applied on top of every reload.
    pub overrides: CliArgs,
}

pub struct AppState {
    config: Config,
    config_source: Option<ConfigSource>,
    system: SolarSystem,
    camera: Camera,
    keyboard: KeyboardState,
    game_loop: GameLoop,
    surface: SurfaceWrapper,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    /// Set when the loop exits because of a failure.
    fatal: Option<RunError>,
}

impl AppState {
    pub fn new(config: Config, system: SolarSystem) -> Self {
        let camera = build_camera(&config);
        let surface = SurfaceWrapper::new(config.window.width, config.window.height, 1.0);
        Self {
            config,
            config_source: None,
            system,
            camera,
            keyboard: KeyboardState::new(),
            game_loop: GameLoop::new(),
            surface,
            window: None,
            renderer: None,
            fatal: None,
        }
    }

    /// Enable reloading `config.ron` from `source.dir`.
    pub fn with_config_source(mut self, source: ConfigSource) -> Self {
        self.config_source = Some(source);
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Orbit time for the frame being rendered.
    pub fn orbit_time(&self) -> f32 {
        (self.game_loop.interpolated_time() * f64::from(self.config.simulation.time_scale)) as f32
    }

    /// Re-read `config.ron` and apply the settings that can change while
    /// running: time scale, camera speed and clear color. Returns whether
    /// anything changed.
    pub fn reload_config(&mut self) -> bool {
        let Some(source) = &self.config_source else {
            debug!("No config directory, reload ignored");
            return false;
        };
        let mut new_config = match self.config.reload(&source.dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("Config unchanged");
                return false;
            }
            Err(e) => {
                warn!("Config reload failed, keeping current settings: {e}");
                return false;
            }
        };
        new_config.apply_cli_overrides(&source.overrides);
        if new_config == self.config {
            info!("Config unchanged");
            return false;
        }

        if new_config.bodies != self.config.bodies
            || new_config.window != self.config.window
            || new_config.render.sphere != self.config.render.sphere
        {
            warn!("Body table, window and sphere changes take effect after a restart");
        }
        self.camera.speed = new_config.camera.speed;
        if let Some(renderer) = &mut self.renderer {
            renderer.set_clear_color(new_config.render.clear_color);
        }
        info!(
            "Config reloaded: time_scale {}, camera speed {}",
            new_config.simulation.time_scale, new_config.camera.speed
        );
        self.config = new_config;
        true
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RunError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);

        let inner = window.inner_size();
        self.surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        self.camera
            .projection
            .set_aspect_ratio(inner.width as f32, inner.height as f32);
        info!(
            "Window created: {}x{} (scale: {:.2})",
            inner.width,
            inner.height,
            window.scale_factor()
        );

        let renderer = SceneRenderer::new(window.clone(), &self.config, &self.system, &self.camera)?;
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        self.camera
            .projection
            .set_aspect_ratio(width as f32, height as f32);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let camera = &mut self.camera;
        let keyboard = &self.keyboard;
        self.game_loop.tick(
            |dt, _| {
                let keys = MovementKeys::from_keyboard(keyboard);
                if keys.any() {
                    apply_input(camera, &keys, dt as f32);
                }
            },
            |_alpha| {},
        );

        if !self.surface.is_minimized()
            && let Some(renderer) = &self.renderer
        {
            let models = self.system.evaluate(self.orbit_time());
            match renderer.draw(&self.camera, &models) {
                Ok(()) => {}
                Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
                Err(SurfaceError::Lost) => warn!("Surface lost, skipping frame"),
                Err(SurfaceError::OutOfMemory) => {
                    self.fail(event_loop, RunError::OutOfMemory);
                    return;
                }
            }
        }

        if self.game_loop.frame_count().is_multiple_of(600) {
            debug!(
                "frame {} sim_time {:.2}s camera {:?}",
                self.game_loop.frame_count(),
                self.game_loop.sim_time(),
                self.camera.position
            );
        }
        self.keyboard.end_frame();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(resize) = self.surface.handle_resize(size.width, size.height) {
                    self.apply_resize(resize.width, resize.height);
                    info!("Window resized to {}x{}", resize.width, resize.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(inner) = self.window.as_ref().map(|w| w.inner_size())
                    && let Some(resize) =
                        self.surface
                            .handle_scale_factor_changed(scale_factor, inner.width, inner.height)
                {
                    self.apply_resize(resize.width, resize.height);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        scale_factor, resize.width, resize.height
                    );
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
                if self.keyboard.just_pressed(KeyCode::Escape) {
                    info!("Escape pressed, shutting down");
                    event_loop.exit();
                }
                if self.keyboard.just_pressed(KeyCode::F5) {
                    self.reload_config();
                }
            }
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until it is closed.
#[instrument(skip_all)]
pub fn run(
    config: Config,
    system: SolarSystem,
    config_source: Option<ConfigSource>,
) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, system);
    if let Some(source) = config_source {
        app = app.with_config_source(source);
    }
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_loop::FIXED_DT;
    use crate::scene::build_system;

    fn app(config: Config) -> AppState {
        let system = build_system(&config).unwrap();
        AppState::new(config, system)
    }

    #[test]
    fn test_new_state_has_no_window() {
        let state = app(Config::default());
        assert!(state.window.is_none());
        assert!(state.renderer.is_none());
        assert!(state.fatal.is_none());
    }

    #[test]
    fn test_camera_aspect_follows_config() {
        let mut config = Config::default();
        config.window.width = 1200;
        config.window.height = 600;
        let state = app(config);
        assert!((state.camera().projection.aspect_ratio - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_without_renderer_updates_projection() {
        let mut state = app(Config::default());
        let resize = state.surface.handle_resize(1000, 250).unwrap();
        state.apply_resize(resize.width, resize.height);
        assert!((state.camera.projection.aspect_ratio - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_orbit_time_applies_time_scale() {
        let mut config = Config::default();
        config.simulation.time_scale = 2.0;
        let mut state = app(config);
        for _ in 0..60 {
            state.game_loop.advance(FIXED_DT, |_, _| {}, |_| {});
        }
        assert!((state.orbit_time() - 2.0).abs() < 1e-4);
        state.game_loop.advance(FIXED_DT * 0.5, |_, _| {}, |_| {});
        assert!((state.orbit_time() - (2.0 + FIXED_DT as f32)).abs() < 1e-4);
    }

    fn reloadable(dir: &std::path::Path, overrides: CliArgs) -> AppState {
        let mut config = Config::load_or_create(dir).unwrap();
        config.apply_cli_overrides(&overrides);
        app(config).with_config_source(ConfigSource {
            dir: dir.to_path_buf(),
            overrides,
        })
    }

    #[test]
    fn test_reload_applies_live_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = reloadable(dir.path(), CliArgs::default());

        let mut edited = Config::default();
        edited.simulation.time_scale = 3.0;
        edited.camera.speed = 7.5;
        edited.render.clear_color = [0.1, 0.0, 0.2, 1.0];
        edited.save(dir.path()).unwrap();

        assert!(state.reload_config());
        assert_eq!(state.config().simulation.time_scale, 3.0);
        assert_eq!(state.config().render.clear_color, [0.1, 0.0, 0.2, 1.0]);
        assert_eq!(state.camera().speed, 7.5);
        assert!(!state.reload_config());
    }

    #[test]
    fn test_reload_keeps_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = CliArgs {
            time_scale: Some(2.0),
            ..CliArgs::default()
        };
        let mut state = reloadable(dir.path(), overrides);
        assert!(!state.reload_config());

        let mut edited = Config::default();
        edited.simulation.time_scale = 5.0;
        edited.camera.speed = 1.0;
        edited.save(dir.path()).unwrap();

        assert!(state.reload_config());
        assert_eq!(state.config().simulation.time_scale, 2.0);
        assert_eq!(state.camera().speed, 1.0);
    }

    #[test]
    fn test_reload_failure_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = reloadable(dir.path(), CliArgs::default());
        std::fs::write(dir.path().join("config.ron"), "(simulation: (time_scale: ").unwrap();
        assert!(!state.reload_config());
        assert_eq!(state.config().simulation.time_scale, 1.0);
    }

    #[test]
    fn test_reload_without_source_is_ignored() {
        let mut state = app(Config::default());
        assert!(!state.reload_config());
    }
}
