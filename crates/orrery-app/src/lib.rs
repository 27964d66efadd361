//! The orrery application: window, event loop and frame pacing.

pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod window;

pub use game_loop::{FIXED_DT, GameLoop, MAX_FRAME_TIME};
pub use platform::{PlatformDirs, PlatformError};
pub use renderer::{SceneRenderer, SetupError};
pub use scene::{body_descriptor, build_camera, build_system, texture_path};
pub use window::{AppState, ConfigSource, RunError, run, window_attributes_from_config};
