//! # chaos-points
//!
//! Real-time viewer for chaotic attractors rendered as GPU point clouds.
//!
//! An attractor is integrated on the CPU, one point per step, into a ring
//! buffer of [`PointVertex`]. Each point carries the speed at which it was
//! reached; the renderer maps that speed through a color palette and draws
//! every point as a round sprite or a camera-facing billboard.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chaos_points::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let settings = ProgramSettings::load_or_default(SETTINGS_FILE);
//!     chaos_points::run(settings, None)
//! }
//! ```
//!
//! ## Without a window
//!
//! Everything except [`gpu`] and [`app`] runs headless, which is how the
//! tests drive it:
//!
//! ```ignore
//! let mut state = AppState::new(ProgramSettings::default());
//! state.update();
//! println!("{} points", state.emitter.len());
//! ```
//!
//! ## Modules
//!
//! - [`attractors`] - attractor equations, parameters and integration
//! - [`emitter`] - the point ring buffer
//! - [`textures`] - palette ramps and noise textures on the CPU side
//! - [`palettes`] - named palettes, mapping, PNG/JSON import and export
//! - [`render`] - render modes, particle settings and clipping planes
//! - [`ui`] - the dialogs
//! - [`gpu`] - wgpu pipelines, textures and egui painting

pub mod app;
pub mod attractors;
pub mod camera;
pub mod color;
pub mod config;
pub mod emitter;
pub mod error;
pub mod gpu;
pub mod palettes;
pub mod render;
pub mod state;
pub mod textures;
pub mod time;
pub mod ui;

pub use app::run;
pub use attractors::{Attractor, AttractorKind, AttractorLibrary, Integration};
pub use camera::Camera;
pub use config::{AttractorFile, GuiTheme, ProgramSettings, SETTINGS_FILE};
pub use emitter::{PointEmitter, PointVertex};
pub use error::{AppError, ConfigError, GpuError, TextureError};
pub use glam::{Vec2, Vec3, Vec4};
pub use palettes::{PaletteEntry, PaletteLibrary, PaletteView};
pub use render::{ClippingPlanes, RenderMode, RenderSettings};
pub use state::{AppState, Command};
pub use textures::{AddressMode, FilterMode, TextureData, TexturePrecision};

/// Common imports.
///
/// ```ignore
/// use chaos_points::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attractors::{Attractor, AttractorKind, AttractorLibrary, Integration};
    pub use crate::camera::Camera;
    pub use crate::config::{GuiTheme, ProgramSettings, SETTINGS_FILE};
    pub use crate::emitter::{PointEmitter, PointVertex};
    pub use crate::error::{AppError, ConfigError};
    pub use crate::palettes::{PaletteLibrary, PaletteView};
    pub use crate::render::{ClippingPlanes, ParticleSettings, RenderMode, RenderSettings};
    pub use crate::state::{AppState, Command};
    pub use crate::textures::{TextureData, TexturePrecision};
    pub use glam::{Vec2, Vec3, Vec4};
}
