//! Application state shared by the GUI, the emitter and the renderer.
//!
//! Nothing here touches the GPU: dialogs edit this state, the frame loop
//! calls [`AppState::update`], and the renderer reads it back. Flags such
//! as `palette_dirty` tell the GPU side which resources to rebuild.

use rand::Rng;

use crate::attractors::{Attractor, AttractorLibrary};
use crate::camera::Camera;
use crate::color::random_unit_vector;
use crate::config::{AttractorFile, ProgramSettings};
use crate::emitter::{PointEmitter, MAX_CAPACITY};
use crate::error::ConfigError;
use crate::palettes::{PaletteLibrary, PaletteView};
use crate::render::{ClippingPlanes, RenderSettings};
use crate::time::Time;

/// Actions triggered from keyboard shortcuts or buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleGui,
    TogglePause,
    Restart,
    Reload,
    Generate,
}

/// Everything the viewer knows, minus GPU resources.
pub struct AppState {
    pub attractors: AttractorLibrary,
    pub emitter: PointEmitter,
    pub render: RenderSettings,
    pub palettes: PaletteLibrary,
    pub palette_view: PaletteView,
    pub camera: Camera,
    pub clipping: ClippingPlanes,
    pub settings: ProgramSettings,
    pub time: Time,
    pub show_gui: bool,
    /// The palette texture must be rebuilt.
    pub palette_dirty: bool,
    /// The noise texture must be rebuilt.
    pub noise_dirty: bool,
    /// Last user-facing message (load/save results).
    pub status: Option<String>,
    /// GPU adapter description, filled in once the device exists.
    pub adapter_info: String,
    /// Largest point buffer the device accepts.
    max_points: usize,
}

impl AppState {
    pub fn new(mut settings: ProgramSettings) -> Self {
        settings.capacity = settings.capacity.clamp(1, MAX_CAPACITY);
        let mut emitter = PointEmitter::new(settings.capacity);
        emitter.steps_per_frame = settings.steps_per_frame;
        emitter.warmup = settings.warmup;

        let attractors = AttractorLibrary::new();
        emitter.restart(attractors.current().start);

        Self {
            attractors,
            emitter,
            render: RenderSettings::default(),
            palettes: PaletteLibrary::new(),
            palette_view: PaletteView::default(),
            camera: Camera::new(),
            clipping: ClippingPlanes::default(),
            settings,
            time: Time::new(),
            show_gui: true,
            palette_dirty: true,
            noise_dirty: true,
            status: None,
            adapter_info: String::new(),
            max_points: MAX_CAPACITY,
        }
    }

    pub fn attractor(&self) -> &Attractor {
        self.attractors.current()
    }

    /// Advance one frame. Returns the number of points emitted.
    pub fn update(&mut self) -> usize {
        let (_, delta) = self.time.update();
        self.camera.advance(delta);
        self.emitter.update(self.attractors.current())
    }

    /// Clear the cloud and start again from the attractor's start point.
    pub fn restart(&mut self) {
        let start = self.attractors.current().start;
        self.emitter.restart(start);
    }

    /// Restore default parameters, then restart.
    pub fn reload(&mut self) {
        self.attractors.current_mut().reset_params();
        self.restart();
    }

    /// Move the start point by a small random offset, then restart.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let attractor = self.attractors.current_mut();
        attractor.start = attractor.kind.default_start() + random_unit_vector(rng) * 0.1;
        self.restart();
    }

    pub fn select_attractor(&mut self, index: usize) -> bool {
        if !self.attractors.select(index) {
            return false;
        }
        log::info!("Selected attractor {}", self.attractors.current().name());
        self.restart();
        true
    }

    pub fn select_palette(&mut self, index: usize) -> bool {
        let changed = self.palettes.select(index);
        self.palette_dirty |= changed;
        changed
    }

    /// Largest capacity [`apply_settings`](Self::apply_settings) allows.
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Lower the capacity limit to what the device supports, shrinking the
    /// ring if it is over.
    pub fn set_max_points(&mut self, max_points: usize) {
        self.max_points = max_points.clamp(1, MAX_CAPACITY);
        if self.settings.capacity > self.max_points {
            log::warn!(
                "Point buffer of {} exceeds the device limit, using {}",
                self.settings.capacity,
                self.max_points
            );
            self.apply_settings();
        }
    }

    /// Push emitter-related settings into the emitter.
    ///
    /// The capacity is clamped to [`max_points`](Self::max_points).
    pub fn apply_settings(&mut self) {
        self.settings.capacity = self.settings.capacity.clamp(1, self.max_points);
        self.emitter.steps_per_frame = self.settings.steps_per_frame;
        self.emitter.warmup = self.settings.warmup;
        if self.emitter.capacity() != self.settings.capacity {
            let start = self.attractors.current().start;
            self.emitter.resize(self.settings.capacity, start);
            log::info!("Point buffer resized to {}", self.emitter.capacity());
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleGui => self.show_gui = !self.show_gui,
            Command::TogglePause => self.emitter.paused = !self.emitter.paused,
            Command::Restart => self.restart(),
            Command::Reload => self.reload(),
            Command::Generate => self.generate(&mut rand::thread_rng()),
        }
    }

    /// Load a saved view into the state.
    pub fn apply_file(&mut self, file: &AttractorFile) -> Result<(), ConfigError> {
        let attractor = file.to_attractor()?;
        let index = self
            .attractors
            .find(attractor.name())
            .ok_or_else(|| ConfigError::UnknownAttractor(file.attractor.clone()))?;
        self.attractors.select(index);
        *self.attractors.current_mut() = attractor;

        if let Some(name) = &file.palette {
            match self.palettes.find(name) {
                Some(i) => {
                    self.select_palette(i);
                }
                None => log::warn!("Palette '{}' not found, keeping current", name),
            }
        }
        self.palette_view = file.palette_view;
        self.render = file.render;
        self.camera = file.camera;
        self.clipping = file.clipping;
        self.restart();
        Ok(())
    }

    /// Capture the current view.
    pub fn to_file(&self) -> AttractorFile {
        let a = self.attractors.current();
        AttractorFile {
            attractor: a.name().to_string(),
            params: a.params().to_vec(),
            dt: a.dt,
            start: a.start,
            palette: Some(self.palettes.current().name.clone()),
            palette_view: self.palette_view,
            render: self.render,
            camera: self.camera,
            clipping: self.clipping,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attractors::AttractorKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_state() -> AppState {
        AppState::new(ProgramSettings {
            capacity: 1024,
            steps_per_frame: 100,
            warmup: 0,
            ..ProgramSettings::default()
        })
    }

    #[test]
    fn test_update_emits_points() {
        let mut state = small_state();
        assert_eq!(state.update(), 100);
        assert_eq!(state.emitter.len(), 100);
    }

    #[test]
    fn test_select_attractor_restarts() {
        let mut state = small_state();
        state.update();
        assert!(state.select_attractor(2));
        assert_eq!(state.attractor().kind, AttractorKind::Aizawa);
        assert!(state.emitter.is_empty());
        assert!(!state.select_attractor(99));
    }

    #[test]
    fn test_reload_restores_defaults() {
        let mut state = small_state();
        state.attractors.current_mut().set_param(0, 1.0);
        state.update();
        state.reload();
        assert_eq!(state.attractor().params(), AttractorKind::Lorenz.default_params());
        assert!(state.emitter.is_empty());
    }

    #[test]
    fn test_generate_moves_start_point() {
        let mut state = small_state();
        let mut rng = StdRng::seed_from_u64(5);
        state.generate(&mut rng);
        let start = state.attractor().start;
        let offset = start - AttractorKind::Lorenz.default_start();
        assert!((offset.length() - 0.1).abs() < 1e-4);
        assert_eq!(state.emitter.cursor(), start);
    }

    #[test]
    fn test_commands() {
        let mut state = small_state();
        state.apply(Command::ToggleGui);
        assert!(!state.show_gui);
        state.apply(Command::TogglePause);
        assert_eq!(state.update(), 0);
        state.apply(Command::TogglePause);
        assert_eq!(state.update(), 100);
        state.apply(Command::Restart);
        assert!(state.emitter.is_empty());
    }

    #[test]
    fn test_apply_settings_resizes() {
        let mut state = small_state();
        state.settings.capacity = 2048;
        state.settings.steps_per_frame = 7;
        state.apply_settings();
        assert_eq!(state.emitter.capacity(), 2048);
        assert_eq!(state.update(), 7);
    }

    #[test]
    fn test_capacity_is_capped_by_device_limit() {
        let mut state = small_state();
        state.settings.capacity = MAX_CAPACITY + 1;
        state.apply_settings();
        assert_eq!(state.settings.capacity, MAX_CAPACITY);

        state.settings.capacity = 4096;
        state.apply_settings();
        state.set_max_points(2000);
        assert_eq!(state.max_points(), 2000);
        assert_eq!(state.settings.capacity, 2000);
        assert_eq!(state.emitter.capacity(), 2000);

        let oversized = AppState::new(ProgramSettings {
            capacity: usize::MAX,
            ..ProgramSettings::default()
        });
        assert_eq!(oversized.emitter.capacity(), MAX_CAPACITY);
    }

    #[test]
    fn test_select_palette_marks_dirty() {
        let mut state = small_state();
        state.palette_dirty = false;
        assert!(state.select_palette(3));
        assert!(state.palette_dirty);
        state.palette_dirty = false;
        assert!(!state.select_palette(1000));
        assert!(!state.palette_dirty);
    }

    #[test]
    fn test_file_roundtrip_through_state() {
        let mut state = small_state();
        state.select_attractor(4);
        state.attractors.current_mut().set_param(0, 1.7);
        state.select_palette(state.palettes.find("Ice").unwrap());
        state.palette_view.reverse = true;
        let file = state.to_file();

        let mut other = small_state();
        other.apply_file(&file).unwrap();
        assert_eq!(other.attractor().kind, AttractorKind::Halvorsen);
        assert_eq!(other.attractor().params(), &[1.7]);
        assert_eq!(other.palettes.current().name, "Ice");
        assert!(other.palette_view.reverse);
        assert_eq!(other.to_file(), file);
    }

    #[test]
    fn test_apply_file_rejects_unknown() {
        let mut state = small_state();
        let mut file = state.to_file();
        file.attractor = "Unknown".into();
        assert!(state.apply_file(&file).is_err());
        assert_eq!(state.attractor().kind, AttractorKind::Lorenz);
    }
}
