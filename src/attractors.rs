//! Strange attractor equations.
//!
//! Two families are supported:
//!
//! - **Flows** defined by three coupled differential equations, integrated
//!   with a fixed-step 4th-order Runge-Kutta scheme.
//! - **Maps** where each point is computed directly from the previous one.
//!
//! # Example
//!
//! ```ignore
//! let lorenz = Attractor::new(AttractorKind::Lorenz);
//! let mut p = lorenz.start;
//! for _ in 0..1000 {
//!     p = lorenz.step(p);
//! }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How an attractor advances from one point to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Integration {
    /// Continuous flow, integrated with the given default time step.
    Ode { dt: f32 },
    /// Discrete iterated map.
    Map,
}

/// Every attractor the viewer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttractorKind {
    Lorenz,
    Rossler,
    Aizawa,
    Thomas,
    Halvorsen,
    Dadras,
    Chen,
    Arneodo,
    Pickover,
    KingsDream,
    PolynomialA,
}

impl AttractorKind {
    /// All kinds in display order.
    pub const ALL: [AttractorKind; 11] = [
        AttractorKind::Lorenz,
        AttractorKind::Rossler,
        AttractorKind::Aizawa,
        AttractorKind::Thomas,
        AttractorKind::Halvorsen,
        AttractorKind::Dadras,
        AttractorKind::Chen,
        AttractorKind::Arneodo,
        AttractorKind::Pickover,
        AttractorKind::KingsDream,
        AttractorKind::PolynomialA,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttractorKind::Lorenz => "Lorenz",
            AttractorKind::Rossler => "Rossler",
            AttractorKind::Aizawa => "Aizawa",
            AttractorKind::Thomas => "Thomas",
            AttractorKind::Halvorsen => "Halvorsen",
            AttractorKind::Dadras => "Dadras",
            AttractorKind::Chen => "Chen",
            AttractorKind::Arneodo => "Arneodo",
            AttractorKind::Pickover => "Pickover",
            AttractorKind::KingsDream => "Kings Dream",
            AttractorKind::PolynomialA => "Polynomial A",
        }
    }

    /// Look a kind up by display name, ignoring case and spaces.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL.into_iter().find(|k| {
            let candidate: String = k.name().chars().filter(|c| !c.is_whitespace()).collect();
            candidate.eq_ignore_ascii_case(&wanted)
        })
    }

    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            AttractorKind::Lorenz => &["sigma", "rho", "beta"],
            AttractorKind::Rossler => &["a", "b", "c"],
            AttractorKind::Aizawa => &["a", "b", "c", "d", "e", "f"],
            AttractorKind::Thomas => &["b"],
            AttractorKind::Halvorsen => &["a"],
            AttractorKind::Dadras => &["a", "b", "c", "d", "e"],
            AttractorKind::Chen => &["a", "b", "c"],
            AttractorKind::Arneodo => &["a", "b", "c"],
            AttractorKind::Pickover => &["a", "b", "c", "d"],
            AttractorKind::KingsDream => &["a", "b", "c", "d", "e", "f"],
            AttractorKind::PolynomialA => &["p0", "p1", "p2"],
        }
    }

    pub fn default_params(&self) -> &'static [f32] {
        match self {
            AttractorKind::Lorenz => &[10.0, 28.0, 8.0 / 3.0],
            AttractorKind::Rossler => &[0.2, 0.2, 5.7],
            AttractorKind::Aizawa => &[0.95, 0.7, 0.6, 3.5, 0.25, 0.1],
            AttractorKind::Thomas => &[0.208186],
            AttractorKind::Halvorsen => &[1.89],
            AttractorKind::Dadras => &[3.0, 2.7, 1.7, 2.0, 9.0],
            AttractorKind::Chen => &[35.0, 3.0, 28.0],
            AttractorKind::Arneodo => &[-5.5, 3.5, -1.0],
            AttractorKind::Pickover => &[2.24, 0.43, -0.65, -2.43],
            AttractorKind::KingsDream => &[2.879879, -0.765145, -0.966918, 0.744728, 0.5, -0.3],
            AttractorKind::PolynomialA => &[1.586, 1.124, 0.281],
        }
    }

    pub fn default_start(&self) -> Vec3 {
        match self {
            AttractorKind::Lorenz => Vec3::new(1.0, 1.0, 1.0),
            AttractorKind::Rossler => Vec3::new(0.1, 0.0, 0.0),
            AttractorKind::Aizawa => Vec3::new(0.1, 0.0, 0.0),
            AttractorKind::Thomas => Vec3::new(0.1, 0.0, 0.0),
            AttractorKind::Halvorsen => Vec3::new(-1.48, -1.51, 2.04),
            AttractorKind::Dadras => Vec3::new(1.0, 1.0, 1.0),
            AttractorKind::Chen => Vec3::new(-0.1, 0.5, -0.6),
            AttractorKind::Arneodo => Vec3::new(0.1, 0.0, 0.0),
            AttractorKind::Pickover => Vec3::new(0.1, 0.1, 0.1),
            AttractorKind::KingsDream => Vec3::new(0.1, 0.1, 0.1),
            AttractorKind::PolynomialA => Vec3::new(0.1, 0.1, 0.1),
        }
    }

    pub fn integration(&self) -> Integration {
        match self {
            AttractorKind::Lorenz => Integration::Ode { dt: 0.005 },
            AttractorKind::Rossler => Integration::Ode { dt: 0.01 },
            AttractorKind::Aizawa => Integration::Ode { dt: 0.01 },
            AttractorKind::Thomas => Integration::Ode { dt: 0.05 },
            AttractorKind::Halvorsen => Integration::Ode { dt: 0.005 },
            AttractorKind::Dadras => Integration::Ode { dt: 0.005 },
            AttractorKind::Chen => Integration::Ode { dt: 0.002 },
            AttractorKind::Arneodo => Integration::Ode { dt: 0.008 },
            AttractorKind::Pickover | AttractorKind::KingsDream | AttractorKind::PolynomialA => {
                Integration::Map
            }
        }
    }

    pub fn is_ode(&self) -> bool {
        matches!(self.integration(), Integration::Ode { .. })
    }
}

/// An attractor with its current parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Attractor {
    pub kind: AttractorKind,
    params: Vec<f32>,
    /// Integration step for flows. Ignored by maps.
    pub dt: f32,
    /// Point emission restarts from.
    pub start: Vec3,
}

impl Attractor {
    pub fn new(kind: AttractorKind) -> Self {
        let dt = match kind.integration() {
            Integration::Ode { dt } => dt,
            Integration::Map => 0.0,
        };
        Self {
            kind,
            params: kind.default_params().to_vec(),
            dt,
            start: kind.default_start(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Set one parameter. Indices past the parameter list are ignored.
    pub fn set_param(&mut self, index: usize, value: f32) {
        if let Some(p) = self.params.get_mut(index) {
            *p = value;
        }
    }

    /// Replace all parameters. Returns `false` (and changes nothing) when
    /// the count does not match the attractor.
    pub fn set_params(&mut self, values: &[f32]) -> bool {
        if values.len() != self.params.len() {
            return false;
        }
        self.params.copy_from_slice(values);
        true
    }

    /// Restore default parameters, time step and start point.
    pub fn reset_params(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Velocity field at `p` for flows, `None` for maps.
    pub fn derivative(&self, p: Vec3) -> Option<Vec3> {
        let k = &self.params;
        let (x, y, z) = (p.x, p.y, p.z);
        let d = match self.kind {
            AttractorKind::Lorenz => Vec3::new(k[0] * (y - x), x * (k[1] - z) - y, x * y - k[2] * z),
            AttractorKind::Rossler => Vec3::new(-y - z, x + k[0] * y, k[1] + z * (x - k[2])),
            AttractorKind::Aizawa => {
                let (a, b, c, dd, e, f) = (k[0], k[1], k[2], k[3], k[4], k[5]);
                Vec3::new(
                    (z - b) * x - dd * y,
                    dd * x + (z - b) * y,
                    c + a * z - z * z * z / 3.0 - (x * x + y * y) * (1.0 + e * z) + f * z * x * x * x,
                )
            }
            AttractorKind::Thomas => Vec3::new(y.sin() - k[0] * x, z.sin() - k[0] * y, x.sin() - k[0] * z),
            AttractorKind::Halvorsen => {
                let a = k[0];
                Vec3::new(
                    -a * x - 4.0 * y - 4.0 * z - y * y,
                    -a * y - 4.0 * z - 4.0 * x - z * z,
                    -a * z - 4.0 * x - 4.0 * y - x * x,
                )
            }
            AttractorKind::Dadras => Vec3::new(
                y - k[0] * x + k[1] * y * z,
                k[2] * y - x * z + z,
                k[3] * x * y - k[4] * z,
            ),
            AttractorKind::Chen => Vec3::new(
                k[0] * (y - x),
                (k[2] - k[0]) * x - x * z + k[2] * y,
                x * y - k[1] * z,
            ),
            AttractorKind::Arneodo => Vec3::new(y, z, -k[0] * x - k[1] * y - z + k[2] * x * x * x),
            AttractorKind::Pickover | AttractorKind::KingsDream | AttractorKind::PolynomialA => {
                return None
            }
        };
        Some(d)
    }

    fn map(&self, p: Vec3) -> Vec3 {
        let k = &self.params;
        let (x, y, z) = (p.x, p.y, p.z);
        match self.kind {
            AttractorKind::Pickover => Vec3::new(
                (k[0] * y).sin() - z * (k[1] * x).cos(),
                z * (k[2] * x).sin() - (k[3] * y).cos(),
                x.sin(),
            ),
            AttractorKind::KingsDream => Vec3::new(
                (k[0] * z).sin() + k[3] * (k[0] * x).sin(),
                (k[1] * x).sin() + k[4] * (k[1] * y).sin(),
                (k[2] * y).sin() + k[5] * (k[2] * z).sin(),
            ),
            AttractorKind::PolynomialA => Vec3::new(k[0] + y - z * y, k[1] + z - x * z, k[2] + x - y * x),
            _ => p,
        }
    }

    /// Advance one point.
    pub fn step(&self, p: Vec3) -> Vec3 {
        if !self.kind.is_ode() {
            return self.map(p);
        }
        let h = self.dt;
        let f = |q: Vec3| self.derivative(q).unwrap_or(Vec3::ZERO);
        let k1 = f(p);
        let k2 = f(p + k1 * (h * 0.5));
        let k3 = f(p + k2 * (h * 0.5));
        let k4 = f(p + k3 * h);
        p + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (h / 6.0)
    }
}

/// The attractors offered by the viewer and the current selection.
#[derive(Debug, Clone)]
pub struct AttractorLibrary {
    attractors: Vec<Attractor>,
    selected: usize,
}

impl AttractorLibrary {
    pub fn new() -> Self {
        Self {
            attractors: AttractorKind::ALL.into_iter().map(Attractor::new).collect(),
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select by index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.attractors.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> &Attractor {
        &self.attractors[self.selected]
    }

    pub fn current_mut(&mut self) -> &mut Attractor {
        &mut self.attractors[self.selected]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attractor> {
        self.attractors.iter()
    }

    /// Index of the attractor with the given name.
    pub fn find(&self, name: &str) -> Option<usize> {
        let kind = AttractorKind::from_name(name)?;
        self.attractors.iter().position(|a| a.kind == kind)
    }
}

impl Default for AttractorLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_tables_match() {
        for kind in AttractorKind::ALL {
            assert_eq!(
                kind.param_names().len(),
                kind.default_params().len(),
                "{} parameter table mismatch",
                kind.name()
            );
        }
    }

    #[test]
    fn test_from_name_ignores_case_and_spaces() {
        assert_eq!(AttractorKind::from_name("lorenz"), Some(AttractorKind::Lorenz));
        assert_eq!(AttractorKind::from_name("KingsDream"), Some(AttractorKind::KingsDream));
        assert_eq!(AttractorKind::from_name("polynomial a"), Some(AttractorKind::PolynomialA));
        assert_eq!(AttractorKind::from_name("nope"), None);
    }

    #[test]
    fn test_lorenz_derivative() {
        let a = Attractor::new(AttractorKind::Lorenz);
        let d = a.derivative(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(d.x, 10.0 * (2.0 - 1.0));
        assert_eq!(d.y, 1.0 * (28.0 - 3.0) - 2.0);
        assert!((d.z - (2.0 - 8.0 / 3.0 * 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_maps_have_no_derivative() {
        let a = Attractor::new(AttractorKind::Pickover);
        assert!(a.derivative(Vec3::ONE).is_none());
    }

    #[test]
    fn test_lorenz_stays_bounded() {
        let a = Attractor::new(AttractorKind::Lorenz);
        let mut p = a.start;
        for _ in 0..20_000 {
            p = a.step(p);
            assert!(p.is_finite());
        }
        assert!(p.length() < 100.0);
    }

    #[test]
    fn test_step_is_runge_kutta() {
        let a = Attractor::new(AttractorKind::Thomas);
        let p = Vec3::new(0.3, -0.2, 0.5);
        let h = a.dt;
        let f = |q: Vec3| a.derivative(q).unwrap();
        let k1 = f(p);
        let k2 = f(p + k1 * h / 2.0);
        let k3 = f(p + k2 * h / 2.0);
        let k4 = f(p + k3 * h);
        let expected = p + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * h / 6.0;
        assert!((a.step(p) - expected).length() < 1e-6);
    }

    #[test]
    fn test_pickover_single_step() {
        let a = Attractor::new(AttractorKind::Pickover);
        let next = a.step(Vec3::ZERO);
        // sin(0) - 0, 0 - cos(0), sin(0)
        assert_eq!(next, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_kings_dream_is_bounded() {
        let a = Attractor::new(AttractorKind::KingsDream);
        let mut p = a.start;
        for _ in 0..5000 {
            p = a.step(p);
        }
        assert!(p.x.abs() <= 1.0 + 0.744728 + 1e-5);
        assert!(p.y.abs() <= 1.5 + 1e-5);
        assert!(p.z.abs() <= 1.3 + 1e-5);
    }

    #[test]
    fn test_set_param_ignores_out_of_range() {
        let mut a = Attractor::new(AttractorKind::Halvorsen);
        a.set_param(0, 2.0);
        a.set_param(5, 9.0);
        assert_eq!(a.params(), &[2.0]);
    }

    #[test]
    fn test_set_params_checks_count() {
        let mut a = Attractor::new(AttractorKind::Lorenz);
        assert!(!a.set_params(&[1.0, 2.0]));
        assert_eq!(a.params(), AttractorKind::Lorenz.default_params());
        assert!(a.set_params(&[1.0, 2.0, 3.0]));
        assert_eq!(a.params(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_reset_params_restores_defaults() {
        let mut a = Attractor::new(AttractorKind::Chen);
        a.set_param(1, 99.0);
        a.dt = 0.5;
        a.start = Vec3::splat(4.0);
        a.reset_params();
        assert_eq!(a, Attractor::new(AttractorKind::Chen));
    }

    #[test]
    fn test_library_selection() {
        let mut lib = AttractorLibrary::new();
        assert_eq!(lib.len(), AttractorKind::ALL.len());
        assert_eq!(lib.current().kind, AttractorKind::Lorenz);
        assert!(lib.select(3));
        assert_eq!(lib.current().kind, AttractorKind::Thomas);
        assert!(!lib.select(100));
        assert_eq!(lib.selected(), 3);
        assert_eq!(lib.find("Pickover"), Some(8));
    }
}
