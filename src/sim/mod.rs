// sim/ - Digital rain simulation
//
// Owns the active streams and the grid buffer. Each tick spawns, advances
// and retires streams, then rebuilds the grid from scratch.

mod stream;

pub use stream::Stream;

use log::{info, trace};

use crate::config::{ConfigError, RainConfig};
use crate::grid::{Geometry, GridBuffer};

/// Source of uniform randomness for spawning and glyph picks
pub trait Entropy {
    /// Uniform value in [0, 1)
    fn next_unit(&mut self) -> f32;

    /// Uniform integer in [0, n); always consumes one draw
    fn next_below(&mut self, n: usize) -> usize {
        let u = self.next_unit();
        if n == 0 { return 0; }
        ((u * n as f32) as usize).min(n - 1)
    }
}

/// xorshift32 generator
#[derive(Clone, Debug)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    pub fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift
        Self { state: if seed == 0 { 0xDEADBEEF } else { seed } }
    }
}

impl Entropy for Xorshift32 {
    #[inline(always)]
    fn next_unit(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 * (1.0 / 16777216.0)
    }
}

/// Rain simulation state
pub struct Simulator<R = Xorshift32> {
    config: RainConfig,
    geometry: Geometry,
    streams: Vec<Stream>,
    grid: GridBuffer,
    rng: R,

    // Lifetime counters
    spawned: u64,
    retired: u64,
}

impl Simulator<Xorshift32> {
    pub fn new(config: RainConfig) -> Result<Self, ConfigError> {
        let rng = Xorshift32::new(config.seed);
        Self::with_entropy(config, rng)
    }
}

impl<R: Entropy> Simulator<R> {
    /// Fails if `config` does not pass `RainConfig::validate`
    pub fn with_entropy(config: RainConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            geometry: Geometry::empty(),
            streams: Vec::new(),
            grid: GridBuffer::default(),
            rng,
            spawned: 0,
            retired: 0,
        })
    }

    /// Recompute geometry for a surface size (CSS px) and reset all state
    pub fn resize_surface(&mut self, width: f32, height: f32, pixel_density: f32) -> Geometry {
        let geometry = Geometry::new(width, height, pixel_density, self.config.base_cell_size);
        self.resize(geometry);
        geometry
    }

    /// Install new geometry. Streams and grid are dropped, never carried over.
    pub fn resize(&mut self, geometry: Geometry) {
        info!(
            "grid {}x{} cells of {:.1}px ({}x{} canvas)",
            geometry.cols, geometry.rows, geometry.cell_size,
            geometry.canvas_width, geometry.canvas_height,
        );
        self.geometry = geometry;
        self.retired += self.streams.len() as u64;
        self.streams.clear();
        self.grid.resize(geometry.rows, geometry.cols);
    }

    /// Advance the simulation by `dt` seconds and rebuild the grid
    pub fn tick(&mut self, dt: f32) {
        if self.geometry.is_empty() { return; }
        // Also maps NaN to zero
        let dt = dt.max(0.0);

        let born = self.spawn(dt);
        let died = self.advance(dt);
        self.rebuild_grid();

        trace!("tick dt={dt:.4} +{born} -{died} streams={}", self.streams.len());
    }

    /// Place a stream directly, bypassing the spawn draw.
    /// Returns false if the column is outside the grid or the stream is degenerate.
    pub fn spawn_stream(&mut self, column: usize, speed: f32, trail_len: usize) -> bool {
        if self.geometry.is_empty() || column >= self.geometry.cols {
            return false;
        }
        if trail_len == 0 || !(speed > 0.0) {
            return false;
        }
        self.push_stream(column, speed, trail_len);
        true
    }

    /// Clear the grid and repaint every active stream
    pub fn rebuild_grid(&mut self) {
        self.grid.clear();
        for s in &self.streams {
            s.paint(&mut self.grid);
        }
    }

    pub fn geometry(&self) -> &Geometry { &self.geometry }
    pub fn grid(&self) -> &GridBuffer { &self.grid }
    pub fn streams(&self) -> &[Stream] { &self.streams }
    pub fn spawned_total(&self) -> u64 { self.spawned }
    pub fn retired_total(&self) -> u64 { self.retired }

    /// Expected spawns this frame is `spawn_rate * dt * cols`; each
    /// successful draw uses up one unit of that budget. At most one
    /// stream per column is born in a single tick.
    fn spawn(&mut self, dt: f32) -> usize {
        let cols = self.geometry.cols;
        let mut budget = self.config.spawn_rate * dt * cols as f32;
        let limit = budget.ceil().min(cols as f32) as usize;
        let mut count = 0;

        for _ in 0..limit {
            if !(self.rng.next_unit() < budget) {
                break;
            }
            let column = self.rng.next_below(cols);
            let speed = lerp(self.config.speed_min, self.config.speed_max, self.rng.next_unit());
            let span = self.config.trail_max.saturating_sub(self.config.trail_min);
            let trail_len = (self.config.trail_min + self.rng.next_below(span)).max(1);
            self.push_stream(column, speed, trail_len);
            budget -= 1.0;
            count += 1;
        }

        count
    }

    fn advance(&mut self, dt: f32) -> usize {
        let rows = self.geometry.rows;
        let rng = &mut self.rng;
        let before = self.streams.len();
        self.streams.retain_mut(|s| s.advance(dt, rows, &mut *rng));
        let died = before - self.streams.len();
        self.retired += died as u64;
        died
    }

    fn push_stream(&mut self, column: usize, speed: f32, trail_len: usize) {
        self.streams.push(Stream::new(self.spawned, column, speed, trail_len));
        self.spawned += 1;
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }
