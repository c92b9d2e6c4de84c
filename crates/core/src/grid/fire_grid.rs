//! Fire spread over a sheet of paper
//!
//! The sheet is an `N×N` grid carrying three scalar fields, each in `[0, 1]`:
//!
//! - `fire` - current combustion intensity (rises and falls)
//! - `burn` - cumulative burn damage (never decreases)
//! - `ash` - ash coverage derived from burn (never decreases)
//!
//! # Update rule
//!
//! ```text
//! fire'(c) = fire(c)
//!          - fire(c) · decay · k                     if c is a source
//!          + Σ fire(n) · spread · k · ½              over 4-neighbours n that are sources
//! fire'(c) = min(clamp(fire'(c), 0, 1), 1 - ash(c))
//! burn'(c) = min(burn(c) + fire'(c) · burn_rate · k, 1)   if fire'(c) > burn_threshold
//! ash'(c)  = min(ash(c) + ash_rate · k, 1)                if burn'(c) > ash_threshold
//! ```
//!
//! A source is an interior cell (border cells never spread) whose fire is
//! above `spread_threshold`, and `k` is the speed multiplier. All fire deltas
//! are computed from the previous step's field into a back buffer which is
//! then swapped in, so the result does not depend on traversal order. Each
//! destination cell gathers from its neighbours, which lets rows be computed
//! in parallel.
//!
//! Ash is consumed paper: a cell's fire can never exceed `1 - ash`, which is
//! what eventually puts the sheet out.

use super::field::FieldData;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// Rates and thresholds for the fire grid
///
/// All rates are per simulation step and are scaled by the speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Minimum fire for an interior cell to spread and decay
    pub spread_threshold: f32,
    /// Fraction of a source's fire pushed out per step (half to each neighbour)
    pub spread_rate: f32,
    /// Fraction of a source's fire lost per step
    pub decay_rate: f32,
    /// Minimum fire for a cell to char (and emit particles)
    pub burn_threshold: f32,
    /// Burn gained per step per unit of fire
    pub burn_rate: f32,
    /// Minimum burn for a cell to start turning to ash
    pub ash_threshold: f32,
    /// Ash gained per step once charred
    pub ash_rate: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            spread_threshold: 0.1,
            spread_rate: 0.15,
            decay_rate: 0.1,
            burn_threshold: 0.5,
            burn_rate: 0.02,
            ash_threshold: 0.8,
            ash_rate: 0.01,
        }
    }
}

/// Cell coordinate in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

/// Seed point lit whenever the grid is reset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ignition {
    pub x: usize,
    pub y: usize,
    /// Initial fire intensity, clamped into `[0, 1]` when applied
    pub intensity: f32,
}

impl Ignition {
    #[must_use]
    pub const fn new(x: usize, y: usize, intensity: f32) -> Self {
        Self { x, y, intensity }
    }

    /// Bottom-left, bottom-right and bottom-centre seeds, five cells in
    /// from the edges
    ///
    /// Sheets narrower or shorter than ten cells pull the seeds towards the
    /// middle; they always land on interior cells of the lower half.
    #[must_use]
    pub fn defaults(width: usize, height: usize) -> Vec<Ignition> {
        let bottom = inset(height.saturating_sub(5).max(height / 2), height);
        vec![
            Ignition::new(inset(5.min(width / 2), width), bottom, 0.8),
            Ignition::new(inset(width.saturating_sub(5).max(width / 2), width), bottom, 0.8),
            Ignition::new(inset(width / 2, width), bottom, 0.6),
        ]
    }
}

// Nearest interior index to `v` on an axis of `len` cells
#[inline]
fn inset(v: usize, len: usize) -> usize {
    v.min(len.saturating_sub(2)).max(1).min(len.saturating_sub(1))
}

#[inline]
fn is_interior(x: usize, y: usize, width: usize, height: usize) -> bool {
    x > 0 && y > 0 && x + 1 < width && y + 1 < height
}

/// Paper fire grid with double-buffered spread
pub struct FireGrid {
    fire: FieldData,
    fire_back: FieldData,
    burn: FieldData,
    ash: FieldData,

    params: GridParams,
    ignitions: Vec<Ignition>,

    // Cells above the burn threshold after the latest update
    hot_cells: Vec<GridCoord>,
}

impl FireGrid {
    /// Create a grid and light its ignition points
    ///
    /// Ignitions outside the grid are ignored with a warning.
    #[must_use]
    pub fn new(width: usize, height: usize, params: GridParams, ignitions: Vec<Ignition>) -> Self {
        let ignitions: Vec<Ignition> = ignitions
            .into_iter()
            .filter(|ign| {
                let inside = ign.x < width && ign.y < height;
                if !inside {
                    warn!(
                        "Ignoring ignition at ({}, {}) outside {}x{} grid",
                        ign.x, ign.y, width, height
                    );
                }
                inside
            })
            .collect();

        let mut grid = Self {
            fire: FieldData::new(width, height),
            fire_back: FieldData::new(width, height),
            burn: FieldData::new(width, height),
            ash: FieldData::new(width, height),
            params,
            ignitions,
            hot_cells: Vec::new(),
        };
        grid.reset();
        grid
    }

    /// Zero every field and re-light the ignition points
    pub fn reset(&mut self) {
        self.fire.fill(0.0);
        self.fire_back.fill(0.0);
        self.burn.fill(0.0);
        self.ash.fill(0.0);
        self.hot_cells.clear();

        for ign in &self.ignitions {
            self.fire.set(ign.x, ign.y, ign.intensity.clamp(0.0, 1.0));
        }
    }

    /// Advance the grid by one step
    ///
    /// Negative multipliers are treated as zero so burn and ash stay
    /// monotonic.
    ///
    /// # Returns
    ///
    /// Cells whose fire is above `burn_threshold` after the step, in
    /// row-major order.
    pub fn update(&mut self, speed_multiplier: f32) -> &[GridCoord] {
        let width = self.fire.width;
        let height = self.fire.height;
        self.hot_cells.clear();
        if width == 0 || height == 0 {
            return &self.hot_cells;
        }

        let params = self.params;
        let k = speed_multiplier.max(0.0);

        // 1. Fire spread and decay (previous field -> back buffer)
        let spread = params.spread_rate * k * 0.5;
        let decay = params.decay_rate * k;
        let fire = self.fire.as_slice();
        let ash = self.ash.as_slice();
        let is_source = |x: usize, y: usize| {
            is_interior(x, y, width, height) && fire[y * width + x] > params.spread_threshold
        };

        self.fire_back
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    let idx = y * width + x;
                    let f = fire[idx];
                    let mut next = f;

                    if is_source(x, y) {
                        next -= f * decay;
                    }
                    if x > 0 && is_source(x - 1, y) {
                        next += fire[idx - 1] * spread;
                    }
                    if x + 1 < width && is_source(x + 1, y) {
                        next += fire[idx + 1] * spread;
                    }
                    if y > 0 && is_source(x, y - 1) {
                        next += fire[idx - width] * spread;
                    }
                    if y + 1 < height && is_source(x, y + 1) {
                        next += fire[idx + width] * spread;
                    }

                    *cell = next.clamp(0.0, 1.0).min(1.0 - ash[idx]);
                }
            });

        std::mem::swap(&mut self.fire, &mut self.fire_back);

        // 2. Charring and ash, from the fresh fire field
        let burn_step = params.burn_rate * k;
        let ash_step = params.ash_rate * k;
        self.burn
            .as_mut_slice()
            .par_iter_mut()
            .zip(self.ash.as_mut_slice().par_iter_mut())
            .zip(self.fire.as_slice().par_iter())
            .for_each(|((burn, ash), &fire)| {
                if fire > params.burn_threshold {
                    *burn = (*burn + fire * burn_step).min(1.0);
                }
                if *burn > params.ash_threshold {
                    *ash = (*ash + ash_step).min(1.0);
                }
            });

        // 3. Collect hot cells for particle emission
        for (idx, &f) in self.fire.as_slice().iter().enumerate() {
            if f > params.burn_threshold {
                self.hot_cells.push(GridCoord {
                    x: idx % width,
                    y: idx / width,
                });
            }
        }

        trace!(
            "Grid step: {} hot cells, fire mass {:.3}",
            self.hot_cells.len(),
            self.fire_mass()
        );

        &self.hot_cells
    }

    /// Cells above the burn threshold after the latest update
    pub fn hot_cells(&self) -> &[GridCoord] {
        &self.hot_cells
    }

    /// Current fire intensity field
    pub fn fire(&self) -> &FieldData {
        &self.fire
    }

    /// Cumulative burn field
    pub fn burn(&self) -> &FieldData {
        &self.burn
    }

    /// Ash coverage field
    pub fn ash(&self) -> &FieldData {
        &self.ash
    }

    /// Sum of fire intensity over the sheet
    pub fn fire_mass(&self) -> f32 {
        self.fire.sum()
    }

    /// True when no cell holds enough fire to spread
    pub fn is_quiescent(&self) -> bool {
        self.fire.count_above(self.params.spread_threshold) == 0
    }

    /// Fraction of cells with any burn damage
    pub fn burned_fraction(&self) -> f32 {
        self.fraction_above(&self.burn)
    }

    /// Fraction of cells with any ash
    pub fn ash_fraction(&self) -> f32 {
        self.fraction_above(&self.ash)
    }

    fn fraction_above(&self, field: &FieldData) -> f32 {
        let total = field.data.len();
        if total == 0 {
            return 0.0;
        }
        field.count_above(0.0) as f32 / total as f32
    }

    pub fn width(&self) -> usize {
        self.fire.width
    }

    pub fn height(&self) -> usize {
        self.fire.height
    }

    pub fn ignitions(&self) -> &[Ignition] {
        &self.ignitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_seed(size: usize, x: usize, y: usize, intensity: f32) -> FireGrid {
        FireGrid::new(
            size,
            size,
            GridParams::default(),
            vec![Ignition::new(x, y, intensity)],
        )
    }

    #[test]
    fn test_center_seed_spreads_to_neighbours() {
        let mut grid = single_seed(3, 1, 1, 0.8);
        grid.update(1.0);

        let fire = grid.fire();
        assert_relative_eq!(fire.get(1, 1), 0.8 - 0.8 * 0.1, epsilon = 1e-6);
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            assert_relative_eq!(fire.get(x, y), 0.8 * 0.15 * 0.5, epsilon = 1e-6);
        }
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(fire.get(x, y), 0.0);
        }
    }

    #[test]
    fn test_spread_is_symmetric() {
        let mut grid = single_seed(9, 4, 4, 1.0);
        for _ in 0..6 {
            grid.update(1.0);
            let fire = grid.fire();
            for d in 1..4 {
                let left = fire.get(4 - d, 4);
                let right = fire.get(4 + d, 4);
                let up = fire.get(4, 4 - d);
                let down = fire.get(4, 4 + d);
                assert_relative_eq!(left, right, epsilon = 1e-6);
                assert_relative_eq!(left, up, epsilon = 1e-6);
                assert_relative_eq!(left, down, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_border_cells_do_not_spread() {
        let mut grid = single_seed(5, 0, 2, 1.0);
        grid.update(1.0);

        // Border seed neither decays nor spreads
        assert_eq!(grid.fire().get(0, 2), 1.0);
        assert_eq!(grid.fire().get(1, 2), 0.0);
    }

    #[test]
    fn test_below_threshold_is_inert() {
        let mut grid = single_seed(5, 2, 2, 0.1);
        grid.update(1.0);
        assert_eq!(grid.fire().get(2, 2), 0.1);
        assert_eq!(grid.fire().get(1, 2), 0.0);
    }

    #[test]
    fn test_burn_and_ash_thresholds() {
        let mut grid = single_seed(5, 2, 2, 0.4);
        grid.update(1.0);
        // 0.4 decays to 0.36, below the burn threshold
        assert_eq!(grid.burn().get(2, 2), 0.0);
        assert!(grid.hot_cells().is_empty());

        let mut grid = single_seed(5, 2, 2, 1.0);
        let hot = grid.update(1.0).to_vec();
        assert_eq!(hot, vec![GridCoord { x: 2, y: 2 }]);
        assert_relative_eq!(grid.burn().get(2, 2), 0.9 * 0.02, epsilon = 1e-6);
        assert_eq!(grid.ash().get(2, 2), 0.0);
    }

    #[test]
    fn test_ash_caps_fire() {
        let mut grid = single_seed(5, 0, 0, 0.0);
        grid.ash.set(2, 2, 0.75);
        grid.fire.set(2, 2, 1.0);
        grid.update(1.0);
        assert!(grid.fire().get(2, 2) <= 0.25 + 1e-6);

        // Fire flowing in from a neighbour is capped too
        grid.fire.set(2, 2, 0.0);
        grid.fire.set(2, 1, 1.0);
        grid.fire.set(2, 3, 1.0);
        grid.fire.set(1, 2, 1.0);
        grid.fire.set(3, 2, 1.0);
        grid.update(1.0);
        assert_relative_eq!(grid.fire().get(2, 2), 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_multiplier_freezes_grid() {
        let mut grid = single_seed(5, 2, 2, 0.9);
        grid.update(0.0);
        assert_eq!(grid.fire().get(2, 2), 0.9);
        assert_eq!(grid.fire_mass(), 0.9);
        assert_eq!(grid.burn().get(2, 2), 0.0);
    }

    #[test]
    fn test_reset_restores_seeds() {
        let mut grid = FireGrid::new(20, 20, GridParams::default(), Ignition::defaults(20, 20));
        let seeded = grid.fire().clone();
        for _ in 0..50 {
            grid.update(1.0);
        }
        assert_ne!(grid.fire(), &seeded);

        grid.reset();
        assert_eq!(grid.fire(), &seeded);
        assert_eq!(grid.burn().sum(), 0.0);
        assert_eq!(grid.ash().sum(), 0.0);
        assert!(grid.hot_cells().is_empty());
    }

    #[test]
    fn test_out_of_bounds_ignition_ignored() {
        let grid = FireGrid::new(
            4,
            4,
            GridParams::default(),
            vec![Ignition::new(9, 1, 1.0), Ignition::new(1, 1, 1.5)],
        );
        assert_eq!(grid.ignitions().len(), 1);
        assert_eq!(grid.fire().get(1, 1), 1.0);
    }

    #[test]
    fn test_default_ignitions() {
        let seeds = Ignition::defaults(80, 80);
        assert_eq!(
            seeds,
            vec![
                Ignition::new(5, 75, 0.8),
                Ignition::new(75, 75, 0.8),
                Ignition::new(40, 75, 0.6),
            ]
        );
    }

    #[test]
    fn test_small_sheet_seeds_stay_interior() {
        assert_eq!(
            Ignition::defaults(5, 5),
            vec![
                Ignition::new(2, 2, 0.8),
                Ignition::new(2, 2, 0.8),
                Ignition::new(2, 2, 0.6),
            ]
        );
        assert_eq!(
            Ignition::defaults(9, 7),
            vec![
                Ignition::new(4, 3, 0.8),
                Ignition::new(4, 3, 0.8),
                Ignition::new(4, 3, 0.6),
            ]
        );
        assert_eq!(
            Ignition::defaults(12, 12),
            vec![
                Ignition::new(5, 7, 0.8),
                Ignition::new(7, 7, 0.8),
                Ignition::new(6, 7, 0.6),
            ]
        );

        for size in 3..10 {
            for seed in Ignition::defaults(size, size) {
                assert!(is_interior(seed.x, seed.y, size, size), "{size}: {seed:?}");
                assert!(seed.y >= size / 2, "{size}: {seed:?}");
            }
        }
    }

    #[test]
    fn test_empty_grid_update() {
        let mut grid = FireGrid::new(0, 0, GridParams::default(), Vec::new());
        assert!(grid.update(1.0).is_empty());
        assert_eq!(grid.burned_fraction(), 0.0);
    }
}
