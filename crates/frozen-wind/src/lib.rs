//! Tick-driven wind field and the cloud offset it pushes along.
//!
//! The wind is sampled from the Xoroshiro noise generator on three isolated
//! axes, scaled up during thunderstorms, and integrated every tick into an
//! unbounded cloud offset.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use frozen_noise::{NoiseBundle, NoiseField, NoiseVariant};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Time scale of the horizontal wind components.
pub const TIME_SCALE: f64 = 0.0005;
/// Time scale of the vertical wind component.
pub const TIME_SCALE_Y: f64 = 0.00035;
/// Extra wind per unit of thunder level.
pub const THUNDER_BOOST: f64 = 0.03;
/// Per-axis factor applied to the wind when moving the clouds.
pub const CLOUD_SPEED: DVec3 = DVec3::new(0.025, 0.005, 0.025);

// ---------------------------------------------------------------------------
// Sampler seam
// ---------------------------------------------------------------------------

/// Source of the raw wind vector.
pub trait WindSampler {
    /// Axis-isolated sample at the scaled times.
    fn sample_wind(&self, x: f64, y: f64, z: f64) -> DVec3;
}

impl WindSampler for NoiseBundle {
    fn sample_wind(&self, x: f64, y: f64, z: f64) -> DVec3 {
        self.sample_vec3(NoiseVariant::Xoroshiro, x, y, z)
    }
}

impl WindSampler for NoiseField {
    fn sample_wind(&self, x: f64, y: f64, z: f64) -> DVec3 {
        self.sample_vec3(NoiseVariant::Xoroshiro, x, y, z)
    }
}

impl<S: WindSampler + ?Sized> WindSampler for Arc<S> {
    fn sample_wind(&self, x: f64, y: f64, z: f64) -> DVec3 {
        (**self).sample_wind(x, y, z)
    }
}

// ---------------------------------------------------------------------------
// Published state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SharedVec3 {
    x: AtomicU64,
    y: AtomicU64,
    z: AtomicU64,
}

impl SharedVec3 {
    fn store(&self, value: DVec3) {
        self.x.store(value.x.to_bits(), Ordering::Relaxed);
        self.y.store(value.y.to_bits(), Ordering::Relaxed);
        self.z.store(value.z.to_bits(), Ordering::Relaxed);
    }

    fn load(&self) -> DVec3 {
        DVec3::new(
            f64::from_bits(self.x.load(Ordering::Relaxed)),
            f64::from_bits(self.y.load(Ordering::Relaxed)),
            f64::from_bits(self.z.load(Ordering::Relaxed)),
        )
    }
}

#[derive(Debug, Default)]
struct SharedWind {
    time: AtomicI64,
    wind: SharedVec3,
    cloud_offset: SharedVec3,
}

/// Cloneable read handle onto a [`WindSimulation`].
///
/// Each field is loaded atomically on its own; a read that races an advance may
/// mix values from two neighbouring ticks.
#[derive(Debug, Clone)]
pub struct WindReader {
    shared: Arc<SharedWind>,
}

impl WindReader {
    /// Tick counter as last published.
    pub fn time(&self) -> i64 {
        self.shared.time.load(Ordering::Relaxed)
    }

    /// Wind vector as last published.
    pub fn wind(&self) -> DVec3 {
        self.shared.wind.load()
    }

    /// Accumulated cloud offset as last published.
    pub fn cloud_offset(&self) -> DVec3 {
        self.shared.cloud_offset.load()
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Saved wind state, restored when a world is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindSnapshot {
    pub time: i64,
    pub wind: DVec3,
    pub cloud_offset: DVec3,
}

/// Owner of the wind state. Only the world-update thread advances it.
#[derive(Debug, Default)]
pub struct WindSimulation {
    time: i64,
    wind: DVec3,
    cloud_offset: DVec3,
    shared: Arc<SharedWind>,
}

impl WindSimulation {
    /// Calm wind at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick.
    ///
    /// `thunder_level` is clamped into `[0, 1]`.
    pub fn advance(&mut self, sampler: &impl WindSampler, thunder_level: f64) {
        let thunder = if thunder_level.is_nan() {
            0.0
        } else {
            thunder_level.clamp(0.0, 1.0)
        };

        self.time += 1;
        let calc_time = self.time as f64 * TIME_SCALE;
        let calc_time_y = self.time as f64 * TIME_SCALE_Y;
        let raw = sampler.sample_wind(calc_time, calc_time_y, calc_time);

        self.wind = raw + raw * (thunder * THUNDER_BOOST);
        self.cloud_offset += self.wind * CLOUD_SPEED;
        trace!(time = self.time, wind = ?self.wind, "wind advanced");
        self.publish();
    }

    /// Ticks advanced since creation or the last restore.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Wind vector computed by the last advance.
    pub fn wind(&self) -> DVec3 {
        self.wind
    }

    /// Sum of every wind step scaled by the cloud speed.
    pub fn cloud_offset(&self) -> DVec3 {
        self.cloud_offset
    }

    /// A read handle for other threads.
    pub fn reader(&self) -> WindReader {
        WindReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Zero the tick counter, the wind and the cloud offset.
    pub fn reset(&mut self) {
        debug!(time = self.time, "wind reset");
        self.restore(WindSnapshot::default());
    }

    /// Capture the current state for saving.
    pub fn snapshot(&self) -> WindSnapshot {
        WindSnapshot {
            time: self.time,
            wind: self.wind,
            cloud_offset: self.cloud_offset,
        }
    }

    /// Replace the state and publish it to every reader.
    pub fn restore(&mut self, snapshot: WindSnapshot) {
        self.time = snapshot.time;
        self.wind = snapshot.wind;
        self.cloud_offset = snapshot.cloud_offset;
        self.publish();
    }

    fn publish(&self) {
        self.shared.wind.store(self.wind);
        self.shared.cloud_offset.store(self.cloud_offset);
        self.shared.time.store(self.time, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(DVec3);

    impl WindSampler for Constant {
        fn sample_wind(&self, _x: f64, _y: f64, _z: f64) -> DVec3 {
            self.0
        }
    }

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).abs().max_element() < 1e-12
    }

    #[test]
    fn test_constant_wind_integrates_linearly() {
        let sampler = Constant(DVec3::new(1.0, -1.0, 0.5));
        let mut sim = WindSimulation::new();
        for _ in 0..40 {
            sim.advance(&sampler, 0.0);
        }
        assert_eq!(sim.time(), 40);
        let expected = DVec3::new(40.0 * 0.025, -40.0 * 0.005, 40.0 * 0.5 * 0.025);
        assert!(approx(sim.cloud_offset(), expected), "got {}", sim.cloud_offset());
    }

    #[test]
    fn test_thunder_boost_scales_wind() {
        let sampler = Constant(DVec3::splat(2.0));
        let mut sim = WindSimulation::new();
        sim.advance(&sampler, 1.0);
        assert!(approx(sim.wind(), DVec3::splat(2.06)));
        sim.advance(&sampler, 5.0);
        assert!(approx(sim.wind(), DVec3::splat(2.06)), "thunder must clamp to 1");
        sim.advance(&sampler, -3.0);
        assert!(approx(sim.wind(), DVec3::splat(2.0)), "thunder must clamp to 0");
    }

    #[test]
    fn test_wind_is_a_function_of_time() {
        let field = NoiseField::new(99);
        let mut sim = WindSimulation::new();
        for _ in 0..10 {
            sim.advance(&field, 0.0);
        }
        let expected = field.sample_vec3(
            NoiseVariant::Xoroshiro,
            10.0 * TIME_SCALE,
            10.0 * TIME_SCALE_Y,
            10.0 * TIME_SCALE,
        );
        assert_eq!(sim.wind(), expected);
    }

    #[test]
    fn test_cloud_offset_is_sum_of_wind() {
        let field = NoiseField::new(4);
        let mut sim = WindSimulation::new();
        let mut sum = DVec3::ZERO;
        for _ in 0..100 {
            sim.advance(&field, 0.5);
            sum += sim.wind() * CLOUD_SPEED;
        }
        assert!(approx(sim.cloud_offset(), sum));
    }

    #[test]
    fn test_reseed_keeps_cloud_offset() {
        let field = NoiseField::new(1);
        let mut sim = WindSimulation::new();
        for _ in 0..20 {
            sim.advance(&field, 0.0);
        }
        let before = sim.cloud_offset();
        field.set_seed(2);
        assert_eq!(sim.cloud_offset(), before);
        sim.advance(&field, 0.0);
        let step = field.sample_vec3(
            NoiseVariant::Xoroshiro,
            21.0 * TIME_SCALE,
            21.0 * TIME_SCALE_Y,
            21.0 * TIME_SCALE,
        ) * CLOUD_SPEED;
        assert!(approx(sim.cloud_offset(), before + step));
    }

    #[test]
    fn test_reader_sees_published_state() {
        let field = NoiseField::new(8);
        let mut sim = WindSimulation::new();
        let reader = sim.reader();
        sim.advance(&field, 0.2);
        sim.advance(&field, 0.2);
        assert_eq!(reader.time(), 2);
        assert_eq!(reader.wind(), sim.wind());
        assert_eq!(reader.cloud_offset(), sim.cloud_offset());

        sim.reset();
        assert_eq!(reader.time(), 0);
        assert_eq!(reader.cloud_offset(), DVec3::ZERO);
    }

    #[test]
    fn test_snapshot_restore_continues_series() {
        let field = NoiseField::new(12);
        let mut original = WindSimulation::new();
        for _ in 0..30 {
            original.advance(&field, 0.0);
        }
        let text = ron::to_string(&original.snapshot()).unwrap();
        let snapshot: WindSnapshot = ron::from_str(&text).unwrap();

        let mut restored = WindSimulation::new();
        restored.restore(snapshot);
        for _ in 0..5 {
            original.advance(&field, 0.3);
            restored.advance(&field, 0.3);
        }
        assert_eq!(original.snapshot(), restored.snapshot());
    }
}
