//! Tilt input
//!
//! The platform samples the device sensor on its own thread; the engine polls
//! once per frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Horizontal steering provider
pub trait TiltSource {
    /// Current bias in `[-1, 1]`; negative steers left
    fn horizontal_bias(&self) -> f32;
    /// Stop listening to the sensor. Called once at teardown.
    fn release(&mut self);
}

/// Lock-free tilt value shared between a sensor thread and the engine
#[derive(Debug, Clone, Default)]
pub struct SharedTilt {
    bits: Arc<AtomicU32>,
    released: Arc<AtomicBool>,
}

impl SharedTilt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new reading, clamped to `[-1, 1]`. Non-finite readings are ignored.
    pub fn set(&self, bias: f32) {
        if !bias.is_finite() {
            return;
        }
        self.bits
            .store(bias.clamp(-1.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// True once the engine has released the sensor
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl TiltSource for SharedTilt {
    fn horizontal_bias(&self) -> f32 {
        if self.is_released() { 0.0 } else { self.get() }
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::Release);
        log::debug!("Tilt source released");
    }
}

/// No sensor: always level
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTilt;

impl TiltSource for NoTilt {
    fn horizontal_bias(&self) -> f32 {
        0.0
    }

    fn release(&mut self) {}
}
