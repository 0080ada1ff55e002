//! Oscillator primitives for the chip tones, and note tuning.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// High-time fraction of the pulse tone.
pub const PULSE_DUTY: f64 = 0.25;

/// Chip note number of A2, tuned to 440 Hz.
pub const A440_NOTE: u8 = 33;

/// Triangle wave. `phase` in `[0.0, 1.0)`, output in `[-1.0, 1.0]`.
pub fn triangle(phase: f64) -> f64 {
    if phase < 0.25 {
        4.0 * phase
    } else if phase < 0.75 {
        2.0 - 4.0 * phase
    } else {
        4.0 * phase - 4.0
    }
}

/// Rectangular wave that is high for the first `duty` of each cycle.
pub fn rectangle(phase: f64, duty: f64) -> f64 {
    if phase < duty {
        1.0
    } else {
        -1.0
    }
}

/// Convert a chip note number (C0 = 0) to a frequency in Hz.
pub fn note_to_freq(note: u8) -> f64 {
    440.0 * 2.0f64.powf((note as f64 - A440_NOTE as f64) / 12.0)
}

/// Sample-and-hold white noise: a new random level each time the phase
/// wraps, so pitch sets how coarse the noise sounds.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
    level: f64,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = rng.gen_range(-1.0..=1.0);
        Self { rng, level }
    }

    /// Current level; call [`NoiseSource::clock`] on every phase wrap.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn clock(&mut self) {
        self.level = self.rng.gen_range(-1.0..=1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn triangle_shape() {
        assert_approx_eq!(triangle(0.0), 0.0);
        assert_approx_eq!(triangle(0.25), 1.0);
        assert_approx_eq!(triangle(0.5), 0.0);
        assert_approx_eq!(triangle(0.75), -1.0);
    }

    #[test]
    fn square_is_half_duty() {
        assert_eq!(rectangle(0.49, 0.5), 1.0);
        assert_eq!(rectangle(0.51, 0.5), -1.0);
    }

    #[test]
    fn pulse_is_quarter_duty() {
        assert_eq!(rectangle(0.2, PULSE_DUTY), 1.0);
        assert_eq!(rectangle(0.3, PULSE_DUTY), -1.0);
    }

    #[test]
    fn waveforms_bounded() {
        for i in 0..1000 {
            let phase = i as f64 / 1000.0;
            assert!((-1.0..=1.0).contains(&triangle(phase)));
            assert!((-1.0..=1.0).contains(&rectangle(phase, PULSE_DUTY)));
        }
    }

    #[test]
    fn a2_is_440() {
        assert_approx_eq!(note_to_freq(33), 440.0);
    }

    #[test]
    fn octave_doubles_freq() {
        let f1 = note_to_freq(24);
        let f2 = note_to_freq(36);
        assert_approx_eq!(f2 / f1, 2.0);
    }

    #[test]
    fn range_ends() {
        assert_approx_eq!(note_to_freq(0), 65.406, 0.01);
        assert_approx_eq!(note_to_freq(59), 1975.53, 0.1);
    }

    #[test]
    fn noise_is_seeded() {
        let run = |seed| {
            let mut n = NoiseSource::new(seed);
            (0..16)
                .map(|_| {
                    n.clock();
                    n.level()
                })
                .collect::<Vec<f64>>()
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
        assert!(run(7).iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}
