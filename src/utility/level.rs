/// The floor reported for silence
pub const SILENCE_DB: f32 = -120.0;

const ZERO_TOLERANCE: f32 = 1e-6;

/// A sample-sized gain, readable as a linear factor or in decibels
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Level(f32);

impl Level {
    pub fn unity() -> Self {
        Self(1.0)
    }

    pub fn silence() -> Self {
        Self(0.0)
    }

    pub fn from_linear(gain: f32) -> Self {
        Self(gain)
    }

    /// Anything at or below [SILENCE_DB] is silence
    pub fn from_db(db: f32) -> Self {
        if db <= SILENCE_DB {
            Self::silence()
        } else {
            Self(10.0_f32.powf(db / 20.0))
        }
    }

    pub fn linear(&self) -> f32 {
        self.0
    }

    /// The level in dB, clamped to [SILENCE_DB]
    pub fn as_db(&self) -> f32 {
        if self.0.abs() <= ZERO_TOLERANCE {
            SILENCE_DB
        } else {
            (20.0 * self.0.abs().log10()).max(SILENCE_DB)
        }
    }

    pub fn is_silent(&self) -> bool {
        self.0.abs() <= ZERO_TOLERANCE
    }

    pub fn is_unity(&self) -> bool {
        (self.0 - 1.0).abs() <= ZERO_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decibels_and_linear_agree() {
        assert_relative_eq!(Level::from_db(0.0).linear(), 1.0);
        assert_relative_eq!(Level::from_db(-6.0206).linear(), 0.5, epsilon = 1e-4);
        assert_relative_eq!(Level::from_linear(0.1).as_db(), -20.0, epsilon = 1e-4);
    }

    #[test]
    fn silence_has_a_floor() {
        assert!(Level::from_db(-200.0).is_silent());
        assert_relative_eq!(Level::silence().as_db(), SILENCE_DB);
        assert_relative_eq!(Level::from_linear(1e-9).as_db(), SILENCE_DB);
    }

    #[test]
    fn negative_gain_reads_as_its_magnitude() {
        let inverted = Level::from_linear(-0.5);
        assert!(!inverted.is_unity());
        assert_relative_eq!(inverted.as_db(), Level::from_linear(0.5).as_db());
    }
}
