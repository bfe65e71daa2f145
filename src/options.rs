#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning constants of the hit detector. The defaults are the values the
/// detector was tuned with on recorded drum hits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorOptions {
    /// A hit requires the RMS level to exceed the noise floor by this factor.
    pub sensitivity: f32,
    /// A hit requires the RMS slope to exceed its running mean by this many
    /// standard deviations.
    pub sigma_multiple: f32,
    /// Factor applied to the noise floor when a quieter level is measured.
    pub floor_drop: f32,
    /// Factor applied to the noise floor when a louder level is measured.
    pub floor_rise: f32,
    pub initial_noise_floor: f32,
    /// Weight of the previous value in the running mean and variance of the slope.
    pub stats_smoothing: f32,
    /// Lower bound for the cap on squared slope deviations fed to the variance.
    pub min_variance_cap: f32,
    pub initial_variance: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        DetectorOptions {
            sensitivity: 20.0,
            sigma_multiple: 3.0,
            floor_drop: 0.5,
            floor_rise: 1.001,
            initial_noise_floor: 1.0,
            stats_smoothing: 0.99,
            min_variance_cap: 0.0001,
            initial_variance: 1.0,
        }
    }
}

impl DetectorOptions {
    /// Panics if any option is outside its valid range.
    pub fn validate(&self) {
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            panic!("Sensitivity must be a positive finite number")
        }
        if !(self.sigma_multiple.is_finite() && self.sigma_multiple > 0.0) {
            panic!("Sigma multiple must be a positive finite number")
        }
        if !(self.floor_drop > 0.0 && self.floor_drop < 1.0) {
            panic!("Floor drop must be in the range (0, 1)")
        }
        if !(self.floor_rise.is_finite() && self.floor_rise >= 1.0) {
            panic!("Floor rise must be a finite number >= 1")
        }
        if !(self.initial_noise_floor.is_finite() && self.initial_noise_floor >= 0.0) {
            panic!("Initial noise floor must be a finite number >= 0")
        }
        if !(self.stats_smoothing > 0.0 && self.stats_smoothing < 1.0) {
            panic!("Stats smoothing must be in the range (0, 1)")
        }
        if !(self.min_variance_cap.is_finite() && self.min_variance_cap > 0.0) {
            panic!("Minimum variance cap must be a positive finite number")
        }
        if !(self.initial_variance.is_finite() && self.initial_variance >= 0.0) {
            panic!("Initial variance must be a finite number >= 0")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DetectorOptions;

    #[test]
    fn test_defaults_are_valid() {
        DetectorOptions::default().validate();
    }

    #[test]
    #[should_panic]
    fn test_zero_sensitivity() {
        DetectorOptions {
            sensitivity: 0.0,
            ..DetectorOptions::default()
        }
        .validate();
    }

    #[test]
    #[should_panic]
    fn test_floor_drop_of_one() {
        DetectorOptions {
            floor_drop: 1.0,
            ..DetectorOptions::default()
        }
        .validate();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json() {
        let options: DetectorOptions =
            serde_json::from_str(r#"{ "sensitivity": 12.5, "sigma_multiple": 2.0 }"#).unwrap();
        assert_eq!(options.sensitivity, 12.5);
        assert_eq!(options.sigma_multiple, 2.0);
        assert_eq!(options.floor_rise, DetectorOptions::default().floor_rise);
    }
}
