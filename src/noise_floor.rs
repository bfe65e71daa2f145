/// A one-sided adaptive estimate of the ambient level.
///
/// A quiet reading pulls the floor down quickly, but by at most `drop` per
/// update and never below the reading itself, so a single abnormally low
/// window cannot collapse the estimate. Louder readings raise the floor
/// slowly by a factor `rise` per update, following increasing background
/// noise without being inflated by the transients being detected.
#[derive(Clone, Copy, Debug)]
pub struct NoiseFloor {
    level: f32,
    drop: f32,
    rise: f32,
}

impl NoiseFloor {
    pub fn new(initial_level: f32, drop: f32, rise: f32) -> Self {
        NoiseFloor {
            level: initial_level,
            drop,
            rise,
        }
    }

    /// Updates the estimate with the latest RMS level and returns the new floor.
    pub fn update(&mut self, rms: f32) -> f32 {
        if rms < self.level {
            self.level *= self.drop;
            if self.level < rms {
                self.level = rms;
            }
        } else if rms > self.level {
            self.level *= self.rise;
        }
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
