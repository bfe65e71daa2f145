//! High-pass filtering applied ahead of envelope estimation.

/// A second order [IIR](https://en.wikipedia.org/wiki/Infinite_impulse_response)
/// section in direct form II. Coefficients are divided by `a0` on construction,
/// so processing a sample needs no division.
#[derive(Clone, Copy, Debug)]
pub struct FilterSection {
    b0: f32,
    b1: f32,
    b2: f32,
    /// Feedback coefficients, stored negated so that the recurrence adds them.
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl FilterSection {
    /// Creates a section from the transfer function
    /// `(b0 + b1 z^-1 + b2 z^-2) / (a0 + a1 z^-1 + a2 z^-2)`
    /// with zeroed delay registers.
    pub fn new(b: [f64; 3], a: [f64; 3]) -> Self {
        if a[0] == 0.0 {
            panic!("The a0 coefficient of a filter section must not be zero")
        }
        let a0_recip = 1.0 / a[0];
        FilterSection {
            b0: (b[0] * a0_recip) as f32,
            b1: (b[1] * a0_recip) as f32,
            b2: (b[2] * a0_recip) as f32,
            a1: (-a[1] * a0_recip) as f32,
            a2: (-a[2] * a0_recip) as f32,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Advances the section by one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let z0 = input + self.a1 * self.z1 + self.a2 * self.z2;
        let output = self.b0 * z0 + self.b1 * self.z1 + self.b2 * self.z2;
        self.z2 = self.z1;
        self.z1 = z0;
        output
    }

    /// The delay registers `(z1, z2)`.
    pub fn delay_registers(&self) -> (f32, f32) {
        (self.z1, self.z2)
    }
}

// Butterworth sections designed for a corner around 1 kHz,
// as (b0, b1, b2) and (a0, a1, a2).
const SECTION_A_B: [f64; 3] = [0.994934, -1.98987, 0.994934];
const SECTION_A_A: [f64; 3] = [1.13119, -1.97973, 0.868807];
const SECTION_B_B: [f64; 3] = [0.994934, -1.98987, 0.994934];
const SECTION_B_A: [f64; 3] = [1.05434, -1.97973, 0.945661];

/// Two cascaded second order high-pass sections, giving a 4th order roll-off
/// that keeps low frequency booms from looking like transients.
#[derive(Clone, Copy, Debug)]
pub struct HighPassCascade {
    first: FilterSection,
    second: FilterSection,
}

impl HighPassCascade {
    pub fn new() -> Self {
        HighPassCascade {
            first: FilterSection::new(SECTION_A_B, SECTION_A_A),
            second: FilterSection::new(SECTION_B_B, SECTION_B_A),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let intermediate = self.first.process(input);
        self.second.process(intermediate)
    }

    /// Filters `samples` and returns the sum of the squared filter output.
    /// The filtered samples themselves are discarded.
    pub fn sum_of_squares(&mut self, samples: &[f32]) -> f32 {
        let mut sum_sq = 0.0;
        for sample in samples.iter() {
            let filtered = self.process(*sample);
            sum_sq += filtered * filtered;
        }
        sum_sq
    }

    pub fn sections(&self) -> (&FilterSection, &FilterSection) {
        (&self.first, &self.second)
    }
}

impl Default for HighPassCascade {
    fn default() -> Self {
        HighPassCascade::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straightforward double precision evaluation of the same recurrence.
    fn reference_cascade(input: &[f32]) -> Vec<f64> {
        let sections = [(SECTION_A_B, SECTION_A_A), (SECTION_B_B, SECTION_B_A)];
        let mut signal: Vec<f64> = input.iter().map(|x| *x as f64).collect();
        for (b, a) in sections.iter() {
            let (mut z1, mut z2) = (0.0_f64, 0.0_f64);
            for x in signal.iter_mut() {
                let z0 = *x - a[1] / a[0] * z1 - a[2] / a[0] * z2;
                *x = (b[0] * z0 + b[1] * z1 + b[2] * z2) / a[0];
                z2 = z1;
                z1 = z0;
            }
        }
        signal
    }

    #[test]
    fn test_normalized_coefficients() {
        let section = FilterSection::new(SECTION_A_B, SECTION_A_A);
        assert!((section.b0 - 0.994934 / 1.13119).abs() <= 1e-6);
        assert!((section.b1 + 1.98987 / 1.13119).abs() <= 1e-6);
        assert!((section.a1 - 1.97973 / 1.13119).abs() <= 1e-6);
        assert!((section.a2 + 0.868807 / 1.13119).abs() <= 1e-6);

        let section = FilterSection::new(SECTION_B_B, SECTION_B_A);
        assert!((section.a1 - 1.97973 / 1.05434).abs() <= 1e-6);
        assert!((section.a2 + 0.945661 / 1.05434).abs() <= 1e-6);
    }

    #[test]
    fn test_matches_reference() {
        let input: Vec<f32> = (0..1024)
            .map(|i| {
                let t = i as f32;
                0.5 * (0.3 * t).sin() + 0.25 * (2.9 * t).sin() + if i % 97 == 0 { 0.8 } else { 0. }
            })
            .collect();
        let expected = reference_cascade(&input);
        let mut cascade = HighPassCascade::new();
        for (x, reference) in input.iter().zip(expected.iter()) {
            let actual = cascade.process(*x) as f64;
            assert!((actual - reference).abs() <= 1e-5 * reference.abs().max(1.0));
        }
    }

    #[test]
    fn test_blocks_dc() {
        let mut cascade = HighPassCascade::new();
        let mut last = 1.0;
        for _ in 0..20000 {
            last = cascade.process(1.0);
        }
        assert!(last.abs() < 1e-3);
    }

    #[test]
    fn test_passes_nyquist() {
        let mut cascade = HighPassCascade::new();
        let mut last = 0.0;
        for i in 0..2000 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            last = cascade.process(x);
        }
        assert!((last.abs() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_sum_of_squares_of_silence() {
        let mut cascade = HighPassCascade::new();
        assert_eq!(cascade.sum_of_squares(&[0.0; 128]), 0.0);
        assert_eq!(cascade.first.delay_registers(), (0.0, 0.0));
    }
}
