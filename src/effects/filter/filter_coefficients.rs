use std::f64::consts::{PI, SQRT_2};

use crate::{GraphError, GraphResult};

/// The longest `b` or `a` list a filter accepts
pub const MAX_COEFFICIENTS: usize = 8;

/// The shape of a Butterworth filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButterworthType {
    LowPass,
    HighPass,
    BandPass,
    BandStop,
}

/// Feed-forward (`b`) and feedback (`a`) coefficients of a difference equation
///
/// `a[0]` is never read: the equation is
/// `y[n] = sum(b[j] * x[n - j]) - sum(a[j] * y[n - j], j >= 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    b: [f64; MAX_COEFFICIENTS],
    a: [f64; MAX_COEFFICIENTS],
    b_count: usize,
    a_count: usize,
}

impl FilterCoefficients {
    /// Coefficients from explicit lists
    pub fn new(b: &[f64], a: &[f64]) -> GraphResult<Self> {
        for (name, list) in [("b", b), ("a", a)] {
            if list.is_empty() || list.len() > MAX_COEFFICIENTS {
                return Err(GraphError::Value(format!(
                    "a filter takes 1 to {MAX_COEFFICIENTS} {name} coefficients, got {}",
                    list.len()
                )));
            }
        }

        let mut coefficients = Self::pass_through();
        coefficients.b[..b.len()].copy_from_slice(b);
        coefficients.a[..a.len()].copy_from_slice(a);
        coefficients.b_count = b.len();
        coefficients.a_count = a.len();
        Ok(coefficients)
    }

    /// `y[n] = x[n]`
    pub fn pass_through() -> Self {
        let mut b = [0.0; MAX_COEFFICIENTS];
        let mut a = [0.0; MAX_COEFFICIENTS];
        b[0] = 1.0;
        a[0] = 1.0;

        Self {
            b,
            a,
            b_count: 1,
            a_count: 1,
        }
    }

    fn second_order(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let mut b = [0.0; MAX_COEFFICIENTS];
        let mut a = [0.0; MAX_COEFFICIENTS];
        b[..3].copy_from_slice(&[b0, b1, b2]);
        a[..3].copy_from_slice(&[a0, a1, a2]);

        Self {
            b,
            a,
            b_count: 3,
            a_count: 3,
        }
    }

    /// Bilinear-transform Butterworth sections
    ///
    /// The low and high pass use only `frequency`; the band pass and band stop are
    /// centred on `frequency` with a width of `bandwidth` Hz.
    pub fn butterworth(
        filter_type: ButterworthType,
        frequency: f64,
        bandwidth: f64,
        sample_rate: f64,
    ) -> Self {
        match filter_type {
            ButterworthType::LowPass => {
                let c = 1.0 / (PI * frequency / sample_rate).tan();
                let b0 = 1.0 / (1.0 + SQRT_2 * c + c * c);
                Self::second_order(
                    b0,
                    2.0 * b0,
                    b0,
                    0.0,
                    2.0 * b0 * (1.0 - c * c),
                    b0 * (1.0 - SQRT_2 * c + c * c),
                )
            }
            ButterworthType::HighPass => {
                let c = (PI * frequency / sample_rate).tan();
                let b0 = 1.0 / (1.0 + SQRT_2 * c + c * c);
                Self::second_order(
                    b0,
                    -2.0 * b0,
                    b0,
                    0.0,
                    2.0 * b0 * (c * c - 1.0),
                    b0 * (1.0 - SQRT_2 * c + c * c),
                )
            }
            ButterworthType::BandPass => {
                let c = 1.0 / (PI * bandwidth / sample_rate).tan();
                let d = 2.0 * (2.0 * PI * frequency / sample_rate).cos();
                let b0 = 1.0 / (1.0 + c);
                Self::second_order(b0, 0.0, -b0, 0.0, -b0 * c * d, b0 * (c - 1.0))
            }
            ButterworthType::BandStop => {
                let c = (PI * bandwidth / sample_rate).tan();
                let d = 2.0 * (2.0 * PI * frequency / sample_rate).cos();
                let b0 = 1.0 / (1.0 + c);
                Self::second_order(b0, -b0 * d, b0, 0.0, -b0 * d, b0 * (1.0 - c))
            }
        }
    }

    /// A two-pole resonator at `frequency` with pole radius `radius`
    ///
    /// When normalized, zeros at +1 and -1 keep the peak gain near unity.
    pub fn formant(frequency: f64, radius: f64, sample_rate: f64, normalize: bool) -> Self {
        let a1 = -2.0 * radius * (2.0 * PI * frequency / sample_rate).cos();
        let a2 = radius * radius;

        if normalize {
            let b0 = 0.5 - 0.5 * a2;
            Self::second_order(b0, 0.0, -b0, 1.0, a1, a2)
        } else {
            Self::second_order(1.0, 0.0, -1.0, 1.0, a1, a2)
        }
    }

    /// A two-zero notch at `frequency` with zero radius `radius`
    pub fn notch(frequency: f64, radius: f64, sample_rate: f64) -> Self {
        let b1 = -2.0 * radius * (2.0 * PI * frequency / sample_rate).cos();
        Self::second_order(1.0, b1, radius * radius, 1.0, 0.0, 0.0)
    }

    /// A first order allpass with coefficient `coefficient`
    pub fn allpass(coefficient: f64) -> Self {
        let mut b = [0.0; MAX_COEFFICIENTS];
        let mut a = [0.0; MAX_COEFFICIENTS];
        b[..2].copy_from_slice(&[coefficient, 1.0]);
        a[..2].copy_from_slice(&[1.0, coefficient]);

        Self {
            b,
            a,
            b_count: 2,
            a_count: 2,
        }
    }

    pub fn b(&self) -> &[f64] {
        &self.b[..self.b_count]
    }

    pub fn a(&self) -> &[f64] {
        &self.a[..self.a_count]
    }
}
