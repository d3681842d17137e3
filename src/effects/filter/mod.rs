mod filter;
mod filter_coefficients;
mod moog;

pub use filter::{Filter, FilterDesign};
pub use filter_coefficients::{ButterworthType, FilterCoefficients, MAX_COEFFICIENTS};
pub use moog::Moog;
