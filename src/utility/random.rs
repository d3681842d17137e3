use rand::Rng;

/// A value drawn uniformly from `base ± range`
pub fn random_between(random_generator: &mut impl Rng, base: f32, range: f32) -> f32 {
    if range == 0.0 {
        return base;
    }

    let range = range.abs();
    base + random_generator.random_range(-range..=range)
}
