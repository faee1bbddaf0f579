use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::{Vec2, vec2};

/// Two stable pseudo-random values in `[-1, 1]` derived from `key` and `seed`.
pub fn stable_pair<K: Hash + ?Sized>(key: &K, seed: u64) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Unit direction for a pair of indices whose positions coincide.
///
/// Antisymmetric: `fallback_direction(a, b) == -fallback_direction(b, a)`, so
/// both members of a coincident pair are pushed apart rather than together.
pub fn fallback_direction(a: usize, b: usize) -> Vec2 {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if a <= b { direction } else { -direction }
}

pub fn format_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_pair_is_deterministic_and_seeded() {
        assert_eq!(stable_pair("NINT", 7), stable_pair("NINT", 7));
        assert_ne!(stable_pair("NINT", 7), stable_pair("NINT", 8));

        let (x, y) = stable_pair("PMDA", 0);
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
    }

    #[test]
    fn fallback_direction_is_antisymmetric_unit() {
        let forward = fallback_direction(3, 11);
        let backward = fallback_direction(11, 3);
        assert!((forward + backward).length() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(1066.0), "1066");
        assert_eq!(format_number(0.70), "0.7");
        assert_eq!(format_number(0.924), "0.924");
    }
}
