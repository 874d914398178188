use rand::Rng;

/// A source of randomness for the simulation.
///
/// Every random decision of a run goes through this trait, so that a seeded source
/// makes the whole run reproducible.
pub trait RandomSource {
    /// Returns an integer uniformly distributed in `low..=high`.
    fn next_int(&mut self, low: i32, high: i32) -> i32;

    /// Returns a float uniformly distributed in `[0, 1)`.
    fn next_float(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    #[inline]
    fn next_int(&mut self, low: i32, high: i32) -> i32 {
        self.gen_range(low..=high)
    }

    #[inline]
    fn next_float(&mut self) -> f64 {
        self.gen()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gen_seed;
    use crate::test_utils::rng;

    #[test]
    fn test_bounds() {
        let mut rng = rng(gen_seed());
        for _ in 0..1000 {
            let n = rng.next_int(70, 120);
            assert!((70..=120).contains(&n));
            let f = rng.next_float();
            assert!((0.0..1.0).contains(&f));
        }
        assert_eq!(rng.next_int(5, 5), 5);
    }

    #[test]
    fn test_reproducibility() {
        let seed = gen_seed();
        let mut rng1 = rng(seed);
        let mut rng2 = rng(seed);
        for _ in 0..100 {
            assert_eq!(rng1.next_int(0, 1000), rng2.next_int(0, 1000));
            assert_eq!(rng1.next_float().to_bits(), rng2.next_float().to_bits());
        }
    }
}
