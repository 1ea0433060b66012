use rand::Rng;

/// The draws the sampler needs, available on any `Rng`.
///
/// Every decision is phrased in terms of `rand_prob` so a scripted generator fully determines
/// the run.
pub trait RandomSource: Rng + Sized {
    /// Uniform draw in `[0, 1)`.
    fn rand_prob(&mut self) -> f64 {
        self.gen::<f64>()
    }

    /// Uniform index in `[0, n)`, used for sites and bonds.
    fn rand_index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }

    /// Fair coin.
    fn coin(&mut self) -> bool {
        self.rand_prob() < 0.5
    }
}

impl<R: Rng> RandomSource for R {}
