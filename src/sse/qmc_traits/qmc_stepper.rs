/// Provides helpers to structs which take QMC timesteps.
pub trait QmcStepper {
    /// Take a single QMC step and return a reference to the state
    fn timestep(&mut self) -> &[bool];
    /// Get the current number of operators in the graph
    fn get_n(&self) -> usize;
    /// Inverse temperature of the simulation.
    fn get_beta(&self) -> f64;
    /// Get a reference to the state.
    fn state_ref(&self) -> &[bool];

    /// Get the average energy given the average number of ops.
    fn get_energy_for_average_n(&self, average_n: f64) -> f64 {
        -average_n / self.get_beta()
    }

    /// Take t qmc timesteps and return the average energy.
    fn timesteps(&mut self, t: usize) -> f64 {
        let (_, average_energy) = self.timesteps_measure(t, (), |_acc, _state| (), None);
        average_energy
    }

    /// Take t qmc timesteps and sample states.
    fn timesteps_sample(
        &mut self,
        t: usize,
        sampling_freq: Option<usize>,
    ) -> (Vec<Vec<bool>>, f64) {
        let acc = Vec::with_capacity(t / sampling_freq.unwrap_or(1) + 1);
        self.timesteps_measure(
            t,
            acc,
            |mut acc, state| {
                acc.push(state.to_vec());
                acc
            },
            sampling_freq,
        )
    }

    /// Take t qmc timesteps, fold across sampled states and output results.
    fn timesteps_measure<F, T>(
        &mut self,
        timesteps: usize,
        init_t: T,
        state_fold: F,
        sampling_freq: Option<usize>,
    ) -> (T, f64)
    where
        F: Fn(T, &[bool]) -> T,
    {
        let mut acc = init_t;
        let mut steps_measured = 0;
        let mut total_n = 0;
        let sampling_freq = sampling_freq.unwrap_or(1);

        for t in 0..timesteps {
            self.timestep();

            // Sample every `sampling_freq`
            if (t + 1) % sampling_freq == 0 {
                acc = state_fold(acc, self.state_ref());
                steps_measured += 1;
                total_n += self.get_n();
            }
        }
        let average_n = total_n as f64 / steps_measured as f64;
        (acc, self.get_energy_for_average_n(average_n))
    }
}
