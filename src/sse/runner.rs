use crate::chain::ChainParams;
use crate::error::SseError;
use crate::sse::estimator::{BinStats, Estimator};
use crate::sse::qmc_tfim::TfimChain;
use crate::sse::qmc_traits::QmcStepper;
use log::{debug, info};
use rand::Rng;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File the bin energies are appended to.
pub const ENERGY_FILE: &str = "energy.dat";
/// File the bin correlation profiles are appended to.
pub const CORR_FILE: &str = "corr_s0_sj.dat";

/// Model and schedule for a whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct RunParams {
    /// The chain to simulate.
    pub chain: ChainParams,
    /// Steps taken (with cutoff adjustment) before measuring.
    pub n_thermalize: usize,
    /// Measured steps per bin.
    pub n_stat: usize,
    /// Number of bins.
    pub n_bins: usize,
}

impl RunParams {
    /// Check the model parameters and that each bin takes at least one measurement.
    pub fn validate(&self) -> Result<(), SseError> {
        self.chain.validate()?;
        if self.n_stat == 0 && self.n_bins > 0 {
            return Err(SseError::InvalidParameter(
                "nStat must be positive when bins are requested".to_string(),
            ));
        }
        Ok(())
    }
}

/// Receives each finished bin.
pub trait BinSink {
    /// Persist one bin.
    fn write_bin(&mut self, stats: &BinStats) -> Result<(), SseError>;
}

impl BinSink for Vec<BinStats> {
    fn write_bin(&mut self, stats: &BinStats) -> Result<(), SseError> {
        self.push(stats.clone());
        Ok(())
    }
}

/// Appends bins to `energy.dat` and `corr_s0_sj.dat` in a directory.
///
/// Each bin adds one line to the energy file and one line per site to the correlation file.
/// Nothing identifies the run, so concurrent runs must use distinct directories.
#[derive(Debug, Clone)]
pub struct DataFiles {
    energy_path: PathBuf,
    corr_path: PathBuf,
}

impl DataFiles {
    /// Use `dir`, creating it if missing.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, SseError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            energy_path: dir.join(ENERGY_FILE),
            corr_path: dir.join(CORR_FILE),
        })
    }

    /// Path of the energy file.
    pub fn energy_path(&self) -> &Path {
        &self.energy_path
    }

    /// Path of the correlation file.
    pub fn corr_path(&self) -> &Path {
        &self.corr_path
    }

    fn open_append(path: &Path) -> Result<BufWriter<File>, SseError> {
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BufWriter::new(f))
    }
}

impl BinSink for DataFiles {
    fn write_bin(&mut self, stats: &BinStats) -> Result<(), SseError> {
        let mut f = Self::open_append(&self.energy_path)?;
        writeln!(f, "{}", stats.energy)?;
        f.flush()?;

        let mut f = Self::open_append(&self.corr_path)?;
        for c in stats.corr_s0_sj.iter() {
            writeln!(f, "{}", c)?;
        }
        f.flush()?;
        Ok(())
    }
}

/// Thermalize `chain`, growing the cutoff each step, without measuring.
pub fn thermalize<R: Rng>(chain: &mut TfimChain<R>, n_thermalize: usize) {
    for _ in 0..n_thermalize {
        chain.timestep();
        chain.adjust_cutoff();
    }
    info!(
        "thermalized {} steps: n={} cutoff={}",
        n_thermalize,
        chain.get_n(),
        chain.get_cutoff()
    );
}

/// Take `n_stat` measured steps into a freshly reset estimator and return the bin means.
pub fn measure_bin<R: Rng>(
    chain: &mut TfimChain<R>,
    estimator: &mut Estimator,
    n_stat: usize,
) -> Result<BinStats, SseError> {
    estimator.reset();
    let beta = chain.get_beta();
    for _ in 0..n_stat {
        chain.timestep();
        estimator.measure(chain.get_n(), beta, chain.state_ref());
    }
    estimator.statisticize()
}

/// Run the full schedule on `chain`: thermalization, then `n_bins` bins each handed to `sink`.
pub fn run<R: Rng, S: BinSink + ?Sized>(
    chain: &mut TfimChain<R>,
    params: &RunParams,
    sink: &mut S,
) -> Result<Vec<BinStats>, SseError> {
    params.validate()?;
    thermalize(chain, params.n_thermalize);

    let mut estimator = Estimator::new(chain.get_nvars());
    let mut bins = Vec::with_capacity(params.n_bins);
    for k in 0..params.n_bins {
        let stats = measure_bin(chain, &mut estimator, params.n_stat)?;
        info!("bin {}: energy={} n={}", k, stats.energy, chain.get_n());
        debug!("bin {} correlations: {:?}", k, stats.corr_s0_sj);
        sink.write_bin(&stats)?;
        bins.push(stats);
    }
    Ok(bins)
}
