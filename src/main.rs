use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use tfim_sse::chain::ChainParams;
use tfim_sse::sse::{new_tfim, run, DataFiles, RunParams};
use tfim_sse::SseError;

/// SSE for the 1D ferromagnetic TFIM, H = -J * sumZZ - h * sumX.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Chain length L.
    l: usize,
    /// Inverse temperature.
    beta: f64,
    /// Ising coupling J.
    j: f64,
    /// Transverse field h.
    h: f64,
    /// Thermalization steps.
    n_thm: usize,
    /// Measured steps per bin.
    n_stat: usize,
    /// Number of bins.
    n_bins: usize,
    /// Seed for the random number generator, drawn from system entropy if absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory the data files are appended to.
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,
}

fn main() -> Result<(), SseError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let t0 = Instant::now();
    let args = Args::parse();

    let params = RunParams {
        chain: ChainParams {
            length: args.l,
            beta: args.beta,
            coupling: args.j,
            field: args.h,
        },
        n_thermalize: args.n_thm,
        n_stat: args.n_stat,
        n_bins: args.n_bins,
    };
    params.validate()?;

    info!("SSE for 1D FM-TFIM (periodic bonds), H = -J * sumZZ - h * sumX");
    info!(
        "L = {}, beta = {}, J = {}, h = {}",
        args.l, args.beta, args.j, args.h
    );

    let mut chain = new_tfim(params.chain, args.seed)?;
    let mut files = DataFiles::new(&args.output_dir)?;
    let bins = run(&mut chain, &params, &mut files)?;
    if let Some(last) = bins.last() {
        info!(
            "last bin energy {} (with constant shift {})",
            last.energy,
            last.energy + chain.get_energy_offset()
        );
    }
    info!(
        "wrote {} bins to {} and {}",
        bins.len(),
        files.energy_path().display(),
        files.corr_path().display()
    );

    let secs = t0.elapsed().as_secs();
    info!(
        "Runtime: {}h-{}m-{}s",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    );
    Ok(())
}
