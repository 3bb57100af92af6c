//! Synth command: write synthetic signal files for trying the pipeline.

use std::f64::consts::TAU;

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{info, info_span};

use crate::cli::SynthArgs;
use crate::io::{self, SignalFile};

/// Amplitude of the Gaussian noise floor under every scenario.
const NOISE_LEVEL: f64 = 0.1;

/// Run the signal synthesizer.
pub fn run(args: SynthArgs) -> Result<()> {
    let _cmd = info_span!("synth").entered();

    // 1. Validate the sampling grid
    if args.samples < 8 {
        bail!("need at least 8 samples, got {}", args.samples);
    }
    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("sampling interval must be positive, got {}", args.dt);
    }

    // 2. Create seeded RNG
    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    // 3. Synthesize the scenario
    let scenario = args.scenario.to_lowercase();
    let times: Vec<f64> = (0..args.samples).map(|i| i as f64 * args.dt).collect();
    let values = match scenario.as_str() {
        "bands" => two_bands(&times, &mut rng),
        "circular" => circular_pair(&times, &mut rng),
        "aligned" => field_aligned(&times, &mut rng),
        other => bail!("unknown scenario: {other:?} (expected bands, circular, or aligned)"),
    };

    // 4. Write the signal file
    let signal = SignalFile {
        name: Some(format!("synth_{scenario}")),
        times,
        values,
    };
    io::write_signal(&args.output, &signal)?;
    info!(
        path = %args.output.display(),
        scenario = %scenario,
        n_samples = args.samples,
        n_components = signal.values[0].len(),
        "synthetic signal written"
    );

    Ok(())
}

/// One component: a short-period sine on the outer quarters and a
/// double-period sine on the middle half, over a weak noise floor.
fn two_bands(times: &[f64], rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = times.len();
    let span = times[n - 1] - times[0];
    let short = span / 128.0;
    let long = 2.0 * short;
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let period = if (n / 4..3 * n / 4).contains(&i) {
                long
            } else {
                short
            };
            vec![(TAU * t / period).sin() + NOISE_LEVEL * noise(rng)]
        })
        .collect()
}

/// Two components in quadrature: a circularly polarized wave.
fn circular_pair(times: &[f64], rng: &mut StdRng) -> Vec<Vec<f64>> {
    let span = times[times.len() - 1] - times[0];
    let period = span / 128.0;
    times
        .iter()
        .map(|&t| {
            let phase = TAU * t / period;
            vec![
                phase.cos() + NOISE_LEVEL * noise(rng),
                phase.sin() + NOISE_LEVEL * noise(rng),
            ]
        })
        .collect()
}

/// Three components: a steady background field along the third axis with a
/// circularly polarized wave in the perpendicular plane.
fn field_aligned(times: &[f64], rng: &mut StdRng) -> Vec<Vec<f64>> {
    let span = times[times.len() - 1] - times[0];
    let period = span / 256.0;
    times
        .iter()
        .map(|&t| {
            let phase = TAU * t / period;
            vec![
                phase.cos() + NOISE_LEVEL * noise(rng),
                phase.sin() + NOISE_LEVEL * noise(rng),
                5.0 + NOISE_LEVEL * noise(rng),
            ]
        })
        .collect()
}

fn noise(rng: &mut StdRng) -> f64 {
    StandardNormal.sample(rng)
}
