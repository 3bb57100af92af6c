//! Analyze command: run the pipeline on a signal file and dump the store.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use aeolus_spectra::{AnalysisOutcome, analyze};
use aeolus_store::VariableStore;
use aeolus_wavelet::CwtEngine;

use crate::cli::AnalyzeArgs;
use crate::config::AeolusConfig;
use crate::convert;
use crate::io;

/// Run the analysis pipeline.
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let _cmd = info_span!("analyze").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: AeolusConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    // 2. Resolve paths; CLI flags override config file settings
    let input = args
        .input
        .or_else(|| config.signal.input.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no input path: set [signal].input in config or use --input")
        })?;
    let output = args
        .output
        .or_else(|| config.output.path.clone())
        .unwrap_or_else(|| input.with_extension("out.json"));

    // 3. Read the signal and stage it in a store
    info!(path = %input.display(), "reading signal");
    let signal = io::read_signal(&input)?;
    let name = signal
        .name
        .clone()
        .unwrap_or_else(|| config.signal.name.clone());
    let n_samples = signal.times.len();
    let mut store = VariableStore::new();
    store.insert(name.clone(), io::into_variable(signal)?);
    info!(name = %name, n_samples, "signal loaded");

    // 4. Run the pipeline
    let analysis_cfg = convert::build_analysis_config(&config)?;
    let mut engine = CwtEngine::new();
    let outcome = analyze(&mut engine, &mut store, &name, &analysis_cfg)
        .with_context(|| format!("analysis failed for signal '{name}'"))?;
    let report = match outcome {
        AnalysisOutcome::Ready(report) => report,
        AnalysisOutcome::Insufficient(reason) => bail!("nothing to analyze: {reason}"),
    };
    info!(
        n_scales = report.n_scales(),
        n_samples = report.n_samples(),
        n_dropped = report.n_dropped(),
        resampled = report.resampled(),
        "analysis complete"
    );
    for product in report.emitted() {
        info!(product = %product, "product written");
    }

    // 5. Dump every store variable
    let json = io::dump_store(&store)?;
    std::fs::write(&output, &json)
        .with_context(|| format!("failed to write output: {}", output.display()))?;
    info!(path = %output.display(), n_variables = store.len(), "output written");

    Ok(())
}
