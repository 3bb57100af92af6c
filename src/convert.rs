//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use aeolus_spectra::{
    AnalysisConfig, HermitianSpec, Normalization, RotationSpec, SmoothingKernel, TimeWindow,
};
use aeolus_wavelet::{Mother, MultiCwtConfig, PadMode};

/// Parses a zero-padding policy name into the corresponding enum variant.
pub fn parse_pad(s: &str) -> Result<PadMode> {
    match s.to_lowercase().as_str() {
        "none" => Ok(PadMode::None),
        "next_pow2" => Ok(PadMode::NextPow2),
        "pow2" => Ok(PadMode::Pow2),
        other => bail!("unknown pad mode: {other:?}"),
    }
}

/// Parses a smoothing kernel name into the corresponding enum variant.
pub fn parse_kernel(s: &str) -> Result<SmoothingKernel> {
    match s.to_lowercase().as_str() {
        "box" => Ok(SmoothingKernel::Box),
        "gaussian" => Ok(SmoothingKernel::Gaussian),
        other => bail!("unknown smoothing kernel: {other:?}"),
    }
}

/// Converts a TOML window section into a `TimeWindow`.
///
/// Exactly one of the `start`/`stop` or `center`/`half_width` pairs must be
/// set.
pub fn parse_window(w: &WindowToml) -> Result<TimeWindow> {
    match (w.start, w.stop, w.center, w.half_width) {
        (Some(start), Some(stop), None, None) => Ok(TimeWindow::Range { start, stop }),
        (None, None, Some(center), Some(half_width)) => {
            Ok(TimeWindow::Around { center, half_width })
        }
        _ => bail!("window must set exactly one of start/stop or center/half_width"),
    }
}

/// Builds a [`MultiCwtConfig`] from the TOML transform configuration.
pub fn build_transform_config(t: &TransformToml) -> Result<MultiCwtConfig> {
    let mother = Mother::from_name(&t.mother, t.param)?;
    let pad = parse_pad(&t.pad)?;
    if t.period_range.is_some() && t.frequency_range.is_some() {
        bail!("set period_range or frequency_range, not both");
    }
    let mut cfg = MultiCwtConfig::new()
        .with_mother(mother)
        .with_pad(pad)
        .with_confidence(t.confidence);
    if let Some(dj) = t.dj {
        cfg = cfg.with_dj(dj);
    }
    if let Some([min, max]) = t.period_range {
        cfg = cfg.with_period_range(min, max);
    }
    if let Some([min, max]) = t.frequency_range {
        cfg = cfg.with_frequency_range(min, max);
    }
    if let Some(lag1) = t.lag1 {
        cfg = cfg.with_lag1(lag1);
    }
    Ok(cfg)
}

/// Builds an [`AnalysisConfig`] from the full TOML configuration.
pub fn build_analysis_config(config: &AeolusConfig) -> Result<AnalysisConfig> {
    let kernel = parse_kernel(&config.smoothing.kernel)?;
    let mut cfg = AnalysisConfig::new()
        .with_transform(build_transform_config(&config.transform)?)
        .with_averaging_periods(config.smoothing.avg_periods)
        .with_kernel(kernel)
        .with_polarization(config.products.polarization)
        .with_coherence(config.products.coherence)
        .with_magnitude(config.products.magnitude);

    if let Some(component) = config.signal.component {
        cfg = cfg.with_component(component);
    }
    if let Some(ref window) = config.signal.window {
        cfg = cfg.with_window(parse_window(window)?);
    }
    if let Some(max_samples) = config.signal.max_samples {
        cfg = cfg.with_max_samples(max_samples);
    }

    let mut normalization = Normalization::new()
        .with_fraction_of_mean_square(config.normalization.fraction_of_mean_square);
    if let Some(exponent) = config.normalization.frequency_exponent {
        normalization = normalization.with_frequency_exponent(exponent);
    }
    cfg = cfg.with_normalization(normalization);

    if config.products.rotation {
        let mut rotation = RotationSpec::new();
        if let Some(reference) = config.products.reference {
            rotation = rotation.with_reference(reference);
        }
        cfg = cfg.with_rotation(rotation);
    } else if config.products.reference.is_some() {
        bail!("products.reference is set but products.rotation is disabled");
    }

    if config.products.hermitian {
        let mut hermitian = HermitianSpec::new();
        if let Some(index) = config.products.hermitian_scale_index {
            hermitian = hermitian.with_scale_index(index);
        }
        cfg = cfg.with_hermitian(hermitian);
    } else if config.products.hermitian_scale_index.is_some() {
        bail!("products.hermitian_scale_index is set but products.hermitian is disabled");
    }

    if let Some(reduce) = config.output.reduce {
        cfg = cfg.with_reduce_factor(reduce);
    }
    if let Some(ref prefix) = config.output.prefix {
        cfg = cfg.with_prefix(prefix.clone());
    }
    Ok(cfg)
}
