//! JSON glue: signal input files and store dumps.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aeolus_store::{Variable, VariableStore};

/// A signal file: timestamps plus one row of component values per sample.
#[derive(Debug, Deserialize, Serialize)]
pub struct SignalFile {
    /// Name the signal is stored under; the config name is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Sample timestamps in seconds.
    pub times: Vec<f64>,
    /// Row-major samples, `[n_time][n_component]`.
    pub values: Vec<Vec<f64>>,
}

/// Reads a signal JSON file.
pub fn read_signal(path: &Path) -> Result<SignalFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read signal file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse signal JSON: {}", path.display()))
}

/// Writes a signal JSON file.
pub fn write_signal(path: &Path, signal: &SignalFile) -> Result<()> {
    let text = serde_json::to_string_pretty(signal).context("failed to serialize signal")?;
    std::fs::write(path, text)
        .with_context(|| format!("failed to write signal file: {}", path.display()))?;
    Ok(())
}

/// Converts a parsed signal file into a store variable.
///
/// Single-column value rows become a scalar variable, wider rows a matrix.
pub fn into_variable(signal: SignalFile) -> Result<Variable> {
    let wide = signal.values.first().is_some_and(|row| row.len() > 1);
    let variable = if wide {
        Variable::matrix(signal.times, signal.values, None)?
    } else {
        let values = signal
            .values
            .into_iter()
            .map(|row| row.first().copied().unwrap_or(f64::NAN))
            .collect();
        Variable::scalar(signal.times, values)?
    };
    Ok(variable)
}

/// Serializes every store variable to pretty JSON, keyed by name.
pub fn dump_store(store: &VariableStore) -> Result<String> {
    let map: BTreeMap<&str, &Variable> = store.iter().collect();
    serde_json::to_string_pretty(&map).context("failed to serialize variables")
}
