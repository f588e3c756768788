use std::path::Path;

use anyhow::{anyhow, Context, Result};
use pd_porosity::prelude::*;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run configuration as written in a RON file. Every field is optional so that command-line
/// flags can fill in or override individual values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub lx: Option<f64>,
    pub ly: Option<f64>,
    pub dx: Option<f64>,
    pub phi: Option<f64>,
    pub m: Option<f64>,
    pub seed: Option<u64>,
    pub search: Option<BondSearch>,
    pub parallel: Option<bool>,
}

/// Values given on the command line; `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub lx: Option<f64>,
    pub ly: Option<f64>,
    pub dx: Option<f64>,
    pub phi: Option<f64>,
    pub m: Option<f64>,
    pub seed: Option<u64>,
    pub search: Option<BondSearch>,
    pub sequential: bool,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

impl FileConfig {
    /// Merges command-line overrides into the file values and builds a [`RunConfig`].
    pub fn resolve(self, overrides: &ParamOverrides) -> Result<RunConfig> {
        let mut missing = Vec::new();
        let mut pick = |name: &'static str, flag: Option<f64>, file: Option<f64>| {
            let value = flag.or(file);
            if value.is_none() {
                missing.push(name);
            }
            value.unwrap_or_default()
        };
        let lx = pick("lx", overrides.lx, self.lx);
        let ly = pick("ly", overrides.ly, self.ly);
        let dx = pick("dx", overrides.dx, self.dx);
        let phi = pick("phi", overrides.phi, self.phi);
        let m = pick("m", overrides.m, self.m);
        if !missing.is_empty() {
            return Err(anyhow!(
                "missing parameters: {} (pass --{} or set them in --config)",
                missing.join(", "),
                missing.join(", --")
            ));
        }

        let mut config = RunConfig::new(DomainParams::new(lx, ly, dx, phi, m))
            .with_search(overrides.search.or(self.search).unwrap_or_default())
            .with_parallel(!overrides.sequential && self.parallel.unwrap_or(true));
        if let Some(seed) = overrides.seed.or(self.seed) {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ron_file_with_partial_fields() {
        let cfg: FileConfig =
            ron::from_str("(lx: Some(2.0), ly: Some(1.0), dx: Some(0.1), search: Some(Exhaustive))")
                .expect("valid ron");
        assert_eq!(cfg.lx, Some(2.0));
        assert_eq!(cfg.search, Some(BondSearch::Exhaustive));
        assert_eq!(cfg.phi, None);
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            lx: Some(1.0),
            ly: Some(1.0),
            dx: Some(0.1),
            phi: Some(0.2),
            m: Some(3.0),
            seed: Some(1),
            ..Default::default()
        };
        let overrides = ParamOverrides {
            phi: Some(0.4),
            seed: Some(9),
            sequential: true,
            ..Default::default()
        };
        let cfg = file.resolve(&overrides).expect("complete");
        assert_eq!(cfg.params.phi, 0.4);
        assert_eq!(cfg.params.lx, 1.0);
        assert_eq!(cfg.seed, Some(9));
        assert!(!cfg.parallel);
        assert_eq!(cfg.search, BondSearch::CellGrid);
    }

    #[test]
    fn missing_parameters_are_listed() {
        let overrides = ParamOverrides {
            lx: Some(1.0),
            ..Default::default()
        };
        let err = FileConfig::default().resolve(&overrides).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("ly"));
        assert!(msg.contains("phi"));
        assert!(!msg.contains("lx,"));
    }
}
