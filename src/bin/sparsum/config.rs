use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recursive: bool,
    pub follow_symlinks: bool,
    pub hidden: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub sample_size: Option<u64>,
    pub size_threshold: Option<u64>,
}

impl Config {
    /// Load config from sparsum_options.yaml, checking CWD first then exe dir.
    pub fn load() -> Result<Self> {
        for path in config_candidates() {
            if path.exists() {
                let text = std::fs::read_to_string(&path)?;
                let config: Config = serde_yaml::from_str(&text)?;
                return Ok(config);
            }
        }
        Ok(Config::default())
    }
}

fn config_candidates() -> Vec<PathBuf> {
    let filename = "sparsum_options.yaml";
    let mut candidates = vec![PathBuf::from(filename)];
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(filename));
        }
    }
    candidates
}
