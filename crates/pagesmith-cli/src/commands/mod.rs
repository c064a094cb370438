//! Command implementations.

pub mod batch;
pub mod config;
pub mod design;

pub use self::batch::execute_batch;
pub use self::config::execute_config;
pub use self::design::execute_design;

use crate::config::Config;
use crate::error::Result;
use crate::provider::Provider;
use pagesmith_designer::PageDesigner;
use std::path::{Path, PathBuf};

/// Pick the provider from the configuration and wrap it in the pipeline.
pub fn build_designer(config: &Config) -> Result<PageDesigner<Provider>> {
    let provider = Provider::from_config(config)?;
    Ok(PageDesigner::new(provider, config.designer.clone())?)
}

/// `<dir>/<stem>.design.json` for an input file.
pub fn default_output_path(input: &Path, dir: Option<&Path>) -> PathBuf {
    numbered_output_path(input, dir, 1)
}

/// `<dir>/<stem>-<n>.design.json`, or the default path when `n` is 1.
pub fn numbered_output_path(input: &Path, dir: Option<&Path>, n: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    if n > 1 {
        dir.join(format!("{}-{}.design.json", stem, n))
    } else {
        dir.join(format!("{}.design.json", stem))
    }
}
