use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the ambient layers (recognisers, logging, output).
/// Clinical patterns and thresholds are compiled in and not configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub transcript: Transcript,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub pdf_command: String,
    pub pdf_args: Vec<String>,
    pub image_command: String,
    pub image_args: Vec<String>,
    pub timeout_seconds: u64,
    pub keep_stderr: bool,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            pdf_command: "pdftotext".into(),
            pdf_args: vec!["-layout".into(), "-".into(), "-".into()],
            image_command: "tesseract".into(),
            image_args: vec!["stdin".into(), "stdout".into(), "-l".into(), "eng".into()],
            timeout_seconds: 120,
            keep_stderr: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Transcript {
    pub normalize_unicode: bool,
    pub normalize_newlines: bool,
    pub strip_control_chars: bool,
    pub trim_trailing_whitespace: bool,
    pub excerpt_chars: usize,
}
impl Default for Transcript {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_newlines: true,
            strip_control_chars: true,
            trim_trailing_whitespace: true,
            excerpt_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_input_bytes: u64,
    pub max_parallel_documents: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_parallel_documents: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub pretty: bool,
    pub out_dir: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            pretty: true,
            out_dir: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
