use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sandbox-fs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Line-delimited JSON file access confined to a project root")]
pub struct Args {
    /// Project root every command is confined to
    #[arg(long, value_name = "DIR", required_unless_present = "config")]
    pub project: Option<PathBuf>,

    /// Optional TOML (or .json) config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub root: Root,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Root { pub root_dir: PathBuf }

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_json")]
    pub json: bool,
}
fn default_filter() -> String { "info".to_string() }
fn default_json() -> bool { true }

impl Default for Log {
    fn default() -> Self {
        Self { filter: default_filter(), json: default_json() }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    /// Builds the effective config: the file (if any) with `--project` on top.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => Self::load(path)?,
            None => {
                let Some(project) = &args.project else {
                    anyhow::bail!("either --project or --config must name a project root");
                };
                Config { root: Root { root_dir: project.clone() }, log: Log::default() }
            }
        };
        if let Some(project) = &args.project {
            cfg.root.root_dir = project.clone();
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.root.root_dir.is_dir() {
            anyhow::bail!("root_dir does not exist or is not a directory: {}", self.root.root_dir.display());
        }
        Ok(())
    }
}
