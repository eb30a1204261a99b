use std::path::PathBuf;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

const ENV_PREFIX: &str = "ARCHIVER";
const CONFIG_FILE: &str = "archiver";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_path: PathBuf,
    pub lexicon: Option<PathBuf>,
    pub chunk_size: usize,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("input_dir", "./input_html")?
        .set_default("output_dir", "./output_jsons")?
        .set_default("archive_path", "./nycu_articles_json.zip")?
        .set_default("chunk_size", 500)?)
}

impl Settings {
    /// Defaults, then `archiver.{toml,json,...}` if present, then `ARCHIVER_*` env.
    pub fn load() -> Result<Self> {
        let settings = defaults()?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;
        let mut s: Settings = settings.try_deserialize()?;
        s.chunk_size = s.chunk_size.max(1);
        Ok(s)
    }

    /// CLI flags win over everything else.
    pub fn with_overrides(
        mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        archive: Option<PathBuf>,
        lexicon: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = input {
            self.input_dir = p;
        }
        if let Some(p) = output {
            self.output_dir = p;
        }
        if let Some(p) = archive {
            self.archive_path = p;
        }
        if lexicon.is_some() {
            self.lexicon = lexicon;
        }
        self
    }
}
