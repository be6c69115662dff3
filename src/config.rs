use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read config ({path}): {error}")]
    Read {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Failed to parse TOML config: {0}")]
    ParseToml(toml::de::Error),
    #[error("Failed to parse YAML config: {0}")]
    ParseYaml(serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where uploaded images end up.
#[derive(Deserialize, Clone, Debug)]
pub enum ImageStorage {
    R2 {
        account_id: String,
        bucket: String,
        prefix: Option<String>,
        /// Public base URL the bucket is served from.
        public_url: url::Url,
    },
    Asset {
        dir: PathBuf,
        /// URL prefix under which `dir` is served, e.g. `/images`.
        public_prefix: String,
    },
}

#[derive(Deserialize, Clone, Debug)]
pub struct Site {
    pub base_url: String,
    pub name: String,
    pub author: String,
    #[serde(default = "default_byline")]
    pub byline: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_byline() -> String {
    "jed".to_owned()
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub site: Site,
    pub database: String,
    pub storage: ImageStorage,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Index page carrying the post placeholders. Defaults to
    /// `{output}/index.html`.
    #[serde(default)]
    pub index_template: Option<PathBuf>,
}

impl Config {
    pub fn parse(src: &str, toml: bool) -> Result<Self, Error> {
        let config: Self = if toml {
            toml::de::from_str(src).map_err(Error::ParseToml)?
        } else {
            serde_yaml::from_str(src).map_err(Error::ParseYaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self, Error> {
        let src = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| Error::Read {
                error,
                path: path.to_owned(),
            })?;
        let toml = path.extension().is_some_and(|ext| ext == "toml");
        Self::parse(&src, toml)
    }

    pub fn index_template(&self) -> PathBuf {
        self.index_template
            .clone()
            .unwrap_or_else(|| self.output.join("index.html"))
    }

    pub fn validate(&self) -> Result<(), Error> {
        url::Url::parse(&self.site.base_url)
            .map_err(|e| Error::Invalid(format!("site.base_url: {e}")))?;
        if self.site.base_url.ends_with('/') {
            return Err(Error::Invalid(
                "site.base_url must not end with a slash".into(),
            ));
        }
        if self.database.is_empty() {
            return Err(Error::Invalid("database must not be empty".into()));
        }
        Ok(())
    }
}
