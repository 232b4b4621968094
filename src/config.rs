use crate::models::LeagueScoringConfig;
use crate::utils::fantasy_scoring::DEFAULT_FIELD_SIZE;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Runtime configuration for the CLI and web server
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the web server binds to
    pub bind_addr: String,

    /// Directory for JSON inputs and CSV exports
    pub data_dir: PathBuf,

    /// Scoring rules used when a request does not carry its own league config
    pub league: LeagueScoringConfig,

    /// Field size for the default logarithmic position curve
    pub field_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            data_dir: PathBuf::from("data"),
            league: LeagueScoringConfig::default(),
            field_size: DEFAULT_FIELD_SIZE,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value {:?}", key, raw))?;
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from environment variables (call `dotenv` first)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key/value source, starting from defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("GOLF_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("GOLF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        parse_var(&lookup, "GOLF_WIN_POINTS", &mut config.league.win_points)?;
        parse_var(&lookup, "GOLF_TOP5_BONUS", &mut config.league.top5_bonus)?;
        parse_var(&lookup, "GOLF_TOP10_BONUS", &mut config.league.top10_bonus)?;
        parse_var(&lookup, "GOLF_MADE_CUT_BONUS", &mut config.league.made_cut_bonus)?;
        parse_var(&lookup, "GOLF_ODDS_MULTIPLIER", &mut config.league.odds_multiplier)?;
        parse_var(&lookup, "GOLF_FIELD_SIZE", &mut config.field_size)?;

        config
            .league
            .validate()
            .context("Invalid league scoring settings in environment")?;
        if config.field_size == 0 {
            anyhow::bail!("GOLF_FIELD_SIZE must be at least 1");
        }

        Ok(config)
    }

    /// Relative input and export paths live under the data directory
    pub fn data_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}
