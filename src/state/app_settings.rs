use cfb_api::client::DEFAULT_API_BASE;
use clap::Parser;
use cfb_api::store::default_store_path;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration from the environment and the command line.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub api_base: String,
    pub store_path: PathBuf,
    pub persist: bool,
    pub request_timeout: Option<Duration>,
    pub team_id: Option<String>,
    pub season: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base: DEFAULT_API_BASE.to_string(),
            store_path: default_store_path(),
            persist: true,
            request_timeout: None,
            team_id: None,
            season: None,
        }
    }
}

impl AppSettings {
    pub fn load(args: &CliArgs) -> Self {
        let mut settings = Self::from_env(|key| std::env::var(key).ok());
        settings.team_id = args.team_id.clone();
        settings.season = args.season.clone();
        if args.no_persist {
            settings.persist = false;
        }
        settings
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            log_level: non_empty("CFBTUI_LOG").and_then(|v| v.trim().parse::<LevelFilter>().ok()),
            api_base: non_empty("CFBTUI_API_BASE").unwrap_or(defaults.api_base),
            store_path: non_empty("CFBTUI_STORE")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            request_timeout: non_empty("CFBTUI_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            ..defaults
        }
    }
}

const ENV_HELP: &str = "Environment:
  CFBTUI_API_BASE       Provider root (default http://127.0.0.1:3001/api/cfb)
  CFBTUI_STORE          Path to the favorites/colors store file
  CFBTUI_LOG            Log level: error, warn, info, debug, trace
  CFBTUI_TIMEOUT_SECS   Per-request timeout (default: none)";

/// College football team page for the terminal.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, version, long_about = None, after_help = ENV_HELP)]
pub struct CliArgs {
    /// Team to open; without it the first favorite is opened
    pub team_id: Option<String>,

    /// Season year to show instead of the provider's current one
    #[arg(short, long, value_name = "YEAR")]
    pub season: Option<String>,

    /// Keep favorites and colors in memory for this run only
    #[arg(long)]
    pub no_persist: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("cfbtui").chain(list.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_team_and_season() {
        assert_eq!(
            args(&["99", "--season", "2023"]).unwrap(),
            CliArgs {
                team_id: Some("99".into()),
                season: Some("2023".into()),
                no_persist: false,
            }
        );
        assert_eq!(
            args(&["--season=2021", "--no-persist"]).unwrap(),
            CliArgs { team_id: None, season: Some("2021".into()), no_persist: true }
        );
        assert_eq!(args(&["-s", "2019"]).unwrap().season.as_deref(), Some("2019"));
    }

    #[test]
    fn test_bad_args() {
        assert!(args(&["--season"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["1", "2"]).is_err());
        assert_eq!(
            args(&["-h"]).unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn test_cli_layers_over_env() {
        let cli = CliArgs {
            team_id: Some("7".into()),
            season: Some("2022".into()),
            no_persist: true,
        };
        let settings = AppSettings::load(&cli);
        assert_eq!(settings.team_id.as_deref(), Some("7"));
        assert_eq!(settings.season.as_deref(), Some("2022"));
        assert!(!settings.persist);
    }

    #[test]
    fn test_env_overrides() {
        let settings = AppSettings::from_env(|key| match key {
            "CFBTUI_API_BASE" => Some("http://mirror/api/cfb".into()),
            "CFBTUI_LOG" => Some("debug".into()),
            "CFBTUI_TIMEOUT_SECS" => Some("15".into()),
            "CFBTUI_STORE" => Some("   ".into()),
            _ => None,
        });
        assert_eq!(settings.api_base, "http://mirror/api/cfb");
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(settings.store_path, default_store_path());
    }
}
