use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use gridpath::config::{self, Config, Overrides};
use gridpath::{logging, Visualizer};
use gridpath_client::HttpPathClient;
use gridpath_core::{App, AppConfig};
use gridpath_crossterm::CrosstermDriver;

#[derive(Parser, Debug)]
#[command(name = "gridpath")]
#[command(version)]
#[command(about = "Pick two cells on a grid and watch the path between them")]
pub struct Args {
    /// Config file (default: $GRIDPATH_CONFIG, then the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path service URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Cells per side of the grid
    #[arg(long, value_parser = clap::value_parser!(i32).range(2..=64))]
    pub grid_size: Option<i32>,

    /// Delay between revealed path cells, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Path request timeout, in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            grid_size: self.grid_size,
            endpoint: self.endpoint.clone(),
            animation_delay_ms: self.delay_ms,
            request_timeout_secs: self.timeout_secs,
            log_file: self.log_file.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let file = config::load_config_with_precedence(args.config.as_deref())?;
    let cfg = Config::resolve(file, args.overrides())?;
    logging::init(args.verbose, &cfg.log_file)?;
    log::info!("resolved config: {cfg:?}");

    let client = HttpPathClient::new(cfg.endpoint.clone(), cfg.request_timeout)?;
    let model = Visualizer::new(cfg.settings(), Arc::new(client));
    let (width, height) = model.screen_size();

    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    if let Err(e) = app.run() {
        log::error!("gridpath stopped: {e}");
        return Err(e);
    }
    log::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_no_overrides() {
        let args = Args::try_parse_from(["gridpath"]).unwrap();
        assert_eq!(args.overrides(), Overrides::default());
        assert_eq!(args.verbose, 0);
        assert!(args.config.is_none());
    }

    #[test]
    fn flags_become_overrides() {
        let args = Args::try_parse_from([
            "gridpath",
            "--endpoint",
            "http://127.0.0.1:9000/find-path",
            "--grid-size",
            "32",
            "--delay-ms",
            "0",
            "--timeout-secs",
            "3",
            "-vv",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.endpoint.as_deref(), Some("http://127.0.0.1:9000/find-path"));
        assert_eq!(overrides.grid_size, Some(32));
        assert_eq!(overrides.animation_delay_ms, Some(0));
        assert_eq!(overrides.request_timeout_secs, Some(3));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn out_of_range_grid_size_is_rejected() {
        assert!(Args::try_parse_from(["gridpath", "--grid-size", "1"]).is_err());
        assert!(Args::try_parse_from(["gridpath", "--grid-size", "65"]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["gridpath", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn version_flag_exits_early() {
        let err = Args::try_parse_from(["gridpath", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
