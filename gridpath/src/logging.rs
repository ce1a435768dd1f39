//! File logging. The terminal is owned by the UI, so log lines go to a file.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Default filter for a `-v` count. `RUST_LOG` takes precedence when set.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install `env_logger` writing to `path`, creating parent directories as
/// needed. The file is truncated on each start.
pub fn init(verbosity: u8, path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level_for(verbosity)))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(io::Error::other)?;

    log::info!("logging to {} (default level {})", path.display(), level_for(verbosity));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(9), "trace");
    }
}
