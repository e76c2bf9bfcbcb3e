use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::app_dirs::AppDirs;

/// Routes `log` output to the state-dir log file; the terminal belongs to the game.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<PathBuf, Box<dyn Error>> {
    let path = AppDirs::log_path().ok_or("no home or data directory for the log file")?;
    init_at(&path)?;
    Ok(path)
}

pub fn init_at(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
