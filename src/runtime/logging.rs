use std::error::Error;
use std::fs::{self, File};

use simplelog::{CombinedLogger, ConfigBuilder, WriteLogger};

use crate::config::Settings;

/// Log to a file; the terminal belongs to the TUI.
pub fn init_logging(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let Some(path) = settings.log_file() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Decoder crates log every probe at debug; keep the file to our own records.
    let config = ConfigBuilder::new()
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .build();
    CombinedLogger::init(vec![WriteLogger::new(
        settings.logging.level.into(),
        config,
        File::create(&path)?,
    )])?;
    Ok(())
}
