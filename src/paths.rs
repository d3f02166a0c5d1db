use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the per-user data directory: `<local data>/court-board/`
///
/// Falls back to `./court-board` when the platform has no data directory.
pub fn get_data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("court-board")
    })
}

/// Returns the logs directory: `<data_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_data_dir().join("logs")
}

/// Returns the text detection cache directory: `<data_dir>/ocr_cache/`
pub fn get_cache_dir() -> PathBuf {
    get_data_dir().join("ocr_cache")
}

/// Returns the tesseract directory: `<data_dir>/tesseract/`
pub fn get_tesseract_dir() -> PathBuf {
    get_data_dir().join("tesseract")
}

/// Returns the default venue config path: `<data_dir>/venues.json`
pub fn get_venues_config_path() -> PathBuf {
    get_data_dir().join("venues.json")
}

/// Ensures all output directories exist. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    std::fs::create_dir_all(get_cache_dir())?;
    Ok(())
}
