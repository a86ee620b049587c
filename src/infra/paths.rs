// src/infra/paths.rs — Path management for configuration
//
// All paths respect the SCOUT_HOME environment variable for isolation.
// When unset, config lives under ~/.scout/.

use std::path::PathBuf;

/// Returns the SCOUT_HOME override, if set.
fn scout_home() -> Option<PathBuf> {
    std::env::var_os("SCOUT_HOME").map(PathBuf::from)
}

/// Configuration directory: $SCOUT_HOME/ or ~/.scout/
pub fn config_dir() -> PathBuf {
    if let Some(home) = scout_home() {
        return home;
    }
    dirs_home().join(".scout")
}

/// Path to `config.toml`.
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}
