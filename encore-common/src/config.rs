//! Configuration loading and database path resolution

use std::path::PathBuf;

/// Environment variable naming the database file
pub const DB_ENV_VAR: &str = "ENCORE_DB";

/// Default database file name, created in the working directory when
/// nothing else is configured
pub const DEFAULT_DB_FILE: &str = "encore.db";

/// Database path resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Compiled default (./encore.db)
pub fn resolve_database_path(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: Compiled default
    PathBuf::from(DEFAULT_DB_FILE)
}
