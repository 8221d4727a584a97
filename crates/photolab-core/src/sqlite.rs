use std::path::Path;

use rusqlite::Connection;

use crate::error::{PhotolabError, Result};

/// Fetch a database connection string from the environment.
pub fn connection_string(env_var: &str) -> Result<String> {
    crate::config::var(env_var)
}

/// Open an existing SQLite database file.
///
/// Refuses to create a new file: calibration databases are provisioned by
/// other tools and an absent file is always a configuration mistake.
pub fn open_database(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(PhotolabError::DatabaseNotFound(path.to_path_buf()));
    }
    Ok(Connection::open(path)?)
}
