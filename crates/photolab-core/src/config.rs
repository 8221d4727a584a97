use std::env;

use crate::error::{PhotolabError, Result};

/// Look up a configuration variable, reading a `.env` file first if one is
/// present in the working directory (then the process environment).
pub fn var(name: &str) -> Result<String> {
    dotenvy::dotenv().ok();
    env::var(name)
        .map_err(|_| PhotolabError::Config(format!("missing environment variable {name}")))
}

/// Like [`var`] but falling back to a default.
pub fn var_or(name: &str, default: &str) -> String {
    var(name).unwrap_or_else(|_| default.to_string())
}
