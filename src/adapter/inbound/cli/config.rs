//! Handler for the `config` command group.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `config show`: print the effective configuration as TOML.
pub fn execute_show(path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(path)?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    Config::load_or_default(path)?;
    match path {
        Some(path) => println!("{}: configuration is valid", path.display()),
        None => println!("default configuration is valid"),
    }
    Ok(())
}
