use std::{collections::HashMap, path::PathBuf};

/// Context data when processing a configuration file
#[derive(Debug, Default)]
pub(crate) struct Ctx {
    /// Path of the current config file
    pub path: Option<PathBuf>,
    /// Configuration arguments
    pub args: HashMap<String, String>,
}

impl Ctx {
    pub(crate) fn new(path: Option<PathBuf>, args: HashMap<String, String>) -> Self {
        Self { path, args }
    }

    #[cfg(test)]
    pub fn mock() -> Self {
        Self::default()
    }
}
