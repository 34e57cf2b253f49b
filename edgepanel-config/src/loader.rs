use std::{
    any::type_name,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use edgepanel_core::{
    config::NodeConfig,
    err::{Context, Error, Result},
};
use edgepanel_logging::{debug, info};
use serde::Deserialize;
use serde_yaml::Deserializer;

use crate::{
    ctx::Ctx,
    diagnostic::ConfigParseError,
    processor::{
        arg::ArgConfigProcessor,
        dir::DirConfigProcessor,
        env::EnvConfigProcessor,
        util::{expression_to_string, parse_expression, process_expression, process_strings},
        ConfigExprProcessor,
    },
};

/// Parses and loads the configuration
pub struct ConfigLoader {
    processors: Vec<Box<dyn ConfigExprProcessor>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Initialises the configuration loader
    pub fn new() -> Self {
        Self {
            processors: vec![
                Box::new(EnvConfigProcessor::default()),
                Box::new(ArgConfigProcessor::default()),
                Box::new(DirConfigProcessor::default()),
            ],
        }
    }

    /// Loads the node configuration from the supplied file
    pub fn load(&self, path: &Path, args: HashMap<String, String>) -> Result<NodeConfig> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to get full config path {}", path.display()))?;
        info!("Loading config from path {}", path.display());

        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from file {}", path.display()))?;

        self.parse(&data, Some(path), args)
    }

    /// Parses the node configuration from the supplied yaml
    pub fn parse(
        &self,
        data: &str,
        path: Option<PathBuf>,
        args: HashMap<String, String>,
    ) -> Result<NodeConfig> {
        let processed = self.load_data(data, path, args)?;

        debug!("Parsing into {}", type_name::<NodeConfig>());
        serde_yaml::from_value(processed).context("Failed to parse yaml into NodeConfig")
    }

    /// Parses and processes the supplied yaml
    pub(crate) fn load_data(
        &self,
        data: &str,
        path: Option<PathBuf>,
        args: HashMap<String, String>,
    ) -> Result<serde_yaml::Value> {
        let mut config = serde_yaml::Value::deserialize(Deserializer::from_str(data))
            .map_err(|e| Error::new(ConfigParseError::new(data.into(), e.location(), e.to_string())))?;

        let ctx = Ctx::new(path, args);

        process_strings(&mut config, &|string| {
            let exp = parse_expression(string)?;

            let exp = process_expression(exp, &|mut exp| {
                for processor in self.processors.iter() {
                    exp = processor.process(&ctx, exp).with_context(|| {
                        format!(
                            "Failed to process config value \"{}\" using the {} processor",
                            string,
                            processor.display_name()
                        )
                    })?;
                }

                Ok(exp)
            })?;

            Ok(expression_to_string(&exp))
        })?;

        debug!("Finished processing yaml");
        Ok(config)
    }
}
