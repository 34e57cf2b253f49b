use std::path::PathBuf;

use clap::Parser;
use edgepanel_core::err::{Context, Result};

/// Serves EdgeDB query results to dashboard panels
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The path of the main configuration file
    #[clap(short, long, value_parser)]
    pub config: Option<PathBuf>,

    /// Values available to the config as ${arg:KEY}
    #[clap(short, long = "arg", value_parser = parse_key_val)]
    pub args: Vec<(String, String)>,
}

/// Parses a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, val) = s
        .split_once('=')
        .with_context(|| format!("Invalid KEY=VALUE: no `=` found in `{}`", s))?;

    Ok((key.to_string(), val.to_string()))
}
