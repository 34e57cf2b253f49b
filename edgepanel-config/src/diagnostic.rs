use std::fmt::{self, Display};

use miette::{Diagnostic, SourceSpan};

/// A yaml syntax error pointing into the config source
#[derive(Debug, Diagnostic)]
#[diagnostic(code(config_parse_error))]
pub struct ConfigParseError {
    #[source_code]
    src: String,
    #[label("Error occurred here")]
    loc: Option<SourceSpan>,
    #[help]
    error: String,
}

impl Display for ConfigParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse configuration: {}", self.error)
    }
}

impl std::error::Error for ConfigParseError {}

impl ConfigParseError {
    pub fn new(src: String, loc: Option<serde_yaml::Location>, error: String) -> Self {
        let loc = loc.filter(|l| l.index() < src.len()).map(|l| {
            let len = src[l.index()..].find('\n').unwrap_or(1).max(1);
            SourceSpan::new(l.index().into(), len.into())
        });

        Self { src, loc, error }
    }

    pub fn message(&self) -> &str {
        &self.error
    }

    /// Prints the error with the offending source lines to stderr
    pub fn print(self) {
        let _ = miette::set_hook(Box::new(|_| {
            Box::new(miette::MietteHandlerOpts::new().context_lines(3).build())
        }));
        eprintln!("Error: {:?}", miette::Report::new(self));
    }
}
