use std::env;

use edgepanel_core::err::{bail, ensure, Result};
use edgepanel_logging::trace;

use crate::ctx::Ctx;

use super::{util::match_interpolation, ConfigExprProcessor, ConfigStringExpr as X};

/// Interpolates configuration using environment variables
///
/// `${env:NAME}` fails when the variable is unset, `${env:NAME:default}`
/// falls back to the default.
#[derive(Default)]
pub struct EnvConfigProcessor {}

impl ConfigExprProcessor for EnvConfigProcessor {
    fn display_name(&self) -> &str {
        "environment"
    }

    fn process(&self, _ctx: &Ctx, expr: X) -> Result<X> {
        let p = match match_interpolation(&expr, &["env"]) {
            Some(p) => p,
            None => return Ok(expr),
        };

        ensure!(p.len() > 1, "${{env:...}} expression cannot be empty");

        let replacement = match (env::var(&p[1]), p.get(2)) {
            (Ok(val), _) => val,
            (Err(_), Some(default)) => default.clone(),
            (Err(_), None) => bail!("Environment variable '{}' is not set", &p[1]),
        };

        trace!("Replaced env expression '{}'", &p[1]);

        Ok(X::Constant(replacement))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_env_processor_ignores_constants() {
        let ctx = Ctx::mock();
        let processor = EnvConfigProcessor::default();

        let input = X::Constant("test".to_owned());

        assert_eq!(processor.process(&ctx, input.clone()).unwrap(), input);
    }

    #[test]
    #[serial]
    fn test_env_processor_replaces_env_var() {
        env::set_var("EDGEPANEL_ENV_PROCESSOR_TEST", "from env");
        let ctx = Ctx::mock();
        let processor = EnvConfigProcessor::default();

        let input = X::Interpolation(vec![
            X::Constant("env".into()),
            X::Constant("EDGEPANEL_ENV_PROCESSOR_TEST".into()),
        ]);

        assert_eq!(
            processor.process(&ctx, input).unwrap(),
            X::Constant("from env".into())
        );
    }

    #[test]
    #[serial]
    fn test_env_processor_default_value() {
        env::remove_var("EDGEPANEL_ENV_PROCESSOR_UNSET");
        let ctx = Ctx::mock();
        let processor = EnvConfigProcessor::default();

        let input = X::Interpolation(vec![
            X::Constant("env".into()),
            X::Constant("EDGEPANEL_ENV_PROCESSOR_UNSET".into()),
            X::Constant("fallback".into()),
        ]);

        assert_eq!(
            processor.process(&ctx, input).unwrap(),
            X::Constant("fallback".into())
        );
    }

    #[test]
    #[serial]
    fn test_env_processor_errors_when_unset() {
        env::remove_var("EDGEPANEL_ENV_PROCESSOR_UNSET");
        let ctx = Ctx::mock();
        let processor = EnvConfigProcessor::default();

        let input = X::Interpolation(vec![
            X::Constant("env".into()),
            X::Constant("EDGEPANEL_ENV_PROCESSOR_UNSET".into()),
        ]);

        processor.process(&ctx, input).unwrap_err();
    }
}
