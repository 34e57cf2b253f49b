use edgepanel_core::err::{bail, ensure, Result};
use edgepanel_logging::trace;

use crate::ctx::Ctx;

use super::{util::match_interpolation, ConfigExprProcessor, ConfigStringExpr as X};

/// Interpolates configuration arguments from the command line
#[derive(Default)]
pub struct ArgConfigProcessor {}

impl ConfigExprProcessor for ArgConfigProcessor {
    fn display_name(&self) -> &str {
        "argument"
    }

    fn process(&self, ctx: &Ctx, expr: X) -> Result<X> {
        let p = match match_interpolation(&expr, &["arg"]) {
            Some(p) => p,
            None => return Ok(expr),
        };

        ensure!(p.len() > 1, "${{arg:...}} expression cannot be empty");

        let replacement = match ctx.args.get(&p[1]) {
            Some(v) => v.clone(),
            None => bail!("Configuration argument '{}' does not exist", &p[1]),
        };

        trace!("Replaced arg expression '{}' with '{}'", &p[1], replacement);

        Ok(X::Constant(replacement))
    }
}
