use edgepanel_core::err::Result;
use edgepanel_logging::trace;

use crate::ctx::Ctx;

use super::{util::match_interpolation, ConfigExprProcessor, ConfigStringExpr as X};

/// Interpolates `${dir}` with the directory of the config file
#[derive(Default)]
pub struct DirConfigProcessor {}

impl ConfigExprProcessor for DirConfigProcessor {
    fn display_name(&self) -> &str {
        "current_dir"
    }

    fn process(&self, ctx: &Ctx, expr: X) -> Result<X> {
        let dir = ctx.path.as_ref().and_then(|p| p.parent());

        Ok(match (match_interpolation(&expr, &["dir"]), dir) {
            (Some(_), Some(dir)) => {
                let replacement = dir.to_string_lossy().to_string();
                trace!("Replaced dir expression with '{}'", replacement);
                X::Constant(replacement)
            }
            _ => expr,
        })
    }
}
