use edgepanel_core::query::{Query, RenderedQuery};

use crate::{render, ScopedVars, TemplateEngine};

/// A panel query paired with the templating context it is rendered in
pub struct QueryModel<'a> {
    query: &'a Query,
    engine: Option<&'a dyn TemplateEngine>,
    scoped: ScopedVars,
}

impl<'a> QueryModel<'a> {
    pub fn new(
        query: &'a Query,
        engine: Option<&'a dyn TemplateEngine>,
        scoped: ScopedVars,
    ) -> Self {
        Self {
            query,
            engine,
            scoped,
        }
    }

    pub fn query(&self) -> &Query {
        self.query
    }

    /// Produces the executable query. When `interpolate` is false, or there
    /// is no engine, the query text is passed through untouched.
    pub fn render(&self, interpolate: bool) -> RenderedQuery {
        let engine = if interpolate { self.engine } else { None };

        RenderedQuery::new(
            &self.query.ref_id,
            render(&self.query.query_text, engine, &self.scoped),
        )
    }
}

#[cfg(test)]
mod tests {
    use edgepanel_core::query::{TimeRange, VariableBinding};

    use crate::VariableTemplateEngine;

    use super::*;

    #[test]
    fn test_query_model_render_interpolates() {
        let query = Query::new("A", "select $region");
        let engine = VariableTemplateEngine::new(vec![VariableBinding::new("region", "east")]);
        let model = QueryModel::new(&query, Some(&engine), ScopedVars::new());

        let rendered = model.render(true);

        assert_eq!(rendered.ref_id(), "A");
        assert_eq!(rendered.query_text(), "select east");
    }

    #[test]
    fn test_query_model_render_without_interpolation() {
        let query = Query::new("A", "select $region");
        let engine = VariableTemplateEngine::new(vec![VariableBinding::new("region", "east")]);
        let model = QueryModel::new(&query, Some(&engine), ScopedVars::new());

        assert_eq!(model.render(false).query_text(), "select $region");
    }

    #[test]
    fn test_query_model_default_query_time_range() {
        let query = Query::with_default_text("A");
        let engine = VariableTemplateEngine::default();
        let scoped = TimeRange::new(1000, 5000).bindings().into_iter().collect();
        let model = QueryModel::new(&query, Some(&engine), scoped);

        let rendered = model.render(true);

        assert!(rendered
            .query_text()
            .contains(".time >= to_datetime(1000 / 1000) and .time <= to_datetime(5000 / 1000)"));
    }
}
