use std::sync::Arc;

use edgepanel_core::{
    err::Result,
    proto::{CheckHealthResult, DataResponse, QueryDataRequest, QueryDataResponse},
    query::{Query, RenderedQuery},
};
use edgepanel_logging::{debug, info, warn, MaxLogLength};
use edgepanel_template::{QueryModel, ScopedVars, TemplateEngine, VariableTemplateEngine};
use edgepanel_util_health::Health;
use serde_json::Value;

use crate::{clean_query, rows_to_frame, QueryExecutor};

/// Query used to verify the connection
pub const HEALTH_CHECK_QUERY: &str = "select 2+2;";

/// Name the data source reports its health under
pub const HEALTH_SUBSYSTEM: &str = "edgedb";

/// A configured EdgeDB data source, shared between request handlers
pub struct EdgeDbDataSource {
    executor: Arc<dyn QueryExecutor>,
    health: Health,
}

impl EdgeDbDataSource {
    pub fn new(executor: Arc<dyn QueryExecutor>, health: Health) -> Self {
        Self { executor, health }
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Renders each query of the request with its variables and time range.
    ///
    /// Results are paired with the ref id of their query, a query which
    /// could not be decoded yields an error.
    pub fn render(&self, req: &QueryDataRequest) -> Vec<(String, Result<RenderedQuery>)> {
        let engine = VariableTemplateEngine::new(req.variables.iter().cloned());
        let scoped = req
            .range
            .as_ref()
            .map(|r| r.bindings().into_iter().collect::<ScopedVars>())
            .unwrap_or_default();

        req.queries
            .iter()
            .map(|record| {
                let rendered = record
                    .decode()
                    .map(|query| render_query(&query, &engine, scoped.clone()));

                (record.ref_id().to_string(), rendered)
            })
            .collect()
    }

    /// Executes each query of the request, failures are reported per query
    pub async fn query_data(&self, req: &QueryDataRequest) -> QueryDataResponse {
        let mut response = QueryDataResponse::new();

        for (ref_id, rendered) in self.render(req) {
            let res = match rendered {
                Ok(query) => self.run_query(&query).await,
                Err(err) => Err(err),
            };

            let res = res.unwrap_or_else(|err| {
                warn!("Query '{}' failed: {:?}", ref_id, err);
                DataResponse::error(format!("{:#}", err))
            });

            response.responses.insert(ref_id, res);
        }

        response
    }

    async fn run_query(&self, query: &RenderedQuery) -> Result<DataResponse> {
        let text = clean_query(query.query_text());
        info!(
            "Running query '{}': {}",
            query.ref_id(),
            MaxLogLength::new(Some(1024), text.as_str())
        );

        let rows = self.executor.query(&text).await?;
        debug!("Query '{}' returned {} rows", query.ref_id(), rows.len());

        Ok(DataResponse::frames(
            rows_to_frame(&rows)?.into_iter().collect(),
        ))
    }

    /// Checks the connection by running a trivial query
    pub async fn check_health(&self) -> CheckHealthResult {
        let result = match self.executor.query_single(HEALTH_CHECK_QUERY).await {
            Ok(value) if value == Value::from(4) => CheckHealthResult::ok(format!(
                "Data source is working: `{}` == `{}`",
                HEALTH_CHECK_QUERY, value
            )),
            Ok(value) => CheckHealthResult::error(format!(
                "Data source is in error: `{}` == `{}`",
                HEALTH_CHECK_QUERY, value
            )),
            Err(err) => CheckHealthResult::error(format!("Data source is in error: {:#}", err)),
        };

        let recorded = self.health.update_with_message(
            HEALTH_SUBSYSTEM,
            result.is_ok(),
            Some(result.message.clone()),
        );

        if let Err(err) = recorded {
            warn!("Failed to record health status: {:?}", err);
        }

        result
    }

    /// Releases the executor, the data source must not be used afterwards
    pub async fn dispose(&self) -> Result<()> {
        info!("Disposing data source");
        self.executor.close().await
    }
}

fn render_query(query: &Query, engine: &dyn TemplateEngine, scoped: ScopedVars) -> RenderedQuery {
    QueryModel::new(query, Some(engine), scoped).render(true)
}

#[cfg(test)]
mod tests {
    use edgepanel_core::{
        proto::{HealthCheckStatus, QueryRecord},
        query::{TimeRange, VariableBinding},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::MemoryExecutor;

    fn data_source() -> (MemoryExecutor, EdgeDbDataSource) {
        let executor = MemoryExecutor::new();
        let ds = EdgeDbDataSource::new(Arc::new(executor.clone()), Health::new());
        (executor, ds)
    }

    #[test]
    fn test_render_with_variables_and_range() {
        let (_, ds) = data_source();

        let rendered = ds.render(&QueryDataRequest {
            queries: vec![Query::new(
                "A",
                "select Reading filter .region in {$region} and .at >= $__from",
            )
            .into()],
            variables: vec![VariableBinding::multi("region", vec!["east", "west"])],
            range: Some(TimeRange::new(1000, 2000)),
        });

        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, "A");
        assert_eq!(
            rendered[0].1.as_ref().unwrap(),
            &RenderedQuery::new(
                "A",
                "select Reading filter .region in {'east','west'} and .at >= 1000"
            )
        );
    }

    #[test]
    fn test_render_reports_malformed_query() {
        let (_, ds) = data_source();

        let rendered = ds.render(&QueryDataRequest {
            queries: vec![
                QueryRecord::Malformed(json!({"refId": "B", "queryText": ["x"]})),
                Query::new("A", "select 1").into(),
            ],
            ..Default::default()
        });

        assert_eq!(rendered[0].0, "B");
        assert!(rendered[0].1.is_err());
        assert_eq!(rendered[1].0, "A");
        assert_eq!(
            rendered[1].1.as_ref().unwrap(),
            &RenderedQuery::new("A", "select 1")
        );
    }

    #[tokio::test]
    async fn test_query_data_reports_malformed_query_only() {
        let (executor, ds) = data_source();
        executor.set_data("select 1", vec![json!({"n": 1})]).unwrap();

        let res = ds
            .query_data(&QueryDataRequest {
                queries: vec![
                    Query::new("A", "select 1").into(),
                    QueryRecord::Malformed(json!({"refId": "B", "queryText": 5})),
                ],
                ..Default::default()
            })
            .await;

        assert!(!res.get("A").unwrap().is_error());
        assert_eq!(
            res.get("B").unwrap().error.as_deref(),
            Some("Failed to parse query: invalid type: integer `5`, expected a string")
        );
        assert_eq!(executor.executed().unwrap(), vec!["select 1".to_string()]);
    }

    #[tokio::test]
    async fn test_check_health_ok() {
        let (executor, ds) = data_source();
        executor.set_data(HEALTH_CHECK_QUERY, vec![json!(4)]).unwrap();

        let res = ds.check_health().await;

        assert_eq!(res.status, HealthCheckStatus::Ok);
        assert_eq!(res.message, "Data source is working: `select 2+2;` == `4`");
        assert!(ds.health().is_healthy().unwrap());
    }

    #[tokio::test]
    async fn test_check_health_wrong_value() {
        let (executor, ds) = data_source();
        executor.set_data(HEALTH_CHECK_QUERY, vec![json!(5)]).unwrap();

        let res = ds.check_health().await;

        assert_eq!(res.status, HealthCheckStatus::Error);
        assert_eq!(res.message, "Data source is in error: `select 2+2;` == `5`");
        assert!(!ds.health().is_healthy().unwrap());
    }

    #[tokio::test]
    async fn test_check_health_query_error() {
        let (executor, ds) = data_source();
        executor
            .set_error(HEALTH_CHECK_QUERY, "connection refused")
            .unwrap();

        let res = ds.check_health().await;

        assert_eq!(res.status, HealthCheckStatus::Error);
        assert_eq!(res.message, "Data source is in error: connection refused");
    }

    #[tokio::test]
    async fn test_dispose_closes_executor() {
        let (executor, ds) = data_source();

        ds.dispose().await.unwrap();

        assert!(executor.is_closed().unwrap());
    }
}
