use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use edgepanel_core::err::{bail, Error, Result};
use serde_json::Value;

use crate::QueryExecutor;

/// An in-memory executor which answers queries from a fixed set of
/// responses, used for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    responses: HashMap<String, std::result::Result<Vec<Value>, String>>,
    executed: Vec<String>,
    closed: bool,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the result set returned for the query
    pub fn set_data(&self, query: impl Into<String>, data: Vec<Value>) -> Result<()> {
        self.lock()?.responses.insert(query.into(), Ok(data));
        Ok(())
    }

    /// Makes the query fail with the supplied message
    pub fn set_error(&self, query: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.lock()?
            .responses
            .insert(query.into(), Err(message.into()));
        Ok(())
    }

    /// Every query executed so far, in order
    pub fn executed(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.executed.clone())
    }

    pub fn is_closed(&self) -> Result<bool> {
        Ok(self.lock()?.closed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::msg("Failed to lock memory executor state"))
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn query_values(&self, query: &str) -> Result<Vec<Value>> {
        let mut state = self.lock()?;

        if state.closed {
            bail!("Executor has been closed");
        }

        state.executed.push(query.to_string());

        match state.responses.get(query) {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(message)) => bail!("{}", message),
            None => bail!("Unknown query: {}", query),
        }
    }

    async fn close(&self) -> Result<()> {
        self.lock()?.closed = true;
        Ok(())
    }
}
