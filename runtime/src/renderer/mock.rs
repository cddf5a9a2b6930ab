//! Scripted renderer for tests: each URL maps to a canned probe result.

use super::{NavigationResult, RenderContext, RenderError, Renderer};
use crate::config::Viewport;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Everything the mock saw, shared with the test after the renderer is moved.
#[derive(Debug, Default)]
pub struct MockLog {
    pub user_agents: Vec<String>,
    pub viewports: Vec<Viewport>,
    pub navigations: Vec<String>,
    pub contexts_opened: usize,
    pub contexts_closed: usize,
    pub shutdowns: usize,
}

#[derive(Clone, Default)]
pub struct MockRenderer {
    pages: Arc<HashMap<String, serde_json::Value>>,
    pub log: Arc<Mutex<MockLog>>,
}

impl MockRenderer {
    /// `pages` maps URL -> value the probe script returns on that page.
    /// Navigating to any other URL fails.
    pub fn new(pages: HashMap<String, serde_json::Value>) -> Self {
        Self {
            pages: Arc::new(pages),
            log: Arc::default(),
        }
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        self.log.lock().unwrap().contexts_opened += 1;
        Ok(Box::new(MockContext {
            pages: Arc::clone(&self.pages),
            log: Arc::clone(&self.log),
            current: None,
        }))
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        self.log.lock().unwrap().shutdowns += 1;
        Ok(())
    }
}

struct MockContext {
    pages: Arc<HashMap<String, serde_json::Value>>,
    log: Arc<Mutex<MockLog>>,
    current: Option<String>,
}

#[async_trait]
impl RenderContext for MockContext {
    async fn set_user_agent(&mut self, user_agent: &str) -> Result<(), RenderError> {
        self.log.lock().unwrap().user_agents.push(user_agent.to_string());
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.log.lock().unwrap().viewports.push(viewport);
        Ok(())
    }

    async fn navigate(
        &mut self,
        url: &str,
        _timeout_ms: u64,
    ) -> Result<NavigationResult, RenderError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if !self.pages.contains_key(url) {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 1,
        })
    }

    async fn execute_js(&self, _script: &str) -> Result<serde_json::Value, RenderError> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .cloned()
            .ok_or_else(|| RenderError::Script("no page loaded".to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.log.lock().unwrap().contexts_closed += 1;
        Ok(())
    }
}
