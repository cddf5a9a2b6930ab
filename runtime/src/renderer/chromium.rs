//! Headless Chromium renderer over the DevTools protocol.

use super::locate::find_chromium;
use super::{NavigationResult, RenderContext, RenderError, Renderer};
use crate::config::Viewport;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lifecycle event Chromium fires after 500ms with no network connections.
const NETWORK_IDLE: &str = "networkIdle";

/// Lifecycle event marking the start of a new document in a frame.
const DOCUMENT_INIT: &str = "init";

/// How to start the browser.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Explicit binary; discovered when `None`.
    pub chromium_path: Option<PathBuf>,
    /// Initial window size.
    pub viewport: Viewport,
}

/// One headless Chromium process.
pub struct ChromiumRenderer {
    browser: Mutex<Option<Browser>>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChromiumRenderer {
    /// Launch headless Chromium and start driving its protocol handler.
    pub async fn launch(options: LaunchOptions) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.viewport.width, options.viewport.height);

        match find_chromium(options.chromium_path.as_deref()) {
            Some(path) => {
                info!("using Chromium at {}", path.display());
                builder = builder.chrome_executable(path);
            }
            None => debug!("no Chromium found on known paths, deferring to auto-detection"),
        }

        let config = builder.build().map_err(RenderError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler: {e}");
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler_task: Mutex::new(Some(handler_task)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| RenderError::Launch("browser already shut down".to_string()))?;

        let page = browser.new_page("about:blank").await?;
        page.execute(SetLifecycleEventsEnabledParams::new(true)).await?;

        Ok(Box::new(ChromiumContext { page }))
    }

    async fn shutdown(&self) -> Result<(), RenderError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        browser.close().await?;
        if let Err(e) = browser.wait().await {
            warn!("waiting for Chromium to exit: {e}");
        }

        if let Some(task) = self.handler_task.lock().await.take() {
            if let Err(e) = task.await {
                warn!("browser handler task ended abnormally: {e}");
            }
        }

        debug!("browser closed");
        Ok(())
    }
}

/// A Chromium tab.
pub struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn set_user_agent(&mut self, user_agent: &str) -> Result<(), RenderError> {
        self.page
            .execute(SetUserAgentOverrideParams::new(user_agent))
            .await?;
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> Result<(), RenderError> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                i64::from(viewport.width),
                i64::from(viewport.height),
                1.0,
                false,
            ))
            .await?;
        Ok(())
    }

    async fn navigate(
        &mut self,
        url: &str,
        timeout_ms: u64,
    ) -> Result<NavigationResult, RenderError> {
        let start = Instant::now();
        // Subscribe before navigating so no lifecycle event is missed.
        let mut lifecycle = self.page.event_listener::<EventLifecycleEvent>().await?;
        let page = &self.page;

        let wait_for_idle = async {
            page.goto(url).await.map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            let main_frame = page.mainframe().await?;

            let mut document_started = false;
            while let Some(event) = lifecycle.next().await {
                if main_frame.as_ref().is_some_and(|id| *id != event.frame_id) {
                    continue;
                }
                match event.name.as_str() {
                    DOCUMENT_INIT => document_started = true,
                    NETWORK_IDLE if document_started => return Ok(()),
                    _ => {}
                }
            }

            Err::<(), RenderError>(RenderError::Navigation {
                url: url.to_string(),
                reason: "page closed before network idle".to_string(),
            })
        };

        tokio::time::timeout(Duration::from_millis(timeout_ms), wait_for_idle)
            .await
            .map_err(|_| RenderError::Timeout {
                url: url.to_string(),
                timeout_ms,
            })??;

        let final_url = self.page.url().await?.unwrap_or_else(|| url.to_string());
        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, RenderError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        result
            .into_value::<serde_json::Value>()
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.page.close().await?;
        Ok(())
    }
}
