//! chromiumoxide による `Surface` 実装

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use serde_json::Value;

use super::{ScrollMetrics, Surface};
use crate::error::ScraperError;

const TEXT_CONTENT_FN: &str = "function() { return this.textContent; }";
const SCROLL_METRICS_FN: &str = r#"function() {
    return JSON.stringify({
        position: this.scrollTop,
        viewport: this.clientHeight,
        limit: this.scrollHeight
    });
}"#;

/// 既にプロフィールページを開いている `Page` を包む
#[derive(Clone)]
pub struct ChromiumSurface {
    page: Arc<Page>,
    timeout: Duration,
}

impl ChromiumSurface {
    pub fn new(page: Arc<Page>, timeout: Duration) -> Self {
        Self { page, timeout }
    }

    pub fn page(&self) -> &Arc<Page> {
        &self.page
    }

    async fn call_fn(&self, element: &Element, declaration: &str) -> Result<Option<Value>, ScraperError> {
        let returns = element
            .call_js_fn(declaration, false)
            .await
            .map_err(map_cdp_error)?;
        Ok(returns.result.value)
    }
}

/// CDPのサーバーエラー。要素操作では古いノードIDや破棄された実行コンテキストを指す。
const CDP_SERVER_ERROR: i64 = -32000;

/// CDPエラーを回復可能/致命的に振り分ける
fn map_cdp_error(err: CdpError) -> ScraperError {
    match err {
        CdpError::Timeout => ScraperError::Timeout(err.to_string()),
        CdpError::NotFound | CdpError::FrameNotFound(_) => ScraperError::ElementNotFound(err.to_string()),
        CdpError::Chrome(ref chrome) if chrome.code == CDP_SERVER_ERROR => {
            ScraperError::Detached(chrome.message.clone())
        }
        CdpError::JavascriptException(_) => ScraperError::JavaScript(err.to_string()),
        _ => ScraperError::Surface(err.to_string()),
    }
}

#[async_trait]
impl Surface for ChromiumSurface {
    type Element = Element;

    async fn query_all(
        &self,
        selector: &str,
        scope: Option<&Element>,
    ) -> Result<Vec<Element>, ScraperError> {
        let found = match scope {
            Some(element) => element.find_elements(selector).await,
            None => self.page.find_elements(selector).await,
        };
        found.map_err(map_cdp_error)
    }

    async fn element_text(&self, element: &Element) -> Result<Option<String>, ScraperError> {
        let value = self.call_fn(element, TEXT_CONTENT_FN).await?;
        Ok(value.and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn element_attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        element.attribute(name).await.map_err(map_cdp_error)
    }

    async fn click(&self, element: &Element) -> Result<(), ScraperError> {
        element.click().await.map_err(map_cdp_error)?;
        Ok(())
    }

    async fn scroll_by(&self, element: &Element, amount: f64) -> Result<(), ScraperError> {
        let declaration = format!("function() {{ this.scrollBy(0, {}); }}", amount);
        self.call_fn(element, &declaration).await?;
        Ok(())
    }

    async fn scroll_metrics(&self, element: &Element) -> Result<ScrollMetrics, ScraperError> {
        let raw = self
            .call_fn(element, SCROLL_METRICS_FN)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| ScraperError::JavaScript("scroll metrics unavailable".into()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }
}
