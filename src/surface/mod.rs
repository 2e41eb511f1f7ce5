//! 描画済みページへのアクセス抽象
//!
//! 抽出コアはブラウザエンジンに直接依存せず、この `Surface` トレイト越しに
//! クエリ・クリック・スクロール・待機を行う。現在の実装は chromiumoxide のみ。

pub mod chromium;

#[cfg(test)]
pub(crate) mod fake;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

pub use chromium::ChromiumSurface;

/// 待機系プリミティブのポーリング間隔
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// スクロール可能な要素の現在位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// 現在のスクロール位置 (scrollTop)
    pub position: f64,
    /// 表示領域の高さ (clientHeight)
    pub viewport: f64,
    /// スクロール可能な全体の高さ (scrollHeight)
    pub limit: f64,
}

impl ScrollMetrics {
    pub fn new(position: f64, viewport: f64, limit: f64) -> Self {
        Self {
            position,
            viewport,
            limit,
        }
    }
}

/// 描画済みドキュメントに対する操作セット
///
/// `scope` を渡した場合はその要素の子孫だけを対象にする。
/// 「見つからない」は `Ok(None)` / `Ok(false)` で表し、`Err` はページ側の致命的な失敗に限る。
#[async_trait]
pub trait Surface: Send + Sync {
    type Element: Send + Sync;

    /// セレクタに一致する要素をドキュメント順で全て返す
    async fn query_all(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
    ) -> Result<Vec<Self::Element>, ScraperError>;

    /// 要素の textContent
    async fn element_text(&self, element: &Self::Element) -> Result<Option<String>, ScraperError>;

    /// 要素の属性値
    async fn element_attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, ScraperError>;

    async fn click(&self, element: &Self::Element) -> Result<(), ScraperError>;

    /// 要素を縦方向に `amount` ピクセルスクロール
    async fn scroll_by(&self, element: &Self::Element, amount: f64) -> Result<(), ScraperError>;

    async fn scroll_metrics(&self, element: &Self::Element) -> Result<ScrollMetrics, ScraperError>;

    async fn delay(&self, duration: Duration);

    /// 待機の締め切り計算に使う時計。テスト用の実装は仮想時計に差し替える。
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// 待機系プリミティブの既定タイムアウト
    fn default_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    async fn query(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
    ) -> Result<Option<Self::Element>, ScraperError> {
        Ok(self.query_all(selector, scope).await?.into_iter().next())
    }

    async fn text_content(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
    ) -> Result<Option<String>, ScraperError> {
        match self.query(selector, scope).await? {
            Some(element) => self.element_text(&element).await,
            None => Ok(None),
        }
    }

    async fn attribute(
        &self,
        selector: &str,
        name: &str,
        scope: Option<&Self::Element>,
    ) -> Result<Option<String>, ScraperError> {
        match self.query(selector, scope).await? {
            Some(element) => self.element_attribute(&element, name).await,
            None => Ok(None),
        }
    }

    /// セレクタで要素を探してクリック。見つかった場合に `true`。
    async fn click_selector(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
    ) -> Result<bool, ScraperError> {
        match self.query(selector, scope).await? {
            Some(element) => {
                self.click(&element).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 要素が現れるまで待機。タイムアウトした場合は `Ok(None)`。
    async fn wait_for_appearance(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
        timeout: Duration,
    ) -> Result<Option<Self::Element>, ScraperError> {
        let deadline = self.now() + timeout;
        loop {
            if let Some(element) = self.query(selector, scope).await? {
                return Ok(Some(element));
            }
            if self.now() >= deadline {
                return Ok(None);
            }
            self.delay(WAIT_POLL_INTERVAL).await;
        }
    }

    /// 要素が消えるまで待機。消えた場合に `true`、タイムアウトした場合は `false`。
    async fn wait_for_disappearance(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
        timeout: Duration,
    ) -> Result<bool, ScraperError> {
        let deadline = self.now() + timeout;
        loop {
            if self.query(selector, scope).await?.is_none() {
                return Ok(true);
            }
            if self.now() >= deadline {
                return Ok(false);
            }
            self.delay(WAIT_POLL_INTERVAL).await;
        }
    }
}
