//! スクロール終端の判定と、終端までスクロールし続けるループ

use serde::Serialize;

use crate::error::ScraperError;
use crate::events::{EventSink, ExtractionEvent};
use crate::policy::{DelayPolicy, ScrollPolicy};
use crate::surface::{ScrollMetrics, Surface};

/// 表示領域の下端がスクロール可能範囲の終端に達していれば `true`
pub fn is_scroll_complete(metrics: &ScrollMetrics) -> bool {
    metrics.position + metrics.viewport >= metrics.limit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainOutcome {
    Complete { steps: u32 },
    BudgetExhausted { steps: u32 },
}

/// 遅延読み込みされるリストを終端までスクロールする
///
/// 1回判定しただけでは信用せず、スクロールと待機のたびに再判定する。
pub struct ScrollDrainer<'a, S: Surface> {
    surface: &'a S,
    delay: &'a dyn DelayPolicy,
    policy: ScrollPolicy,
    events: &'a dyn EventSink,
}

impl<'a, S: Surface> ScrollDrainer<'a, S> {
    pub fn new(
        surface: &'a S,
        delay: &'a dyn DelayPolicy,
        policy: ScrollPolicy,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            surface,
            delay,
            policy,
            events,
        }
    }

    pub async fn is_complete(&self, container: &S::Element) -> Result<bool, ScraperError> {
        let metrics = self.surface.scroll_metrics(container).await?;
        Ok(is_scroll_complete(&metrics))
    }

    pub async fn drain(&self, container: &S::Element) -> Result<DrainOutcome, ScraperError> {
        let started = self.surface.now();
        let mut steps = 0u32;

        loop {
            let metrics = self.surface.scroll_metrics(container).await?;
            if is_scroll_complete(&metrics) {
                return Ok(DrainOutcome::Complete { steps });
            }
            if self.surface.now().duration_since(started) >= self.policy.budget {
                return Ok(DrainOutcome::BudgetExhausted { steps });
            }

            self.events.record(ExtractionEvent::ScrollStep {
                attempt: steps,
                position: metrics.position,
                limit: metrics.limit,
            });
            let step = metrics.viewport.max(self.policy.min_step);
            self.surface.scroll_by(container, step).await?;
            self.surface.delay(self.delay.delay_for(steps)).await;
            steps += 1;
        }
    }
}
