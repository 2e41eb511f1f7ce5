//! 抽出処理のイベント通知
//!
//! 抽出コアはログを直接出さず、注入された `EventSink` にイベントを渡す。

use std::fmt::Debug;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info, warn};

/// プロフィールのセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Identity,
    Experience,
    Education,
    Certifications,
    Skills,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    SectionStarted {
        section: Section,
    },
    /// セクション要素が待機時間内に現れなかった
    SectionAbsent {
        section: Section,
    },
    SectionCompleted {
        section: Section,
        items: usize,
    },
    /// セクションは表示されていたが、回復可能なエラーで読み切れなかった
    SectionFailed {
        section: Section,
        reason: String,
    },
    DisclosureFinished {
        trigger: String,
        clicks: u32,
    },
    /// 上限時間を使い切ってもボタンが残っていた
    DisclosureBudgetExhausted {
        trigger: String,
        clicks: u32,
    },
    ScrollStep {
        attempt: u32,
        position: f64,
        limit: f64,
    },
    /// ポップアップが開かなかったなどで推薦者を取得できなかった
    EndorsementsUnavailable {
        skill: String,
        reason: String,
    },
    EndorsementsCollected {
        skill: String,
        count: usize,
    },
    /// 回復可能なエラーで値を空として扱った
    FieldUnavailable {
        selector: String,
        reason: String,
    },
}

pub trait EventSink: Send + Sync + Debug {
    fn record(&self, event: ExtractionEvent);
}

/// イベントを `tracing` に流す既定のシンク
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: ExtractionEvent) {
        match &event {
            ExtractionEvent::SectionStarted { section } => {
                info!(?section, "Extracting section");
            }
            ExtractionEvent::SectionAbsent { section } => {
                info!(?section, "Section not rendered, skipping");
            }
            ExtractionEvent::SectionCompleted { section, items } => {
                info!(?section, items, "Section extracted");
            }
            ExtractionEvent::SectionFailed { section, reason } => {
                warn!(?section, reason = %reason, "Section extraction failed, leaving it empty");
            }
            ExtractionEvent::DisclosureFinished { trigger, clicks } => {
                debug!(trigger = %trigger, clicks, "Disclosure finished");
            }
            ExtractionEvent::DisclosureBudgetExhausted { trigger, clicks } => {
                warn!(trigger = %trigger, clicks, "Disclosure budget exhausted, proceeding anyway");
            }
            ExtractionEvent::ScrollStep {
                attempt,
                position,
                limit,
            } => {
                debug!(attempt, position, limit, "Scrolling endorsers list");
            }
            ExtractionEvent::EndorsementsUnavailable { skill, reason } => {
                warn!(skill = %skill, reason = %reason, "Endorsers unavailable");
            }
            ExtractionEvent::EndorsementsCollected { skill, count } => {
                debug!(skill = %skill, count, "Endorsers collected");
            }
            ExtractionEvent::FieldUnavailable { selector, reason } => {
                debug!(selector = %selector, reason = %reason, "Field unavailable");
            }
        }
    }
}

/// イベントをメモリに溜めるシンク
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: ExtractionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
