//! プロフィール各セクションの抽出処理
//!
//! どのセクションも同じ流れで動く:
//! セクション要素を待つ → 「もっと見る」を押し切る → 項目を列挙 → 項目ごとに各フィールドを読む。

pub mod certification;
pub mod disclosure;
pub mod education;
pub mod endorsement;
pub mod experience;
pub mod identity;
pub mod parse;
pub mod reader;
pub mod scroll;
pub mod skill;

use std::sync::Arc;
use std::time::Duration;

use crate::error::ScraperError;
use crate::events::{EventSink, ExtractionEvent, Section};
use crate::policy::{DelayPolicy, DisclosurePolicy, RandomJitter, ScrollPolicy};
use crate::selectors::Selectors;
use crate::surface::Surface;

pub use disclosure::{DisclosureDriver, DisclosureOutcome};
pub use endorsement::EndorsementCrawler;
pub use reader::FieldReader;
pub use scroll::{is_scroll_complete, DrainOutcome, ScrollDrainer};

/// 抽出処理の動作設定
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// スキルごとに推薦者一覧まで取得する
    pub detailed_skills: bool,
    /// セクション要素の出現を待つ上限
    pub section_timeout: Duration,
    pub disclosure: DisclosurePolicy,
    pub scroll: ScrollPolicy,
    /// 推薦者一覧をスクロールするたびの待機
    pub endorsement_delay: Arc<dyn DelayPolicy>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            detailed_skills: false,
            section_timeout: Duration::from_secs(10),
            disclosure: DisclosurePolicy::default(),
            scroll: ScrollPolicy::default(),
            endorsement_delay: Arc::new(RandomJitter::default()),
        }
    }
}

/// セクション抽出に必要なものをまとめた参照
pub struct ExtractContext<'a, S: Surface> {
    pub surface: &'a S,
    pub selectors: &'a Selectors,
    pub options: &'a ExtractOptions,
    pub events: &'a dyn EventSink,
}

impl<'a, S: Surface> Clone for ExtractContext<'a, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, S: Surface> Copy for ExtractContext<'a, S> {}

impl<'a, S: Surface> ExtractContext<'a, S> {
    pub fn new(
        surface: &'a S,
        selectors: &'a Selectors,
        options: &'a ExtractOptions,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            surface,
            selectors,
            options,
            events,
        }
    }

    pub fn reader(&self) -> FieldReader<'a, S> {
        FieldReader::new(self.surface, self.events)
    }

    pub fn driver(&self) -> DisclosureDriver<'a, S> {
        DisclosureDriver::new(self.surface, self.options.disclosure, self.events)
    }

    pub fn drainer(&self) -> ScrollDrainer<'a, S> {
        ScrollDrainer::new(
            self.surface,
            self.options.endorsement_delay.as_ref(),
            self.options.scroll,
            self.events,
        )
    }

    /// セクション要素を待つ。時間内に現れなければ `None`。
    pub async fn find_section(
        &self,
        section: Section,
        selector: &str,
    ) -> Result<Option<S::Element>, ScraperError> {
        self.events.record(ExtractionEvent::SectionStarted { section });
        let found = match self
            .surface
            .wait_for_appearance(selector, None, self.options.section_timeout)
            .await
        {
            Ok(found) => found,
            Err(e) if e.is_recoverable() => None,
            Err(e) => return Err(e),
        };
        if found.is_none() {
            self.events.record(ExtractionEvent::SectionAbsent { section });
        }
        Ok(found)
    }

    /// 項目要素を列挙する。要素が途中で消えた場合は空として扱う。
    pub async fn items(&self, selector: &str, scope: &S::Element) -> Result<Vec<S::Element>, ScraperError> {
        match self.surface.query_all(selector, Some(scope)).await {
            Ok(items) => Ok(items),
            Err(e) if e.is_recoverable() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub fn completed(&self, section: Section, items: usize) {
        self.events
            .record(ExtractionEvent::SectionCompleted { section, items });
    }
}
