//! スキルの推薦者一覧ポップアップの取得
//!
//! 詳細リンクをクリック → ポップアップを待つ → 一覧を終端までスクロール →
//! 推薦者を列挙 → ポップアップを閉じる。

use crate::error::ScraperError;
use crate::events::ExtractionEvent;
use crate::profile::User;
use crate::surface::Surface;

use super::parse::username_from_url;
use super::{DrainOutcome, ExtractContext};

pub struct EndorsementCrawler<'a, S: Surface> {
    ctx: ExtractContext<'a, S>,
}

impl<'a, S: Surface> EndorsementCrawler<'a, S> {
    pub fn new(ctx: ExtractContext<'a, S>) -> Self {
        Self { ctx }
    }

    /// 推薦者を出現順に返す
    ///
    /// リンクが無い・ポップアップが開かないなど、このスキルだけの失敗は空で返す。
    /// ページ自体が壊れている場合のみ `Err`。
    pub async fn crawl(
        &self,
        skill: &str,
        detail_link: Option<&S::Element>,
    ) -> Result<Vec<User>, ScraperError> {
        let Some(link) = detail_link else {
            return Ok(Vec::new());
        };

        // 前のスキルのポップアップが残っていると、その一覧を読んでしまう
        if self.popup_open().await? {
            self.unavailable(skill, "a previous endorsers popup is still open");
            return Ok(Vec::new());
        }

        let result = self.open_and_collect(link).await;
        let users = match result {
            Ok(Some(users)) => users,
            Ok(None) => {
                self.unavailable(skill, "endorsers popup did not appear");
                return Ok(Vec::new());
            }
            Err(e) if e.is_recoverable() => {
                self.unavailable(skill, &e.to_string());
                self.close_popup().await;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        self.close_popup().await;
        self.ctx.events.record(ExtractionEvent::EndorsementsCollected {
            skill: skill.to_string(),
            count: users.len(),
        });
        Ok(users)
    }

    /// ポップアップが開かなかった場合は `Ok(None)`
    async fn open_and_collect(&self, link: &S::Element) -> Result<Option<Vec<User>>, ScraperError> {
        let surface = self.ctx.surface;
        let selectors = &self.ctx.selectors.endorsement;

        surface.click(link).await?;

        let timeout = surface.default_timeout();
        let Some(popup) = surface
            .wait_for_appearance(&selectors.popup, None, timeout)
            .await?
        else {
            return Ok(None);
        };

        let Some(container) = surface
            .wait_for_appearance(&selectors.list_container, Some(&popup), timeout)
            .await?
        else {
            return Err(ScraperError::ElementNotFound(format!(
                "endorsers list: {}",
                selectors.list_container
            )));
        };

        if let DrainOutcome::BudgetExhausted { steps } = self.ctx.drainer().drain(&container).await? {
            self.ctx.events.record(ExtractionEvent::FieldUnavailable {
                selector: selectors.list_container.clone(),
                reason: format!("scroll budget exhausted after {} steps, list may be partial", steps),
            });
        }

        let reader = self.ctx.reader();
        let entities = surface.query_all(&selectors.entity, Some(&container)).await?;
        let mut users = Vec::with_capacity(entities.len());
        for entity in &entities {
            let (name, url) = futures::try_join!(
                reader.read(&selectors.entity_name, Some(entity)),
                reader.read_attribute(&selectors.entity_link, "href", Some(entity)),
            )?;
            users.push(User {
                name,
                username: username_from_url(&url),
            });
        }
        Ok(Some(users))
    }

    async fn popup_open(&self) -> Result<bool, ScraperError> {
        match self.ctx.surface.query(&self.ctx.selectors.endorsement.popup, None).await {
            Ok(found) => Ok(found.is_some()),
            Err(e) if e.is_recoverable() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// 閉じるボタンが無い・押せない場合も続行する
    ///
    /// 閉じた後はポップアップが消えるまで待つ。消えなければイベントを残す。
    async fn close_popup(&self) {
        let surface = self.ctx.surface;
        let selectors = &self.ctx.selectors.endorsement;
        if let Err(e) = surface.click_selector(&selectors.close, None).await {
            self.ctx.events.record(ExtractionEvent::FieldUnavailable {
                selector: selectors.close.clone(),
                reason: e.to_string(),
            });
        }

        let reason = match surface
            .wait_for_disappearance(&selectors.popup, None, surface.default_timeout())
            .await
        {
            Ok(true) => return,
            Ok(false) => "endorsers popup still open after close".to_string(),
            Err(e) => e.to_string(),
        };
        self.ctx.events.record(ExtractionEvent::FieldUnavailable {
            selector: selectors.popup.clone(),
            reason,
        });
    }

    fn unavailable(&self, skill: &str, reason: &str) {
        self.ctx.events.record(ExtractionEvent::EndorsementsUnavailable {
            skill: skill.to_string(),
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::extract::ExtractOptions;
    use crate::policy::NoDelay;
    use crate::selectors::Selectors;
    use crate::surface::fake::{FakeAction, FakeSurface, NodeId, ROOT};
    use std::sync::Arc;

    fn options() -> ExtractOptions {
        ExtractOptions {
            endorsement_delay: Arc::new(NoDelay),
            ..Default::default()
        }
    }

    /// 詳細リンク・ポップアップ・一覧・閉じるボタンを組み立てる
    fn popup_page(surface: &FakeSurface, selectors: &Selectors) -> (NodeId, NodeId, NodeId) {
        let s = &selectors.endorsement;
        let link = surface.add(ROOT, "skill-link");
        let popup = surface.add(ROOT, &s.popup);
        surface.hide(popup);
        let list = surface.add(popup, &s.list_container);
        surface.make_scrollable(list, 100.0, 100.0);
        let close = surface.add(popup, &s.close);
        surface.on_click(link, FakeAction::Show(popup));
        surface.on_click(close, FakeAction::Hide(popup));
        (link, popup, list)
    }

    fn add_endorser(surface: &FakeSurface, selectors: &Selectors, list: NodeId, name: &str, href: &str) -> NodeId {
        let s = &selectors.endorsement;
        let entity = surface.add(list, &s.entity);
        let link = surface.add(entity, &s.entity_link);
        surface.set_attr(link, "href", href);
        surface.add_text(link, &s.entity_name, name);
        entity
    }

    #[tokio::test]
    async fn test_collects_endorsers_in_order_and_closes() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        let (link, popup, list) = popup_page(&surface, &selectors);
        add_endorser(&surface, &selectors, list, " Jane Doe ", "https://www.linkedin.com/in/jane-doe/");
        let lazy = add_endorser(&surface, &selectors, list, "Bob", "/company/bob-inc");
        surface.make_scrollable(list, 100.0, 150.0);
        surface.load_on_scroll(list, lazy);

        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);
        let users = EndorsementCrawler::new(ctx)
            .crawl("Rust", Some(&link))
            .await
            .unwrap();

        assert_eq!(
            users,
            vec![
                User {
                    name: "Jane Doe".into(),
                    username: "jane-doe".into()
                },
                User {
                    name: "Bob".into(),
                    username: "/company/bob-inc".into()
                },
            ]
        );
        assert!(surface.is_hidden(popup));
        assert!(sink.events().contains(&ExtractionEvent::EndorsementsCollected {
            skill: "Rust".into(),
            count: 2
        }));
    }

    #[tokio::test]
    async fn test_empty_list_is_empty_result() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        let (link, _, _) = popup_page(&surface, &selectors);

        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);
        let users = EndorsementCrawler::new(ctx).crawl("Rust", Some(&link)).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_missing_link_short_circuits() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);

        let users = EndorsementCrawler::new(ctx).crawl("Rust", None).await.unwrap();
        assert!(users.is_empty());
        assert!(surface.clicks().is_empty());
    }

    #[tokio::test]
    async fn test_popup_timeout_degrades_to_empty() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        // クリックしても何も開かない
        let link = surface.add(ROOT, "skill-link");

        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);
        let users = EndorsementCrawler::new(ctx).crawl("Go", Some(&link)).await.unwrap();

        assert!(users.is_empty());
        assert!(matches!(
            sink.events().last(),
            Some(ExtractionEvent::EndorsementsUnavailable { skill, .. }) if skill == "Go"
        ));
    }

    #[tokio::test]
    async fn test_missing_close_button_is_not_escalated() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        let s = &selectors.endorsement;
        let link = surface.add(ROOT, "skill-link");
        let popup = surface.add(ROOT, &s.popup);
        surface.hide(popup);
        let list = surface.add(popup, &s.list_container);
        surface.make_scrollable(list, 100.0, 100.0);
        surface.on_click(link, FakeAction::Show(popup));
        add_endorser(&surface, &selectors, list, "Jane", "/in/jane/");

        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);
        let users = EndorsementCrawler::new(ctx).crawl("Rust", Some(&link)).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "jane");
    }

    #[tokio::test]
    async fn test_broken_page_propagates() {
        let surface = FakeSurface::new();
        let selectors = Selectors::default();
        let (link, _, _) = popup_page(&surface, &selectors);
        surface.break_selector(&selectors.endorsement.entity);

        let options = options();
        let sink = MemorySink::new();
        let ctx = ExtractContext::new(&surface, &selectors, &options, &sink);
        assert!(EndorsementCrawler::new(ctx)
            .crawl("Rust", Some(&link))
            .await
            .is_err());
    }
}
