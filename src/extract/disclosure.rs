//! 「もっと見る」ボタンを押し切る展開ループ

use serde::Serialize;

use crate::error::ScraperError;
use crate::events::{EventSink, ExtractionEvent};
use crate::policy::DisclosurePolicy;
use crate::surface::Surface;

/// 展開ループの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureOutcome {
    /// ボタンが無くなった（最初から無かった場合は `clicks == 0`）
    Exhausted { clicks: u32 },
    /// 上限時間に達したがボタンが残っている
    BudgetExhausted { clicks: u32 },
}

impl DisclosureOutcome {
    pub fn clicks(&self) -> u32 {
        match self {
            DisclosureOutcome::Exhausted { clicks } | DisclosureOutcome::BudgetExhausted { clicks } => *clicks,
        }
    }
}

enum State<E> {
    Probe,
    Activate(E),
    AwaitVanish,
    Done(DisclosureOutcome),
}

/// ボタンが消えるまで「クリック → 消えるのを待つ」を繰り返す
///
/// 同じ範囲に対して並行に呼ばないこと（クリックが競合する）。
pub struct DisclosureDriver<'a, S: Surface> {
    surface: &'a S,
    policy: DisclosurePolicy,
    events: &'a dyn EventSink,
}

impl<'a, S: Surface> DisclosureDriver<'a, S> {
    pub fn new(surface: &'a S, policy: DisclosurePolicy, events: &'a dyn EventSink) -> Self {
        Self {
            surface,
            policy,
            events,
        }
    }

    pub async fn expand(
        &self,
        trigger: &str,
        scope: Option<&S::Element>,
    ) -> Result<DisclosureOutcome, ScraperError> {
        let started = self.surface.now();
        let mut clicks = 0u32;
        let mut state = State::Probe;

        loop {
            state = match state {
                State::Probe => match self.probe(trigger, scope).await? {
                    None => State::Done(DisclosureOutcome::Exhausted { clicks }),
                    Some(_) if self.surface.now().duration_since(started) >= self.policy.budget => {
                        State::Done(DisclosureOutcome::BudgetExhausted { clicks })
                    }
                    Some(element) => State::Activate(element),
                },
                State::Activate(element) => match self.surface.click(&element).await {
                    Ok(()) => {
                        clicks += 1;
                        State::AwaitVanish
                    }
                    // 確認とクリックの間にボタンが差し替わった
                    Err(e) if e.is_recoverable() => {
                        self.surface.delay(self.policy.poll_interval).await;
                        State::Probe
                    }
                    Err(e) => return Err(e),
                },
                State::AwaitVanish => {
                    match self
                        .surface
                        .wait_for_disappearance(trigger, scope, self.policy.vanish_timeout)
                        .await
                    {
                        Ok(_) => {}
                        Err(e) if e.is_recoverable() => {}
                        Err(e) => return Err(e),
                    }
                    self.surface.delay(self.policy.poll_interval).await;
                    State::Probe
                }
                State::Done(outcome) => {
                    self.report(trigger, outcome);
                    return Ok(outcome);
                }
            };
        }
    }

    async fn probe(
        &self,
        trigger: &str,
        scope: Option<&S::Element>,
    ) -> Result<Option<S::Element>, ScraperError> {
        match self.surface.query(trigger, scope).await {
            Ok(found) => Ok(found),
            Err(e) if e.is_recoverable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn report(&self, trigger: &str, outcome: DisclosureOutcome) {
        let event = match outcome {
            DisclosureOutcome::Exhausted { clicks } => ExtractionEvent::DisclosureFinished {
                trigger: trigger.to_string(),
                clicks,
            },
            DisclosureOutcome::BudgetExhausted { clicks } => ExtractionEvent::DisclosureBudgetExhausted {
                trigger: trigger.to_string(),
                clicks,
            },
        };
        self.events.record(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::MemorySink;
    use crate::surface::fake::{FakeAction, FakeSurface, ROOT};

    fn policy() -> DisclosurePolicy {
        DisclosurePolicy {
            poll_interval: Duration::from_millis(250),
            vanish_timeout: Duration::from_secs(5),
            budget: Duration::from_secs(20),
        }
    }

    #[tokio::test]
    async fn test_absent_trigger_is_noop() {
        let surface = FakeSurface::new();
        let section = surface.add(ROOT, "section");
        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);

        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();
        assert_eq!(outcome, DisclosureOutcome::Exhausted { clicks: 0 });
        assert!(surface.clicks().is_empty());

        // 2回目も同じ
        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();
        assert_eq!(outcome.clicks(), 0);
    }

    #[tokio::test]
    async fn test_clicks_until_trigger_vanishes() {
        let surface = FakeSurface::new();
        let section = surface.add(ROOT, "section");
        let button = surface.add(section, "see-more");
        let hidden_item = surface.add(section, "item");
        surface.hide(hidden_item);
        surface.on_click(button, FakeAction::Hide(button));
        surface.on_click(button, FakeAction::Show(hidden_item));

        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);
        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();

        assert_eq!(outcome, DisclosureOutcome::Exhausted { clicks: 1 });
        assert_eq!(surface.clicks(), vec![button]);
        assert!(!surface.is_hidden(hidden_item));
        assert!(sink.events().contains(&ExtractionEvent::DisclosureFinished {
            trigger: "see-more".into(),
            clicks: 1
        }));
    }

    #[tokio::test]
    async fn test_follows_replacement_buttons() {
        let surface = FakeSurface::new();
        let section = surface.add(ROOT, "section");
        let first = surface.add(section, "see-more");
        let second = surface.add(section, "see-more");
        let third = surface.add(section, "see-more");
        surface.hide(second);
        surface.hide(third);
        surface.on_click(first, FakeAction::Hide(first));
        surface.on_click(first, FakeAction::Show(second));
        surface.on_click(second, FakeAction::Hide(second));
        surface.on_click(second, FakeAction::Show(third));
        surface.on_click(third, FakeAction::Hide(third));

        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);
        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();

        assert_eq!(outcome, DisclosureOutcome::Exhausted { clicks: 3 });
        assert_eq!(surface.clicks(), vec![first, second, third]);
    }

    #[tokio::test]
    async fn test_stuck_trigger_stops_at_budget() {
        let surface = FakeSurface::new();
        let section = surface.add(ROOT, "section");
        surface.add(section, "see-more");

        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);
        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();

        // 1周 = 消滅待ち 5s + 再確認間隔 250ms。20s の上限で 4 回クリックして止まる
        assert_eq!(outcome, DisclosureOutcome::BudgetExhausted { clicks: 4 });
        assert!(matches!(
            sink.events().last(),
            Some(ExtractionEvent::DisclosureBudgetExhausted { clicks: 4, .. })
        ));
    }

    #[tokio::test]
    async fn test_trigger_outside_scope_is_ignored() {
        let surface = FakeSurface::new();
        let section = surface.add(ROOT, "section");
        let other = surface.add(ROOT, "other");
        surface.add(other, "see-more");

        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);
        let outcome = driver.expand("see-more", Some(&section)).await.unwrap();
        assert_eq!(outcome.clicks(), 0);
    }

    #[tokio::test]
    async fn test_fatal_error_propagates() {
        let surface = FakeSurface::new();
        surface.break_selector("see-more");

        let sink = MemorySink::new();
        let driver = DisclosureDriver::new(&surface, policy(), &sink);
        assert!(driver.expand("see-more", None).await.is_err());
    }
}
