//! テスト用のインメモリ `Surface`
//!
//! ノードごとにセレクタのラベルを持たせ、クリック時の表示切替や
//! スクロールで読み込まれる遅延ノードを再現する。`delay` は仮想時計を進めるだけ。

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{ScrollMetrics, Surface};
use crate::error::ScraperError;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy)]
pub(crate) enum FakeAction {
    Show(NodeId),
    Hide(NodeId),
}

#[derive(Debug)]
struct ScrollState {
    metrics: ScrollMetrics,
    pending: VecDeque<NodeId>,
}

#[derive(Debug, Default)]
struct Node {
    labels: Vec<String>,
    text: String,
    attrs: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
    on_click: Vec<FakeAction>,
    scroll: Option<ScrollState>,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<Node>,
    clicks: Vec<NodeId>,
    delays: Vec<Duration>,
    scrolls: usize,
    elapsed: Duration,
    broken: HashSet<String>,
    detached: HashSet<NodeId>,
}

pub(crate) struct FakeSurface {
    state: Mutex<State>,
    epoch: Instant,
    timeout: Duration,
}

impl FakeSurface {
    pub(crate) fn new() -> Self {
        let state = State {
            nodes: vec![Node::default()],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
            epoch: Instant::now(),
            timeout: Duration::from_secs(2),
        }
    }

    pub(crate) fn add(&self, parent: NodeId, label: &str) -> NodeId {
        let mut state = self.state.lock().unwrap();
        let id = state.nodes.len();
        state.nodes.push(Node {
            labels: vec![label.to_string()],
            parent: Some(parent),
            ..Default::default()
        });
        state.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn add_text(&self, parent: NodeId, label: &str, text: &str) -> NodeId {
        let id = self.add(parent, label);
        self.set_text(id, text);
        id
    }

    pub(crate) fn set_text(&self, id: NodeId, text: &str) {
        self.state.lock().unwrap().nodes[id].text = text.to_string();
    }

    pub(crate) fn set_attr(&self, id: NodeId, name: &str, value: &str) {
        self.state.lock().unwrap().nodes[id]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub(crate) fn hide(&self, id: NodeId) {
        self.state.lock().unwrap().nodes[id].hidden = true;
    }

    pub(crate) fn on_click(&self, id: NodeId, action: FakeAction) {
        self.state.lock().unwrap().nodes[id].on_click.push(action);
    }

    /// スクロールのたびに `load_on_scroll` のノードを1件表示し、高さを1画面分伸ばす
    pub(crate) fn make_scrollable(&self, id: NodeId, viewport: f64, limit: f64) {
        self.state.lock().unwrap().nodes[id].scroll = Some(ScrollState {
            metrics: ScrollMetrics::new(0.0, viewport, limit),
            pending: VecDeque::new(),
        });
    }

    pub(crate) fn load_on_scroll(&self, container: NodeId, id: NodeId) {
        let mut state = self.state.lock().unwrap();
        state.nodes[id].hidden = true;
        if let Some(scroll) = state.nodes[container].scroll.as_mut() {
            scroll.pending.push_back(id);
        }
    }

    /// このセレクタへのクエリを致命的エラーにする
    pub(crate) fn break_selector(&self, selector: &str) {
        self.state.lock().unwrap().broken.insert(selector.to_string());
    }

    pub(crate) fn detach(&self, id: NodeId) {
        self.state.lock().unwrap().detached.insert(id);
    }

    pub(crate) fn clicks(&self) -> Vec<NodeId> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub(crate) fn delays(&self) -> Vec<Duration> {
        self.state.lock().unwrap().delays.clone()
    }

    pub(crate) fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    pub(crate) fn is_hidden(&self, id: NodeId) -> bool {
        let state = self.state.lock().unwrap();
        Self::hidden_in(&state, id)
    }

    fn hidden_in(state: &State, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if state.nodes[node].hidden {
                return true;
            }
            current = state.nodes[node].parent;
        }
        false
    }

    fn collect(state: &State, id: NodeId, selector: &str, out: &mut Vec<NodeId>) {
        for &child in &state.nodes[id].children {
            let node = &state.nodes[child];
            if node.hidden {
                continue;
            }
            if node.labels.iter().any(|l| l == selector) {
                out.push(child);
            }
            Self::collect(state, child, selector, out);
        }
    }

    fn text_of(state: &State, id: NodeId) -> String {
        let node = &state.nodes[id];
        let mut text = node.text.clone();
        // 非表示のノードはまだ描画されていないものとして扱う
        for &child in &node.children {
            if !state.nodes[child].hidden {
                text.push_str(&Self::text_of(state, child));
            }
        }
        text
    }

    fn check_attached(state: &State, id: NodeId) -> Result<(), ScraperError> {
        if state.detached.contains(&id) {
            return Err(ScraperError::Detached(format!("node {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Surface for FakeSurface {
    type Element = NodeId;

    async fn query_all(
        &self,
        selector: &str,
        scope: Option<&NodeId>,
    ) -> Result<Vec<NodeId>, ScraperError> {
        let state = self.state.lock().unwrap();
        if state.broken.contains(selector) {
            return Err(ScraperError::Surface(format!("target closed: {}", selector)));
        }
        let start = scope.copied().unwrap_or(ROOT);
        Self::check_attached(&state, start)?;
        if start != ROOT && Self::hidden_in(&state, start) {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        Self::collect(&state, start, selector, &mut out);
        Ok(out)
    }

    async fn element_text(&self, element: &NodeId) -> Result<Option<String>, ScraperError> {
        let state = self.state.lock().unwrap();
        Self::check_attached(&state, *element)?;
        Ok(Some(Self::text_of(&state, *element)))
    }

    async fn element_attribute(
        &self,
        element: &NodeId,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        let state = self.state.lock().unwrap();
        Self::check_attached(&state, *element)?;
        Ok(state.nodes[*element].attrs.get(name).cloned())
    }

    async fn click(&self, element: &NodeId) -> Result<(), ScraperError> {
        let mut state = self.state.lock().unwrap();
        Self::check_attached(&state, *element)?;
        if Self::hidden_in(&state, *element) {
            return Err(ScraperError::Detached(format!("node {} is not rendered", element)));
        }
        state.clicks.push(*element);
        let actions = state.nodes[*element].on_click.clone();
        for action in actions {
            match action {
                FakeAction::Show(id) => state.nodes[id].hidden = false,
                FakeAction::Hide(id) => state.nodes[id].hidden = true,
            }
        }
        Ok(())
    }

    async fn scroll_by(&self, element: &NodeId, amount: f64) -> Result<(), ScraperError> {
        let mut state = self.state.lock().unwrap();
        state.scrolls += 1;
        let Some(scroll) = state.nodes[*element].scroll.as_mut() else {
            return Ok(());
        };
        let revealed = scroll.pending.pop_front();
        if revealed.is_some() {
            scroll.metrics.limit += scroll.metrics.viewport;
        }
        let max_position = (scroll.metrics.limit - scroll.metrics.viewport).max(0.0);
        scroll.metrics.position = (scroll.metrics.position + amount).min(max_position);
        if let Some(id) = revealed {
            state.nodes[id].hidden = false;
        }
        Ok(())
    }

    async fn scroll_metrics(&self, element: &NodeId) -> Result<ScrollMetrics, ScraperError> {
        let state = self.state.lock().unwrap();
        state.nodes[*element]
            .scroll
            .as_ref()
            .map(|s| s.metrics)
            .ok_or_else(|| ScraperError::JavaScript(format!("node {} is not scrollable", element)))
    }

    async fn delay(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.delays.push(duration);
        state.elapsed += duration;
    }

    fn now(&self) -> Instant {
        self.epoch + self.state.lock().unwrap().elapsed
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }
}
