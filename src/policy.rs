//! 待機時間のポリシー

use std::fmt::Debug;
use std::time::Duration;

use rand::Rng;

/// 試行回数から次の待機時間を決める
pub trait DelayPolicy: Send + Sync + Debug {
    fn delay_for(&self, attempt: u32) -> Duration;
}

/// `[min, max)` の一様乱数で待機する
///
/// 推薦者ポップアップのスクロールで自動操作と判定されにくくするためのもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomJitter {
    pub min: Duration,
    pub max: Duration,
}

impl RandomJitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000), Duration::from_millis(10000))
    }
}

impl DelayPolicy for RandomJitter {
    fn delay_for(&self, _attempt: u32) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis() as u64..self.max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelayPolicy for FixedDelay {
    fn delay_for(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// 待機なし（テスト用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn delay_for(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// 「もっと見る」ボタン展開ループの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisclosurePolicy {
    /// クリック後、ボタンの存在を再確認するまでの間隔
    pub poll_interval: Duration,
    /// クリック1回あたりボタンが消えるのを待つ上限
    pub vanish_timeout: Duration,
    /// 展開ループ全体の上限時間
    pub budget: Duration,
}

impl Default for DisclosurePolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            vanish_timeout: Duration::from_secs(5),
            budget: Duration::from_secs(120),
        }
    }
}

/// スクロールで全件読み込むループの設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPolicy {
    /// 1回のスクロール量の下限（表示領域の高さが取れない場合に使う）
    pub min_step: f64,
    /// ループ全体の上限時間
    pub budget: Duration,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            min_step: 100.0,
            budget: Duration::from_secs(600),
        }
    }
}
