use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ScraperError;
use crate::extract::ExtractOptions;
use crate::policy::{DisclosurePolicy, RandomJitter, ScrollPolicy};
use crate::selectors::Selectors;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// ログイン済みセッションのクッキー (li_at)
    pub session_cookie: String,
    pub headless: bool,
    /// 待機系操作の既定タイムアウト
    pub timeout: Duration,
    /// セクション要素の出現を待つ上限
    pub section_timeout: Duration,
    pub debug: bool,
    /// 未指定の場合は CHROME_PATH / CHROMIUM_PATH 環境変数、なければ "chromium"
    pub chrome_executable: Option<PathBuf>,
    /// スキルごとに推薦者一覧まで取得する
    pub detailed_skills: bool,
    pub selectors: Selectors,
    pub endorsement_delay: RandomJitter,
    pub disclosure: DisclosurePolicy,
    pub scroll: ScrollPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            session_cookie: String::new(),
            headless: true,
            timeout: Duration::from_secs(30),
            section_timeout: Duration::from_secs(10),
            debug: false,
            chrome_executable: None,
            detailed_skills: false,
            selectors: Selectors::default(),
            endorsement_delay: RandomJitter::default(),
            disclosure: DisclosurePolicy::default(),
            scroll: ScrollPolicy::default(),
        }
    }
}

impl ScraperConfig {
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self {
            session_cookie: session_cookie.into(),
            ..Default::default()
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_section_timeout(mut self, timeout: Duration) -> Self {
        self.section_timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_executable = Some(path.into());
        self
    }

    pub fn with_detailed_skills(mut self, detailed: bool) -> Self {
        self.detailed_skills = detailed;
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_endorsement_delay(mut self, min: Duration, max: Duration) -> Self {
        self.endorsement_delay = RandomJitter::new(min, max);
        self
    }

    pub fn with_disclosure_budget(mut self, budget: Duration) -> Self {
        self.disclosure.budget = budget;
        self
    }

    /// Chrome実行ファイルのパス
    pub fn chrome_path(&self) -> PathBuf {
        if let Some(path) = &self.chrome_executable {
            return path.clone();
        }
        std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("chromium"))
    }

    /// ブラウザ起動前に設定値の矛盾を検出する
    pub fn validate(&self) -> Result<(), ScraperError> {
        if self.timeout.is_zero() || self.section_timeout.is_zero() {
            return Err(ScraperError::Config("timeout must be positive".into()));
        }
        if self.endorsement_delay.min > self.endorsement_delay.max {
            return Err(ScraperError::Config(format!(
                "endorsement delay min {:?} exceeds max {:?}",
                self.endorsement_delay.min, self.endorsement_delay.max
            )));
        }
        if self.disclosure.poll_interval.is_zero() {
            return Err(ScraperError::Config("disclosure poll interval must be positive".into()));
        }
        if self.scroll.min_step <= 0.0 {
            return Err(ScraperError::Config("scroll step must be positive".into()));
        }
        Ok(())
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            detailed_skills: self.detailed_skills,
            section_timeout: self.section_timeout,
            disclosure: self.disclosure,
            scroll: self.scroll,
            endorsement_delay: Arc::new(self.endorsement_delay),
        }
    }
}
