use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::events::{EventSink, TracingSink};
use crate::profile::ScrapedProfile;
use crate::session::LinkedInScraper;
use crate::traits::Scraper;

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ProfileRequest {
    pub session_cookie: String,
    pub profile_url: String,
    pub headless: bool,
    pub detailed_skills: bool,
}

impl ProfileRequest {
    pub fn new(session_cookie: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            session_cookie: session_cookie.into(),
            profile_url: profile_url.into(),
            headless: true,
            detailed_skills: false,
        }
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_detailed_skills(mut self, detailed: bool) -> Self {
        self.detailed_skills = detailed;
        self
    }
}

impl From<ProfileRequest> for ScraperConfig {
    fn from(req: ProfileRequest) -> Self {
        ScraperConfig::new(req.session_cookie)
            .with_headless(req.headless)
            .with_detailed_skills(req.detailed_skills)
    }
}

/// tower::Serviceを実装したプロフィール取得サービス
///
/// リクエストごとにブラウザを起動し、終了時に閉じる。
#[derive(Debug, Clone)]
pub struct ProfileService {
    base: ScraperConfig,
    events: Arc<dyn EventSink>,
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileService {
    pub fn new() -> Self {
        Self::with_config(ScraperConfig::default())
    }

    /// リクエストに含まれない設定（セレクタ、タイムアウトなど）の既定値を指定する
    pub fn with_config(base: ScraperConfig) -> Self {
        Self {
            base,
            events: Arc::new(TracingSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    fn config_for(&self, req: &ProfileRequest) -> ScraperConfig {
        let mut config = self.base.clone();
        config.session_cookie = req.session_cookie.clone();
        config.headless = req.headless;
        config.detailed_skills = req.detailed_skills;
        config
    }
}

impl Service<ProfileRequest> for ProfileService {
    type Response = ScrapedProfile;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ProfileRequest) -> Self::Future {
        info!("Profile request received: url={}", req.profile_url);

        let config = self.config_for(&req);
        let events = self.events.clone();

        Box::pin(async move {
            let mut scraper = LinkedInScraper::new(config).with_events(events);
            let scraped = scraper.execute(&req.profile_url).await?;

            info!(
                "Profile request completed: url={}, scraped_at={}",
                scraped.url, scraped.scraped_at
            );
            Ok(scraped)
        })
    }
}
