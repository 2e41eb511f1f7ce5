//! LinkedIn プロフィールスクレイパー実装

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::events::{EventSink, TracingSink};
use crate::profile::{ProfileExtractor, ScrapedProfile};
use crate::surface::{ChromiumSurface, Surface};
use crate::traits::Scraper;

const SESSION_COOKIE_NAME: &str = "li_at";
const SESSION_COOKIE_DOMAIN: &str = ".www.linkedin.com";

/// 遅延読み込みのセクションを描画させるためにページ全体を一度スクロールする
const PAGE_WARMUP_SCRIPT: &str = r#"
(async () => {
    const scrollStep = 500;
    const scrollDelay = 300;
    for (let i = 0; i < 10; i++) {
        window.scrollBy(0, scrollStep);
        await new Promise(resolve => setTimeout(resolve, scrollDelay));
    }
    window.scrollTo(0, 0);
    await new Promise(resolve => setTimeout(resolve, 300));
})()
"#;

pub struct LinkedInScraper {
    config: ScraperConfig,
    events: Arc<dyn EventSink>,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
    user_data_dir: Option<PathBuf>,
}

impl LinkedInScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            events: Arc::new(TracingSink),
            browser: None,
            page: None,
            user_data_dir: None,
        }
    }

    /// 抽出イベントの送り先を差し替える
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn get_page(&self) -> Result<&Arc<Page>, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("Browser not initialized".into()))
    }

    fn session_cookie(&self) -> Result<CookieParam, ScraperError> {
        let value = self.config.session_cookie.trim();
        if value.is_empty() {
            return Err(ScraperError::Login("session cookie is empty".into()));
        }
        CookieParam::builder()
            .name(SESSION_COOKIE_NAME)
            .value(value)
            .domain(SESSION_COOKIE_DOMAIN)
            .path("/")
            .build()
            .map_err(|e| ScraperError::Login(format!("invalid session cookie: {}", e)))
    }

    async fn navigate(&self, page: &Page, url: &str) -> Result<(), ScraperError> {
        info!("Navigating to {}", url);
        page.goto(url)
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;

        if let Err(e) = page.evaluate(PAGE_WARMUP_SCRIPT).await {
            debug!("Page warmup scroll failed: {}", e);
        }
        sleep(Duration::from_secs(1)).await;
        Ok(())
    }

    /// デバッグ時のみ、ページ全体のスクリーンショットをbase64でログに出す
    async fn debug_screenshot(&self, page: &Page, label: &str) {
        if !self.config.debug {
            return;
        }
        match page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            Ok(screenshot) => {
                use base64::Engine;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
                debug!("{} screenshot: data:image/png;base64,{}", label, encoded);
            }
            Err(e) => debug!("Failed to take {} screenshot: {}", label, e),
        }
    }
}

#[async_trait]
impl Scraper for LinkedInScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("Initializing browser for profile scraper...");
        self.config.validate()?;

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("profile-scraper-{}", unique_id));

        let mut builder = BrowserConfig::builder()
            .chrome_executable(self.config.chrome_path())
            .user_data_dir(&user_data_dir)
            .window_size(1280, 1024);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(self.config.timeout)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        if self.config.debug {
            builder = builder.arg("--enable-logging=stderr").arg("--v=1");
        }

        let browser_config = builder
            .build()
            .map_err(ScraperError::BrowserInit)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ハンドラータスクを起動
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        self.browser = Some(browser);
        self.page = Some(Arc::new(page));
        self.user_data_dir = Some(user_data_dir);

        info!("Browser initialized successfully");
        Ok(())
    }

    async fn login(&mut self) -> Result<(), ScraperError> {
        let page = self.get_page()?.clone();
        let cookie = self.session_cookie()?;

        page.set_cookie(cookie)
            .await
            .map_err(|e| ScraperError::Login(format!("failed to set session cookie: {}", e)))?;

        info!("Session cookie installed");
        Ok(())
    }

    async fn scrape(&mut self, profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
        let page = self.get_page()?.clone();
        self.navigate(&page, profile_url).await?;

        let surface = ChromiumSurface::new(page.clone(), self.config.timeout);

        // 上部カードが出なければログイン画面に飛ばされている
        let top_card = surface
            .wait_for_appearance(&self.config.selectors.identity.top_card, None, self.config.timeout)
            .await?;
        if top_card.is_none() {
            self.debug_screenshot(&page, "Login check").await;
            return Err(ScraperError::Login(format!(
                "profile did not render, the session cookie may be expired: {}",
                profile_url
            )));
        }

        let extractor =
            ProfileExtractor::new(self.config.selectors.clone(), self.config.extract_options())
                .with_events(self.events.clone());
        let profile = extractor.extract(&surface).await?;
        self.debug_screenshot(&page, "Profile").await;

        info!(
            "Profile scraped: experiences={}, educations={}, certifications={}, skills={}",
            profile.experiences.len(),
            profile.educations.len(),
            profile.certifications.len(),
            profile.skills.len()
        );
        Ok(ScrapedProfile::new(profile_url, profile))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");

        if let Some(page) = self.page.take() {
            if let Err(e) = page.as_ref().clone().close().await {
                debug!("Failed to close page: {}", e);
            }
        }
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            let _ = browser.wait().await;
        }
        if let Some(dir) = self.user_data_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                debug!("Failed to remove user data dir {:?}: {}", dir, e);
            }
        }

        info!("Browser closed");
        Ok(())
    }
}
