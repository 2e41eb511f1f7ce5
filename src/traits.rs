use async_trait::async_trait;
use tracing::warn;

use crate::error::ScraperError;
use crate::profile::ScrapedProfile;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// セッションクッキーの設定
    async fn login(&mut self) -> Result<(), ScraperError>;

    /// プロフィールページを開いて抽出
    async fn scrape(&mut self, profile_url: &str) -> Result<ScrapedProfile, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → login → scrape → close）
    ///
    /// 途中で失敗してもブラウザは閉じる。
    async fn execute(&mut self, profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
        let result = match self.initialize().await {
            Ok(()) => match self.login().await {
                Ok(()) => self.scrape(profile_url).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        if let Err(e) = self.close().await {
            warn!("Failed to close browser: {}", e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    #[derive(Default)]
    struct Recording {
        calls: Vec<&'static str>,
        fail_login: bool,
    }

    #[async_trait]
    impl Scraper for Recording {
        async fn initialize(&mut self) -> Result<(), ScraperError> {
            self.calls.push("initialize");
            Ok(())
        }

        async fn login(&mut self) -> Result<(), ScraperError> {
            self.calls.push("login");
            if self.fail_login {
                return Err(ScraperError::Login("expired".into()));
            }
            Ok(())
        }

        async fn scrape(&mut self, profile_url: &str) -> Result<ScrapedProfile, ScraperError> {
            self.calls.push("scrape");
            Ok(ScrapedProfile::new(profile_url, Profile::default()))
        }

        async fn close(&mut self) -> Result<(), ScraperError> {
            self.calls.push("close");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_execute_runs_lifecycle_in_order() {
        let mut scraper = Recording::default();
        let scraped = scraper.execute("https://www.linkedin.com/in/jane/").await.unwrap();
        assert_eq!(scraped.url, "https://www.linkedin.com/in/jane/");
        assert_eq!(scraper.calls, vec!["initialize", "login", "scrape", "close"]);
    }

    #[tokio::test]
    async fn test_execute_closes_after_failure() {
        let mut scraper = Recording {
            fail_login: true,
            ..Default::default()
        };
        let result = scraper.execute("https://www.linkedin.com/in/jane/").await;
        assert!(matches!(result, Err(ScraperError::Login(_))));
        assert_eq!(scraper.calls, vec!["initialize", "login", "close"]);
    }
}
