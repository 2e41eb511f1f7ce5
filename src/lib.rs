//! プロフィールスクレイパーライブラリ
//!
//! - 「もっと見る」を押し切り、遅延読み込みの一覧をスクロールし切ってから読む
//! - 職歴・学歴・資格・スキル（推薦者を含む）を構造化データにする
//! - ブラウザ操作は `Surface` トレイトの裏に隠れており、抽出処理はページ実装に依存しない
//!
//! # サービス使用例
//!
//! ```rust,ignore
//! use profile_scraper::{ProfileRequest, ProfileService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ProfileService::new();
//!
//!     let request = ProfileRequest::new("li_at cookie", "https://www.linkedin.com/in/someone/")
//!         .with_detailed_skills(true)
//!         .with_headless(false);
//!
//!     let scraped = service.call(request).await.unwrap();
//!     println!("{}", scraped.to_json_pretty().unwrap());
//! }
//! ```
//!
//! # 既に開いているページから抽出する
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use profile_scraper::{ChromiumSurface, ProfileExtractor};
//!
//! async fn extract(page: Arc<chromiumoxide::Page>) {
//!     let surface = ChromiumSurface::new(page, Duration::from_secs(30));
//!     let profile = ProfileExtractor::default().extract(&surface).await.unwrap();
//!     println!("Skills: {}", profile.skills.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod policy;
pub mod profile;
pub mod selectors;
pub mod service;
pub mod session;
pub mod surface;
pub mod traits;

// 主要な型をリエクスポート
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use events::{EventSink, ExtractionEvent, MemorySink, Section, TracingSink};
pub use extract::ExtractOptions;
pub use policy::{DelayPolicy, DisclosurePolicy, FixedDelay, NoDelay, RandomJitter, ScrollPolicy};
pub use selectors::Selectors;
pub use service::{ProfileRequest, ProfileService};
pub use session::LinkedInScraper;
pub use surface::{ChromiumSurface, ScrollMetrics, Surface};
pub use traits::Scraper;

// プロフィールの型もリエクスポート
pub use profile::{
    Certification, Credential, DateInterval, Education, Experience, NamedLink, Profile,
    ProfileExtractor, Role, ScrapedProfile, Skill, User,
};
