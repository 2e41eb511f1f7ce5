//! ブラウザセッション
//!
//! Chromiumを起動してセッションクッキーを設定し、プロフィールページを開いて
//! `ProfileExtractor` に渡す。

mod scraper;

pub use scraper::LinkedInScraper;
