use profile_scraper::{LinkedInScraper, Scraper, ScraperConfig, Selectors};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,profile_scraper=debug")),
        )
        .init();

    // 環境変数からセッションと対象URLを取得
    let cookie = std::env::var("LINKEDIN_SESSION_COOKIE")
        .expect("LINKEDIN_SESSION_COOKIE environment variable not set");
    let url = std::env::var("PROFILE_URL").expect("PROFILE_URL environment variable not set");

    let mut config = ScraperConfig::new(cookie)
        .with_headless(false) // デバッグ用に表示モード
        .with_detailed_skills(std::env::var("DETAILED_SKILLS").is_ok());

    // レイアウト変更時はビルドし直さずにセレクタを差し替えられる
    if let Ok(path) = std::env::var("SELECTORS_FILE") {
        let selectors = Selectors::from_json_file(&path).expect("Failed to load selectors");
        config = config.with_selectors(selectors);
    }

    let mut scraper = LinkedInScraper::new(config);

    println!("=== Profile Scraper Test ===");

    match scraper.execute(&url).await {
        Ok(scraped) => {
            let output = std::env::var("OUTPUT").unwrap_or_else(|_| "./output/profile.json".into());
            match scraped.save_json(&output) {
                Ok(()) => println!("成功! 保存先: {}", output),
                Err(e) => eprintln!("保存エラー: {}", e),
            }
        }
        Err(e) => {
            eprintln!("エラー: {}", e);
        }
    }
}
