use profile_scraper::{ProfileRequest, ProfileService};
use tower::Service;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cookie = std::env::var("LINKEDIN_SESSION_COOKIE")
        .expect("LINKEDIN_SESSION_COOKIE environment variable not set");

    // 対象URL一覧（JSON形式）
    // 例: PROFILE_URLS='["https://www.linkedin.com/in/user1/","https://www.linkedin.com/in/user2/"]'
    let urls_json =
        std::env::var("PROFILE_URLS").expect("PROFILE_URLS environment variable not set");
    let urls: Vec<String> =
        serde_json::from_str(&urls_json).expect("Failed to parse PROFILE_URLS JSON");

    println!("=== Profile Service Multi-Profile Test ===\n");

    let mut service = ProfileService::new();

    for (i, url) in urls.iter().enumerate() {
        println!("--- Profile {}: {} ---", i + 1, url);

        let request = ProfileRequest::new(&cookie, url).with_detailed_skills(true);

        match service.call(request).await {
            Ok(scraped) => {
                println!(
                    "✓ 成功! name={:?}, experiences={}, skills={}",
                    scraped.profile.full_name,
                    scraped.profile.experiences.len(),
                    scraped.profile.skills.len()
                );
            }
            Err(e) => {
                eprintln!("✗ エラー: {}", e);
            }
        }

        println!();
    }

    println!("=== テスト完了 ===");
}
