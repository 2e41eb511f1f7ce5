use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("ログインエラー: {0}")]
    Login(String),

    #[error("タイムアウト: {0}")]
    Timeout(String),

    #[error("要素がページから切り離されました: {0}")]
    Detached(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("ページ操作エラー: {0}")]
    Surface(String),

    #[error("JavaScript実行エラー: {0}")]
    JavaScript(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScraperError {
    /// フィールド単位で「値なし」として扱ってよいエラーか
    ///
    /// タイムアウトや要素の切り離しは読み取り対象が消えただけなので、
    /// 抽出全体を止めずに空文字として扱う。それ以外はページ自体が壊れているため伝播させる。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScraperError::Timeout(_) | ScraperError::Detached(_) | ScraperError::ElementNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(ScraperError::Timeout("wait".into()).is_recoverable());
        assert!(ScraperError::Detached("node".into()).is_recoverable());
        assert!(ScraperError::ElementNotFound("x".into()).is_recoverable());
        assert!(!ScraperError::Navigation("net".into()).is_recoverable());
        assert!(!ScraperError::Surface("closed".into()).is_recoverable());
    }
}
