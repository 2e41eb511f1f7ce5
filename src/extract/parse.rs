//! 画面テキストの解析（期間・資格の日付・URLなど）

use std::sync::LazyLock;

use regex::Regex;

use crate::profile::DateInterval;

/// 有効期限なしを表す値
pub const NO_EXPIRATION: &str = "N/A";

/// 年が読めない場合の値
pub const UNKNOWN_YEAR: i32 = -1;

const DASHES: &[char] = &['-', '\u{2013}', '\u{2014}'];

static CERTIFICATION_DATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)issued\s+((?:[a-z]+\.?\s+)?\d{4})(?:[\s\W]*?(no\s+)?expiration\s+date(?:[\s\W]*?((?:[a-z]+\.?\s+)?\d{4}))?)?",
    )
    .expect("certification dates pattern is valid")
});

static CREDENTIAL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*credential\s+id").expect("credential label pattern is valid"));

static PROFILE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/in/([^/]+)/").expect("profile path pattern is valid"));

/// "A - B" を (A, B) に分割する
///
/// ダッシュの片側しか無い場合は開始・終了とも同じ値になる。
pub fn dash_split(text: &str) -> (String, String) {
    let mut parts = text
        .split(DASHES)
        .map(str::trim)
        .filter(|part| !part.is_empty());
    match (parts.next(), parts.next()) {
        (Some(start), Some(end)) => (start.to_string(), end.to_string()),
        (Some(only), None) => (only.to_string(), only.to_string()),
        _ => (String::new(), String::new()),
    }
}

pub fn parse_text_interval(text: &str) -> DateInterval<String> {
    let (start, end) = dash_split(text);
    DateInterval::new(start, end)
}

/// 学歴の年の期間。読めない側は -1。
pub fn parse_year_interval(text: &str) -> DateInterval<i32> {
    let (start, end) = dash_split(text);
    DateInterval::new(
        leading_int(&start).unwrap_or(UNKNOWN_YEAR),
        leading_int(&end).unwrap_or(UNKNOWN_YEAR),
    )
}

/// 先頭の数字列を整数として読む（"99+" → 99、"1,024" → 1）
pub fn leading_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}

/// 推薦数の表示を読む。数値で始まらない場合は `None`。
pub fn parse_endorsement_count(text: &str) -> Option<u32> {
    leading_int(text).and_then(|n| u32::try_from(n).ok())
}

/// 資格の日付テキストから (発行日, 有効期限) を取り出す
///
/// 有効期限の日付が書かれていればそれを、書かれていなければ "N/A" を返す。
/// パターンに一致しない場合はどちらも空文字。
pub fn parse_certification_dates(text: &str) -> (String, String) {
    let Some(caps) = CERTIFICATION_DATES.captures(text) else {
        return (String::new(), String::new());
    };
    let issued = caps
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let expiration = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NO_EXPIRATION.to_string());
    (issued, expiration)
}

/// 先頭の "Credential ID" ラベルを除去する
pub fn strip_credential_label(text: &str) -> String {
    CREDENTIAL_LABEL.replace(text, "").trim().to_string()
}

/// `/in/<username>/` からユーザー名を取り出す。一致しないURLはそのまま返す。
pub fn username_from_url(url: &str) -> String {
    PROFILE_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| url.to_string())
}

/// 会社欄の "会社名\n雇用形態" を分割する
pub fn split_company_summary(text: &str) -> (String, String) {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let company = lines.next().unwrap_or_default().to_string();
    let contract_type = lines.next().unwrap_or_default().to_string();
    (company, contract_type)
}
