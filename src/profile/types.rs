//! プロフィール関連の型定義

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

/// 期間（開始・終了）
///
/// 学歴は西暦年 (`i32`)、職歴は画面上の文字列をそのまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval<T> {
    pub start: T,
    pub end: T,
}

impl<T> DateInterval<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }
}

/// 名前とプロフィールURLの組（学校・会社・発行元）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLink {
    pub name: String,
    pub url: String,
}

impl NamedLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub school: NamedLink,
    pub field_of_study: String,
    pub degree: String,
    pub description: String,
    pub activities: String,
    /// 解析できない年は -1
    pub date: DateInterval<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub name: String,
    pub location: String,
    pub description: String,
    pub duration: String,
    pub time_interval: DateInterval<String>,
    /// 雇用形態（例: "Full-time"）
    pub contract_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: NamedLink,
    pub location: String,
    /// 在籍期間の合計（表示文字列）
    pub duration: String,
    /// ページ上の並び順
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: NamedLink,
    pub credential: Credential,
    pub issued: String,
    /// 有効期限なしの場合は "N/A"、解析できない場合は空文字
    pub expiration: String,
}

/// 推薦者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    /// プロフィールURLの `/in/<username>/` 部分
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub has_assessment: bool,
    /// 件数表示が数値として読めない場合は `None`
    pub endorsement_count: Option<u32>,
    /// 詳細取得を指定した場合のみ埋まる
    pub endorsers: Vec<User>,
}

/// プロフィール全体
///
/// 上部カードの項目は要素が無ければ `None`。各セクションは無ければ空の `Vec`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub premium: Option<bool>,
    pub influencer: Option<bool>,
    pub educations: Vec<Education>,
    pub experiences: Vec<Experience>,
    pub certifications: Vec<Certification>,
    pub skills: Vec<Skill>,
}

/// 取得結果（取得元URLと時刻付き）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProfile {
    pub url: String,
    pub profile: Profile,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapedProfile {
    pub fn new(url: impl Into<String>, profile: Profile) -> Self {
        Self {
            url: url.into(),
            profile,
            scraped_at: Utc::now(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ScraperError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSONファイルとして保存（親ディレクトリは作成する）
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ScraperError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}
