//! プロフィール全体の抽出
//!
//! 全セクションが同じページ（スクロール位置・ポップアップ）を共有するため、
//! セクションは1つずつ順番に処理する。

use std::future::Future;
use std::sync::Arc;

use crate::error::ScraperError;
use crate::events::{EventSink, ExtractionEvent, Section, TracingSink};
use crate::extract::certification::extract_certifications;
use crate::extract::education::extract_educations;
use crate::extract::experience::extract_experiences;
use crate::extract::identity::{extract_identity, Identity};
use crate::extract::skill::extract_skills;
use crate::extract::{ExtractContext, ExtractOptions};
use crate::selectors::Selectors;
use crate::surface::Surface;

use super::types::Profile;

#[derive(Debug, Clone)]
pub struct ProfileExtractor {
    selectors: Selectors,
    options: ExtractOptions,
    events: Arc<dyn EventSink>,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new(Selectors::default(), ExtractOptions::default())
    }
}

impl ProfileExtractor {
    pub fn new(selectors: Selectors, options: ExtractOptions) -> Self {
        Self {
            selectors,
            options,
            events: Arc::new(TracingSink),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// 表示中のプロフィールページから `Profile` を組み立てる
    ///
    /// 表示されていないセクションは空のまま続行する。
    /// ページ自体の致命的なエラーのみ `Err` で中断する。
    pub async fn extract<S: Surface>(&self, surface: &S) -> Result<Profile, ScraperError> {
        let ctx = ExtractContext::new(surface, &self.selectors, &self.options, self.events.as_ref());

        let identity = self
            .section(Section::Identity, extract_identity(&ctx))
            .await?;
        let experiences = self
            .section(Section::Experience, extract_experiences(&ctx))
            .await?;
        let educations = self
            .section(Section::Education, extract_educations(&ctx))
            .await?;
        let certifications = self
            .section(Section::Certifications, extract_certifications(&ctx))
            .await?;
        let skills = self.section(Section::Skills, extract_skills(&ctx)).await?;

        let Identity {
            full_name,
            description,
            about,
            location,
            premium,
            influencer,
        } = identity;

        Ok(Profile {
            full_name,
            description,
            about,
            location,
            premium,
            influencer,
            educations,
            experiences,
            certifications,
            skills,
        })
    }

    /// 回復可能なエラーで失敗したセクションは空として扱い、他のセクションを続ける
    async fn section<T, F>(&self, section: Section, extraction: F) -> Result<T, ScraperError>
    where
        T: Default,
        F: Future<Output = Result<T, ScraperError>>,
    {
        match extraction.await {
            Ok(value) => Ok(value),
            Err(e) if e.is_recoverable() => {
                self.events.record(ExtractionEvent::SectionFailed {
                    section,
                    reason: e.to_string(),
                });
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }
}
