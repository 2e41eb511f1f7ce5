//! プロフィール上部（名前・見出し・所在地・バッジ・自己紹介）

use crate::error::ScraperError;
use crate::events::Section;
use crate::surface::Surface;

use super::ExtractContext;

/// 上部カードから読める項目
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub premium: Option<bool>,
    pub influencer: Option<bool>,
}

pub async fn extract_identity<S: Surface>(ctx: &ExtractContext<'_, S>) -> Result<Identity, ScraperError> {
    let selectors = &ctx.selectors.identity;
    let Some(card) = ctx.find_section(Section::Identity, &selectors.top_card).await? else {
        return Ok(Identity::default());
    };

    let reader = ctx.reader();
    let scope = Some(&card);
    let (full_name, description, location, premium, influencer) = futures::try_join!(
        reader.read_optional(&selectors.full_name, scope),
        reader.read_optional(&selectors.description, scope),
        reader.read_optional(&selectors.location, scope),
        reader.exists(&selectors.premium_badge, scope),
        reader.exists(&selectors.influencer_badge, scope),
    )?;

    // 自己紹介は上部カードの外にあり、省略表示を展開してから読む
    let about = match ctx.surface.query(&selectors.about_section, None).await {
        Ok(Some(section)) => {
            ctx.driver()
                .expand(&selectors.about_see_more, Some(&section))
                .await?;
            reader.read_optional(&selectors.about_text, Some(&section)).await?
        }
        Ok(None) => None,
        Err(e) if e.is_recoverable() => None,
        Err(e) => return Err(e),
    };

    ctx.completed(Section::Identity, 1);
    Ok(Identity {
        full_name,
        description,
        about,
        location,
        premium: Some(premium),
        influencer: Some(influencer),
    })
}
