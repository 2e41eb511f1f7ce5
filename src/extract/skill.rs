//! スキルセクション

use crate::error::ScraperError;
use crate::events::Section;
use crate::profile::Skill;
use crate::surface::Surface;

use super::parse::parse_endorsement_count;
use super::{EndorsementCrawler, ExtractContext};

pub async fn extract_skills<S: Surface>(ctx: &ExtractContext<'_, S>) -> Result<Vec<Skill>, ScraperError> {
    let selectors = &ctx.selectors.skill;
    let Some(section) = ctx.find_section(Section::Skills, &selectors.section).await? else {
        return Ok(Vec::new());
    };

    ctx.driver().expand(&selectors.see_more, Some(&section)).await?;

    let reader = ctx.reader();
    let crawler = EndorsementCrawler::new(*ctx);
    let items = ctx.items(&selectors.item, &section).await?;
    let mut skills = Vec::with_capacity(items.len());

    for item in &items {
        let (name, has_assessment, count) = futures::try_join!(
            reader.read(&selectors.name, Some(item)),
            reader.exists(&selectors.assessment_badge, Some(item)),
            reader.read(&selectors.endorsement_count, Some(item)),
        )?;

        // 件数が読めない場合は推測せず `None`
        let endorsement_count = parse_endorsement_count(&count);

        // ポップアップはページ全体で1つなので、スキルごとに順番に処理する
        let endorsers = if ctx.options.detailed_skills {
            let link = match ctx.surface.query(&selectors.detail_link, Some(item)).await {
                Ok(link) => link,
                Err(e) if e.is_recoverable() => None,
                Err(e) => return Err(e),
            };
            crawler.crawl(&name, link.as_ref()).await?
        } else {
            Vec::new()
        };

        skills.push(Skill {
            name,
            has_assessment,
            endorsement_count,
            endorsers,
        });
    }

    ctx.completed(Section::Skills, skills.len());
    Ok(skills)
}
