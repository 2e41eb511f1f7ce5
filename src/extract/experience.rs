//! 職歴セクション
//!
//! 会社ブロックごとに、中にロール項目があるかで処理を分ける。
//! - ロール項目なし: ブロック自体が唯一のロール（要約レイアウトから読む）
//! - ロール項目あり: ロール一覧を展開してから、ロールごとに読む

use futures::future::try_join_all;

use crate::error::ScraperError;
use crate::events::Section;
use crate::profile::{Experience, NamedLink, Role};
use crate::surface::Surface;

use super::parse::{parse_text_interval, split_company_summary};
use super::ExtractContext;

pub async fn extract_experiences<S: Surface>(
    ctx: &ExtractContext<'_, S>,
) -> Result<Vec<Experience>, ScraperError> {
    let selectors = &ctx.selectors.experience;
    let Some(section) = ctx.find_section(Section::Experience, &selectors.section).await? else {
        return Ok(Vec::new());
    };

    ctx.driver().expand(&selectors.see_more, Some(&section)).await?;

    let blocks = ctx.items(&selectors.company_block, &section).await?;
    let mut experiences = Vec::with_capacity(blocks.len());
    for block in &blocks {
        experiences.push(extract_company(ctx, block).await?);
    }

    ctx.completed(Section::Experience, experiences.len());
    Ok(experiences)
}

async fn extract_company<S: Surface>(
    ctx: &ExtractContext<'_, S>,
    block: &S::Element,
) -> Result<Experience, ScraperError> {
    let selectors = &ctx.selectors.experience;
    let url = ctx
        .reader()
        .read_attribute(&selectors.company_link, "href", Some(block))
        .await?;

    if ctx.items(&selectors.role_item, block).await?.is_empty() {
        single_role(ctx, block, url).await
    } else {
        multi_role(ctx, block, url).await
    }
}

async fn single_role<S: Surface>(
    ctx: &ExtractContext<'_, S>,
    block: &S::Element,
    url: String,
) -> Result<Experience, ScraperError> {
    let selectors = &ctx.selectors.experience;
    let reader = ctx.reader();
    let scope = Some(block);

    let (company_text, name, interval, location, duration, description) = futures::try_join!(
        reader.read(&selectors.summary_company, scope),
        reader.read(&selectors.summary_role, scope),
        reader.read(&selectors.summary_interval, scope),
        reader.read(&selectors.summary_location, scope),
        reader.read(&selectors.summary_duration, scope),
        reader.read_filtered(&selectors.summary_description, &selectors.description_see_more, scope),
    )?;

    let (company, contract_type) = split_company_summary(&company_text);
    let role = Role {
        name,
        location: location.clone(),
        description,
        duration: duration.clone(),
        time_interval: parse_text_interval(&interval),
        contract_type,
    };

    Ok(Experience {
        company: NamedLink::new(company, url),
        location,
        duration,
        roles: vec![role],
    })
}

async fn multi_role<S: Surface>(
    ctx: &ExtractContext<'_, S>,
    block: &S::Element,
    url: String,
) -> Result<Experience, ScraperError> {
    let selectors = &ctx.selectors.experience;
    let reader = ctx.reader();

    ctx.driver().expand(&selectors.roles_see_more, Some(block)).await?;

    let (title, subtitle) = futures::try_join!(
        reader.read(&selectors.company_title, Some(block)),
        reader.read(&selectors.company_subtitle, Some(block)),
    )?;

    // 展開後に改めて列挙する
    let items = ctx.items(&selectors.role_item, block).await?;
    let roles = try_join_all(items.iter().map(|item| read_role(ctx, item))).await?;

    Ok(Experience {
        company: NamedLink::new(title, url),
        location: String::new(),
        duration: subtitle,
        roles,
    })
}

async fn read_role<S: Surface>(ctx: &ExtractContext<'_, S>, item: &S::Element) -> Result<Role, ScraperError> {
    let selectors = &ctx.selectors.experience;
    let reader = ctx.reader();
    let scope = Some(item);

    let (name, contract_type, info, description) = futures::try_join!(
        reader.read(&selectors.role_name, scope),
        reader.read(&selectors.role_contract_type, scope),
        reader.read_lines(&selectors.role_info_line, scope),
        reader.read_filtered(&selectors.role_description, &selectors.description_see_more, scope),
    )?;

    // 0: 期間, 1: 在籍期間, 2: 勤務地（無い場合あり）
    let line = |index: usize| info.get(index).cloned().unwrap_or_default();
    Ok(Role {
        name,
        location: line(2),
        description,
        duration: line(1),
        time_interval: parse_text_interval(&line(0)),
        contract_type,
    })
}
