//! 学歴セクション

use crate::error::ScraperError;
use crate::events::Section;
use crate::profile::{Education, NamedLink};
use crate::surface::Surface;

use super::parse::parse_year_interval;
use super::ExtractContext;

pub async fn extract_educations<S: Surface>(
    ctx: &ExtractContext<'_, S>,
) -> Result<Vec<Education>, ScraperError> {
    let selectors = &ctx.selectors.education;
    let Some(section) = ctx.find_section(Section::Education, &selectors.section).await? else {
        return Ok(Vec::new());
    };

    ctx.driver().expand(&selectors.see_more, Some(&section)).await?;

    let reader = ctx.reader();
    let items = ctx.items(&selectors.item, &section).await?;
    let mut educations = Vec::with_capacity(items.len());
    for item in &items {
        let scope = Some(item);
        let (url, name, dates, field_of_study, degree, description, activities) = futures::try_join!(
            reader.read_attribute(&selectors.school_link, "href", scope),
            reader.read(&selectors.school_name, scope),
            reader.read(&selectors.dates, scope),
            reader.read(&selectors.field_of_study, scope),
            reader.read(&selectors.degree, scope),
            reader.read(&selectors.description, scope),
            reader.read(&selectors.activities, scope),
        )?;

        educations.push(Education {
            school: NamedLink::new(name, url),
            field_of_study,
            degree,
            description,
            activities,
            date: parse_year_interval(&dates),
        });
    }

    ctx.completed(Section::Education, educations.len());
    Ok(educations)
}
