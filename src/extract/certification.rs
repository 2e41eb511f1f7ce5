//! 資格セクション

use crate::error::ScraperError;
use crate::events::Section;
use crate::profile::{Certification, Credential, NamedLink};
use crate::surface::Surface;

use super::parse::{parse_certification_dates, strip_credential_label};
use super::ExtractContext;

pub async fn extract_certifications<S: Surface>(
    ctx: &ExtractContext<'_, S>,
) -> Result<Vec<Certification>, ScraperError> {
    let selectors = &ctx.selectors.certification;
    let Some(section) = ctx
        .find_section(Section::Certifications, &selectors.section)
        .await?
    else {
        return Ok(Vec::new());
    };

    ctx.driver().expand(&selectors.see_more, Some(&section)).await?;

    let reader = ctx.reader();
    let items = ctx.items(&selectors.item, &section).await?;
    let mut certifications = Vec::with_capacity(items.len());
    for item in &items {
        let scope = Some(item);
        let (issuer_url, issuer_name, name, dates, credential_id, credential_url) = futures::try_join!(
            reader.read_attribute(&selectors.issuer_link, "href", scope),
            reader.read(&selectors.issuer_name, scope),
            reader.read(&selectors.name, scope),
            reader.read(&selectors.dates, scope),
            reader.read(&selectors.credential_id, scope),
            reader.read_attribute(&selectors.credential_link, "href", scope),
        )?;

        let (issued, expiration) = parse_certification_dates(&dates);
        certifications.push(Certification {
            name,
            issuer: NamedLink::new(issuer_name, issuer_url),
            credential: Credential {
                id: strip_credential_label(&credential_id),
                url: credential_url,
            },
            issued,
            expiration,
        });
    }

    ctx.completed(Section::Certifications, certifications.len());
    Ok(certifications)
}
