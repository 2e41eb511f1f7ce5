//! プロフィールページのセレクタ定義
//!
//! ページ構造の変更に追従できるよう、JSONで一部だけ上書きできる。
//! 指定しなかった項目は既定値（現行レイアウト）が使われる。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub identity: IdentitySelectors,
    pub experience: ExperienceSelectors,
    pub education: EducationSelectors,
    pub certification: CertificationSelectors,
    pub skill: SkillSelectors,
    pub endorsement: EndorsementSelectors,
}

impl Selectors {
    pub fn from_json_str(json: &str) -> Result<Self, ScraperError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScraperError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// プロフィール上部（名前・見出し・自己紹介など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySelectors {
    pub top_card: String,
    pub full_name: String,
    pub description: String,
    pub location: String,
    pub premium_badge: String,
    pub influencer_badge: String,
    pub about_section: String,
    pub about_text: String,
    pub about_see_more: String,
}

impl Default for IdentitySelectors {
    fn default() -> Self {
        Self {
            top_card: "section.pv-top-card".into(),
            full_name: "h1.text-heading-xlarge".into(),
            description: "div.text-body-medium.break-words".into(),
            location: "span.text-body-small.inline.t-black--light.break-words".into(),
            premium_badge: "span.pv-member-badge--for-top-card".into(),
            influencer_badge: "span.pv-top-card__influencer-badge".into(),
            about_section: "section.pv-about-section".into(),
            about_text: "p.pv-about__summary-text".into(),
            about_see_more: "a.lt-line-clamp__more".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceSelectors {
    pub section: String,
    pub see_more: String,
    pub company_block: String,
    pub company_link: String,
    pub role_item: String,
    pub roles_see_more: String,
    // 単一ロールの会社ブロック
    pub summary_company: String,
    pub summary_role: String,
    pub summary_interval: String,
    pub summary_location: String,
    pub summary_duration: String,
    pub summary_description: String,
    // 複数ロールの会社ブロック
    pub company_title: String,
    pub company_subtitle: String,
    pub role_name: String,
    pub role_contract_type: String,
    pub role_info_line: String,
    pub role_description: String,
    pub description_see_more: String,
}

impl Default for ExperienceSelectors {
    fn default() -> Self {
        Self {
            section: "#experience-section".into(),
            see_more: "div.pv-experience-section__see-more > button.pv-profile-section__see-more-inline".into(),
            company_block: "li.pv-entity__position-group-pager".into(),
            company_link: "a[data-control-name='background_details_company']".into(),
            role_item: "li.pv-entity__position-group-role-item".into(),
            roles_see_more: "button.pv-profile-section__see-more-inline.pv-profile-section__text-truncate-toggle".into(),
            summary_company: "p.pv-entity__secondary-title".into(),
            summary_role: "div.pv-entity__summary-info > h3".into(),
            summary_interval: "h4.pv-entity__date-range > span:nth-child(2)".into(),
            summary_location: "h4.pv-entity__location > span:nth-child(2)".into(),
            summary_duration: "h4 > span.pv-entity__bullet-item-v2".into(),
            summary_description: "div.pv-entity__extra-details p.pv-entity__description".into(),
            company_title: "div.pv-entity__company-summary-info > h3 > span:nth-child(2)".into(),
            company_subtitle: "div.pv-entity__company-summary-info > h4 > span:nth-child(2)".into(),
            role_name: "div.pv-entity__summary-info-v2 > h3 > span:nth-child(2)".into(),
            role_contract_type: "span.pv-entity__secondary-title".into(),
            role_info_line: "div.pv-entity__summary-info-v2 > h4 > span:nth-child(2)".into(),
            role_description: "p.pv-entity__description".into(),
            description_see_more: "a.lt-line-clamp__more".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationSelectors {
    pub section: String,
    pub see_more: String,
    pub item: String,
    pub school_name: String,
    pub school_link: String,
    pub dates: String,
    pub field_of_study: String,
    pub degree: String,
    pub description: String,
    pub activities: String,
}

impl Default for EducationSelectors {
    fn default() -> Self {
        Self {
            section: "#education-section".into(),
            see_more: "button.pv-profile-section__see-more-inline".into(),
            item: "li.pv-education-entity".into(),
            school_name: "h3.pv-entity__school-name".into(),
            school_link: "a[data-control-name='background_details_school']".into(),
            dates: "p.pv-entity__dates > span:nth-child(2)".into(),
            field_of_study: "p.pv-entity__fos > span:nth-child(2)".into(),
            degree: "p.pv-entity__degree-name > span:nth-child(2)".into(),
            description: "div.pv-entity__extra-details > p".into(),
            activities: "p.pv-entity__secondary-title.activities-societies".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationSelectors {
    pub section: String,
    pub see_more: String,
    pub item: String,
    pub name: String,
    pub issuer_name: String,
    pub issuer_link: String,
    pub dates: String,
    pub credential_id: String,
    pub credential_link: String,
}

impl Default for CertificationSelectors {
    fn default() -> Self {
        Self {
            section: "#certifications-section".into(),
            see_more: "button.pv-profile-section__see-more-inline".into(),
            item: "li.pv-certification-entity".into(),
            name: "h3".into(),
            issuer_name: "p:nth-of-type(1) > span:nth-child(2)".into(),
            issuer_link: "a[data-control-name='background_details_company']".into(),
            dates: "p:nth-of-type(2)".into(),
            credential_id: "p:nth-of-type(3)".into(),
            credential_link: "a[data-control-name='see_credential']".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSelectors {
    pub section: String,
    pub see_more: String,
    pub item: String,
    pub name: String,
    pub assessment_badge: String,
    pub endorsement_count: String,
    pub detail_link: String,
}

impl Default for SkillSelectors {
    fn default() -> Self {
        Self {
            section: "section.pv-skill-categories-section".into(),
            see_more: "button.pv-skills-section__additional-skills[aria-expanded='false']".into(),
            item: "li.pv-skill-category-entity".into(),
            name: "span.pv-skill-category-entity__name-text".into(),
            assessment_badge: "li-icon[type='verified']".into(),
            endorsement_count: "span.pv-skill-category-entity__endorsement-count".into(),
            detail_link: "a.pv-skill-category-entity__endorsement-count-link".into(),
        }
    }
}

/// 推薦者一覧ポップアップ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndorsementSelectors {
    pub popup: String,
    pub list_container: String,
    pub entity: String,
    pub entity_name: String,
    pub entity_link: String,
    pub close: String,
}

impl Default for EndorsementSelectors {
    fn default() -> Self {
        Self {
            popup: "div.artdeco-modal[role='dialog']".into(),
            list_container: "div.artdeco-modal__content".into(),
            entity: "li.pv-endorsement-entity".into(),
            entity_name: "div.pv-endorsement-entity__name--has-hover".into(),
            entity_link: "a.pv-endorsement-entity__link".into(),
            close: "button.artdeco-modal__dismiss".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let selectors = Selectors::from_json_str(
            r#"{ "skill": { "item": "li.skill" }, "endorsement": { "close": "button.close" } }"#,
        )
        .unwrap();

        assert_eq!(selectors.skill.item, "li.skill");
        assert_eq!(selectors.skill.name, SkillSelectors::default().name);
        assert_eq!(selectors.endorsement.close, "button.close");
        assert_eq!(selectors.education, EducationSelectors::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Selectors::from_json_str("{ not json").is_err());
    }
}
