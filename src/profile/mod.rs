//! プロフィールの型と、セクションを順に抽出するオーケストレータ

mod extractor;
mod types;

pub use extractor::ProfileExtractor;
pub use types::{
    Certification, Credential, DateInterval, Education, Experience, NamedLink, Profile, Role,
    ScrapedProfile, Skill, User,
};
