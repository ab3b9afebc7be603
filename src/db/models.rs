use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_PROFILE_PIC: &str = "default.png";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub email: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_posted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Project {
    pub id: i64,
    pub description: String,
    pub image_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct HomePage {
    pub id: i64,
    pub intro_title: String,
    pub intro_subtitle: String,
    pub profile_pic: Option<String>,
}

impl HomePage {
    /// Values written on first edit; public pages render them when no row exists.
    pub fn defaults() -> Self {
        Self {
            id: 0,
            intro_title: "Default Title".to_string(),
            intro_subtitle: "Default Subtitle".to_string(),
            profile_pic: Some(DEFAULT_PROFILE_PIC.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AboutPage {
    pub id: i64,
    pub bio_text: String,
    pub skills: String,
}

impl AboutPage {
    pub fn defaults() -> Self {
        Self {
            id: 0,
            bio_text: "Default biography".to_string(),
            skills: "Skill1, Skill2".to_string(),
        }
    }

    /// Comma separated skills, trimmed, blanks dropped.
    pub fn skill_list(&self) -> Vec<&str> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
