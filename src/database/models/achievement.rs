use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog entry. Seeded by the migration, never written at runtime.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
    #[sqlx(rename = "type", try_from = "String")]
    #[serde(rename = "type")]
    pub kind: AchievementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementKind {
    Finance,
    Cultivation,
    Community,
}

impl AchievementKind {
    /// Column name of the matching tally on game_profiles.
    pub fn tally_column(&self) -> &'static str {
        match self {
            Self::Finance => "financial_points",
            Self::Cultivation => "cultivation_points",
            Self::Community => "community_points",
        }
    }
}

impl TryFrom<String> for AchievementKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "finance" => Ok(Self::Finance),
            "cultivation" => Ok(Self::Cultivation),
            "community" => Ok(Self::Community),
            other => Err(format!("unknown achievement type: {}", other)),
        }
    }
}
