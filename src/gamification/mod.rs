pub mod engine;
pub mod profile;

pub use engine::{AchievementEngine, AchievementUnlock};
pub use profile::{GameProfileView, ProfileService, UserAchievementView};
