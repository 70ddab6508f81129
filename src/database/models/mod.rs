pub mod user;
pub mod achievement;
pub mod user_achievement;
pub mod game_profile;
pub mod marketplace_item;
pub mod transaction;
pub mod subscription;

pub use user::User;
pub use achievement::{Achievement, AchievementKind};
pub use user_achievement::UserAchievementProgress;
pub use game_profile::GameProfile;
pub use marketplace_item::{ItemStatus, MarketplaceItem};
pub use transaction::{Transaction, TransactionStatus};
pub use subscription::Subscription;
