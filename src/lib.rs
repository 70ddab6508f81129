pub mod backend;
pub mod database;
pub mod error;
pub mod gamification;
pub mod marketplace;
pub mod subscription;
