pub mod app_config;
pub mod lottery;
pub mod template;
pub mod user;
