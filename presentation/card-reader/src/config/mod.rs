pub mod app_config;
pub mod vision_config;
