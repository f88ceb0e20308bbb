pub mod animation_utils;
pub mod save_utils;
