//! spacecases-assets library: CS2 item data generators shared by the CLI.

pub mod condition;
pub mod config;
pub mod container_metadata;
pub mod data;
pub mod item_metadata;
pub mod logging;
pub mod model;
pub mod names;
pub mod prices;
pub mod skin_data;
pub mod skin_images;
