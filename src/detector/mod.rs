//! Heuristics that find fragrance photos and group them into product containers

pub mod classifier;
pub mod container;
pub mod name;
pub mod topmost;

pub use classifier::{ImageClassifier, Verdict};
pub use container::ContainerResolver;
pub use name::{clean_name, extract_container_name, extract_image_name, UNKNOWN_FRAGRANCE};
pub use topmost::{is_rendered, pick_topmost};
