//! Core data models shared by the detector, overlay and scan loop

pub mod layout;
pub mod list;
pub mod overlay;
pub mod scan;

pub use layout::*;
pub use list::*;
pub use overlay::*;
pub use scan::*;
