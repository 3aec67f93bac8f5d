//! Overlay button management

pub mod button;
pub mod handlers;

pub use button::ButtonController;
pub use handlers::HandlerTable;
