pub mod forms;
pub mod styles;
pub mod templates;
