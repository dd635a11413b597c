pub mod column;
pub mod convert;
pub mod data;
pub mod entity;
pub mod form;
pub mod style;
pub mod template;
