pub mod api;
pub mod config;
pub mod controller;
pub mod convert;
pub mod display;
pub mod error;
pub mod model;
pub mod page;
pub mod source;

pub use error::ViewerError;
