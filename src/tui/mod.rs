pub mod app;
pub mod controller;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
