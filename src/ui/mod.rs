pub mod render;

pub use render::{OutputFormat, RenderOptions, render_all, render_line};
