pub mod post_renderer;
pub mod list_renderer;
