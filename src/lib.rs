pub mod config;
pub mod logger;
pub mod server;
pub mod template;
pub mod legacy;
pub mod post;
pub mod post_list;
pub mod post_cache;
pub mod subdomain;
pub mod text_utils;
mod post_processor;
mod query_string;
mod paginator;
mod view;
mod test_data;
