use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ntex::web;
use ntex::web::{Error, HttpRequest};
use ntex_files::NamedFile;
use spdlog::debug;

use crate::config::Config;
use crate::paginator::Paginator;
use crate::post::resolve_post;
use crate::post_cache::Blog;
use crate::query_string::ListQuery;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;

pub const POST_TEMPLATE: &str = "post.tpl";
pub const LIST_TEMPLATE: &str = "postlist.tpl";

pub fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    std::fs::read_to_string(&full_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error loading template {}: {}", full_path.display(), e)))
}

/// Link prefix of a blog: the site root on its own subdomain, `/blog/<username>/` otherwise.
pub fn blog_link(username: &str, on_subdomain: bool) -> String {
    if on_subdomain {
        "/".to_string()
    } else {
        format!("/blog/{}/", username)
    }
}

pub fn get_file(root_dir: &Path, file: String) -> Result<NamedFile, Error> {
    if file.contains("../") || file.contains("..\\") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = root_dir.join(file);
    Ok(NamedFile::open(file_path)?)
}

pub fn get_cur_page(req: &HttpRequest) -> u32 {
    if let Some(query_str) = req.uri().query() {
        ListQuery::from(query_str).get_page()
    } else {
        1
    }
}

/// Renders a single post page. `Ok(None)` means the blog has no public post under `slug`.
pub fn render_post_page(config: &Config, blog: &Blog, link_prefix: &str, slug: &str) -> Result<Option<String>> {
    let Some(post) = blog.find_post(slug) else {
        return Ok(None);
    };

    let resolved = resolve_post(post);
    if resolved.from_legacy_html {
        debug!("Header of post {} extracted from legacy HTML", post.id);
    }

    let template_src = read_template(&config.paths.template_dir, POST_TEMPLATE)?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(Some(renderer.render(&blog.user, link_prefix, post, &resolved)))
}

/// Renders one page of the blog's post list, newest first.
pub fn render_blog_list(config: &Config, blog: &Blog, link_prefix: &str, cur_page: u32) -> Result<String> {
    let posts = blog.posts();
    let paginator = Paginator::from(posts, config.defaults.page_size);
    let cur_page = paginator.sanitize_page(cur_page);

    let page = paginator.get_page(cur_page)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Error paginating blog {}", blog.user.username))?;

    let template_src = read_template(&config.paths.template_dir, LIST_TEMPLATE)?;
    let renderer = ListRenderer::new(&template_src, paginator.page_count())?;
    Ok(renderer.render(&blog.user, link_prefix, page, posts.len(), cur_page))
}
