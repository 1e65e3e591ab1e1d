use std::io;
use std::sync::Arc;

use ntex::http::header;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info};

use crate::config::Config;
use crate::post_cache::{Blog, PostCache};
use crate::post_processor::*;
use crate::subdomain::tenant_from_host;

struct AppState {
    cache: PostCache,
    config: Config,
}

type SharedState = web::types::State<Arc<AppState>>;

fn html_ok(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn not_found(what: &str) -> web::HttpResponse {
    web::HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body(format!("{} not found", what))
}

fn tenant(req: &HttpRequest, state: &AppState) -> Option<String> {
    let host = req.headers().get(header::HOST)?.to_str().ok()?;
    tenant_from_host(host, &state.config.site)
}

/// Blog addressed by a `/blog/<username>/` path. Tenant subdomains only serve their own blog at the
/// root, so these paths do not resolve there.
fn path_blog<'a>(req: &HttpRequest, state: &'a AppState, username: &str) -> Option<&'a Blog> {
    if tenant(req, state).is_some() {
        return None;
    }
    state.cache.blog(username)
}

fn blog_list_response(req: &HttpRequest, state: &AppState, blog: &Blog, on_subdomain: bool) -> web::HttpResponse {
    let link_prefix = blog_link(&blog.user.username, on_subdomain);
    match render_blog_list(&state.config, blog, &link_prefix, get_cur_page(req)) {
        Ok(page) => html_ok(page),
        Err(e) => {
            error!("Error listing posts of {}: {:#}", blog.user.username, e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error listing posts: {}", e))
        }
    }
}

fn post_response(state: &AppState, blog: &Blog, slug: &str, on_subdomain: bool) -> web::HttpResponse {
    let link_prefix = blog_link(&blog.user.username, on_subdomain);
    match render_post_page(&state.config, blog, &link_prefix, slug) {
        Ok(Some(page)) => html_ok(page),
        Ok(None) => not_found("Post"),
        Err(e) => {
            error!("Error rendering post {} of {}: {:#}", slug, blog.user.username, e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error loading post {}: {}", slug, e))
        }
    }
}

#[web::get("/blog/{username}")]
async fn blog_wo_slash(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    if tenant(&req, &state).is_some() {
        return not_found("Page");
    }
    web::HttpResponse::TemporaryRedirect()
        .header("Location", format!("/blog/{}/", path.into_inner()))
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/blog/{username}/")]
async fn blog_list(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let username = path.into_inner();
    match path_blog(&req, &state, &username) {
        Some(blog) => blog_list_response(&req, &state, blog, false),
        None => not_found("Blog"),
    }
}

#[web::get("/blog/{username}/{slug}")]
async fn blog_post(req: HttpRequest, path: web::types::Path<(String, String)>, state: SharedState) -> web::HttpResponse {
    let (username, slug) = path.into_inner();
    match path_blog(&req, &state, &username) {
        Some(blog) => post_response(&state, blog, &slug, false),
        None => not_found("Blog"),
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: SharedState) -> Result<NamedFile, web::Error> {
    get_file(&state.config.paths.public_dir, path.into_inner())
}

#[web::get("/")]
async fn index(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    let Some(username) = tenant(&req, &state) else {
        return not_found("Blog");
    };

    match state.cache.blog(&username) {
        Some(blog) => blog_list_response(&req, &state, blog, true),
        None => not_found("Blog"),
    }
}

#[web::get("/{slug}")]
async fn tenant_post(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let Some(username) = tenant(&req, &state) else {
        return not_found("Page");
    };

    match state.cache.blog(&username) {
        Some(blog) => post_response(&state, blog, &path.into_inner(), true),
        None => not_found("Blog"),
    }
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let cache = PostCache::load(&config.paths.posts_dir)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:#}", e)))?;
    info!("Loaded {} blogs from {}", cache.blog_count(), config.paths.posts_dir.display());

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState {
        cache,
        config,
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(public_files)
            .service(blog_wo_slash)
            .service(blog_list)
            .service(blog_post)
            .service(index)
            .service(tenant_post)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
