use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use spdlog::{info, warn};
use uuid::Uuid;

use crate::post::PostRecord;
use crate::post_list::{PostList, USER_FILE};

#[derive(Debug, Clone, Default, Deserialize)]
struct UserFile {
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogUser {
    pub username: String,
    pub name: Option<String>,
}

impl BlogUser {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.username.as_str(),
        }
    }
}

/// Public posts of one blog, newest first.
pub struct Blog {
    pub user: BlogUser,
    posts: Vec<PostRecord>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl Blog {
    pub fn new(user: BlogUser, posts: Vec<PostRecord>) -> Blog {
        let mut posts: Vec<PostRecord> = posts.into_iter().filter(|p| p.is_public()).collect();
        posts.sort_by(|a, b| b.created_at_utc().cmp(&a.created_at_utc()).then_with(|| b.created_at.cmp(&a.created_at)));

        let mut by_id = HashMap::new();
        let mut by_slug = HashMap::new();
        for (index, post) in posts.iter().enumerate() {
            by_id.insert(post.id.to_ascii_lowercase(), index);
            if let Some(ref slug) = post.post_slug {
                if !slug.trim().is_empty() {
                    by_slug.entry(slug.clone()).or_insert(index);
                }
            }
        }

        Blog {
            user,
            posts,
            by_id,
            by_slug,
        }
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// A slug shaped like a UUID addresses the post id, anything else the post slug.
    pub fn find_post(&self, slug: &str) -> Option<&PostRecord> {
        let index = if Uuid::parse_str(slug).is_ok() {
            self.by_id.get(&slug.to_ascii_lowercase())
        } else {
            self.by_slug.get(slug)
        }?;
        self.posts.get(*index)
    }
}

pub struct PostCache {
    blogs: HashMap<String, Blog>,
}

impl PostCache {
    pub fn new() -> PostCache {
        PostCache {
            blogs: Default::default(),
        }
    }

    /// Loads every blog under `posts_dir`. Files that cannot be read are logged and skipped.
    pub fn load(posts_dir: &Path) -> Result<PostCache> {
        let post_list = PostList { root_dir: posts_dir.to_path_buf() };
        let blog_dirs = post_list.retrieve_blogs()
            .with_context(|| format!("Error listing blogs in {}", posts_dir.display()))?;

        let mut cache = PostCache::new();
        for (username, blog_dir) in blog_dirs {
            let user = read_user(&username, &blog_dir);
            let mut posts = vec![];
            for post_file in PostList::retrieve_posts(&blog_dir)? {
                match PostRecord::from_file(&post_file) {
                    Ok(post) => posts.push(post),
                    Err(e) => warn!("Skipping post file: {}", e),
                }
            }

            let blog = Blog::new(user, posts);
            info!("Blog {}: {} public posts", username, blog.posts().len());
            cache.add(blog);
        }

        Ok(cache)
    }

    pub fn add(&mut self, blog: Blog) {
        self.blogs.insert(blog.user.username.to_ascii_lowercase(), blog);
    }

    pub fn blog(&self, username: &str) -> Option<&Blog> {
        self.blogs.get(&username.to_ascii_lowercase())
    }

    pub fn blog_count(&self) -> usize {
        self.blogs.len()
    }
}

fn read_user(username: &str, blog_dir: &Path) -> BlogUser {
    let user_path = blog_dir.join(USER_FILE);
    let user_file = match fs::read_to_string(&user_path) {
        Ok(raw) => serde_json::from_str::<UserFile>(&raw).unwrap_or_else(|e| {
            warn!("Ignoring invalid {}: {}", user_path.display(), e);
            UserFile::default()
        }),
        Err(_) => UserFile::default(),
    };

    BlogUser {
        username: username.to_string(),
        name: user_file.name,
    }
}
