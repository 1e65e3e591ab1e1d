use std::{fs, io};
use std::path::{Path, PathBuf};

pub const USER_FILE: &str = "user.json";

/// Layout of the exported blogs: one directory per username holding `*.json` post records and an
/// optional `user.json`.
pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    /// Lists `(username, directory)` for every blog directory.
    pub fn retrieve_blogs(&self) -> io::Result<Vec<(String, PathBuf)>> {
        let mut blogs = vec![];
        for entry in fs::read_dir(self.root_dir.as_path())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(username) = entry.file_name().to_str() {
                if username.starts_with('.') {
                    continue;
                }
                blogs.push((username.to_ascii_lowercase(), entry.path()));
            }
        }
        blogs.sort();
        Ok(blogs)
    }

    /// Lists the post record files of one blog directory.
    pub fn retrieve_posts(blog_dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        for entry in fs::read_dir(blog_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(file_name) = file_name.to_str() {
                if file_name.ends_with(".json") && file_name != USER_FILE {
                    posts.push(entry.path());
                }
            }
        }
        posts.sort();
        Ok(posts)
    }
}
