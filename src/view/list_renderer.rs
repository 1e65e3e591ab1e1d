use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::{resolve_post, PostRecord};
use crate::post_cache::BlogUser;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    blog_title: &'a str,
    post_count: usize,
    post_count_label: &'a str,
    post_list: Vec<PostItem>,
    page_list: Vec<ViewPagination>,
    show_pagination: bool,
}

#[derive(ramhorns::Content)]
struct PostItem {
    date: String,
    link: String,
    title: String,
    subtitle: String,
}

#[derive(ramhorns::Content)]
struct ViewPagination {
    current: bool,
    number: u32,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
    pub page_count: u32,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str, page_count: u32) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer {
            template,
            page_count,
        })
    }

    /// Renders one page of posts. `post_count` is the number of public posts in the whole blog.
    pub fn render(&self, user: &BlogUser, link_prefix: &str, posts: &[PostRecord], post_count: usize, cur_page: u32) -> String {
        let mut post_list = vec![];
        for post in posts {
            let resolved = resolve_post(post);
            post_list.push(PostItem {
                date: resolved.template.date.clone().unwrap_or_default(),
                link: format!("{}{}", link_prefix, post.link()),
                title: resolved.display_title(post).to_string(),
                subtitle: resolved.template.subtitle.clone().unwrap_or_default(),
            });
        }

        let page_list: Vec<ViewPagination> = (1..=self.page_count)
            .map(|number| ViewPagination { current: number == cur_page, number })
            .collect();

        let blog_title = format!("{}'s Blog", user.display_name());
        self.template.render(&ListPage {
            blog_title: &blog_title,
            post_count,
            post_count_label: if post_count == 1 { "post" } else { "posts" },
            post_list,
            page_list,
            show_pagination: self.page_count > 1,
        })
    }
}
