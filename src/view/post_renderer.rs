use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::{PostRecord, ResolvedPost};
use crate::post_cache::BlogUser;
use crate::template::header_renderer::render_header_html;
use crate::text_utils::non_blank;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    blog_title: &'a str,
    blog_link: &'a str,
    post_id: &'a str,
    post_title: &'a str,
    header_html: &'a str,
    author: &'a str,
    date: &'a str,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, user: &BlogUser, blog_link: &str, post: &PostRecord, resolved: &ResolvedPost) -> String {
        let blog_title = format!("{}'s Blog", user.display_name());
        let author = resolved.byline_author(user.name.as_deref(), &user.username);

        // The page header always carries a title and an author, falling back to the stored title
        // and the blog owner
        let mut header = resolved.template.clone();
        header.title = non_blank(resolved.display_title(post));
        header.author_name = non_blank(author);
        let header_html = render_header_html(&header);

        self.template.render(&ViewItem {
            blog_title: &blog_title,
            blog_link,
            post_id: &post.id,
            post_title: resolved.display_title(post),
            header_html: &header_html,
            author,
            date: resolved.template.date.as_deref().unwrap_or(""),
            post_content: &resolved.body,
        })
    }
}
