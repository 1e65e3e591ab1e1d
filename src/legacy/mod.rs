use serde::Serialize;

use crate::legacy::header_matcher::{assign_roles, extract_fields, find_container};
use crate::template::normalizer::normalize;
use crate::template::PostTemplateData;

pub mod html_scanner;
pub mod header_matcher;

/// A legacy post body with its embedded header block taken out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacySplit {
    pub template: PostTemplateData,
    pub body: String,
    /// True when a header block was recognized and removed
    #[serde(skip)]
    pub found: bool,
}

/// Splits the header block off the top of a post written before header data had its own column.
///
/// The block is the first element of the document (after whitespace and comments): a `header`,
/// `div` or `section` whose children are, in order, an optional series line, an `h1`/`h2` title, an
/// optional subtitle and a byline ("By Author • Date"). Attributes are not looked at. When nothing
/// matches, the template only carries defaults and the body is returned untouched.
pub fn split_template_from_html(html: &str, fallback_created_at: &str) -> LegacySplit {
    let not_found = || LegacySplit {
        template: normalize(None, fallback_created_at),
        body: html.to_string(),
        found: false,
    };

    let Some(container) = find_container(html) else {
        return not_found();
    };
    let Some(roles) = assign_roles(html, &container) else {
        return not_found();
    };

    let fields = extract_fields(html, &container, &roles);
    let template = PostTemplateData {
        title: fields.title,
        subtitle: fields.subtitle,
        author_name: fields.author_name,
        series_name: fields.series_name,
        volume: fields.volume,
        date: fields.date,
        header_enabled: true,
    }.normalized(fallback_created_at);

    let before = &html[..container.outer.start];
    let after = html[container.outer.end..].trim_start();
    let body = if before.trim().is_empty() {
        after.to_string()
    } else {
        format!("{}\n{}", before.trim_end(), after)
    };

    LegacySplit { template, body, found: true }
}

#[cfg(test)]
mod tests {
    use crate::template::header_renderer::render_header_html;
    use crate::test_data::{LEGACY_POST_BODY, LEGACY_POST_HTML, LEGACY_POST_WITH_COMMENT_HTML, PLAIN_POST_HTML};

    use super::*;

    const CREATED_AT: &str = "2024-01-05T00:00:00Z";

    #[test]
    fn test_no_header_is_untouched() {
        let split = split_template_from_html(PLAIN_POST_HTML, CREATED_AT);
        assert_eq!(split, LegacySplit {
            template: normalize(None, CREATED_AT),
            body: PLAIN_POST_HTML.to_string(),
            found: false,
        });
    }

    #[test]
    fn test_malformed_input_is_untouched() {
        for html in ["", "   ", "<header><h1>Hello", "<<<>>>", "<div><h1>Hi</h1></span>", "</header><h1>x</h1>"] {
            let split = split_template_from_html(html, CREATED_AT);
            assert_eq!(split.body, html);
            assert_eq!(split.template, normalize(None, CREATED_AT));
            assert!(!split.found);
        }
    }

    #[test]
    fn test_extracts_title_and_subtitle() {
        let html = "<header><h1>Hello</h1><p>World</p></header>\n<p>First paragraph.</p>";
        let split = split_template_from_html(html, CREATED_AT);
        assert_eq!(split.template.title.as_deref(), Some("Hello"));
        assert_eq!(split.template.subtitle.as_deref(), Some("World"));
        assert_eq!(split.template.date.as_deref(), Some("January 5, 2024"));
        assert!(split.template.header_enabled);
        assert_eq!(split.body, "<p>First paragraph.</p>");
        assert!(split.found);
        assert!(!split.body.contains("<header"));
    }

    #[test]
    fn test_legacy_fixture() {
        let split = split_template_from_html(LEGACY_POST_HTML, "2023-06-01T12:00:00Z");
        assert_eq!(split.template, PostTemplateData {
            title: Some("What the river taught me".to_string()),
            subtitle: Some("Notes from a week without a phone".to_string()),
            author_name: Some("Maya Chen".to_string()),
            series_name: Some("Slow Travel".to_string()),
            volume: Some("Vol. 3".to_string()),
            date: Some("May 28, 2023".to_string()),
            header_enabled: true,
        });
        assert_eq!(split.body, LEGACY_POST_BODY);
    }

    #[test]
    fn test_leading_comment_is_kept() {
        let split = split_template_from_html(LEGACY_POST_WITH_COMMENT_HTML, CREATED_AT);
        assert_eq!(split.template.title.as_deref(), Some("Hello"));
        assert_eq!(split.template.author_name.as_deref(), Some("Sam"));
        assert_eq!(split.body, "<!-- imported -->\n<p>Body</p>\n");
    }

    #[test]
    fn test_header_only_post() {
        let html = "<div class=\"hdr\"><h2>Only a header</h2><span>By Kim • March 1, 2024</span></div>";
        let split = split_template_from_html(html, CREATED_AT);
        assert_eq!(split.template.title.as_deref(), Some("Only a header"));
        assert_eq!(split.template.author_name.as_deref(), Some("Kim"));
        assert_eq!(split.template.date.as_deref(), Some("March 1, 2024"));
        assert_eq!(split.body, "");
    }

    #[test]
    fn test_wrapped_content_is_not_a_header() {
        let posts = [
            "<div><h2>Chapter one</h2><p>By the time we reached the river it was dark.</p></div>\n<p>More.</p>",
            "<section><h2>Chapter one</h2><p>The rain.</p><p>By then we were soaked.</p></section>",
            "<div><h2>Lists</h2><p>Some intro</p><div>A • B • C</div></div>",
        ];
        for html in posts {
            let split = split_template_from_html(html, CREATED_AT);
            assert_eq!(split.body, html);
            assert!(!split.found);
            assert_eq!(split.template.author_name, None);
        }

        // The same lines inside a <header> are a header
        let html = "<header><h2>Chapter one</h2><p>By Maya</p></header>\n<p>More.</p>";
        let split = split_template_from_html(html, CREATED_AT);
        assert_eq!(split.template.author_name.as_deref(), Some("Maya"));
        assert_eq!(split.body, "<p>More.</p>");
    }

    #[test]
    fn test_content_after_header_is_untouched() {
        let rest = "<p>One</p>\n<script>var x = '<header>';</script>\n<header><h1>Not me</h1></header>\n";
        let html = format!("<header><h1>Hello</h1></header>\n\n{}", rest);
        let split = split_template_from_html(&html, CREATED_AT);
        assert_eq!(split.template.title.as_deref(), Some("Hello"));
        assert_eq!(split.body, rest);
    }

    #[test]
    fn test_rendered_header_splits_back() {
        let templates = [
            PostTemplateData {
                title: Some("Hello".to_string()),
                subtitle: Some("World".to_string()),
                author_name: Some("Ada <Lovelace>".to_string()),
                series_name: Some("Field Notes".to_string()),
                volume: Some("Vol. 2".to_string()),
                date: Some("January 5, 2024".to_string()),
                header_enabled: true,
            },
            PostTemplateData {
                title: Some("Tom & Jerry's \"day\"".to_string()),
                date: Some("Custom Date".to_string()),
                ..Default::default()
            },
            PostTemplateData {
                title: Some("Separators".to_string()),
                author_name: Some("Ada • Co".to_string()),
                series_name: Some("Notes • Letters".to_string()),
                volume: Some("Vol. 1 • Part 2".to_string()),
                date: Some("May 1, 2021".to_string()),
                ..Default::default()
            },
            PostTemplateData {
                title: Some("No volume".to_string()),
                author_name: Some("Ada • Co".to_string()),
                series_name: Some("Notes • Letters".to_string()),
                ..Default::default()
            },
            PostTemplateData {
                title: Some("Series only".to_string()),
                series_name: Some("Letters".to_string()),
                subtitle: Some("A subtitle".to_string()),
                date: Some("June 2, 2020".to_string()),
                ..Default::default()
            },
        ];

        let body = "<p>The body.</p>";
        for template in templates {
            let html = format!("{}{}", render_header_html(&template), body);
            let split = split_template_from_html(&html, CREATED_AT);
            let expected = template.normalized(CREATED_AT);
            assert_eq!(split.template, expected);
            assert_eq!(split.body, body);
        }
    }
}
