use std::fmt::Write;

use quick_xml::escape::escape;

use crate::template::PostTemplateData;

pub const SERIES_SEPARATOR: &str = "\u{2022}";

/// Renders the header block painted above a post body.
///
/// This is the same markup legacy posts carry at the top of their HTML, so
/// [`crate::legacy::split_template_from_html`] reads it back. The volume is only shown next to a
/// series name. Series, volume and author sit in their own `<span>` and the date in a `<time>`, so
/// values containing the separator read back whole. Returns an empty string when the header is
/// disabled or has nothing to show.
pub fn render_header_html(template: &PostTemplateData) -> String {
    if !template.shows_header() {
        return String::new();
    }

    let mut buf = String::new();
    let _ = writeln!(&mut buf, r#"<header class="post-header">"#);

    if let Some(ref series) = template.series_name {
        let line = match template.volume {
            Some(ref volume) => format!("<span>{}</span> {} <span>{}</span>", escape(series), SERIES_SEPARATOR, escape(volume)),
            None => format!("<span>{}</span>", escape(series)),
        };
        let _ = writeln!(&mut buf, r#"  <div class="post-series">{}</div>"#, line);
    }

    if let Some(ref title) = template.title {
        let _ = writeln!(&mut buf, r#"  <h1 class="post-title">{}</h1>"#, escape(title));
    }

    if let Some(ref subtitle) = template.subtitle {
        let _ = writeln!(&mut buf, r#"  <p class="post-subtitle">{}</p>"#, escape(subtitle));
    }

    let author = template.author_name.as_ref().map(|a| format!("By <span>{}</span>", escape(a)));
    let date = template.date.as_ref().map(|d| format!("<time>{}</time>", escape(d)));
    let byline = match (author, date) {
        (Some(author), Some(date)) => Some(format!("{} {} {}", author, SERIES_SEPARATOR, date)),
        (Some(author), None) => Some(author),
        (None, Some(date)) => Some(date),
        (None, None) => None,
    };
    if let Some(byline) = byline {
        let _ = writeln!(&mut buf, r#"  <div class="post-byline">{}</div>"#, byline);
    }

    let _ = writeln!(&mut buf, "</header>");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_header() {
        let template = PostTemplateData {
            title: Some("Hello".to_string()),
            subtitle: Some("World".to_string()),
            author_name: Some("Ada Lovelace".to_string()),
            series_name: Some("Field Notes".to_string()),
            volume: Some("Vol. 2".to_string()),
            date: Some("January 5, 2024".to_string()),
            header_enabled: true,
        };
        assert_eq!(render_header_html(&template), r##"<header class="post-header">
  <div class="post-series"><span>Field Notes</span> • <span>Vol. 2</span></div>
  <h1 class="post-title">Hello</h1>
  <p class="post-subtitle">World</p>
  <div class="post-byline">By <span>Ada Lovelace</span> • <time>January 5, 2024</time></div>
</header>
"##);
    }

    #[test]
    fn test_escapes_text() {
        let template = PostTemplateData {
            title: Some("<script>Tom & Jerry</script>".to_string()),
            ..Default::default()
        };
        let html = render_header_html(&template);
        assert!(html.contains("&lt;script&gt;Tom &amp; Jerry&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_volume_needs_series() {
        let template = PostTemplateData {
            title: Some("Hello".to_string()),
            volume: Some("Vol. 2".to_string()),
            ..Default::default()
        };
        let html = render_header_html(&template);
        assert!(!html.contains("post-series"));
        assert!(!html.contains("Vol. 2"));
    }

    #[test]
    fn test_date_only_byline() {
        let template = PostTemplateData {
            title: Some("Hello".to_string()),
            date: Some("Custom Date".to_string()),
            ..Default::default()
        };
        let html = render_header_html(&template);
        assert!(html.contains(r#"<div class="post-byline"><time>Custom Date</time></div>"#));
    }

    #[test]
    fn test_disabled_or_empty_header() {
        let template = PostTemplateData {
            title: Some("Hello".to_string()),
            header_enabled: false,
            ..Default::default()
        };
        assert_eq!(render_header_html(&template), "");
        assert_eq!(render_header_html(&PostTemplateData::default()), "");
    }
}
