use std::ops::Range;

use crate::legacy::html_scanner::{is_void, HtmlScanner, Token};
use crate::template::header_renderer::SERIES_SEPARATOR;
use crate::text_utils::{collapse_whitespace, decode_entities, is_display_date};

/// Elements that may wrap a legacy header block.
const CONTAINER_TAGS: &[&str] = &["header", "div", "section"];
const SERIES_TAGS: &[&str] = &["p", "div", "span", "small"];
const TITLE_TAGS: &[&str] = &["h1", "h2"];
const SUBTITLE_TAGS: &[&str] = &["p", "div", "h2", "h3", "h4"];
const BYLINE_TAGS: &[&str] = &["p", "div", "span", "small", "time"];

/// Opening one of these implicitly closes an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

/// Direct child of the header container.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub name: String,
    pub outer: Range<usize>,
    pub inner: Range<usize>,
    /// Outer and inner range of the first `<time>` element in the child
    pub time: Option<(Range<usize>, Range<usize>)>,
    /// Inner ranges of the elements directly inside the child
    pub nested: Vec<Range<usize>>,
}

#[derive(Debug, PartialEq)]
pub struct Container {
    pub name: String,
    pub outer: Range<usize>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    Series,
    Title,
    Subtitle,
    Byline,
}

/// Fields read out of a matched header block, before normalization.
#[derive(Debug, Default, PartialEq)]
pub struct HeaderFields {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author_name: Option<String>,
    pub series_name: Option<String>,
    pub volume: Option<String>,
    pub date: Option<String>,
}

/// Finds the leading container element of `html` and its direct children.
///
/// Only whitespace and comments may precede the container. Returns `None` when the first element is
/// not a container, is never closed, or holds loose text or media next to its children.
pub fn find_container(html: &str) -> Option<Container> {
    let mut tokens = HtmlScanner::new(html);

    let (container_name, container_start) = loop {
        match tokens.next()? {
            Token::Comment { .. } => continue,
            Token::Text { text, .. } if text.trim().is_empty() => continue,
            Token::Open { name, start, self_closing: false, .. } if CONTAINER_TAGS.contains(&name.as_str()) => {
                break (name, start);
            }
            _ => return None,
        }
    };

    let mut stack: Vec<String> = vec![container_name.clone()];
    let mut children: Vec<Child> = vec![];
    let mut current: Option<Child> = None;
    // Open tag range and stack index of a <time> nested in the current child
    let mut time_open: Option<(Range<usize>, usize)> = None;
    // Inner start of an element directly inside the current child
    let mut nested_open: Option<usize> = None;

    for token in tokens {
        match token {
            Token::Comment { .. } => {}
            Token::Text { text, .. } => {
                if stack.len() == 1 && !text.trim().is_empty() {
                    return None;
                }
            }
            Token::Open { name, start, end, self_closing } => {
                let top_is_paragraph = stack.last().map(|n| n == "p").unwrap_or(false);
                if top_is_paragraph && CLOSES_PARAGRAPH.contains(&name.as_str()) {
                    stack.pop();
                    if stack.len() <= 2 {
                        nested_open = None;
                    }
                    if stack.len() == 1 {
                        if let Some(mut child) = current.take() {
                            child.inner.end = start;
                            child.outer.end = start;
                            children.push(child);
                        }
                    }
                }

                if self_closing || is_void(&name) {
                    if stack.len() == 1 && name != "br" {
                        return None;
                    }
                    continue;
                }

                if stack.len() == 1 {
                    current = Some(Child {
                        name: name.clone(),
                        outer: start..end,
                        inner: end..end,
                        time: None,
                        nested: vec![],
                    });
                } else {
                    if stack.len() == 2 {
                        nested_open = Some(end);
                    }
                    if name == "time" && time_open.is_none() {
                        let has_time = current.as_ref().map(|c| c.time.is_some()).unwrap_or(true);
                        if !has_time {
                            time_open = Some((start..end, stack.len()));
                        }
                    }
                }
                stack.push(name);
            }
            Token::Close { name, start, end } => {
                let Some(index) = stack.iter().rposition(|n| *n == name) else {
                    continue;
                };

                if index == 0 {
                    if let Some(mut child) = current.take() {
                        child.inner.end = start;
                        child.outer.end = start;
                        children.push(child);
                    }
                    return Some(Container {
                        name: container_name,
                        outer: container_start..end,
                        children,
                    });
                }

                if let Some((open, time_index)) = time_open.clone() {
                    if index == time_index {
                        if let Some(ref mut child) = current {
                            child.time = Some((open.start..end, open.end..start));
                        }
                    }
                    if index <= time_index {
                        time_open = None;
                    }
                }

                if index <= 2 {
                    if let (2, Some(inner_start)) = (index, nested_open.take()) {
                        if let Some(ref mut child) = current {
                            child.nested.push(inner_start..start);
                        }
                    }
                    nested_open = None;
                }

                stack.truncate(index);
                if stack.len() == 1 {
                    if let Some(mut child) = current.take() {
                        child.inner.end = start;
                        child.outer.end = end;
                        if child.name == "time" {
                            child.time = Some((child.outer.clone(), child.inner.clone()));
                        }
                        children.push(child);
                    }
                }
            }
        }
    }

    None
}

/// Tags each child with its header role, or returns `None` when the children do not read as
/// `[series]? title [subtitle]? [byline]?`.
///
/// A `div` or `section` container must end with a byline; a `header` element may omit it.
pub fn assign_roles(html: &str, container: &Container) -> Option<Vec<Role>> {
    let children = &container.children;
    let title_index = children.iter().position(|c| TITLE_TAGS.contains(&c.name.as_str()))?;

    let before = &children[..title_index];
    let after = &children[title_index + 1..];
    if before.len() > 1 || after.len() > 2 {
        return None;
    }

    let mut roles = vec![];
    if let Some(series) = before.first() {
        if !SERIES_TAGS.contains(&series.name.as_str()) {
            return None;
        }
        roles.push(Role::Series);
    }
    roles.push(Role::Title);

    // Generic wrappers around ordinary content must not be mistaken for a header
    let strict = container.name != "header";

    match after {
        [] => {}
        [only] => {
            if BYLINE_TAGS.contains(&only.name.as_str()) && looks_like_byline(html, only, strict) {
                roles.push(Role::Byline);
            } else if SUBTITLE_TAGS.contains(&only.name.as_str()) {
                roles.push(Role::Subtitle);
            } else {
                return None;
            }
        }
        [subtitle, byline] => {
            if !SUBTITLE_TAGS.contains(&subtitle.name.as_str()) || !BYLINE_TAGS.contains(&byline.name.as_str()) {
                return None;
            }
            if strict && !looks_like_byline(html, byline, true) {
                return None;
            }
            roles.push(Role::Subtitle);
            roles.push(Role::Byline);
        }
        _ => return None,
    }

    if container.name != "header" && roles.last() != Some(&Role::Byline) {
        return None;
    }

    Some(roles)
}

/// In `strict` mode a line starting with "By " also needs the separator, so prose such as
/// "By the time we got there" stays content.
fn looks_like_byline(html: &str, child: &Child, strict: bool) -> bool {
    if child.time.is_some() {
        return true;
    }
    let text = element_text(html, child.inner.clone());
    if is_display_date(&text) {
        return true;
    }

    let has_by = starts_with_by(&text).is_some();
    let has_separator = text.contains(SERIES_SEPARATOR);
    if strict {
        has_by && has_separator
    } else {
        has_by || has_separator
    }
}

/// Reads the header fields out of children already tagged by [`assign_roles`].
pub fn extract_fields(html: &str, container: &Container, roles: &[Role]) -> HeaderFields {
    let mut fields = HeaderFields::default();

    for (role, child) in roles.iter().zip(container.children.iter()) {
        match role {
            Role::Series => {
                let (series, volume) = read_series(html, child);
                fields.series_name = series;
                fields.volume = volume;
            }
            Role::Title => fields.title = non_empty(element_text(html, child.inner.clone())),
            Role::Subtitle => fields.subtitle = non_empty(element_text(html, child.inner.clone())),
            Role::Byline => read_byline(html, child, &mut fields),
        }
    }

    fields
}

/// Series name and volume. Lines whose elements spell out the whole text ("<span>S</span> •
/// <span>V</span>") are read element by element, anything else is split on the last separator.
fn read_series(html: &str, child: &Child) -> (Option<String>, Option<String>) {
    let text = element_text(html, child.inner.clone());
    let parts: Vec<String> = child.nested.iter().map(|r| element_text(html, r.clone())).collect();

    let spaced = format!(" {} ", SERIES_SEPARATOR);
    let joined = parts.join(spaced.as_str());
    if (1..=2).contains(&parts.len()) && joined == text {
        let mut parts = parts.into_iter().map(non_empty);
        return (parts.next().flatten(), parts.next().flatten());
    }

    split_last_separator(&text)
}

fn read_byline(html: &str, child: &Child, fields: &mut HeaderFields) {
    if let Some((ref outer, ref inner)) = child.time {
        fields.date = non_empty(element_text(html, inner.clone()));

        // Everything before the date is the author, separators included
        let before = element_text(html, child.inner.start..outer.start.max(child.inner.start));
        let after = element_text(html, outer.end.min(child.inner.end)..child.inner.end);
        for side in [before.trim_end_matches(SERIES_SEPARATOR), after.trim_start_matches(SERIES_SEPARATOR)] {
            if let Some(author) = starts_with_by(side.trim()) {
                fields.author_name = non_empty(author.trim().to_string());
                return;
            }
        }
        return;
    }

    let text = element_text(html, child.inner.clone());
    if let [only] = child.nested.as_slice() {
        let author = element_text(html, only.clone());
        if starts_with_by(&text).map(|rest| rest.trim() == author).unwrap_or(false) {
            fields.author_name = non_empty(author);
            return;
        }
    }

    for part in text.split(SERIES_SEPARATOR).map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(author) = starts_with_by(part) {
            if fields.author_name.is_none() {
                fields.author_name = non_empty(author.trim().to_string());
            }
        } else if fields.date.is_none() {
            fields.date = Some(part.to_string());
        }
    }
}

/// Visible text of a range of HTML: tags dropped, entities decoded, whitespace collapsed.
pub fn element_text(html: &str, range: Range<usize>) -> String {
    let Some(fragment) = html.get(range) else {
        return String::new();
    };

    let mut text = String::new();
    for token in HtmlScanner::new(fragment) {
        match token {
            Token::Text { text: chunk, raw: false, .. } => text.push_str(&decode_entities(chunk)),
            Token::Open { ref name, .. } if name == "br" => text.push(' '),
            _ => {}
        }
    }
    collapse_whitespace(&text)
}

fn starts_with_by(text: &str) -> Option<&str> {
    let prefix = text.get(..3)?;
    if prefix.eq_ignore_ascii_case("by ") {
        Some(&text[3..])
    } else {
        None
    }
}

fn split_last_separator(text: &str) -> (Option<String>, Option<String>) {
    let spaced = format!(" {} ", SERIES_SEPARATOR);
    match text.rsplit_once(spaced.as_str()).or_else(|| text.rsplit_once(SERIES_SEPARATOR)) {
        Some((left, right)) => (non_empty(left.trim().to_string()), non_empty(right.trim().to_string())),
        None => (non_empty(text.to_string()), None),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_container_ranges() {
        let html = "<!-- legacy -->\n<header><h1>Hi</h1><p>Sub</header>\n<p>Body</p>";
        let container = find_container(html).unwrap();
        assert_eq!(container.name, "header");
        assert_eq!(&html[container.outer.clone()], "<header><h1>Hi</h1><p>Sub</header>");
        assert_eq!(container.children.len(), 2);
        assert_eq!(container.children[0].name, "h1");
        assert_eq!(&html[container.children[0].inner.clone()], "Hi");
        assert_eq!(&html[container.children[1].inner.clone()], "Sub");
    }

    #[test]
    fn test_find_container_unclosed_paragraphs() {
        let html = "<div><p>Series<h1>Title</h1><p>By Ada<p>January 5, 2024</div>";
        let container = find_container(html).unwrap();
        let names: Vec<_> = container.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["p", "h1", "p", "p"]);
        assert_eq!(&html[container.children[0].inner.clone()], "Series");
    }

    #[test]
    fn test_find_container_rejects() {
        assert!(find_container("<p>Intro</p><header><h1>x</h1></header>").is_none());
        assert!(find_container("text first<header><h1>x</h1></header>").is_none());
        assert!(find_container("<header><h1>never closed</h1>").is_none());
        assert!(find_container("<header>loose text<h1>x</h1></header>").is_none());
        assert!(find_container("<div><img src=\"a.png\"><h1>x</h1></div>").is_none());
        assert!(find_container("").is_none());
    }

    #[test]
    fn test_time_inside_byline() {
        let html = "<header><h1>T</h1><div>By <b>Ada</b> • <time datetime=\"2024-01-05\">January 5, 2024</time></div></header>";
        let container = find_container(html).unwrap();
        let byline = &container.children[1];
        let (outer, inner) = byline.time.clone().unwrap();
        assert_eq!(&html[inner], "January 5, 2024");
        assert!(html[outer].starts_with("<time"));
    }

    #[test]
    fn test_assign_roles() {
        let html = "<header><div>S • V</div><h1>T</h1><p>Sub</p><div>By A</div></header>";
        let container = find_container(html).unwrap();
        assert_eq!(assign_roles(html, &container), Some(vec![Role::Series, Role::Title, Role::Subtitle, Role::Byline]));

        let html = "<header><h1>T</h1><p>Just a subtitle</p></header>";
        let container = find_container(html).unwrap();
        assert_eq!(assign_roles(html, &container), Some(vec![Role::Title, Role::Subtitle]));

        let html = "<header><h1>T</h1><p>March 3, 2022</p></header>";
        let container = find_container(html).unwrap();
        assert_eq!(assign_roles(html, &container), Some(vec![Role::Title, Role::Byline]));
    }

    #[test]
    fn test_assign_roles_rejects() {
        // No title
        let html = "<header><p>a</p><p>b</p></header>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        // Too many lines before the title
        let html = "<header><p>a</p><p>b</p><h1>T</h1></header>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        // Too many lines after the title
        let html = "<header><h1>T</h1><p>a</p><p>b</p><p>c</p></header>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        // Lists are not header lines
        let html = "<header><h1>T</h1><ul><li>a</li></ul></header>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        // A plain div needs a byline
        let html = "<div><h2>Intro</h2><p>Some paragraph about things.</p></div>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());
    }

    #[test]
    fn test_generic_container_needs_a_clear_byline() {
        // Prose starting with "By" is not a byline outside of <header>
        let html = "<div><h2>Chapter one</h2><p>By the time we reached the river it was dark.</p></div>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        let html = "<section><h2>Chapter one</h2><p>Intro</p><p>By then it rained.</p></section>";
        assert!(assign_roles(html, &find_container(html).unwrap()).is_none());

        let html = "<div><h2>T</h2><p>By Ada • May 1, 2021</p></div>";
        assert_eq!(assign_roles(html, &find_container(html).unwrap()), Some(vec![Role::Title, Role::Byline]));

        let html = "<div><h2>T</h2><p>Sub</p><p>Posted <time>May 1, 2021</time></p></div>";
        assert_eq!(assign_roles(html, &find_container(html).unwrap()), Some(vec![Role::Title, Role::Subtitle, Role::Byline]));

        let html = "<section><h1>T</h1><small>May 1, 2021</small></section>";
        assert_eq!(assign_roles(html, &find_container(html).unwrap()), Some(vec![Role::Title, Role::Byline]));

        let html = "<header><h2>T</h2><p>By Ada</p></header>";
        assert_eq!(assign_roles(html, &find_container(html).unwrap()), Some(vec![Role::Title, Role::Byline]));
    }

    #[test]
    fn test_separators_inside_values() {
        let html = "<header><div><span>Notes • Letters</span> • <span>Vol. 2</span></div><h1>T</h1>\
            <div>By <span>Ada • Co</span> • <time>May 1, 2021</time></div></header>";
        let container = find_container(html).unwrap();
        assert_eq!(container.children[0].nested.len(), 2);
        let roles = assign_roles(html, &container).unwrap();
        let fields = extract_fields(html, &container, &roles);
        assert_eq!(fields.series_name.as_deref(), Some("Notes • Letters"));
        assert_eq!(fields.volume.as_deref(), Some("Vol. 2"));
        assert_eq!(fields.author_name.as_deref(), Some("Ada • Co"));
        assert_eq!(fields.date.as_deref(), Some("May 1, 2021"));

        // Plain text series lines split on the last separator
        let html = "<header><p>Notes • Letters • Vol. 2</p><h1>T</h1></header>";
        let container = find_container(html).unwrap();
        let fields = extract_fields(html, &container, &assign_roles(html, &container).unwrap());
        assert_eq!(fields.series_name.as_deref(), Some("Notes • Letters"));
        assert_eq!(fields.volume.as_deref(), Some("Vol. 2"));
    }

    #[test]
    fn test_extract_fields() {
        let html = "<header><div>Field Notes &bull; Vol. 2</div><h1>Hello <em>there</em></h1>\
            <p class=\"sub\">World</p><div>by Ada &amp; Co • January 5, 2024</div></header>";
        let container = find_container(html).unwrap();
        let roles = assign_roles(html, &container).unwrap();
        let fields = extract_fields(html, &container, &roles);
        assert_eq!(fields, HeaderFields {
            title: Some("Hello there".to_string()),
            subtitle: Some("World".to_string()),
            author_name: Some("Ada & Co".to_string()),
            series_name: Some("Field Notes".to_string()),
            volume: Some("Vol. 2".to_string()),
            date: Some("January 5, 2024".to_string()),
        });
    }

    #[test]
    fn test_element_text() {
        let html = "<b>Hello</b>&nbsp;<i>World</i><br>again<script>ignored()</script>";
        assert_eq!(element_text(html, 0..html.len()), "Hello World again");
        assert_eq!(element_text(html, 0..0), "");
        assert_eq!(element_text(html, 5..1000), "");
    }
}
