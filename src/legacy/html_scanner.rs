use lazy_static::lazy_static;
use regex::Regex;

/// Elements that never have content or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose content is raw text until the matching closing tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Open { name: String, start: usize, end: usize, self_closing: bool },
    Close { name: String, start: usize, end: usize },
    Text { text: &'a str, start: usize, end: usize, raw: bool },
    /// Comments, doctype and processing instructions
    Comment { start: usize, end: usize },
}

/// Splits HTML into tags, text and comments, keeping byte offsets into the source.
///
/// It does not build a tree and never fails: anything that does not look like a tag is returned as
/// text, and an unterminated comment swallows the rest of the input.
pub struct HtmlScanner<'a> {
    html: &'a str,
    pos: usize,
    raw_text_of: Option<String>,
}

impl<'a> HtmlScanner<'a> {
    pub fn new(html: &'a str) -> Self {
        HtmlScanner {
            html,
            pos: 0,
            raw_text_of: None,
        }
    }

    fn scan_raw_text(&mut self, name: String) -> Token<'a> {
        let start = self.pos;
        let rest = self.html[start..].to_ascii_lowercase();
        let end_tag = format!("</{}", name);
        let end = match rest.find(&end_tag) {
            Some(offset) => start + offset,
            None => self.html.len(),
        };
        self.pos = end;
        Token::Text { text: &self.html[start..end], start, end, raw: true }
    }

    fn scan_comment(&mut self, open_len: usize, close: &str) -> Token<'a> {
        let start = self.pos;
        let end = match self.html[start + open_len..].find(close) {
            Some(offset) => start + open_len + offset + close.len(),
            None => self.html.len(),
        };
        self.pos = end;
        Token::Comment { start, end }
    }

    fn scan_text(&mut self) -> Token<'a> {
        let start = self.pos;
        // A lone '<' that did not start a tag belongs to the text
        let from = if self.html[start..].starts_with('<') { start + 1 } else { start };
        let end = match self.html[from..].find('<') {
            Some(offset) => from + offset,
            None => self.html.len(),
        };
        self.pos = end;
        Token::Text { text: &self.html[start..end], start, end, raw: false }
    }

    fn scan_tag(&mut self) -> Option<Token<'a>> {
        lazy_static! {
            static ref TAG_REGEX: Regex = Regex::new(r"^<(?P<close>/?)(?P<name>[A-Za-z][A-Za-z0-9-]*)").unwrap();
        }

        let start = self.pos;
        let caps = TAG_REGEX.captures(&self.html[start..])?;
        let name = caps.name("name")?.as_str().to_ascii_lowercase();
        let is_close = caps.name("close").map(|c| !c.as_str().is_empty()).unwrap_or(false);

        let end = find_tag_end(self.html, start + caps.get(0)?.end())?;
        self.pos = end;

        if is_close {
            return Some(Token::Close { name, start, end });
        }

        let self_closing = self.html[start..end].ends_with("/>");
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_of = Some(name.clone());
        }
        Some(Token::Open { name, start, end, self_closing })
    }
}

impl<'a> Iterator for HtmlScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.html.len() {
            return None;
        }

        if let Some(name) = self.raw_text_of.take() {
            let token = self.scan_raw_text(name);
            if let Token::Text { start, end, .. } = token {
                if start < end {
                    return Some(token);
                }
            }
            return self.next();
        }

        let rest = &self.html[self.pos..];
        if rest.starts_with("<!--") {
            return Some(self.scan_comment(4, "-->"));
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            return Some(self.scan_comment(2, ">"));
        }
        if rest.starts_with('<') {
            if let Some(token) = self.scan_tag() {
                return Some(token);
            }
        }
        Some(self.scan_text())
    }
}

/// Finds the byte after the '>' closing a tag, skipping quoted attribute values.
fn find_tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, c) in html[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(from + offset + 1),
            _ => {}
        }
    }
    None
}

pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}
