use serde::Deserialize;

#[derive(Deserialize, Default, PartialEq, Debug)]
pub struct ListQuery {
    page: Option<String>,
}

impl ListQuery {
    pub fn from(buf: &str) -> Self {
        serde_urlencoded::from_str(buf).unwrap_or_default()
    }

    /// Requested 1-based page, falling back to 1 for anything that is not a positive number.
    pub fn get_page(&self) -> u32 {
        match self.page.as_deref().map(|p| p.trim().parse::<u32>()) {
            Some(Ok(page)) if page > 0 => page,
            _ => 1,
        }
    }
}
