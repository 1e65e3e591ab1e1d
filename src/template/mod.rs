use serde::{Deserialize, Serialize};

pub mod normalizer;
pub mod header_renderer;

/// Header shown above a post body.
///
/// Built on every read, either from the post's `template_data` column or from the header block
/// embedded in a legacy post's HTML. Absent values are `None`, never blank strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTemplateData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author_name: Option<String>,
    pub series_name: Option<String>,
    pub volume: Option<String>,
    pub date: Option<String>,
    pub header_enabled: bool,
}

impl Default for PostTemplateData {
    fn default() -> Self {
        PostTemplateData {
            title: None,
            subtitle: None,
            author_name: None,
            series_name: None,
            volume: None,
            date: None,
            header_enabled: true,
        }
    }
}

impl PostTemplateData {
    /// True when nothing would be painted in the header block.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.author_name.is_none()
            && self.series_name.is_none()
            && self.volume.is_none()
            && self.date.is_none()
    }

    pub fn shows_header(&self) -> bool {
        self.header_enabled && !self.is_empty()
    }
}
