use serde_json::{Map, Value};

use crate::template::PostTemplateData;
use crate::text_utils::{display_date_from_timestamp, non_blank};

/// Turns whatever is stored for a post header into a fully populated [`PostTemplateData`].
///
/// `raw` is the JSON found in the post's `template_data` column. Anything that is not an object is
/// read as an empty object, values of the wrong type are ignored, and blank strings count as
/// missing. When no date was stored, the display date comes from `fallback_created_at`.
pub fn normalize(raw: Option<&Value>, fallback_created_at: &str) -> PostTemplateData {
    let empty = Map::new();
    let fields = match raw {
        Some(Value::Object(map)) => map,
        _ => &empty,
    };

    let header_enabled = !matches!(fields.get("headerEnabled"), Some(Value::Bool(false)));

    let template = PostTemplateData {
        title: string_field(fields, "title"),
        subtitle: string_field(fields, "subtitle"),
        author_name: string_field(fields, "authorName"),
        series_name: string_field(fields, "seriesName"),
        volume: volume_field(fields),
        date: string_field(fields, "date"),
        header_enabled,
    };

    template.normalized(fallback_created_at)
}

impl PostTemplateData {
    /// Applies the normalization rules to an already typed header.
    pub fn normalized(self, fallback_created_at: &str) -> PostTemplateData {
        let date = self.date
            .as_deref()
            .and_then(non_blank)
            .or_else(|| display_date_from_timestamp(fallback_created_at));

        PostTemplateData {
            title: self.title.as_deref().and_then(non_blank),
            subtitle: self.subtitle.as_deref().and_then(non_blank),
            author_name: self.author_name.as_deref().and_then(non_blank),
            series_name: self.series_name.as_deref().and_then(non_blank),
            volume: self.volume.as_deref().and_then(non_blank),
            date,
            header_enabled: self.header_enabled,
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => non_blank(s),
        _ => None,
    }
}

// The editor stored volumes typed into a number input as JSON numbers.
fn volume_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("volume") {
        Some(Value::String(s)) => non_blank(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
