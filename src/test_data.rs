#[cfg(test)]
pub const LEGACY_POST_HTML: &str = r##"<header class="mb-12 text-white">
  <div class="text-center text-xs uppercase tracking-wider mb-4">Slow Travel • Vol. 3</div>
  <h1 class="text-center text-5xl font-bold mb-4">What the river taught me</h1>
  <p class="text-center text-lg italic mb-6">Notes from a week without a phone</p>
  <div class="text-center text-xs uppercase tracking-wider border-b pb-4 mb-12">By Maya Chen • May 28, 2023</div>
</header>
<p>On the third day the rain stopped.</p>
<img src="https://cdn.bloggish.io/u/maya/river.jpg" alt="River">
<p>We walked until the path ran out &amp; then kept going.</p>
"##;

#[cfg(test)]
pub const LEGACY_POST_BODY: &str = r##"<p>On the third day the rain stopped.</p>
<img src="https://cdn.bloggish.io/u/maya/river.jpg" alt="River">
<p>We walked until the path ran out &amp; then kept going.</p>
"##;

#[cfg(test)]
pub const LEGACY_POST_WITH_COMMENT_HTML: &str = "<!-- imported -->\n<header>\n  <h1>Hello</h1>\n  <div>By Sam</div>\n</header>\n<p>Body</p>\n";

#[cfg(test)]
pub const PLAIN_POST_HTML: &str = r##"<h2>Why I started writing again</h2>
<p>Some posts never had a header block. They start right away with content.</p>
<div class="callout"><p>Tip: you can embed <a href="https://example.com">links</a> too.</p></div>
"##;

#[cfg(test)]
pub const STRUCTURED_POST_JSON: &str = r##"{
  "id": "7f8a3c52-1d4e-4b7a-9c1f-2e5d6a7b8c9d",
  "title": "Stored title",
  "content": "<p>Structured body.</p>",
  "status": "published",
  "created_at": "2024-02-12T22:54:00.000Z",
  "updated_at": "2024-02-13T08:00:00.000Z",
  "user_id": "u-1",
  "is_draft": false,
  "template_data": {"title": "Template title", "subtitle": "  ", "authorName": "Ada", "headerEnabled": true},
  "folder_slug": null,
  "post_slug": "template-title"
}"##;

#[cfg(test)]
pub const LEGACY_POST_JSON: &str = r##"{
  "id": "0b6d1f9e-5a2c-4e8b-8f3d-1c2b3a4d5e6f",
  "title": "What the river taught me",
  "content": "<header><h1>What the river taught me</h1><div>By Maya Chen • May 28, 2023</div></header><p>On the third day the rain stopped.</p>",
  "status": "published",
  "created_at": "2023-06-01T12:00:00Z",
  "is_draft": false,
  "template_data": null
}"##;
