//! Markdown → storage-format conversion.
//!
//! Output is XHTML as produced by pulldown-cmark, with one rewrite: images
//! pointing at relative paths become attachment references, because the sync
//! engine uploads local images as attachments of the folder page.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use treemirror_core::Metadata;

/// Split a leading `---` YAML block from the document.
///
/// Returns `(yaml, rest)`; `None` when the document has no front matter.
pub(crate) fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let after = text.strip_prefix("---")?;
    let after = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in after.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "---" || trimmed == "..." {
            return Some((&after[..offset], &after[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a front matter block. An empty block yields empty metadata.
pub(crate) fn parse_front_matter(yaml: &str) -> Result<Metadata, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }
    serde_yaml::from_str(yaml)
}

/// Text of the first level-one ATX heading outside fenced code.
pub(crate) fn first_heading(markdown: &str) -> Option<String> {
    let mut in_fence = false;
    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("# ") {
            let heading = rest.trim().trim_end_matches('#').trim();
            if !heading.is_empty() {
                return Some(heading.to_owned());
            }
        }
    }
    None
}

/// Convert CommonMark to storage-format XHTML.
pub fn to_storage(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut events = Vec::new();
    let mut image_depth = 0usize;
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Image { dest_url, .. }) if image_depth == 0 && is_local(&dest_url) => {
                image_depth = 1;
                events.push(Event::InlineHtml(CowStr::from(attachment_image(&dest_url))));
            }
            Event::Start(Tag::Image { .. }) if image_depth > 0 => image_depth += 1,
            Event::End(TagEnd::Image) if image_depth > 0 => image_depth -= 1,
            // alt text of a rewritten image
            _ if image_depth > 0 => {}
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn is_local(url: &str) -> bool {
    !(url.contains("://") || url.starts_with("//") || url.starts_with("data:") || url.starts_with('#'))
}

fn attachment_image(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file_name = path.rsplit('/').next().unwrap_or(path).replace("%20", " ");
    format!(
        r#"<ac:image><ri:attachment ri:filename="{}" /></ac:image>"#,
        escape_attr(&file_name)
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
