//! Markdown → HTML rendering with pulldown-cmark
//!
//! GitHub-flavored extensions (tables, strikethrough, task lists) are on by
//! default. Raw HTML in the source is escaped rather than passed through, and
//! links or images whose destination fails [`SecurityValidator`] are rendered
//! as their plain text, so untrusted Markdown cannot inject markup or script
//! URLs.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::security::SecurityValidator;

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable tables, strikethrough and task lists
    pub gfm: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl RenderOptions {
    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }
}

/// Render Markdown to HTML with GitHub-flavored extensions
///
/// ```
/// use text_codec_kit::renderer::markdown_to_html;
///
/// assert_eq!(markdown_to_html("# Hi"), "<h1>Hi</h1>\n");
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with(markdown, &RenderOptions::default())
}

/// Render Markdown to HTML with explicit options
pub fn markdown_to_html_with(markdown: &str, options: &RenderOptions) -> String {
    let validator = SecurityValidator::new();
    // One entry per open link/image: true when its tags were dropped
    let mut dropped: Vec<bool> = Vec::new();

    let parser = Parser::new_ext(markdown, options.parser_options()).filter_map(|event| {
        match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
            Event::Start(Tag::Link { ref dest_url, .. })
            | Event::Start(Tag::Image { ref dest_url, .. }) => {
                let dangerous = validator.is_dangerous_url(dest_url);
                dropped.push(dangerous);
                (!dangerous).then_some(event)
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                let was_dropped = dropped.pop().unwrap_or(false);
                (!was_dropped).then_some(event)
            }
            other => Some(other),
        }
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
