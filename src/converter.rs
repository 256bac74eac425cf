//! Markdown converter - transforms a DOM tree into Markdown
//!
//! The converter walks the tree depth-first in document order and dispatches
//! each element to a handler. Block elements (headings, paragraphs, lists,
//! code blocks, blockquotes, rules) are separated by one blank line; inline
//! elements (links, images, emphasis, inline code) are written in place.
//!
//! # Supported Elements
//!
//! - `h1`-`h6` → ATX headings
//! - `p`, `div` and other containers → paragraphs / pass-through
//! - `a` → `[text](href)`, `img` → `![alt](src)`
//! - `ul`/`ol`/`li` → `-` and `1.` lists, nested by two spaces per level
//! - `pre` → fenced code block, language from `language-*` / `lang-*` classes
//! - `code` → inline code, `strong`/`b` → `**bold**`, `em`/`i` → `*italic*`
//! - `blockquote` → `> ` prefixed lines, `br` → hard break, `hr` → `---`
//!
//! Elements listed by [`SecurityValidator::check_element`] are dropped with
//! their content, and links or images with dangerous URLs degrade to text.
//!
//! # Output Normalization
//!
//! The final string uses LF line endings, has no trailing whitespace, never
//! contains two consecutive blank lines and ends with exactly one newline
//! (an empty document converts to an empty string). Code blocks are exempt
//! from whitespace collapsing.
//!
//! # Example
//!
//! ```rust
//! use text_codec_kit::converter::html_to_markdown;
//!
//! let markdown = html_to_markdown("<h1>Title</h1><p>Some <b>bold</b> text.</p>")?;
//! assert_eq!(markdown, "# Title\n\nSome **bold** text.\n");
//! # Ok::<(), text_codec_kit::CodecError>(())
//! ```

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::CodecError;
use crate::parser::parse_html;
use crate::security::{MAX_NESTING_DEPTH, SanitizeAction, SecurityValidator};

/// Conversion options
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Maximum element nesting depth before conversion fails
    pub max_depth: usize,
    /// Marker for unordered list items (`-`, `*` or `+`)
    pub bullet: char,
    /// Number ordered list items sequentially instead of repeating `1.`
    pub number_ordered_lists: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
            bullet: '-',
            number_ordered_lists: true,
        }
    }
}

/// Markdown converter
///
/// Stateless between calls; one converter can convert any number of documents.
///
/// ```rust
/// use text_codec_kit::converter::MarkdownConverter;
/// use text_codec_kit::parser::parse_html;
///
/// let dom = parse_html("<ul><li>One</li><li>Two</li></ul>");
/// let markdown = MarkdownConverter::new().convert(&dom)?;
/// assert_eq!(markdown, "- One\n- Two\n");
/// # Ok::<(), text_codec_kit::CodecError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: ConversionOptions,
    security_validator: SecurityValidator,
}

impl MarkdownConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::with_options(ConversionOptions::default())
    }

    /// Create a converter with custom options
    pub fn with_options(options: ConversionOptions) -> Self {
        let security_validator = SecurityValidator::with_max_depth(options.max_depth);
        Self {
            options,
            security_validator,
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a DOM tree to Markdown
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidInput` when the document nests deeper than
    /// the configured maximum.
    pub fn convert(&self, dom: &RcDom) -> Result<String, CodecError> {
        let mut output = String::with_capacity(1024);
        self.traverse_node(&dom.document, &mut output, 0)?;
        Ok(self.normalize_output(output))
    }

    fn traverse_children(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        for child in node.children.borrow().iter() {
            self.traverse_node(child, output, depth + 1)?;
        }
        Ok(())
    }

    fn traverse_node(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        match node.data {
            NodeData::Document => {
                for child in node.children.borrow().iter() {
                    self.traverse_node(child, output, depth)?;
                }
            }
            NodeData::Element { ref name, .. } => {
                let tag_name = name.local.as_ref();
                self.handle_element(node, tag_name, output, depth)?;
            }
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                let normalized = self.normalize_text(&text);
                if normalized.is_empty() {
                    // Whitespace between inline elements still separates words
                    if !text.is_empty() && !ends_with_space(output) {
                        output.push(' ');
                    }
                    return Ok(());
                }

                if text.starts_with(char::is_whitespace) && !ends_with_space(output) {
                    output.push(' ');
                }
                let line_start = at_line_start(output);
                output.push_str(&escape_markdown(&normalized, line_start));
                if text.ends_with(char::is_whitespace) {
                    output.push(' ');
                }
            }
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {}
        }

        Ok(())
    }

    fn handle_element(
        &self,
        node: &Handle,
        tag_name: &str,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        if self.security_validator.check_element(tag_name) == SanitizeAction::Remove {
            return Ok(());
        }

        self.security_validator.validate_depth(depth)?;

        match tag_name {
            "h1" => self.handle_heading(node, 1, output, depth)?,
            "h2" => self.handle_heading(node, 2, output, depth)?,
            "h3" => self.handle_heading(node, 3, output, depth)?,
            "h4" => self.handle_heading(node, 4, output, depth)?,
            "h5" => self.handle_heading(node, 5, output, depth)?,
            "h6" => self.handle_heading(node, 6, output, depth)?,

            "p" => self.handle_paragraph(node, output, depth)?,
            "a" => self.handle_link(node, output),
            "img" => self.handle_image(node, output),

            "ul" => self.handle_list(node, output, depth, 0, false)?,
            "ol" => self.handle_list(node, output, depth, 0, true)?,
            // Stray <li> outside a list
            "li" => self.handle_list_item(node, output, depth, 0, "- ")?,

            "pre" => self.handle_code_block(node, output),
            "code" => self.handle_inline_code(node, output),

            "strong" | "b" => self.handle_wrapped(node, "**", output, depth)?,
            "em" | "i" => self.handle_wrapped(node, "*", output, depth)?,

            "blockquote" => self.handle_blockquote(node, output, depth)?,
            "br" => output.push_str("\\\n"),
            "hr" => {
                start_block(output);
                output.push_str("---\n\n");
            }

            // Document metadata, never body content
            "head" | "title" => {}

            "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav"
            | "figure" | "table" | "tr" => {
                start_block(output);
                self.traverse_children(node, output, depth)?;
                start_block(output);
            }

            _ => self.traverse_children(node, output, depth)?,
        }

        Ok(())
    }

    fn handle_heading(
        &self,
        node: &Handle,
        level: usize,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        let mut content = String::new();
        self.traverse_children(node, &mut content, depth)?;
        let normalized = self.normalize_text(&content.replace("\\\n", " "));
        if normalized.is_empty() {
            return Ok(());
        }

        start_block(output);
        output.push_str(&"#".repeat(level));
        output.push(' ');
        output.push_str(&normalized);
        output.push_str("\n\n");

        Ok(())
    }

    fn handle_paragraph(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        start_block(output);

        let start_len = output.len();
        self.traverse_children(node, output, depth)?;

        if output[start_len..].trim().is_empty() {
            output.truncate(start_len);
        } else {
            output.push_str("\n\n");
        }

        Ok(())
    }

    fn handle_link(&self, node: &Handle, output: &mut String) {
        let href = attribute(node, "href");

        let mut link_text = String::new();
        extract_text(node, &mut link_text);
        let text = self.normalize_text(&link_text);

        if link_text.starts_with(char::is_whitespace) && !ends_with_space(output) {
            output.push(' ');
        }

        match href.as_deref().and_then(|url| self.security_validator.sanitize_url(url)) {
            Some(url) if !text.is_empty() => {
                output.push('[');
                output.push_str(&escape_markdown(&text, false));
                output.push_str("](");
                output.push_str(url);
                output.push(')');
            }
            // Missing or dangerous href, or no text: keep whatever text there is
            _ => {
                let line_start = at_line_start(output);
                output.push_str(&escape_markdown(&text, line_start));
            }
        }

        if link_text.ends_with(char::is_whitespace) {
            output.push(' ');
        }
    }

    fn handle_image(&self, node: &Handle, output: &mut String) {
        let alt = attribute(node, "alt").unwrap_or_default();
        let alt = self.normalize_text(&alt);

        let Some(src) = attribute(node, "src") else {
            return;
        };

        match self.security_validator.sanitize_url(&src) {
            Some(url) => {
                output.push_str("![");
                output.push_str(&escape_markdown(&alt, false));
                output.push_str("](");
                output.push_str(url);
                output.push(')');
            }
            None => {
                let line_start = at_line_start(output);
                output.push_str(&escape_markdown(&alt, line_start));
            }
        }
    }

    fn handle_list(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
        level: usize,
        ordered: bool,
    ) -> Result<(), CodecError> {
        if level == 0 {
            start_block(output);
        }

        let mut number: i64 = if ordered {
            attribute(node, "start")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(1)
        } else {
            1
        };

        for child in node.children.borrow().iter() {
            if let NodeData::Element { ref name, .. } = child.data
                && name.local.as_ref() == "li"
            {
                let marker = if !ordered {
                    format!("{} ", self.options.bullet)
                } else if self.options.number_ordered_lists {
                    format!("{}. ", number)
                } else {
                    "1. ".to_string()
                };
                self.handle_list_item(child, output, depth + 1, level, &marker)?;
                number += 1;
            }
        }

        if level == 0 {
            output.push('\n');
        }

        Ok(())
    }

    /// Write one list item: marker, text lines, then any nested lists
    fn handle_list_item(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
        level: usize,
        marker: &str,
    ) -> Result<(), CodecError> {
        self.security_validator.validate_depth(depth)?;

        let indent = "  ".repeat(level);
        let continuation = " ".repeat(marker.len());

        let mut content = String::new();
        let mut nested = String::new();
        for child in node.children.borrow().iter() {
            match child.data {
                NodeData::Element { ref name, .. } if name.local.as_ref() == "ul" => {
                    self.handle_list(child, &mut nested, depth + 1, level + 1, false)?;
                }
                NodeData::Element { ref name, .. } if name.local.as_ref() == "ol" => {
                    self.handle_list(child, &mut nested, depth + 1, level + 1, true)?;
                }
                _ => self.traverse_node(child, &mut content, depth + 1)?,
            }
        }

        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }

        output.push_str(&indent);
        output.push_str(marker);
        let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());
        if let Some(first) = lines.next() {
            output.push_str(first);
        }
        output.push('\n');
        for line in lines {
            output.push_str(&indent);
            output.push_str(&continuation);
            output.push_str(line);
            output.push('\n');
        }

        output.push_str(&nested);

        Ok(())
    }

    fn handle_code_block(&self, node: &Handle, output: &mut String) {
        start_block(output);

        let language = code_language(node).unwrap_or_default();

        let mut code = String::new();
        extract_code_content(node, &mut code);
        // html5ever already drops the newline directly after <pre>
        let fence = "`".repeat(longest_backtick_run(&code).max(2) + 1);

        output.push_str(&fence);
        output.push_str(&language);
        output.push('\n');
        output.push_str(&code);
        if !code.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&fence);
        output.push_str("\n\n");
    }

    fn handle_inline_code(&self, node: &Handle, output: &mut String) {
        let mut code = String::new();
        extract_code_content(node, &mut code);
        let code = code.replace('\n', " ");

        let ticks = "`".repeat(longest_backtick_run(&code) + 1);
        let pad = if code.contains('`') { " " } else { "" };

        output.push_str(&ticks);
        output.push_str(pad);
        output.push_str(&code);
        output.push_str(pad);
        output.push_str(&ticks);
    }

    /// Emphasis: `marker` on both sides of the children, whitespace kept outside
    fn handle_wrapped(
        &self,
        node: &Handle,
        marker: &str,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        let mut raw = String::new();
        extract_text(node, &mut raw);

        let mut inner = String::new();
        self.traverse_children(node, &mut inner, depth)?;
        let inner = inner.trim();
        if inner.is_empty() {
            if !raw.is_empty() && !ends_with_space(output) {
                output.push(' ');
            }
            return Ok(());
        }

        if raw.starts_with(char::is_whitespace) && !ends_with_space(output) {
            output.push(' ');
        }
        output.push_str(marker);
        output.push_str(inner);
        output.push_str(marker);
        if raw.ends_with(char::is_whitespace) {
            output.push(' ');
        }

        Ok(())
    }

    fn handle_blockquote(
        &self,
        node: &Handle,
        output: &mut String,
        depth: usize,
    ) -> Result<(), CodecError> {
        let mut inner = String::new();
        self.traverse_children(node, &mut inner, depth)?;
        let inner = self.normalize_output(inner);
        if inner.is_empty() {
            return Ok(());
        }

        start_block(output);
        for line in inner.lines() {
            if line.is_empty() {
                output.push_str(">\n");
            } else {
                output.push_str("> ");
                output.push_str(line);
                output.push('\n');
            }
        }
        output.push('\n');

        Ok(())
    }

    /// Collapse runs of whitespace to single spaces and trim
    fn normalize_text(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// LF only, no trailing whitespace, single blank lines, one final newline
    fn normalize_output(&self, output: String) -> String {
        let output = output.replace("\r\n", "\n");

        let mut result = String::with_capacity(output.len());
        let mut prev_blank = true;
        let mut open_fence: Option<usize> = None;

        for line in output.lines() {
            let trimmed = line.trim_end();
            let fence_len = trimmed.trim_start().chars().take_while(|c| *c == '`').count();

            match open_fence {
                Some(open) if fence_len >= open && trimmed.trim() == "`".repeat(fence_len) => {
                    open_fence = None;
                }
                Some(_) => {
                    // Inside a code block: keep blank lines and inner spacing
                    result.push_str(trimmed);
                    result.push('\n');
                    prev_blank = false;
                    continue;
                }
                None if fence_len >= 3 => open_fence = Some(fence_len),
                None => {}
            }

            if trimmed.is_empty() {
                if !prev_blank {
                    result.push('\n');
                    prev_blank = true;
                }
            } else {
                result.push_str(&normalize_line_whitespace(trimmed));
                result.push('\n');
                prev_blank = false;
            }
        }

        while result.ends_with("\n\n") {
            result.pop();
        }

        result
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `html` and convert it with default options
pub fn html_to_markdown(html: &str) -> Result<String, CodecError> {
    let dom = parse_html(html);
    MarkdownConverter::new().convert(&dom)
}

fn ends_with_space(output: &str) -> bool {
    output.is_empty() || output.ends_with(|c| c == ' ' || c == '\n')
}

/// True when only whitespace precedes the end of `output` on its last line
fn at_line_start(output: &str) -> bool {
    let line_begin = output.rfind('\n').map_or(0, |i| i + 1);
    output[line_begin..].trim().is_empty()
}

/// Characters with inline meaning anywhere in Markdown text
const INLINE_SYNTAX: &[char] = &['\\', '*', '_', '`', '[', ']'];

/// Backslash-escape `text` so Markdown reads it literally
///
/// Inline syntax is escaped everywhere. Block markers (`#`, `>`, `-`, `+ `,
/// `=`, `~~~`, `1.`, `1)`) are escaped only when the text begins a line.
fn escape_markdown(text: &str, at_line_start: bool) -> String {
    let marker_at = if at_line_start {
        block_marker_position(text)
    } else {
        None
    };

    let mut escaped = String::with_capacity(text.len() + 4);
    for (index, ch) in text.char_indices() {
        if marker_at == Some(index) || INLINE_SYNTAX.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Byte index of the character that would make `text` open a block
fn block_marker_position(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let space_or_end = |index: usize| bytes.get(index).is_none_or(|b| *b == b' ');

    match bytes.first()? {
        b'#' | b'>' | b'-' | b'=' => Some(0),
        b'+' if space_or_end(1) => Some(0),
        b'~' if text.starts_with("~~~") => Some(0),
        b'0'..=b'9' => {
            // Ordered list markers have at most nine digits
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            let delimiter = matches!(bytes.get(digits), Some(b'.' | b')'));
            (digits <= 9 && delimiter && space_or_end(digits + 1)).then_some(digits)
        }
        _ => None,
    }
}

/// Make sure the next block starts after a blank line
fn start_block(output: &mut String) {
    if output.trim().is_empty() {
        return;
    }
    let trimmed_len = output.trim_end_matches(' ').len();
    output.truncate(trimmed_len);
    if !output.ends_with("\n\n") {
        if output.ends_with('\n') {
            output.push('\n');
        } else {
            output.push_str("\n\n");
        }
    }
}

fn attribute(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { ref attrs, .. } = node.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

/// Language from `class="language-x"` / `lang-x` on the `<pre>` or its `<code>`
fn code_language(pre: &Handle) -> Option<String> {
    let from_class = |node: &Handle| {
        attribute(node, "class").and_then(|classes| {
            classes.split_whitespace().find_map(|class| {
                class
                    .strip_prefix("language-")
                    .or_else(|| class.strip_prefix("lang-"))
                    .filter(|lang| !lang.is_empty())
                    .map(str::to_string)
            })
        })
    };

    pre.children
        .borrow()
        .iter()
        .filter(|child| {
            matches!(child.data, NodeData::Element { ref name, .. } if name.local.as_ref() == "code")
        })
        .find_map(from_class)
        .or_else(|| from_class(pre))
}

/// Raw text of a subtree, no normalization
fn extract_code_content(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => output.push_str(&contents.borrow()),
        NodeData::Element { .. } => {
            for child in node.children.borrow().iter() {
                extract_code_content(child, output);
            }
        }
        _ => {}
    }
}

/// Text of a subtree, skipping dropped elements
fn extract_text(node: &Handle, output: &mut String) {
    match node.data {
        NodeData::Text { ref contents } => output.push_str(&contents.borrow()),
        NodeData::Element { ref name, .. } => {
            if SecurityValidator::new().check_element(name.local.as_ref()) == SanitizeAction::Remove
            {
                return;
            }
            for child in node.children.borrow().iter() {
                extract_text(child, output);
            }
        }
        _ => {}
    }
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Collapse inner space runs, keeping indentation and inline code intact
fn normalize_line_whitespace(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut prev_space = false;
    let mut at_start = true;
    let mut in_inline_code = false;
    let mut escaped = false;

    for ch in line.chars() {
        if escaped {
            // Backslash-escaped character, never a code delimiter
            result.push(ch);
            escaped = false;
            prev_space = false;
            at_start = false;
        } else if ch == '\\' && !in_inline_code {
            result.push(ch);
            escaped = true;
            prev_space = false;
            at_start = false;
        } else if ch == '`' {
            in_inline_code = !in_inline_code;
            result.push(ch);
            prev_space = false;
            at_start = false;
        } else if ch == ' ' {
            if in_inline_code || at_start || !prev_space {
                result.push(ch);
            }
            prev_space = !at_start && !in_inline_code;
        } else {
            result.push(ch);
            prev_space = false;
            at_start = false;
        }
    }

    result
}
