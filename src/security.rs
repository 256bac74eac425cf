//! Sanitization rules for HTML → Markdown conversion
//!
//! Untrusted HTML may carry scripts, plugin embeds and URLs that execute code
//! when clicked. The converter consults [`SecurityValidator`] to:
//!
//! 1. Drop executable or non-content elements together with their children
//! 2. Render links and images with dangerous URLs as plain text
//! 3. Bound recursion depth so deeply nested input cannot exhaust the stack
//!
//! html5ever does not resolve external entities, so XML entity expansion is
//! not a concern here.

use crate::error::CodecError;

/// Default maximum nesting depth for HTML elements
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Elements removed with all their content
const DANGEROUS_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "iframe", "object", "embed", "applet", "link", "base",
    "template",
];

/// URL schemes never emitted as link or image targets
const DANGEROUS_URL_SCHEMES: &[&str] = &["javascript:", "vbscript:", "file:", "about:"];

/// Inline raster images are the only `data:` URLs let through
const SAFE_DATA_URL_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/jpeg",
    "data:image/gif",
    "data:image/webp",
];

/// Action to take for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeAction {
    /// Convert the element normally
    Allow,
    /// Skip the element and all its children
    Remove,
}

/// Security policy applied during conversion
#[derive(Debug, Clone)]
pub struct SecurityValidator {
    max_depth: usize,
}

impl SecurityValidator {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Create a validator with a custom maximum depth
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decide what to do with an element by tag name
    ///
    /// ```
    /// use text_codec_kit::security::{SanitizeAction, SecurityValidator};
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.check_element("script"), SanitizeAction::Remove);
    /// assert_eq!(validator.check_element("div"), SanitizeAction::Allow);
    /// ```
    pub fn check_element(&self, tag_name: &str) -> SanitizeAction {
        if DANGEROUS_ELEMENTS.contains(&tag_name) {
            SanitizeAction::Remove
        } else {
            SanitizeAction::Allow
        }
    }

    /// Check whether a URL uses a scheme that can execute code
    ///
    /// Browsers ignore ASCII whitespace and control characters inside a
    /// scheme (`java\tscript:`), so those are removed before comparing.
    ///
    /// ```
    /// use text_codec_kit::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert!(validator.is_dangerous_url("javascript:alert('xss')"));
    /// assert!(validator.is_dangerous_url("data:text/html,<script>alert(1)</script>"));
    /// assert!(!validator.is_dangerous_url("data:image/png;base64,iVBORw0KGgo="));
    /// assert!(!validator.is_dangerous_url("/relative/path"));
    /// ```
    pub fn is_dangerous_url(&self, url: &str) -> bool {
        let normalized: String = url
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
            .take(32)
            .collect::<String>()
            .to_ascii_lowercase();

        if normalized.starts_with("data:") {
            return !SAFE_DATA_URL_PREFIXES
                .iter()
                .any(|prefix| normalized.starts_with(prefix));
        }

        DANGEROUS_URL_SCHEMES
            .iter()
            .any(|scheme| normalized.starts_with(scheme))
    }

    /// `None` for dangerous URLs, the trimmed URL otherwise
    pub fn sanitize_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        if self.is_dangerous_url(url) {
            None
        } else {
            Some(url.trim())
        }
    }

    /// Fail once `depth` exceeds the configured maximum
    pub fn validate_depth(&self, depth: usize) -> Result<(), CodecError> {
        if depth > self.max_depth {
            Err(CodecError::InvalidInput(format!(
                "HTML nesting depth {} exceeds maximum allowed depth {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for SecurityValidator {
    fn default() -> Self {
        Self::new()
    }
}
