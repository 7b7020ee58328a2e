//! Link validation
//!
//! A plain substring check, not URL parsing. Short links, embed hosts and
//! links pasted inside other text all pass.

/// Host substrings that mark a message as a YouTube link
pub const SUPPORTED_LINK_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// Returns true if `text` contains one of the recognized YouTube hosts.
///
/// # Examples
/// ```
/// use tubemux::core::validation::is_supported_link;
///
/// assert!(is_supported_link("https://youtu.be/abc123"));
/// assert!(is_supported_link("https://m.youtube.com/watch?v=abc123&t=10"));
/// assert!(!is_supported_link("https://vimeo.com/123"));
/// ```
pub fn is_supported_link(text: &str) -> bool {
    SUPPORTED_LINK_HOSTS.iter().any(|host| text.contains(host))
}
