//! Media path classification and display-name derivation.
//!
//! Host file paths routinely carry cache-busting query strings or
//! fragments (`tokens/orc.webm?1699...`), so every classification and
//! comparison in the crate goes through [`strip_query`] first. Raw
//! paths are only ever handed back to the host verbatim for playback.

/// Extensions treated as still images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "apng", "jpg", "jpeg", "gif", "webp", "avif", "svg",
];

/// Extensions treated as video.
pub const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "m4v", "ogv", "mov", "mkv"];

/// Classification of a media path by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    /// Extension is not a recognized media type.
    Other,
}

impl MediaKind {
    #[must_use]
    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }

    #[must_use]
    pub fn is_image(self) -> bool {
        self == MediaKind::Image
    }
}

/// Returns the path up to (but not including) the first `?` or `#`.
///
/// # Example
///
/// ```
/// use media_orb::domain::strip_query;
///
/// assert_eq!(strip_query("a/b.webm?x=1#frag"), "a/b.webm");
/// assert_eq!(strip_query("a/b.webm"), "a/b.webm");
/// ```
#[must_use]
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Lowercased extension of the stripped path, if any.
fn extension(path: &str) -> Option<String> {
    let stripped = strip_query(path);
    let base = stripped.rsplit('/').next().unwrap_or(stripped);
    let dot = base.rfind('.')?;
    let ext = &base[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Classifies a path as image, video, or other.
///
/// Query strings and fragments are ignored; matching is
/// case-insensitive.
#[must_use]
pub fn media_kind(path: &str) -> MediaKind {
    match extension(path) {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Image,
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Other,
    }
}

/// True when the path carries a recognized image or video extension.
#[must_use]
pub fn has_media_extension(path: &str) -> bool {
    media_kind(path) != MediaKind::Other
}

/// Final path component of the stripped path.
#[must_use]
pub fn basename(path: &str) -> &str {
    let stripped = strip_query(path);
    stripped.rsplit('/').next().unwrap_or(stripped)
}

/// Sanitizes a name for display by removing characters outside the
/// allowed set: ASCII letters, CJK ideographs (U+4E00..=U+9FA5),
/// whitespace, underscore, hyphen, and dot. Digits are not in the set
/// and are dropped.
#[must_use]
pub fn sanitize_display(name: &str) -> String {
    name.chars()
        .filter(|c| {
            c.is_ascii_alphabetic()
                || ('\u{4e00}'..='\u{9fa5}').contains(c)
                || c.is_whitespace()
                || matches!(c, '_' | '-' | '.')
        })
        .collect()
}

/// Display name for a media path.
///
/// An alias, when present and non-empty after trimming, wins outright.
/// Otherwise the name is the sanitized basename of the stripped path
/// (extension included, digits and punctuation dropped), falling back
/// to the raw basename when sanitization leaves nothing.
#[must_use]
pub fn display_name(path: &str, alias: Option<&str>) -> String {
    if let Some(alias) = alias {
        let trimmed = alias.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let base = basename(path);
    let cleaned = sanitize_display(base);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        base.to_string()
    } else {
        cleaned.to_string()
    }
}
