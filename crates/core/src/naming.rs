//! Frame naming convention.
//!
//! Captured frames are named `{identity}{index}.jpg`, where `identity` is the
//! signed-in user's handle and `index` is the 1-based position in the capture
//! sequence.

/// Identity used when no authenticated handle is available.
pub const FALLBACK_IDENTITY: &str = "frame";

/// Derive the identity label from an optional user handle.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced by `_` so the label is
/// always a safe file name component. An absent or blank handle yields
/// [`FALLBACK_IDENTITY`].
///
/// # Examples
///
/// ```
/// use attend_core::naming::identity_label;
///
/// assert_eq!(identity_label(Some("alice")), "alice");
/// assert_eq!(identity_label(Some("bob.smith")), "bob_smith");
/// assert_eq!(identity_label(None), "frame");
/// ```
pub fn identity_label(handle: Option<&str>) -> String {
    let handle = match handle.map(str::trim) {
        Some(h) if !h.is_empty() => h,
        _ => return FALLBACK_IDENTITY.to_string(),
    };

    handle
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name for frame `index` captured under `identity`.
///
/// ```
/// use attend_core::naming::frame_file_name;
///
/// assert_eq!(frame_file_name("alice", 3), "alice3.jpg");
/// ```
pub fn frame_file_name(identity: &str, index: u32) -> String {
    format!("{identity}{index}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_handle_falls_back() {
        assert_eq!(identity_label(Some("   ")), FALLBACK_IDENTITY);
        assert_eq!(identity_label(Some("")), FALLBACK_IDENTITY);
    }

    #[test]
    fn handle_is_trimmed_and_sanitized() {
        assert_eq!(identity_label(Some("  carol ")), "carol");
        assert_eq!(identity_label(Some("../etc")), "___etc");
        assert_eq!(identity_label(Some("dana-k_2")), "dana-k_2");
    }

    #[test]
    fn fallback_frame_names() {
        let id = identity_label(None);
        assert_eq!(frame_file_name(&id, 1), "frame1.jpg");
        assert_eq!(frame_file_name(&id, 5), "frame5.jpg");
    }
}
