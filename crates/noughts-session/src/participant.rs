//! Participant records and display-name normalization.
//!
//! A participant is one connection that has sent `join`. It carries only
//! its identity and display name. Which match it sits in, and with which
//! mark, is looked up in the [`SessionRegistry`](crate::SessionRegistry)
//! by id; nothing here points at a match.

use noughts_transport::ConnectionId;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for participant handling.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Longest display name kept, in characters. Longer names are cut.
    ///
    /// Default: 24.
    pub max_name_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_name_len: 24 }
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// One connected, identified player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ConnectionId,
    name: String,
}

impl Participant {
    /// Creates a participant, normalizing the requested name.
    pub fn new(id: ConnectionId, requested_name: Option<&str>, config: &SessionConfig) -> Self {
        Self {
            id,
            name: normalize_display_name(requested_name, id, config.max_name_len),
        }
    }

    /// The connection this participant speaks through.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The normalized display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Trims the requested name and cuts it to `max_len` characters.
///
/// A missing or blank name becomes the connection id's display form
/// (for example `conn-7`). Truncation counts `char`s, so multi-byte names
/// are never split mid-character.
pub fn normalize_display_name(
    requested: Option<&str>,
    fallback: ConnectionId,
    max_len: usize,
) -> String {
    let trimmed = requested.map(str::trim).unwrap_or_default();
    let name: String = trimmed.chars().take(max_len).collect();
    let name = name.trim_end();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_display_name(Some("  ada \n"), cid(1), 24), "ada");
    }

    #[test]
    fn test_normalize_blank_uses_connection_id() {
        assert_eq!(normalize_display_name(Some("   "), cid(7), 24), "conn-7");
        assert_eq!(normalize_display_name(None, cid(8), 24), "conn-8");
    }

    #[test]
    fn test_normalize_truncates_to_bound() {
        let name = normalize_display_name(Some("abcdefghijklmnopqrstuvwxyz"), cid(1), 5);
        assert_eq!(name, "abcde");
    }

    #[test]
    fn test_normalize_counts_chars_not_bytes() {
        let name = normalize_display_name(Some("ééééé"), cid(1), 3);
        assert_eq!(name, "ééé");
    }

    #[test]
    fn test_normalize_drops_whitespace_exposed_by_truncation() {
        assert_eq!(normalize_display_name(Some("ab   cd"), cid(1), 4), "ab");
    }

    #[test]
    fn test_participant_new_applies_config() {
        let config = SessionConfig { max_name_len: 3 };
        let p = Participant::new(cid(2), Some("grace"), &config);
        assert_eq!(p.id(), cid(2));
        assert_eq!(p.name(), "gra");
    }

    #[test]
    fn test_session_config_default() {
        assert_eq!(SessionConfig::default().max_name_len, 24);
    }
}
