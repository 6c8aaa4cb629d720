use crate::domain::input::NameKey;

pub const MAX_NAME_LENGTH: usize = 12;
pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

/// Text buffer behind the high-score name entry screen.
///
/// Keys outside the allowed set, or past the length limit, are dropped silently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntry {
    buffer: String,
}

impl NameEntry {
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Applies one key press. Returns false when the key was ignored.
    pub fn press(&mut self, key: NameKey) -> bool {
        match key {
            NameKey::Backspace => self.buffer.pop().is_some(),
            NameKey::Space => self.push(' '),
            NameKey::Char(c) if is_allowed(c) => self.push(c),
            NameKey::Char(_) => false,
        }
    }

    /// Replaces the buffer with `text`, keeping only what typing it would have kept.
    pub fn replace(&mut self, text: &str) {
        self.buffer.clear();
        for c in text.chars() {
            self.press(NameKey::Char(c));
        }
    }

    /// Name to persist: trimmed buffer, or the default when nothing printable was typed.
    pub fn submitted_name(&self) -> String {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn push(&mut self, c: char) -> bool {
        if self.buffer.chars().count() >= MAX_NAME_LENGTH {
            return false;
        }
        self.buffer.push(c);
        true
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '\t' | '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> NameEntry {
        let mut entry = NameEntry::default();
        entry.replace(text);
        entry
    }

    #[test]
    fn when_allowed_character_is_pressed_then_it_is_appended() {
        assert_eq!(typed("Ace_Pilot-1.").as_str(), "Ace_Pilot-1.");
    }

    #[test]
    fn when_disallowed_character_is_pressed_then_it_is_ignored() {
        let mut entry = NameEntry::default();
        assert!(!entry.press(NameKey::Char('!')));
        assert!(!entry.press(NameKey::Char('é')));
        assert!(entry.press(NameKey::Char('a')));
        assert_eq!(entry.as_str(), "a");
    }

    #[test]
    fn when_buffer_is_full_then_further_keys_are_ignored() {
        let mut entry = typed("ABCDEFGHIJKL");
        assert!(!entry.press(NameKey::Char('M')));
        assert!(!entry.press(NameKey::Space));
        assert_eq!(entry.as_str(), "ABCDEFGHIJKL");
    }

    #[test]
    fn when_backspace_is_pressed_then_last_character_is_removed() {
        let mut entry = typed("Ace");
        assert!(entry.press(NameKey::Backspace));
        assert_eq!(entry.as_str(), "Ac");

        let mut empty = NameEntry::default();
        assert!(!empty.press(NameKey::Backspace));
    }

    #[test]
    fn when_name_is_submitted_then_it_is_trimmed() {
        let mut entry = NameEntry::default();
        entry.press(NameKey::Space);
        entry.press(NameKey::Char('Z'));
        entry.press(NameKey::Space);
        assert_eq!(entry.submitted_name(), "Z");
    }

    #[test]
    fn when_name_is_blank_then_anonymous_is_used() {
        assert_eq!(NameEntry::default().submitted_name(), "Anonymous");
        assert_eq!(typed("   ").submitted_name(), "Anonymous");
    }
}
