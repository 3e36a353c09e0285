//! Backend-neutral key classification.

/// Classification of one key press.
///
/// Backend implementations map their native key codes to these values; the
/// lock state machine only ever sees a `Key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable character (letters, digits, symbols, space)
    Char(char),
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Escape key
    Escape,
    /// Anything else (modifiers, function keys, control characters)
    Unknown,
}

impl Key {
    /// Classifies the text a key press produced.
    ///
    /// Exactly one non-control character yields [`Key::Char`]; empty text,
    /// multi-character compose output, and control characters are
    /// [`Key::Unknown`].
    pub fn from_text(text: &str) -> Self {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Key::Char(c),
            _ => Key::Unknown,
        }
    }

    /// Name used in debug logs. Never reveals which character was typed.
    pub fn log_name(&self) -> &'static str {
        match self {
            Key::Char(_) => "printable",
            Key::Return => "Return",
            Key::Backspace => "Backspace",
            Key::Escape => "Escape",
            Key::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_printable_char_is_char() {
        assert_eq!(Key::from_text("a"), Key::Char('a'));
        assert_eq!(Key::from_text(" "), Key::Char(' '));
        assert_eq!(Key::from_text("é"), Key::Char('é'));
    }

    #[test]
    fn control_and_empty_text_are_unknown() {
        assert_eq!(Key::from_text(""), Key::Unknown);
        assert_eq!(Key::from_text("\t"), Key::Unknown);
        assert_eq!(Key::from_text("\u{1b}"), Key::Unknown);
        assert_eq!(Key::from_text("\r"), Key::Unknown);
    }

    #[test]
    fn multi_char_text_is_unknown() {
        assert_eq!(Key::from_text("ab"), Key::Unknown);
    }

    #[test]
    fn log_name_hides_character() {
        assert_eq!(Key::Char('s').log_name(), "printable");
    }
}
