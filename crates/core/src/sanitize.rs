//! Free-text sanitization applied before validation.
//!
//! Removes control and markup characters and trims the ends. Interior
//! spacing and every other character are left alone, so the field
//! validators can still reject bad input with a message instead of it
//! silently changing.

/// Characters that are never meaningful in a quote's free-text fields.
const MARKUP_CHARS: [char; 5] = ['<', '>', '`', '{', '}'];

fn is_stripped(c: char) -> bool {
    (c.is_control() && !c.is_whitespace()) || MARKUP_CHARS.contains(&c)
}

/// Sanitize one free-text value.
pub fn sanitize_text(input: &str) -> String {
    let kept: String = input.chars().filter(|&c| !is_stripped(c)).collect();
    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_input_is_unchanged() {
        assert_eq!(sanitize_text("John Smith"), "John Smith");
        assert_eq!(sanitize_text("O'Brien, \"Pro\" Roofing"), "O'Brien, \"Pro\" Roofing");
    }

    #[test]
    fn trims_ends_only() {
        assert_eq!(sanitize_text("  John Smith\n"), "John Smith");
        assert_eq!(sanitize_text("John  Smith"), "John  Smith");
        assert_eq!(sanitize_text(" Mary-Jo \t O'Neil "), "Mary-Jo \t O'Neil");
    }

    #[test]
    fn strips_markup_and_control_characters() {
        assert_eq!(sanitize_text("<b>Acme</b>"), "bAcme/b");
        assert_eq!(sanitize_text("Ac\u{0}me\u{7}"), "Acme");
        assert_eq!(sanitize_text("{{Austin}}"), "Austin");
    }

    #[test]
    fn leaves_other_characters_for_validation() {
        assert_eq!(sanitize_text("John3"), "John3");
        assert_eq!(sanitize_text("St. Louis"), "St. Louis");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(sanitize_text(" \t\n "), "");
    }
}
