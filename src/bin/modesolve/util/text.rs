/// Greedy word wrap by character count. Words longer than `width` (long
/// paths in error messages, mostly) are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        if current_len > 0 && current_len + 1 + word.len() <= width {
            current.push(' ');
            current.extend(&word);
            current_len += 1 + word.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while word.len() > width {
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        current_len = word.len();
        current = word.into_iter().collect();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len == 0 {
        return String::new();
    }

    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_fits_on_one_line() {
        assert_eq!(wrap("secular frequency", 40), vec!["secular frequency"]);
    }

    #[test]
    fn wrap_breaks_between_words() {
        assert_eq!(
            wrap("ions repel along the axis", 12),
            vec!["ions repel", "along the", "axis"]
        );
    }

    #[test]
    fn wrap_splits_overlong_words() {
        assert_eq!(
            wrap("see /tmp/abcdefghij", 6),
            vec!["see", "/tmp/a", "bcdefg", "hij"]
        );
    }

    #[test]
    fn wrap_empty_text_yields_one_line() {
        assert_eq!(wrap("   ", 10), vec![String::new()]);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Ca40", 4), "Ca40");
    }

    #[test]
    fn truncate_marks_the_cut() {
        assert_eq!(truncate("Equilibrium Search", 8), "Equilib…");
        assert_eq!(truncate("Ca40 × 12", 6), "Ca40 …");
        assert_eq!(truncate("abc", 0), "");
    }
}
