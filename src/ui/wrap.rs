/// Fill each paragraph to `width` columns. Blank lines separate paragraphs;
/// single newlines inside a paragraph are folded like any other whitespace.
pub fn wrap_text(text: &str, width: usize) -> String {
    paragraphs(text)
        .map(|paragraph| fill(&paragraph, width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn paragraphs(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split("\n\n")
        .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|p| !p.is_empty())
}

/// Greedy fill. Words longer than `width` are split at character boundaries.
fn fill(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }
        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }

        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current_len = chars.len();
        current = chars.into_iter().collect();
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}
