/// Escapes special characters for MarkdownV2 format
///
/// Every character Telegram reserves in MarkdownV2 text is prefixed with a
/// backslash, so the result renders literally.
///
/// # Example
///
/// ```
/// use chanbot::core::utils::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("1. News!"), "1\\. News\\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '_' => result.push_str("\\_"),
            '*' => result.push_str("\\*"),
            '[' => result.push_str("\\["),
            ']' => result.push_str("\\]"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            '~' => result.push_str("\\~"),
            '`' => result.push_str("\\`"),
            '>' => result.push_str("\\>"),
            '#' => result.push_str("\\#"),
            '+' => result.push_str("\\+"),
            '-' => result.push_str("\\-"),
            '=' => result.push_str("\\="),
            '|' => result.push_str("\\|"),
            '{' => result.push_str("\\{"),
            '}' => result.push_str("\\}"),
            '.' => result.push_str("\\."),
            '!' => result.push_str("\\!"),
            _ => result.push(c),
        }
    }

    result
}

/// Escapes the URL part of a MarkdownV2 inline link `[label](url)`.
///
/// Inside the parentheses only `)` and `\` must be escaped.
pub fn escape_markdown_v2_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len() + 4);
    for c in url.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ')' => result.push_str("\\)"),
            _ => result.push(c),
        }
    }
    result
}

/// Builds a MarkdownV2 inline link with both parts escaped.
pub fn markdown_v2_link(label: &str, url: &str) -> String {
    format!("[{}]({})", escape_markdown_v2(label), escape_markdown_v2_url(url))
}

/// Turns MarkdownV2 text back into what the reader would have seen.
///
/// Escapes are resolved, `*`, `_`, `~` and backtick markers are dropped and
/// inline links become `label (url)`. Used when Telegram rejects the markup
/// and the message is resent without a parse mode.
///
/// ```
/// use chanbot::core::utils::markdown_v2_to_plain;
///
/// assert_eq!(markdown_v2_to_plain("*Hi*\\!"), "Hi!");
/// ```
pub fn markdown_v2_to_plain(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_link_label = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    result.push(escaped);
                }
            }
            '*' | '_' | '~' | '`' => {}
            '[' => in_link_label = true,
            ']' if in_link_label => {
                in_link_label = false;
                if chars.peek() == Some(&'(') {
                    chars.next();
                    let mut url = String::new();
                    while let Some(u) = chars.next() {
                        match u {
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    url.push(escaped);
                                }
                            }
                            ')' => break,
                            _ => url.push(u),
                        }
                    }
                    result.push_str(" (");
                    result.push_str(&url);
                    result.push(')');
                }
            }
            _ => result.push(c),
        }
    }

    result
}
