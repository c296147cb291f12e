//! Identifier tokenization shared by the index builders and query parsing.

/// Split text into words on any non-alphanumeric character, then split each
/// word on case boundaries. Case is preserved.
///
/// Acronyms stay together: `UIViewController` yields `UI`, `View`, `Controller`.
pub fn split_identifier(text: &str) -> Vec<String> {
    words(text).flat_map(camel_parts).collect()
}

/// Case-preserving token set: every whole word plus its case-boundary parts,
/// deduplicated in first-seen order.
pub fn tokenize_preserving_case(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in words(text) {
        push_unique(&mut tokens, word.to_string());
        for part in camel_parts(word) {
            push_unique(&mut tokens, part);
        }
    }
    tokens
}

/// Lower-cased token set used for index entries and queries.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in tokenize_preserving_case(text) {
        push_unique(&mut tokens, token.to_lowercase());
    }
    tokens
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

fn camel_parts(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn push_unique(tokens: &mut Vec<String>, token: String) {
    if !token.is_empty() && !tokens.contains(&token) {
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_with_acronyms() {
        assert_eq!(
            split_identifier("UIViewController"),
            vec!["UI", "View", "Controller"]
        );
        assert_eq!(split_identifier("NavigationView"), vec!["Navigation", "View"]);
        assert_eq!(split_identifier("URLSession"), vec!["URL", "Session"]);
        assert_eq!(split_identifier("view"), vec!["view"]);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            split_identifier("frame(width:height:)"),
            vec!["frame", "width", "height"]
        );
        assert_eq!(
            split_identifier("/documentation/swiftui/view"),
            vec!["documentation", "swiftui", "view"]
        );
    }

    #[test]
    fn test_tokenize_includes_whole_word_lowercased() {
        assert_eq!(
            tokenize("NavigationView"),
            vec!["navigationview", "navigation", "view"]
        );
        assert_eq!(
            tokenize_preserving_case("NavigationView"),
            vec!["NavigationView", "Navigation", "View"]
        );
    }

    #[test]
    fn test_tokenize_dedupes() {
        assert_eq!(tokenize("View view VIEW"), vec!["view"]);
        assert!(tokenize("  ").is_empty());
    }
}
