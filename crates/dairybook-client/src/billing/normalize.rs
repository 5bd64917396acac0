/// Matching key for customer names across tables: case-folded with runs of
/// whitespace collapsed to a single space. `None` for blank input.
pub fn customer_key(value: &str) -> Option<String> {
    let mut output = String::new();
    for token in value.split_whitespace() {
        if !output.is_empty() {
            output.push(' ');
        }
        output.push_str(&token.to_lowercase());
    }

    if output.is_empty() {
        return None;
    }
    Some(output)
}

/// Header comparison key: trimmed and lowercased.
pub fn header_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Header key with separators dropped, so `Amount Billed`, `amount_billed`
/// and `AmountBilled` compare equal.
pub fn compact_header_key(value: &str) -> String {
    value
        .chars()
        .filter(|character| character.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
