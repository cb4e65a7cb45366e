//! Identifier hygiene for generated Rust source.
//!
//! Database object names arrive in whatever casing and punctuation the
//! schema uses; everything emitted into source files goes through these
//! helpers first.

/// Keywords that need a raw-identifier prefix when used as names.
/// `self`, `super` and `crate` are excluded since they cannot be raw
/// identifiers at all and get an underscore suffix instead.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Convert a database name into a valid snake_case Rust identifier.
///
/// Word boundaries are detected at case changes and at runs of
/// non-alphanumeric characters; keywords come out raw-prefixed and a
/// leading digit gets an underscore.
pub fn to_snake_ident(raw: &str) -> String {
    let mut ident = String::with_capacity(raw.len());
    let mut prev: Option<char> = None;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                ident.push('_');
            }
            ident.push(ch.to_ascii_lowercase());
        } else if !ident.is_empty() && !ident.ends_with('_') {
            ident.push('_');
        }
        prev = Some(ch);
    }
    while ident.ends_with('_') {
        ident.pop();
    }

    if ident.is_empty() {
        return "unnamed".to_string();
    }
    if ident.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return format!("_{ident}");
    }
    match ident.as_str() {
        "self" | "super" | "crate" => format!("{ident}_"),
        _ if KEYWORDS.contains(&ident.as_str()) => format!("r#{ident}"),
        _ => ident,
    }
}

/// Convert a database name into a PascalCase type name.
pub fn to_pascal_case(raw: &str) -> String {
    let snake = to_snake_ident(raw);
    let snake = snake.strip_prefix("r#").unwrap_or(&snake);

    let mut out = String::with_capacity(snake.len());
    for word in snake.split('_').filter(|word| !word.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }

    if out.is_empty() {
        return "Unnamed".to_string();
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return format!("T{out}");
    }
    if out == "Self" {
        return "SelfRow".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_keeps_plain_names() {
        assert_eq!(to_snake_ident("user_accounts"), "user_accounts");
        assert_eq!(to_snake_ident("email"), "email");
    }

    #[test]
    fn snake_splits_camel_case() {
        assert_eq!(to_snake_ident("userId"), "user_id");
        assert_eq!(to_snake_ident("OrderItems"), "order_items");
    }

    #[test]
    fn snake_escapes_keywords() {
        assert_eq!(to_snake_ident("type"), "r#type");
        assert_eq!(to_snake_ident("match"), "r#match");
        assert_eq!(to_snake_ident("self"), "self_");
    }

    #[test]
    fn snake_guards_leading_digits_and_squeezes_separators() {
        assert_eq!(to_snake_ident("2fa codes"), "_2fa_codes");
        assert_eq!(to_snake_ident("a--b"), "a_b");
        assert_eq!(to_snake_ident(""), "unnamed");
    }

    #[test]
    fn pascal_cases_table_names() {
        assert_eq!(to_pascal_case("user_accounts"), "UserAccounts");
        assert_eq!(to_pascal_case("orders"), "Orders");
        assert_eq!(to_pascal_case("orderItems"), "OrderItems");
    }

    #[test]
    fn pascal_handles_edge_names() {
        assert_eq!(to_pascal_case("type"), "Type");
        assert_eq!(to_pascal_case("2fa_codes"), "T2faCodes");
        assert_eq!(to_pascal_case("self"), "SelfRow");
    }
}
