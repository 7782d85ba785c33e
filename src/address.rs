//! Address canonicalization helpers

const GMAIL_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Canonicalize a free-form address header into a lowercase address.
///
/// Accepts `"Name <user@host>"`, `"user@host (Comment)"` or a bare address.
/// Gmail addresses lose their `+alias` suffix and the dots of the local part,
/// and `googlemail.com` becomes `gmail.com`. Returns `None` when no address
/// with an `@` can be extracted.
pub fn normalize_email(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let email = extract_address(raw)?.to_lowercase();
    let (local, domain) = email.split_once('@')?;

    if GMAIL_DOMAINS.contains(&domain) {
        let local = local.split('+').next().unwrap_or_default().replace('.', "");
        return Some(format!("{}@gmail.com", local));
    }

    Some(format!("{}@{}", local, domain))
}

/// Pull the bare address out of a header value
fn extract_address(raw: &str) -> Option<String> {
    if let Some(start) = raw.rfind('<') {
        let rest = &raw[start + 1..];
        let end = rest.find('>').unwrap_or(rest.len());
        let inner = rest[..end].trim();
        return (!inner.is_empty()).then(|| inner.to_string());
    }

    let stripped = strip_comments(raw);
    stripped
        .split_whitespace()
        .find(|token| token.contains('@'))
        .map(|token| {
            token
                .trim_matches(|c| matches!(c, '"' | ',' | ';' | '<' | '>'))
                .to_string()
        })
}

fn strip_comments(raw: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_gmail_alias_and_dots_are_stripped() {
        assert_eq!(
            normalize_email(Some("Name <User+alias@GMail.com>")),
            Some("user@gmail.com".to_string())
        );
        assert_eq!(
            normalize_email(Some("first.last+news@googlemail.com")),
            Some("firstlast@gmail.com".to_string())
        );
    }

    #[test]
    fn test_other_domains_only_lowercased() {
        assert_eq!(
            normalize_email(Some("plain@Example.COM")),
            Some("plain@example.com".to_string())
        );
        assert_eq!(
            normalize_email(Some("First.Last+tag@example.com")),
            Some("first.last+tag@example.com".to_string())
        );
    }

    #[test]
    fn test_absent_or_empty_input() {
        assert_eq!(normalize_email(None), None);
        assert_eq!(normalize_email(Some("")), None);
        assert_eq!(normalize_email(Some("   ")), None);
    }

    #[test]
    fn test_input_without_at_sign() {
        assert_eq!(normalize_email(Some("Support Team <support>")), None);
        assert_eq!(normalize_email(Some("not an address")), None);
        assert_eq!(normalize_email(Some("Name <>")), None);
    }

    #[test]
    fn test_comment_is_ignored() {
        assert_eq!(
            normalize_email(Some("jane@Example.org (Jane Doe)")),
            Some("jane@example.org".to_string())
        );
    }

    #[test]
    fn test_stray_angle_bracket_is_dropped() {
        assert_eq!(
            normalize_email(Some("user@Example.com>")),
            Some("user@example.com".to_string())
        );
    }

    #[test]
    fn test_normalization_is_a_fixed_point() {
        let inputs = [
            "Name <User+alias@GMail.com>",
            "plain@Example.COM",
            "a.b.c+x+y@googlemail.com",
            "+only@gmail.com",
            "\"Quoted\" <Mixed.Case@Sub.Example.net>",
        ];

        for input in inputs {
            let once = normalize_email(Some(input));
            let twice = normalize_email(once.as_deref());
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }
}
