/// Autolink recognition.
///
/// Covers the angle-bracket forms `<scheme:...>` and `<user@host>`, plus the
/// extension's bare URLs (`http://`, `https://`, `www.`) in running text.
pub struct Autolink;

impl Autolink {
    pub const OPEN: char = '<';
    pub const CLOSE: char = '>';
    pub const MAX_SCHEME_LEN: usize = 32;

    /// `scheme:rest` where the scheme is 2..=32 chars, starts with a letter,
    /// and the rest contains no whitespace or angle brackets.
    pub fn is_uri(inner: &str) -> bool {
        let Some(colon) = inner.find(':') else {
            return false;
        };
        let scheme = &inner[..colon];
        if scheme.len() < 2 || scheme.len() > Self::MAX_SCHEME_LEN {
            return false;
        }
        let mut chars = scheme.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_ascii_alphabetic() {
            return false;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')) {
            return false;
        }
        inner[colon + 1..]
            .chars()
            .all(|c| !c.is_whitespace() && c != '<' && c != '>')
    }

    /// A single `local@domain` address with a dotted domain.
    pub fn is_email(inner: &str) -> bool {
        let Some(at) = inner.find('@') else {
            return false;
        };
        let (local, domain) = (&inner[..at], &inner[at + 1..]);
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return false;
        }
        let local_ok = local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c));
        let domain_ok = domain.split('.').count() >= 2
            && domain.split('.').all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-')
            });
        local_ok && domain_ok
    }
}

/// A bare URL in running text, recognized only when the autolink extension
/// is enabled.
pub struct BareUrl;

impl BareUrl {
    const PREFIXES: [&'static str; 3] = ["https://", "http://", "www."];

    /// Tries to read a bare URL at the start of `text`. Returns the target
    /// as written and the bytes consumed.
    pub fn parse(text: &str) -> Option<(&str, usize)> {
        let prefix = Self::PREFIXES.iter().find(|p| text.starts_with(**p))?;
        let mut end = text
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(text.len());

        // Trailing punctuation belongs to the sentence, not the link.
        loop {
            let target = &text[..end];
            let Some(last) = target.chars().next_back() else {
                return None;
            };
            let drop = match last {
                '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' => true,
                ')' => {
                    let opens = target.matches('(').count();
                    let closes = target.matches(')').count();
                    closes > opens
                }
                _ => false,
            };
            if !drop {
                break;
            }
            end -= last.len_utf8();
        }
        let target = &text[..end];
        if target.len() <= prefix.len() {
            return None;
        }
        Some((target, end))
    }

    /// The href for a bare target; `www.` links get an explicit scheme.
    pub fn href(target: &str) -> String {
        if target.starts_with("www.") {
            format!("http://{target}")
        } else {
            target.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn uri_autolinks() {
        assert!(Autolink::is_uri("https://example.com/a?b=c"));
        assert!(Autolink::is_uri("mailto:x@y.com"));
        assert!(!Autolink::is_uri("not a uri"));
        assert!(!Autolink::is_uri("a:b"));
        assert!(!Autolink::is_uri("http://with space"));
    }

    #[test]
    fn email_autolinks() {
        assert!(Autolink::is_email("user@example.com"));
        assert!(!Autolink::is_email("user@nodot"));
        assert!(!Autolink::is_email("@example.com"));
        assert!(!Autolink::is_email("a@b@c.com"));
    }

    #[test]
    fn bare_url_stops_at_whitespace() {
        let (target, len) = BareUrl::parse("https://example.com/x and more").unwrap();
        assert_eq!(target, "https://example.com/x");
        assert_eq!(len, target.len());
    }

    #[test]
    fn bare_url_drops_trailing_punctuation() {
        let (target, _) = BareUrl::parse("www.example.com.").unwrap();
        assert_eq!(target, "www.example.com");
    }

    #[test]
    fn balanced_paren_is_kept() {
        let (target, _) = BareUrl::parse("https://en.example.org/x_(y)").unwrap();
        assert_eq!(target, "https://en.example.org/x_(y)");
    }

    #[test]
    fn unbalanced_paren_is_dropped() {
        let (target, _) = BareUrl::parse("https://example.com/x)").unwrap();
        assert_eq!(target, "https://example.com/x");
    }

    #[test]
    fn www_href_gains_scheme() {
        assert_eq!(BareUrl::href("www.example.com"), "http://www.example.com");
        assert_eq!(BareUrl::href("https://a.b"), "https://a.b");
    }

    #[test]
    fn bare_prefix_alone_is_not_a_link() {
        assert!(BareUrl::parse("http:// rest").is_none());
    }
}
