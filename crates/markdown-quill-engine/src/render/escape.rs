//! Output escaping.
//!
//! Text and attribute escaping delegate to `html_escape`; destinations get
//! percent-encoding on top so a hostile link target cannot break out of its
//! attribute.

/// Escapes `text` for element content.
pub fn text_into(out: &mut String, text: &str) {
    html_escape::encode_text_to_string(text, out);
}

/// Escapes `text` for a double-quoted attribute value.
pub fn attr_into(out: &mut String, text: &str) {
    html_escape::encode_double_quoted_attribute_to_string(text, out);
}

/// Writes a link destination: quotes, angle brackets, backticks, whitespace,
/// control bytes, and non-ASCII are percent-encoded; `&` becomes an entity.
pub fn href_into(out: &mut String, href: &str) {
    let mut buf = [0u8; 4];
    for ch in href.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' | '\'' | '<' | '>' | '`' | ' ' => percent_into(out, ch, &mut buf),
            c if c.is_ascii_control() => percent_into(out, c, &mut buf),
            c if c.is_ascii() => out.push(c),
            c => percent_into(out, c, &mut buf),
        }
    }
}

fn percent_into(out: &mut String, ch: char, buf: &mut [u8; 4]) {
    for byte in ch.encode_utf8(buf).bytes() {
        out.push('%');
        out.push(char::from_digit((byte >> 4) as u32, 16).unwrap_or('0').to_ascii_uppercase());
        out.push(char::from_digit((byte & 0xf) as u32, 16).unwrap_or('0').to_ascii_uppercase());
    }
}

/// Destinations suppressed entirely under safe mode.
pub fn is_unsafe_scheme(dest: &str) -> bool {
    const SCHEMES: [&str; 4] = ["javascript:", "vbscript:", "file:", "data:"];
    let head = dest.trim_start();
    SCHEMES.iter().any(|scheme| {
        head.len() >= scheme.len()
            && head.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}
