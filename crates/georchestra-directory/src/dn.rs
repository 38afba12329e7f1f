//! Distinguished name helpers
//!
//! DN construction and inspection without a full RFC 4514 parser: the entries
//! managed here always have a single-valued leading RDN.

/// Escape special characters in a DN attribute value per RFC 4514.
///
/// Characters that must be escaped:
/// - Leading or trailing SPACE (escaped as \20)
/// - Leading # (escaped as \23)
/// - Characters: , + " \ < > ; = (escaped with backslash prefix)
/// - NUL character (escaped as \00)
pub fn escape_dn_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len() * 2);
    let last = value.chars().count().saturating_sub(1);

    for (i, ch) in value.chars().enumerate() {
        let is_first = i == 0;
        let is_last = i == last;

        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                result.push('\\');
                result.push(ch);
            }
            '\0' => result.push_str("\\00"),
            ' ' if is_first || is_last => result.push_str("\\20"),
            '#' if is_first => result.push_str("\\23"),
            _ => result.push(ch),
        }
    }

    result
}

/// Reverse [`escape_dn_value`] for the escapes it produces and for `\XX` hex pairs.
pub fn unescape_dn_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut bytes: Vec<u8> = Vec::new();
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            flush_bytes(&mut bytes, &mut result);
            result.push(ch);
            continue;
        }

        let Some(next) = chars.next() else {
            flush_bytes(&mut bytes, &mut result);
            result.push('\\');
            break;
        };

        match chars.peek().copied() {
            Some(second) if next.is_ascii_hexdigit() && second.is_ascii_hexdigit() => {
                chars.next();
                let hex: String = [next, second].iter().collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => bytes.push(byte),
                    Err(_) => {
                        flush_bytes(&mut bytes, &mut result);
                        result.push(next);
                        result.push(second);
                    }
                }
            }
            _ => {
                flush_bytes(&mut bytes, &mut result);
                result.push(next);
            }
        }
    }
    flush_bytes(&mut bytes, &mut result);

    result
}

fn flush_bytes(bytes: &mut Vec<u8>, out: &mut String) {
    if !bytes.is_empty() {
        out.push_str(&String::from_utf8_lossy(bytes));
        bytes.clear();
    }
}

/// Build a DN from a naming attribute, its raw value and the parent DN.
///
/// The value is escaped; the parent is used as given.
pub fn child_dn(attribute: &str, value: &str, parent: &str) -> String {
    format!("{}={},{}", attribute, escape_dn_value(value), parent)
}

/// Build a relative DN (`attr=value`) with the value escaped.
pub fn rdn(attribute: &str, value: &str) -> String {
    format!("{}={}", attribute, escape_dn_value(value))
}

/// Split a DN into its leading RDN and the parent DN at the first unescaped comma.
pub fn split_leading_rdn(dn: &str) -> (&str, Option<&str>) {
    let mut escaped = false;
    for (i, ch) in dn.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            ',' if !escaped => return (&dn[..i], Some(dn[i + 1..].trim_start())),
            _ => escaped = false,
        }
    }
    (dn, None)
}

/// Unescaped value of the leading RDN: `cn=ADMIN,ou=roles,...` gives `ADMIN`.
pub fn leading_rdn_value(dn: &str) -> Option<String> {
    let (rdn, _) = split_leading_rdn(dn);
    let (_, value) = rdn.split_once('=')?;
    Some(unescape_dn_value(value.trim()))
}

/// Normalized form used for DN comparisons: lowercase, no blanks around separators.
pub fn normalize_dn(dn: &str) -> String {
    dn.split(',')
        .map(|rdn| {
            rdn.split('=')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join("=")
        })
        .collect::<Vec<_>>()
        .join(",")
        .to_lowercase()
}

/// Whether `dn` names an entry strictly below `base`.
pub fn is_descendant_of(dn: &str, base: &str) -> bool {
    let dn = normalize_dn(dn);
    let base = normalize_dn(base);
    dn.len() > base.len() && dn.ends_with(&format!(",{base}"))
}

/// Whether two DNs designate the same entry (case and spacing insensitive).
pub fn same_dn(a: &str, b: &str) -> bool {
    normalize_dn(a) == normalize_dn(b)
}
