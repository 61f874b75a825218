//! Label ⇄ local name conversion.
//!
//! `to_local_name("Network Device", true)` gives `NetworkDevice`,
//! `to_label("NetworkDevice")` gives `network device`. The two are not
//! inverses: spacing and original capitalisation are lost on the way to a
//! local name.

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Convert a label into a camelCase local name.
///
/// Every word start is upper-cased and whitespace is dropped. The very
/// first character is lower-cased instead unless `capitalize_first` is set
/// (PascalCase for classes). Upper-case letters inside a word are kept.
pub fn to_local_name(label: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(label.len());
    let mut prev: Option<char> = None;

    for (index, c) in label.char_indices() {
        if c.is_whitespace() {
            prev = Some(c);
            continue;
        }

        let word_start = is_word_char(c) && !prev.is_some_and(is_word_char);
        if index == 0 && !capitalize_first {
            out.extend(c.to_lowercase());
        } else if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Best-effort label from a local name: split lower→upper boundaries with a
/// space, then lower-case everything.
pub fn to_label(local_name: &str) -> String {
    let mut spaced = String::with_capacity(local_name.len() + 8);
    let mut chars = local_name.chars().peekable();

    while let Some(c) = chars.next() {
        spaced.push(c);
        if c.is_lowercase() && chars.peek().is_some_and(|next| next.is_uppercase()) {
            spaced.push(' ');
        }
    }

    spaced.to_lowercase()
}

/// Escapes `urlencoding` emits that a URI component leaves literal
const COMPONENT_LITERALS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Percent-encode a local name as a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8 octets.
pub fn encode_local_name(local_name: &str) -> String {
    let mut encoded = urlencoding::encode(local_name).into_owned();
    for (escape, literal) in COMPONENT_LITERALS {
        if encoded.contains(escape) {
            encoded = encoded.replace(escape, literal);
        }
    }
    encoded
}

/// Inverse of [`encode_local_name`]. Malformed escapes leave the input as is.
pub fn decode_local_name(local_name: &str) -> String {
    urlencoding::decode(local_name)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| local_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(label: &str) -> Vec<String> {
        label.split_whitespace().map(str::to_lowercase).collect()
    }

    #[test]
    fn class_labels_become_pascal_case() {
        assert_eq!(to_local_name("Network Device", true), "NetworkDevice");
        assert_eq!(to_local_name("network device", true), "NetworkDevice");
        assert_eq!(to_local_name("person", true), "Person");
    }

    #[test]
    fn property_labels_become_camel_case() {
        assert_eq!(to_local_name("has part", false), "hasPart");
        assert_eq!(to_local_name("Has Part", false), "hasPart");
        assert_eq!(to_local_name("is  defined   by", false), "isDefinedBy");
    }

    #[test]
    fn inner_capitals_are_preserved() {
        assert_eq!(to_local_name("HTTP server", true), "HTTPServer");
        assert_eq!(to_local_name("my iPhone", false), "myIPhone");
    }

    #[test]
    fn punctuation_starts_a_new_word() {
        assert_eq!(to_local_name("part-of", false), "part-Of");
    }

    #[test]
    fn leading_whitespace_does_not_shield_first_word() {
        assert_eq!(to_local_name(" foo bar", false), "FooBar");
    }

    #[test]
    fn unicode_letters_count_as_word_characters() {
        assert_eq!(to_local_name("über straße", true), "ÜberStraße");
        assert_eq!(to_label("überStraße"), "über straße");
    }

    #[test]
    fn local_names_split_into_lowercase_words() {
        assert_eq!(to_label("NetworkDevice"), "network device");
        assert_eq!(to_label("hasPart"), "has part");
        assert_eq!(to_label("HTTPServer"), "httpserver");
    }

    #[test]
    fn component_encoding_keeps_mark_characters() {
        assert_eq!(encode_local_name("tom'S(Draft)"), "tom'S(Draft)");
        assert_eq!(encode_local_name("a*b!c~d.e-f_g"), "a*b!c~d.e-f_g");
        assert_eq!(encode_local_name("a b&c"), "a%20b%26c");
        assert_eq!(encode_local_name("Gerät"), "Ger%C3%A4t");
        assert_eq!(encode_local_name("100%"), "100%25");
    }

    #[test]
    fn decoding_reverses_component_encoding() {
        assert_eq!(decode_local_name("Ger%C3%A4t"), "Gerät");
        assert_eq!(decode_local_name("tom'S(Draft)"), "tom'S(Draft)");
        assert_eq!(decode_local_name("%FF"), "%FF");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(to_local_name("", true), "");
        assert_eq!(to_local_name("", false), "");
        assert_eq!(to_label(""), "");
    }

    #[test]
    fn rederiving_keeps_word_order() {
        for (label, cap) in [
            ("Network Device", true),
            ("has part", false),
            ("is defined by", false),
            ("Small Office Router", true),
            ("knows", false),
        ] {
            let local = to_local_name(label, cap);
            let relabelled = to_label(&local);
            assert_eq!(words(&relabelled), words(label), "label {label:?}");
            assert_eq!(to_local_name(&relabelled, cap), local, "label {label:?}");
        }
    }
}
