//! Leaf-text XML walking without a parser dependency.
//!
//! Form-data XML (and the Office part XML the container layer reads) only
//! ever needs "text of the innermost elements, keyed by local tag name".
//! A single forward scan over the markup covers that; a regex extractor
//! backstops malformed input.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// `<tag attr="..">text</tag>` pairs for the malformed-XML fallback.
static LEAF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][\w:.-]*)(?:\s[^<>]*)?>([^<]+)</").expect("valid regex")
});

/// Decode the five predefined XML entities plus decimal char refs.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';').filter(|&e| e <= 10) else {
            out.push('&');
            rest = &rest[start + 1..];
            continue;
        };
        let entity = &tail[1..end];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ if entity.starts_with('#') => {
                let code = entity[1..]
                    .strip_prefix('x')
                    .map(|h| u32::from_str_radix(h, 16))
                    .unwrap_or_else(|| entity[1..].parse());
                match code.ok().and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => out.push_str(&tail[..=end]),
                }
            }
            _ => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

/// Strip a namespace prefix: `xfa:datasets` → `datasets`.
fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

/// Walk XML and collect the text of leaf elements, keyed by local tag
/// name. Repeated same-named leaves concatenate with a newline. Elements
/// that contain child elements contribute no entry of their own.
pub fn leaf_text_map(xml: &str) -> BTreeMap<String, String> {
    struct Frame {
        name: String,
        text: String,
        has_children: bool,
    }

    let mut map: BTreeMap<String, String> = BTreeMap::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut rest = xml;

    let mut insert = |name: &str, text: &str| {
        let value = decode_entities(text.trim());
        if value.is_empty() {
            return;
        }
        map.entry(name.to_string())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(&value);
            })
            .or_insert(value);
    };

    while let Some(lt) = rest.find('<') {
        // Text run before this tag belongs to the innermost open element.
        if let Some(frame) = stack.last_mut() {
            frame.text.push_str(&rest[..lt]);
        }
        rest = &rest[lt..];

        if let Some(body) = rest.strip_prefix("<![CDATA[") {
            let end = match body.find("]]>") {
                Some(e) => e,
                None => break,
            };
            if let Some(frame) = stack.last_mut() {
                frame.text.push_str(&body[..end]);
            }
            rest = &body[end + 3..];
            continue;
        }
        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(e) => rest = &rest[e + 3..],
                None => break,
            }
            continue;
        }

        let Some(gt) = rest.find('>') else { break };
        let tag = &rest[1..gt];
        rest = &rest[gt + 1..];

        if tag.starts_with('?') || tag.starts_with('!') {
            continue;
        }

        if tag.starts_with('/') {
            // Closing tag: a childless element with text is a leaf.
            if let Some(frame) = stack.pop() {
                if !frame.has_children {
                    insert(&frame.name, &frame.text);
                }
                if let Some(parent) = stack.last_mut() {
                    parent.has_children = true;
                }
            }
            continue;
        }

        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("");
        if name.is_empty() {
            continue;
        }

        if self_closing {
            if let Some(parent) = stack.last_mut() {
                parent.has_children = true;
            }
            continue;
        }

        stack.push(Frame {
            name: local_name(name).to_string(),
            text: String::new(),
            has_children: false,
        });
    }

    map
}

/// Regex-based extraction for XML too malformed to walk. Same keying and
/// concatenation rules as [`leaf_text_map`].
pub fn leaf_text_map_fallback(xml: &str) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for caps in LEAF_RE.captures_iter(xml) {
        let name = local_name(&caps[1]).to_string();
        let value = decode_entities(caps[2].trim());
        if value.is_empty() {
            continue;
        }
        map.entry(name)
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_leaf_text_by_local_name() {
        let xml = r#"<xfa:datasets xmlns:xfa="x"><form><Q1_TextField>Smith</Q1_TextField><Q2_TextField>stable</Q2_TextField></form></xfa:datasets>"#;
        let map = leaf_text_map(xml);
        assert_eq!(map.get("Q1_TextField").unwrap(), "Smith");
        assert_eq!(map.get("Q2_TextField").unwrap(), "stable");
        assert!(!map.contains_key("form"), "non-leaf elements are skipped");
    }

    #[test]
    fn namespace_prefix_is_stripped() {
        let map = leaf_text_map("<a:root><a:field>value</a:field></a:root>");
        assert_eq!(map.get("field").unwrap(), "value");
        assert!(!map.contains_key("a:field"));
    }

    #[test]
    fn repeated_leaves_concatenate_with_newline() {
        let map = leaf_text_map("<r><item>one</item><item>two</item></r>");
        assert_eq!(map.get("item").unwrap(), "one\ntwo");
    }

    #[test]
    fn entities_are_decoded() {
        let map = leaf_text_map("<r><t>a &amp; b &lt;c&gt; &#233;</t></r>");
        assert_eq!(map.get("t").unwrap(), "a & b <c> é");
    }

    #[test]
    fn cdata_is_text() {
        let map = leaf_text_map("<r><t><![CDATA[raw < text]]></t></r>");
        assert_eq!(map.get("t").unwrap(), "raw < text");
    }

    #[test]
    fn comments_and_declarations_are_skipped() {
        let map = leaf_text_map("<?xml version=\"1.0\"?><!-- note --><r><t>x</t></r>");
        assert_eq!(map.get("t").unwrap(), "x");
    }

    #[test]
    fn self_closing_elements_contribute_nothing() {
        let map = leaf_text_map("<r><empty/><t>x</t></r>");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(leaf_text_map("").is_empty());
    }

    #[test]
    fn fallback_handles_unclosed_markup() {
        let broken = "<form><Q5_TextField>history of self-harm</Q5_TextField><Q6_TextField>ongoing";
        let map = leaf_text_map_fallback(broken);
        assert_eq!(map.get("Q5_TextField").unwrap(), "history of self-harm");
    }

    #[test]
    fn fallback_strips_prefix_and_decodes() {
        let map = leaf_text_map_fallback("<x:t attr=\"v\">a &amp; b</x:t>");
        assert_eq!(map.get("t").unwrap(), "a & b");
    }
}
