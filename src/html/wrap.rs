//! Highlight markup insertion
//!
//! Every accepted match is replaced by
//! `<tag class=".." data-set-id=".." data-item-id=".." ..>text</tag>`.
//! The markup is identical for all matches of one item, so each wrap adds
//! the same number of bytes and later offsets can be shifted arithmetically.

use serde::Deserialize;

use super::matcher::Match;
use super::AnnotateError;
use crate::annotations::AnnotationKey;

/// Configuration for highlight markup
///
/// `class_name` and `onclick` are attribute values and get escaped. The tag
/// and attribute names are written as-is and must pass [`validate`].
///
/// [`validate`]: HighlightConfig::validate
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Element used to wrap matches
    pub tag: String,
    /// CSS class of the wrapper
    pub class_name: String,
    /// Data attribute carrying the set ID
    pub set_attribute: String,
    /// Data attribute carrying the item ID
    pub item_attribute: String,
    /// Data attribute carrying the combined `{set}-{item}` key
    pub key_attribute: String,
    /// Message type passed to the click handler
    pub annotation_type: String,
    /// Inline click handler; `{type}` and `{key}` are substituted
    pub onclick: Option<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            class_name: "xy-annotation".to_string(),
            set_attribute: "data-set-id".to_string(),
            item_attribute: "data-item-id".to_string(),
            key_attribute: "data-annotation-key".to_string(),
            annotation_type: "annotation".to_string(),
            onclick: None,
        }
    }
}

impl HighlightConfig {
    /// Check that the tag and attribute names are plain HTML names
    pub fn validate(&self) -> Result<(), AnnotateError> {
        let names = [
            ("tag", &self.tag),
            ("set attribute", &self.set_attribute),
            ("item attribute", &self.item_attribute),
            ("key attribute", &self.key_attribute),
        ];

        for (field, name) in names {
            if !is_markup_name(name) {
                return Err(AnnotateError::InvalidMarkupName {
                    field,
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_markup_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

/// Opening and closing markup for one annotation key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapMarkup {
    open: String,
    close: String,
}

impl WrapMarkup {
    pub fn new(key: AnnotationKey, config: &HighlightConfig) -> Self {
        let key_str = key.to_string();

        let onclick = config
            .onclick
            .as_ref()
            .map(|template| {
                let handler = template
                    .replace("{type}", &config.annotation_type)
                    .replace("{key}", &key_str);
                format!(
                    " onclick=\"{}\"",
                    html_escape::encode_double_quoted_attribute(&handler)
                )
            })
            .unwrap_or_default();

        let open = format!(
            "<{tag} class=\"{class}\" {set_attr}=\"{set}\" {item_attr}=\"{item}\" {key_attr}=\"{key}\"{onclick}>",
            tag = config.tag,
            class = html_escape::encode_double_quoted_attribute(&config.class_name),
            set_attr = config.set_attribute,
            set = key.set_id,
            item_attr = config.item_attribute,
            item = key.item_id,
            key_attr = config.key_attribute,
            key = key_str,
            onclick = onclick,
        );

        Self {
            open,
            close: format!("</{}>", config.tag),
        }
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// Bytes added by wrapping one match
    pub fn wrap_length(&self) -> usize {
        self.open.len() + self.close.len()
    }
}

/// Result of wrapping the matches of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// The HTML with wrappers inserted
    pub html: String,
    /// Start offset, before insertion, of each wrapped span
    pub inserts: Vec<usize>,
    /// Span of each inserted element within `html`
    pub elements: Vec<Match>,
    /// Bytes added per wrapped span
    pub wrap_length: usize,
}

/// Wrap `matches` in `html`, in ascending start order.
///
/// A match that overlaps one already wrapped in this call is skipped.
pub fn wrap_matches(matches: &[Match], html: &str, markup: &WrapMarkup) -> Wrapped {
    let wrap_length = markup.wrap_length();

    let mut sorted = matches.to_vec();
    sorted.sort_by_key(|m| m.start);

    let mut output = String::with_capacity(html.len() + sorted.len() * wrap_length);
    let mut inserts = Vec::with_capacity(sorted.len());
    let mut elements = Vec::with_capacity(sorted.len());
    let mut cursor = 0;

    for m in sorted {
        if m.start < cursor || m.end > html.len() {
            continue;
        }

        let shift = inserts.len() * wrap_length;
        output.push_str(&html[cursor..m.start]);
        output.push_str(&markup.open);
        output.push_str(&html[m.start..m.end]);
        output.push_str(&markup.close);

        elements.push(Match::new(m.start + shift, m.end + shift + wrap_length));
        inserts.push(m.start);
        cursor = m.end;
    }
    output.push_str(&html[cursor..]);

    Wrapped {
        html: output,
        inserts,
        elements,
        wrap_length,
    }
}

/// Where `offset` moves to after wrapping spans starting at `inserts`.
pub fn shift_offset(offset: usize, inserts: &[usize], wrap_length: usize) -> usize {
    let preceding = inserts.iter().filter(|&&at| at <= offset).count();
    offset + preceding * wrap_length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup() -> WrapMarkup {
        WrapMarkup::new(AnnotationKey::new(1, 2), &HighlightConfig::default())
    }

    #[test]
    fn test_default_markup() {
        let markup = markup();
        assert_eq!(
            markup.open(),
            r#"<span class="xy-annotation" data-set-id="1" data-item-id="2" data-annotation-key="1-2">"#
        );
        assert_eq!(markup.close(), "</span>");
        assert_eq!(markup.wrap_length(), markup.open().len() + 7);
    }

    #[test]
    fn test_validate_markup_names() {
        assert!(HighlightConfig::default().validate().is_ok());

        let custom = HighlightConfig {
            tag: "mark".into(),
            key_attribute: "data-xy_key".into(),
            ..HighlightConfig::default()
        };
        assert!(custom.validate().is_ok());

        for tag in ["", "span onmouseover=x", "span>", "1span", "<span"] {
            let config = HighlightConfig {
                tag: tag.into(),
                ..HighlightConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(AnnotateError::InvalidMarkupName { field: "tag", .. })),
                "{:?} accepted",
                tag
            );
        }

        let config = HighlightConfig {
            item_attribute: "data-item=\"x\"".into(),
            ..HighlightConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_onclick_template() {
        let config = HighlightConfig {
            onclick: Some("parent.postMessage({type: '{type}', key: '{key}'}, '*')".into()),
            ..HighlightConfig::default()
        };
        let markup = WrapMarkup::new(AnnotationKey::new(3, 4), &config);

        assert!(markup
            .open()
            .contains("onclick=\"parent.postMessage({type: 'annotation', key: '3-4'}, '*')\""));
    }

    #[test]
    fn test_onclick_quotes_escaped() {
        let config = HighlightConfig {
            onclick: Some(r#"handle("{key}")"#.into()),
            ..HighlightConfig::default()
        };
        let markup = WrapMarkup::new(AnnotationKey::new(1, 1), &config);

        assert!(markup.open().contains("onclick=\"handle(&quot;1-1&quot;)\""));
    }

    #[test]
    fn test_wrap_multiple_matches() {
        let html = "a cat and a cat";
        let markup = markup();
        let wrapped = wrap_matches(&[Match::new(12, 15), Match::new(2, 5)], html, &markup);

        let expected = format!(
            "a {open}cat{close} and a {open}cat{close}",
            open = markup.open(),
            close = markup.close()
        );
        assert_eq!(wrapped.html, expected);
        assert_eq!(wrapped.inserts, vec![2, 12]);
        assert_eq!(wrapped.wrap_length, markup.wrap_length());

        for element in &wrapped.elements {
            let text = &wrapped.html[element.start..element.end];
            assert!(text.starts_with("<span"));
            assert!(text.ends_with("cat</span>"));
        }
    }

    #[test]
    fn test_wrap_no_matches() {
        let wrapped = wrap_matches(&[], "<p>text</p>", &markup());
        assert_eq!(wrapped.html, "<p>text</p>");
        assert!(wrapped.inserts.is_empty());
    }

    #[test]
    fn test_overlapping_match_skipped() {
        let wrapped = wrap_matches(&[Match::new(0, 5), Match::new(3, 8)], "abcdefgh", &markup());
        assert_eq!(wrapped.inserts, vec![0]);
    }

    #[test]
    fn test_shift_offset() {
        assert_eq!(shift_offset(5, &[10, 20], 3), 5);
        assert_eq!(shift_offset(10, &[10, 20], 3), 13);
        assert_eq!(shift_offset(25, &[10, 20], 3), 31);
    }
}
