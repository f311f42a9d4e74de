//! Removal of previously inserted highlight markup
//!
//! Uses lol_html so wrappers are unwrapped in a single streaming pass,
//! leaving their text in place. Lets a viewer switch annotation sets
//! without re-rendering the chapter.

use lol_html::{element, rewrite_str, RewriteStrSettings, Selector};

use super::wrap::HighlightConfig;
use super::AnnotateError;

/// Unwrap every highlight element produced with `config`
pub fn strip_annotations(html: &str, config: &HighlightConfig) -> Result<String, AnnotateError> {
    let selector = format!("{}[{}]", config.tag, config.key_attribute);
    selector
        .parse::<Selector>()
        .map_err(|e| AnnotateError::RewriteError(e.to_string()))?;

    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                el.remove_and_keep_content();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| AnnotateError::RewriteError(e.to_string()))?;

    Ok(result)
}
