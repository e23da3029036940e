//! Document Assembly
//!
//! Splices the stylesheet and script into the HTML file so the preview is a
//! single self-contained document. The preview surface has no access to the
//! other files as separate resources, so inlining is the only way to give
//! them effect.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{FileName, FileStore};

static DOCTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*<!doctype").expect("valid doctype pattern"));
static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid head pattern"));
static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body pattern"));

/// Assemble the composite document from the current store contents
pub fn assemble_store(store: &FileStore) -> String {
    assemble(
        store.get(FileName::Html),
        store.get(FileName::Stylesheet),
        store.get(FileName::Script),
    )
}

/// Assemble the composite document from the three file contents
///
/// Never fails: content without a doctype is wrapped in a minimal shell,
/// and missing injection points fall back to prepending the style block
/// and appending the script block.
pub fn assemble(html: &str, css: &str, js: &str) -> String {
    let mut document = if looks_like_document(html) {
        html.to_string()
    } else {
        wrap_in_shell(html)
    };

    // Both offsets come from the base document so the inserted blocks are
    // never searched
    let style_at = HEAD_CLOSE.find(&document).map_or(0, |head| head.start());
    let script_at = BODY_CLOSE
        .find_iter(&document)
        .last()
        .map_or(document.len(), |body| body.start());

    let style = style_block(css);
    let script = script_block(js);
    if script_at >= style_at {
        document.insert_str(script_at, &script);
        document.insert_str(style_at, &style);
    } else {
        document.insert_str(style_at, &style);
        document.insert_str(script_at, &script);
    }

    document
}

/// A complete document starts with a document-type declaration.
///
/// Fragments that carry their own head/body but no doctype still get
/// wrapped.
pub fn looks_like_document(html: &str) -> bool {
    DOCTYPE.is_match(html)
}

fn wrap_in_shell(fragment: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         </head>\n\
         <body>\n\
         {fragment}\n\
         </body>\n\
         </html>\n"
    )
}

fn style_block(css: &str) -> String {
    format!("<style>\n{css}\n</style>\n")
}

fn script_block(js: &str) -> String {
    format!("<script>\n{js}\n</script>\n")
}
