//! Preview Metadata
//!
//! Extracts the page title and favicon from the HTML file so the preview
//! chrome can show them. Scanning is lenient: whatever cannot be understood
//! is skipped, and missing values fall back to fixed placeholders.

use serde::Serialize;
use url::Url;

pub const DEFAULT_FALLBACK_TITLE: &str = "Live Preview";
pub const DEFAULT_FALLBACK_ICON: &str = "https://via.placeholder.com/16";

/// Title and icon shown next to the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewMetadata {
    pub title: String,
    pub icon: String,
}

/// Fallbacks and resolution base for metadata extraction
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataOptions {
    pub fallback_title: String,
    pub fallback_icon: String,
    /// Base against which relative icon references are resolved
    pub base_url: Option<Url>,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            fallback_title: DEFAULT_FALLBACK_TITLE.to_string(),
            fallback_icon: DEFAULT_FALLBACK_ICON.to_string(),
            base_url: None,
        }
    }
}

/// Extract the preview title and icon from HTML content
pub fn extract_metadata(html: &str, options: &MetadataOptions) -> PreviewMetadata {
    let scan = scan_document(html);

    let title = scan
        .title
        .unwrap_or_else(|| options.fallback_title.clone());
    let icon = match scan.icon_href {
        Some(href) => resolve_reference(
            &href,
            scan.base_href.as_deref(),
            options.base_url.as_ref(),
        ),
        None => options.fallback_icon.clone(),
    };

    PreviewMetadata { title, icon }
}

/// What the scanner found in a document
#[derive(Debug, Default, PartialEq)]
struct DocumentScan {
    title: Option<String>,
    icon_href: Option<String>,
    base_href: Option<String>,
}

/// A start tag with lowercased name and attribute names
#[derive(Debug)]
struct StartTag {
    name: String,
    attributes: Vec<(String, String)>,
    /// Byte length of the tag including `<` and `>`
    len: usize,
}

impl StartTag {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_rel(&self, rel: &str) -> bool {
        self.attr("rel")
            .map(|value| {
                value
                    .split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case(rel))
            })
            .unwrap_or(false)
    }
}

fn scan_document(html: &str) -> DocumentScan {
    let mut out = DocumentScan::default();
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            pos = match comment.find("-->") {
                Some(end) => start + 4 + end + 3,
                None => html.len(),
            };
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = match rest.find('>') {
                Some(end) => start + end + 1,
                None => html.len(),
            };
            continue;
        }

        let Some(tag) = parse_start_tag(rest) else {
            pos = start + 1;
            continue;
        };
        pos = start + tag.len;

        match tag.name.as_str() {
            "title" => {
                let (text, next) = raw_text(html, pos, "title");
                if out.title.is_none() {
                    out.title = Some(decode_entities(text));
                }
                pos = next;
            }
            "script" | "style" | "textarea" => {
                let (_, next) = raw_text(html, pos, &tag.name);
                pos = next;
            }
            "link" if out.icon_href.is_none() && tag.has_rel("icon") => {
                out.icon_href = tag.attr("href").map(str::to_string);
            }
            "base" if out.base_href.is_none() => {
                out.base_href = tag.attr("href").map(str::to_string);
            }
            _ => {}
        }
    }

    out
}

/// Parse a start tag at the beginning of `input` (which starts with `<`).
/// Returns `None` for anything that is not a complete start tag.
fn parse_start_tag(input: &str) -> Option<StartTag> {
    let bytes = input.as_bytes();
    if bytes.len() < 2 || !bytes[1].is_ascii_alphabetic() {
        return None;
    }

    let mut i = 1;
    while i < bytes.len() && !is_tag_delimiter(bytes[i]) {
        i += 1;
    }
    let name = input[1..i].to_ascii_lowercase();
    let mut attributes = Vec::new();

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                return Some(StartTag {
                    name,
                    attributes,
                    len: i + 1,
                });
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len() && !is_tag_delimiter(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        // A stray '=' where a name should be
        if i == name_start {
            i += 1;
            continue;
        }
        let attr_name = input[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            attributes.push((attr_name, String::new()));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            None => return None,
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = i + 1;
                let len = input[value_start..].find(quote as char)?;
                i = value_start + len + 1;
                &input[value_start..value_start + len]
            }
            Some(_) => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &input[value_start..i]
            }
        };
        attributes.push((attr_name, decode_entities(value)));
    }
}

fn is_tag_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'/' || byte == b'>'
}

/// Text of a raw-text element starting at `from`, and the position after its
/// closing tag. An unclosed element runs to the end of the input.
fn raw_text<'a>(html: &'a str, from: usize, name: &str) -> (&'a str, usize) {
    let closing = format!("</{name}");

    match find_ignore_ascii_case(&html.as_bytes()[from..], closing.as_bytes()) {
        Some(end) => {
            let text = &html[from..from + end];
            let after = from + end + closing.len();
            let next = html[after..]
                .find('>')
                .map(|gt| after + gt + 1)
                .unwrap_or(html.len());
            (text, next)
        }
        None => (&html[from..], html.len()),
    }
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`
fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Decode the character references that commonly show up in titles and
/// attribute values. Unknown references are kept verbatim.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = reference.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Resolve an icon reference the way a browser resolves `link.href`: against
/// the document's `<base href>`, which is itself resolved against the
/// configured base URL. References that cannot be resolved are kept as
/// written.
fn resolve_reference(href: &str, base_href: Option<&str>, base_url: Option<&Url>) -> String {
    let href = href.trim();
    if let Ok(absolute) = Url::parse(href) {
        return absolute.to_string();
    }

    let document_base = base_href
        .and_then(|base| {
            Url::parse(base.trim())
                .ok()
                .or_else(|| base_url.and_then(|url| url.join(base.trim()).ok()))
        })
        .or_else(|| base_url.cloned());

    document_base
        .and_then(|base| base.join(href).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| href.to_string())
}
