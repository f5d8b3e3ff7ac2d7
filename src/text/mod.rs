//! Text normalization and chunking
//!
//! Resume and job-description payloads arrive as HTML or plain text. This
//! module flattens them to clean ASCII text and splits them into bounded,
//! overlapping segments suitable for embedding.

pub mod chunker;

pub use chunker::TextChunker;
pub use chunker::CHUNK_OVERLAP;
pub use chunker::CHUNK_SIZE;
pub use chunker::MIN_SPLIT_LEN;

/// Strip non-ASCII bytes, collapse whitespace runs to single spaces, trim ends
pub fn clean_text(text: &str) -> String {
    let ascii_only: String = text
        .chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect();

    let mut cleaned = String::with_capacity(ascii_only.len());
    let mut last_was_space = true; // leading whitespace is dropped
    for c in ascii_only.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else {
            cleaned.push(c);
            last_was_space = false;
        }
    }
    while cleaned.ends_with(' ') {
        cleaned.pop();
    }
    cleaned
}

/// Convert HTML content to plain text with space separators
///
/// Tags are replaced by spaces and the handful of entities that show up in
/// exported resumes are decoded. Plain-text input passes through unchanged
/// aside from entity decoding.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
