//! In-place edits of a generated stylesheet.
//!
//! Classes are grouped in sections per block and pseudo-selector:
//!
//! ```css
//! /* START: core/button-hover */
//! /* CLASS: text--bold */
//! [class*="wp-block"].text--bold{font-weight:700;}
//! /* END CLASS: text--bold */
//! /* END: core/button-hover */
//! ```
//!
//! All text surgery goes through [`insert_section`] and
//! [`remove_marked_span`]. Markers match exactly, so `foo` never matches
//! `foo-bar`. Names containing `*/` would break out of the comment and are
//! rejected, leaving the text unchanged.

use std::ops::Range;

fn section_markers(block: &str, pseudo: &str) -> (String, String) {
    (
        format!("/* START: {}-{} */", block, pseudo),
        format!("/* END: {}-{} */", block, pseudo),
    )
}

fn class_markers(class: &str) -> (String, String) {
    (format!("/* CLASS: {} */", class), format!("/* END CLASS: {} */", class))
}

fn is_safe_name(name: &str) -> bool {
    !name.contains("*/")
}

/// Finds the span from `start` through `end`, both markers included.
pub fn locate_marked_span(text: &str, start: &str, end: &str) -> Option<Range<usize>> {
    let open = text.find(start)?;
    let search_from = open + start.len();
    let close = text[search_from..].find(end)? + search_from;
    Some(open..close + end.len())
}

/// Inserts `content` before the section's end marker, appending a new
/// section when none exists.
pub fn insert_section(text: &str, start: &str, end: &str, content: &str) -> String {
    if let Some(span) = locate_marked_span(text, start, end) {
        let insert_at = span.end - end.len();
        let mut patched = String::with_capacity(text.len() + content.len() + 1);
        patched.push_str(&text[..insert_at]);
        patched.push_str(content);
        if !content.ends_with('\n') {
            patched.push('\n');
        }
        patched.push_str(&text[insert_at..]);
        return patched;
    }

    let mut patched = text.to_string();
    if !patched.is_empty() && !patched.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(start);
    patched.push('\n');
    patched.push_str(content);
    if !content.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(end);
    patched.push('\n');
    patched
}

/// Removes the first span from `start` through `end` and the newline that
/// follows it. Returns `None` when no such span exists.
pub fn remove_marked_span(text: &str, start: &str, end: &str) -> Option<(String, usize)> {
    let span = locate_marked_span(text, start, end)?;
    let mut until = span.end;
    if text[until..].starts_with('\n') {
        until += 1;
    }
    let mut patched = String::with_capacity(text.len());
    patched.push_str(&text[..span.start]);
    patched.push_str(&text[until..]);
    Some((patched, span.start))
}

/// Adds a class's CSS to the section for `block` and `pseudo`.
///
/// A class already present anywhere in the text is replaced.
pub fn add_class(text: &str, block: &str, pseudo: &str, class: &str, css: &str) -> String {
    if ![block, pseudo, class].iter().all(|name| is_safe_name(name)) {
        tracing::warn!(block, pseudo, class, "marker name rejected");
        return text.to_string();
    }

    let text = remove_class(text, class);
    let (class_start, class_end) = class_markers(class);
    let (section_start, section_end) = section_markers(block, pseudo);

    let content = format!("{}\n{}\n{}\n", class_start, css.trim(), class_end);
    insert_section(&text, &section_start, &section_end, &content)
}

/// Removes a class's CSS, and its section when that leaves it empty.
pub fn remove_class(text: &str, class: &str) -> String {
    if !is_safe_name(class) {
        tracing::warn!(class, "marker name rejected");
        return text.to_string();
    }

    let (start, end) = class_markers(class);
    let Some((patched, removed_at)) = remove_marked_span(text, &start, &end) else {
        return text.to_string();
    };
    remove_section_if_empty(patched, removed_at)
}

/// The byte range of a class's span, markers included.
pub fn locate_class(text: &str, class: &str) -> Option<Range<usize>> {
    if !is_safe_name(class) {
        return None;
    }
    let (start, end) = class_markers(class);
    locate_marked_span(text, &start, &end)
}

fn remove_section_if_empty(text: String, at: usize) -> String {
    const OPEN: &str = "/* START: ";
    const CLOSE: &str = " */";

    let Some(open) = text[..at].rfind(OPEN) else {
        return text;
    };
    let name_from = open + OPEN.len();
    let Some(name_len) = text[name_from..].find(CLOSE) else {
        return text;
    };
    let name = &text[name_from..name_from + name_len];
    let start = format!("{}{}{}", OPEN, name, CLOSE);
    let end = format!("/* END: {} */", name);

    let body_from = name_from + name_len + CLOSE.len();
    let Some(body_len) = text[body_from..].find(&end) else {
        return text;
    };
    if body_from + body_len < at || !text[body_from..body_from + body_len].trim().is_empty() {
        return text;
    }

    // Search from the section's own start so an earlier section of the same
    // name is left alone
    match remove_marked_span(&text[open..], &start, &end) {
        Some((tail, _)) => format!("{}{}", &text[..open], tail),
        None => text,
    }
}
