//! Message rendering.
//!
//! A record's message is its items concatenated in order, followed by the
//! rendered messages of its children, each child line indented by two
//! spaces. The markup for plain text, structured items and location
//! references is supplied by a `MessageMarkup` implementation, so the
//! same traversal serves the terminal and the HTML report.

use crate::parser::{Location, MessageItem, Record};

/// How message fragments are written out
pub trait MessageMarkup {
    /// Append plain message text
    fn text(&self, out: &mut String, text: &str);

    /// Append a structured item (expression, statement or symbol)
    fn item(&self, out: &mut String, item: &MessageItem);

    /// Wrap already-rendered item markup as a reference to `location`
    fn link(&self, out: &mut String, location: &Location, inner: &str);
}

/// Markup-free rendering; links become a trailing ` (file:line)`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkup;

impl MessageMarkup for PlainMarkup {
    fn text(&self, out: &mut String, text: &str) {
        out.push_str(text);
    }

    fn item(&self, out: &mut String, item: &MessageItem) {
        out.push_str(item.text());
    }

    fn link(&self, out: &mut String, location: &Location, inner: &str) {
        out.push_str(inner);
        out.push_str(&format!(" ({}:{})", location.file, location.line));
    }
}

/// Render a record's message and, indented below it, its whole descendant tree
pub fn render_message(record: &Record, markup: &impl MessageMarkup) -> String {
    let mut out = String::new();

    for item in record.message() {
        if item.is_text() {
            markup.text(&mut out, item.text());
            continue;
        }

        match item.location() {
            Some(location) => {
                let mut inner = String::new();
                markup.item(&mut inner, item);
                markup.link(&mut out, location, &inner);
            }
            None => markup.item(&mut out, item),
        }
    }

    for child in record.children() {
        for line in render_message(child, markup).lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
    }

    out
}

/// The record's own message text, without children or markup
pub fn message_text(record: &Record) -> String {
    record.message().iter().map(MessageItem::text).collect()
}
