//! HTML rendering for the browser UI.
//!
//! Pure formatting: every function takes data and returns markup. All
//! interpolated text goes through `escape`. Fragments are swapped in by
//! htmx, so each list renderer emits a complete `<ul class="book-list">`.

use std::collections::HashSet;
use std::fmt::Write;

use shelf_core::{Book, MemorizedBook};

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
h1, h2 { color: #2c3e50; text-align: center; }
h1 { border-bottom: 2px solid #3498db; padding-bottom: 10px; }
form { text-align: center; margin-bottom: 20px; }
input[type=text] { padding: 8px 15px; width: 60%; border: 1px solid #ddd; border-radius: 4px; font-size: 16px; }
.book-list { list-style-type: none; padding: 0; }
.book-item { background-color: white; margin-bottom: 10px; padding: 15px; border-radius: 5px; box-shadow: 0 2px 5px rgba(0,0,0,0.1); display: flex; justify-content: space-between; align-items: center; }
.book-item a { color: #3498db; text-decoration: none; font-weight: bold; font-size: 18px; }
.no-results { text-align: center; font-style: italic; color: #7f8c8d; }
.message { text-align: center; padding: 8px; border-radius: 4px; }
.message.success { background: #e8f8f0; color: #1e8449; }
.message.error { background: #fdecea; color: #c0392b; }
.memorized-tag { color: #7f8c8d; font-size: 14px; }
footer { margin-top: 30px; text-align: center; font-size: 14px; color: #7f8c8d; }
"#;

/// Outcome styling for `render_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The full page: popular list with filter and refresh, live search, and
/// the memorized shelf.
pub fn render_index(popular: &[Book], memorized: &[MemorizedBook]) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Royal Road - Popular Books</title>
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
<style>{style}</style>
</head>
<body>
<h1>Top {count} Popular Books on Royal Road</h1>

<form hx-post="/search" hx-target="#popular" hx-trigger="input changed delay:300ms from:#filter, submit">
<input type="text" id="filter" name="search" placeholder="Filter popular books...">
<button type="button" hx-post="/refresh" hx-target="#popular">Refresh</button>
</form>
<div id="popular">
{popular}
</div>

<h2>Search Royal Road</h2>
<form hx-post="/search-books" hx-target="#search-results">
<input type="text" name="query" placeholder="Search for books...">
<button type="submit">Search</button>
</form>
<div id="search-results"></div>

<h2>Memorized Books</h2>
<div id="memorize-status"></div>
<div id="memorized" hx-get="/memorized-books" hx-trigger="memorized-changed from:body">
{memorized}
</div>

<footer>Data scraped from Royal Road's Active Popular Fiction List</footer>
</body>
</html>
"##,
        style = STYLE,
        count = popular.len(),
        popular = render_book_list(popular),
        memorized = render_memorized_list(memorized),
    )
}

/// Plain list of popular books.
pub fn render_book_list(books: &[Book]) -> String {
    render_list(books.iter(), "No books found matching your search.", |_| {
        String::new()
    })
}

/// Live search results. Titles in `memorized` are tagged instead of
/// getting a memorize button.
pub fn render_search_results(books: &[Book], memorized: &HashSet<String>) -> String {
    render_list(books.iter(), "No books found on Royal Road.", |book| {
        if memorized.contains(&book.title) {
            return r#"<span class="memorized-tag">Memorized</span>"#.to_string();
        }
        format!(
            r##"<button hx-post="/memorize-book" hx-vals='{{"title": "{}", "link": "{}"}}' hx-target="#memorize-status">Memorize</button>"##,
            json_attr(&book.title),
            json_attr(&book.link),
        )
    })
}

/// Memorized shelf, newest first, each with a remove button.
pub fn render_memorized_list(entries: &[MemorizedBook]) -> String {
    let books: Vec<Book> = entries.iter().map(MemorizedBook::to_book).collect();
    render_list(books.iter(), "No memorized books yet.", |book| {
        format!(
            r##"<button hx-post="/remove-memorized-book" hx-vals='{{"title": "{}"}}' hx-target="#memorized">Remove</button>"##,
            json_attr(&book.title),
        )
    })
}

/// A status line shown after a memorize attempt.
pub fn render_message(kind: MessageKind, text: &str) -> String {
    let class = match kind {
        MessageKind::Success => "success",
        MessageKind::Error => "error",
    };
    format!(r#"<div class="message {}">{}</div>"#, class, escape(text))
}

fn render_list<'a, I, F>(books: I, empty_text: &str, actions: F) -> String
where
    I: Iterator<Item = &'a Book>,
    F: Fn(&Book) -> String,
{
    let mut html = String::from(r#"<ul class="book-list">"#);
    let mut any = false;

    for book in books {
        any = true;
        // Writing to a String cannot fail.
        let _ = write!(
            html,
            r#"<li class="book-item"><a href="{}" target="_blank" rel="noopener">{}</a>{}</li>"#,
            escape(&book.link),
            escape(&book.title),
            actions(book),
        );
    }
    html.push_str("</ul>");

    if !any {
        let _ = write!(html, r#"<p class="no-results">{}</p>"#, escape(empty_text));
    }
    html
}

/// Encode a value for a JSON string inside a single-quoted `hx-vals`.
fn json_attr(value: &str) -> String {
    let json = serde_json::to_string(value).unwrap_or_default();
    let inner = json
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or_default();
    escape(inner)
}
