//! HTML pages.
//!
//! Plain markup built from escaped strings; every value that comes from a
//! user or from the catalog goes through [`escape`].

use axum::{http::StatusCode, response::Html};

use crate::models::book::{Book, BookDetail};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, signed_in: bool, body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<nav><a href="/">Books</a> <a href="/new">Add a book</a>
<form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form></nav>"#
    } else {
        r#"<nav><a href="/login">Log in</a> <a href="/register">Register</a></nav>"#
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Bookshelf</title></head>
<body>
{nav}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav,
        body = body,
    ))
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="errors">{}</ul>"#, items)
}

fn credentials_form(action: &str, submit: &str, errors: &[String]) -> String {
    format!(
        r#"{errors}
<form method="post" action="{action}">
<label>Email <input type="email" name="username" required></label>
<label>Password <input type="password" name="password" minlength="6" required></label>
<button type="submit">{submit}</button>
</form>"#,
        errors = error_list(errors),
        action = action,
        submit = submit,
    )
}

pub fn login(errors: &[String]) -> Html<String> {
    let body = format!(
        r#"{}<p>No account? <a href="/register">Register</a></p>"#,
        credentials_form("/login", "Log in", errors)
    );
    layout("Log in", false, &body)
}

pub fn register(errors: &[String]) -> Html<String> {
    let body = format!(
        r#"{}<p>Already registered? <a href="/login">Log in</a></p>"#,
        credentials_form("/register", "Register", errors)
    );
    layout("Register", false, &body)
}

pub fn index(books: &[Book], email: &str) -> Html<String> {
    let list = if books.is_empty() {
        r#"<p>No books yet. <a href="/new">Add the first one</a>.</p>"#.to_string()
    } else {
        let items: String = books
            .iter()
            .map(|book| {
                format!(
                    r#"<li><a href="/book/{id}">{title}</a> by {author}</li>"#,
                    id = book.id,
                    title = escape(&book.title),
                    author = escape(&book.author_name),
                )
            })
            .collect();
        format!("<ul>{}</ul>", items)
    };

    let body = format!("<p>Signed in as {}</p>\n{}", escape(email), list);
    layout("Books", true, &body)
}

pub fn new_book(errors: &[String]) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="/new">
<label>ISBN <input type="text" name="isbn" required></label>
<button type="submit">Add</button>
</form>"#,
        errors = error_list(errors),
    );
    layout("Add a book", true, &body)
}

pub fn book_detail(detail: &BookDetail) -> Html<String> {
    let book = &detail.book;

    let image = book
        .image_url
        .as_deref()
        .map(|url| format!(r#"<img src="{}" alt="Cover">"#, escape(url)))
        .unwrap_or_default();
    let rating = book
        .rating
        .map(|r| format!("<p>Rating: {:.1}</p>", r))
        .unwrap_or_default();
    let reviews: String = detail
        .reviews
        .iter()
        .map(|r| format!("<li>{}</li>", escape(r)))
        .collect();

    let body = format!(
        r#"{image}
<p>by {author}</p>
<p>ISBN {isbn}{date}</p>
{rating}
<p>{description}</p>
<h2>Reviews</h2>
<ul>{reviews}</ul>
<form method="post" action="/review/{id}">
<textarea name="review_text" required></textarea>
<button type="submit">Post review</button>
</form>
<form method="post" action="/book/{id}">
<button type="submit">Delete book</button>
</form>"#,
        image = image,
        author = escape(&book.author_name),
        isbn = escape(&book.isbn),
        date = book
            .date
            .as_deref()
            .map(|d| format!(", published {}", escape(d)))
            .unwrap_or_default(),
        rating = rating,
        description = escape(book.description.as_deref().unwrap_or("")),
        reviews = reviews,
        id = book.id,
    );
    layout(&book.title, true, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(r#"<p>{}</p><p><a href="/">Back to the books</a></p>"#, escape(message));
    layout(title, false, &body)
}
