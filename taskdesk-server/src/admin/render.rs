/// Minimal HTML rendering for the admin panel
///
/// Pages are small enough that a handful of `format!` builders beat a
/// templating engine. Everything user-controlled goes through [`escape`].

use taskdesk_shared::models::user::User;

/// Escapes text for safe interpolation into HTML
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps page content in the shared panel chrome
///
/// `user` is None only on the login page, which has no navigation.
pub fn layout(title: &str, user: Option<&User>, body: &str) -> String {
    let nav = match user {
        Some(user) => format!(
            concat!(
                r#"<nav class="nav">"#,
                r#"<a href="/admin">Dashboard</a> "#,
                r#"<a href="/admin/users">Users</a> "#,
                r#"<a href="/admin/tasks">Tasks</a> "#,
                r#"<a href="/admin/reports">Reports</a>"#,
                r#"<span class="who">{} ({})</span>"#,
                r#"<form method="post" action="/admin/logout" class="logout">"#,
                r#"<button type="submit">Log out</button></form>"#,
                "</nav>"
            ),
            escape(&user.display_name()),
            user.role.as_str(),
        ),
        None => String::new(),
    };

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            "<title>{title} - TaskDesk</title>",
            "<style>",
            "body{{font-family:sans-serif;margin:2rem;color:#222}}",
            ".nav a{{margin-right:1rem}}",
            ".who{{margin-left:2rem;color:#666}}",
            ".logout{{display:inline;margin-left:1rem}}",
            "table{{border-collapse:collapse;margin-top:1rem}}",
            "th,td{{border:1px solid #ccc;padding:.4rem .8rem;text-align:left}}",
            ".error{{color:#b00020}}",
            ".cards{{display:flex;gap:1rem;margin-top:1rem}}",
            ".card{{border:1px solid #ccc;padding:1rem;min-width:10rem}}",
            ".card b{{font-size:1.6rem;display:block}}",
            "</style></head><body>",
            "{nav}<h1>{title}</h1>{body}",
            "</body></html>"
        ),
        title = escape(title),
        nav = nav,
        body = body,
    )
}

/// Renders a table from a header row and pre-escaped body rows
pub fn table(headers: &[&str], rows: &[String]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();

    if rows.is_empty() {
        return format!(
            "<table><tr>{}</tr><tr><td colspan=\"{}\">Nothing here yet</td></tr></table>",
            head,
            headers.len()
        );
    }

    format!(
        "<table><tr>{}</tr>{}</table>",
        head,
        rows.concat()
    )
}

/// Renders a dashboard stat card
pub fn stat_card(label: &str, value: i64) -> String {
    format!(
        r#"<div class="card"><b>{}</b>{}</div>"#,
        value,
        escape(label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x')</script>"#),
            "&lt;script&gt;alert(&quot;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_empty_table_shows_placeholder() {
        let html = table(&["Title", "Status"], &[]);
        assert!(html.contains("Nothing here yet"));
        assert!(html.contains("<th>Title</th>"));
    }

    #[test]
    fn test_table_concatenates_rows() {
        let rows = vec!["<tr><td>a</td></tr>".to_string(), "<tr><td>b</td></tr>".to_string()];
        let html = table(&["Col"], &rows);
        assert!(html.contains("<td>a</td>"));
        assert!(html.contains("<td>b</td>"));
    }
}
