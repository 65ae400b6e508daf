//! Login entry point.
//!
//! Challenged requests land here. Verifying submitted credentials is the
//! job of the authentication front in front of this site.

use axum::{extract::Query, response::Html};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Page to return to after signing in.
    pub from: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let from = escape_html(query.from.as_deref().unwrap_or("/"));

    Html(format!(
        "<!DOCTYPE html><html><head><title>Sign in</title></head><body>\
         <form name=\"login\" method=\"post\">\
         <input type=\"hidden\" name=\"from\" value=\"{from}\">\
         <label>Token <input type=\"password\" name=\"token\"></label>\
         <button type=\"submit\">Sign in</button>\
         </form></body></html>"
    ))
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
