// src/views/board_view.rs - board page rendering
//
// The template is registered as `board.html`, which turns on MiniJinja's HTML
// auto-escaping for every `{{ }}` expression in it.

use minijinja::{Environment, HtmlEscape, Value, context};

use crate::dtos::post_dtos::PostOut;
use crate::models::post::Post;

const BOARD_TEMPLATE: &str = "board.html";

/// Escapes `text`, then puts `<br />` in front of every line break.
pub fn nl2br(text: String) -> Value {
    let escaped = HtmlEscape(&text).to_string();
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                out.push_str("<br />\r");
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    out.push('\n');
                }
            }
            '\n' => out.push_str("<br />\n"),
            other => out.push(other),
        }
    }
    Value::from_safe_string(out)
}

/// Percent-encodes a single path segment; the result is then HTML-escaped as usual.
pub fn url_segment(segment: String) -> String {
    urlencoding::encode(&segment).into_owned()
}

fn size_label(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

pub struct BoardView {
    env: Environment<'static>,
    max_image_bytes: usize,
}

impl BoardView {
    pub fn new(max_image_bytes: usize) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("nl2br", nl2br);
        env.add_filter("url_segment", url_segment);
        env.add_template(BOARD_TEMPLATE, include_str!("templates/board.html"))?;
        Ok(Self { env, max_image_bytes })
    }

    pub fn render(&self, posts: &[Post]) -> Result<String, minijinja::Error> {
        let posts: Vec<PostOut> = posts.iter().map(PostOut::from).collect();
        let tmpl = self.env.get_template(BOARD_TEMPLATE)?;
        tmpl.render(context! {
            posts => posts,
            max_image_bytes => self.max_image_bytes,
            max_image_label => size_label(self.max_image_bytes),
        })
    }
}
