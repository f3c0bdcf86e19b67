//! Keyword templates for directory and file names.
//!
//! A template is plain text with `{key}` placeholders, e.g. `{category}_{id}_{md5}.{extension}`.
//! Literal braces are written as `{{` and `}}`.
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Text used for keys that are missing or `null`.
const NONE: &str = "None";

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NONE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Replaces every placeholder in `template` with the matching value of `kwdict`.
///
/// An unterminated `{` is kept as literal text.
pub fn render(template: &str, kwdict: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(idx) = rest.find(['{', '}']) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        match tail.find('}') {
            Some(end) => {
                let key = &tail[1..end];
                out.push_str(&value_to_string(kwdict.get(key)));
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Makes a rendered value safe to use as a single path segment.
pub fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => String::from("_"),
        s => s.to_string(),
    }
}

/// Renders every directory template segment into a relative path.
pub fn render_directory(directory_fmt: &[String], kwdict: &Map<String, Value>) -> PathBuf {
    directory_fmt
        .iter()
        .map(|seg| sanitize_segment(&render(seg, kwdict)))
        .collect()
}

/// Renders a file name template.
#[inline]
pub fn render_filename(filename_fmt: &str, kwdict: &Map<String, Value>) -> String {
    sanitize_segment(&render(filename_fmt, kwdict))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn kw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn render_keys() {
        let kwdict = kw(json!({
            "category": "gelbooru",
            "id": 313638,
            "md5": "5e2557131bb1e5ba3d3c6a4a4e9fc37a",
            "extension": "jpg",
            "source": null,
        }));

        assert_eq!(
            render("{category}_{id}_{md5}.{extension}", &kwdict),
            "gelbooru_313638_5e2557131bb1e5ba3d3c6a4a4e9fc37a.jpg"
        );
        assert_eq!(render("{source}-{missing}", &kwdict), "None-None");
    }

    #[test]
    fn render_escapes() {
        let kwdict = kw(json!({"id": 1}));

        assert_eq!(render("{{id}} = {id}", &kwdict), "{id} = 1");
        assert_eq!(render("open {id", &kwdict), "open {id");
        assert_eq!(render("close }", &kwdict), "close }");
    }

    #[test]
    fn directory_segments() {
        let kwdict = kw(json!({"category": "gelbooru", "tags": "fate/stay_night"}));
        let fmt = vec![String::from("{category}"), String::from("{tags}")];

        assert_eq!(
            render_directory(&fmt, &kwdict),
            PathBuf::from("gelbooru").join("fate_stay_night")
        );
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_segment(".."), "_");
        assert_eq!(sanitize_segment(" a\\b\n "), "a_b_");
        assert_eq!(sanitize_segment("plain name"), "plain name");
    }
}
