//! Delimiter based text scraping helpers.
//!
//! Gelbooru doesn't expose the fields we need through its listing pages in any structured form,
//! so everything is pulled out of the raw HTML by looking for a literal `begin` marker and
//! reading up to the next literal `end` marker.
//!
//! All positions are byte offsets into the scanned text.
use ahash::HashMap;
use std::str::FromStr;

/// A single scraping rule: an optional key to store the result under, followed by the `begin`
/// and `end` delimiters.
///
/// Rules without a key only move the cursor forward.
pub type Rule<'r> = (Option<&'static str>, &'r str, &'r str);

/// Returns the text between `begin` and `end`, searching from `pos` onwards, together with the
/// position right after `end`.
///
/// If either delimiter can't be found, returns `None` and leaves the cursor untouched.
/// An empty delimiter always matches at the current position.
pub fn extract<'a>(txt: &'a str, begin: &str, end: &str, pos: usize) -> (Option<&'a str>, usize) {
    let Some(haystack) = txt.get(pos..) else {
        return (None, pos);
    };

    let Some(idx) = haystack.find(begin) else {
        return (None, pos);
    };

    let first = pos + idx + begin.len();

    match txt[first..].find(end) {
        Some(len) => {
            let last = first + len;
            (Some(&txt[first..last]), last + end.len())
        }
        None => (None, pos),
    }
}

/// Applies every rule in order, each one starting where the previous one stopped.
///
/// Only matched keyed rules end up in the returned map. The second element is the final cursor
/// position.
pub fn extract_all<'a>(
    txt: &'a str,
    rules: &[Rule<'_>],
    pos: usize,
) -> (HashMap<&'static str, &'a str>, usize) {
    let mut values = HashMap::default();
    let mut cursor = pos;

    for (key, begin, end) in rules {
        let (result, next) = extract(txt, begin, end, cursor);
        cursor = next;

        if let (Some(key), Some(value)) = (key, result) {
            values.insert(*key, value);
        }
    }

    (values, cursor)
}

/// Iterator over every successive match of `begin`..`end` inside a text.
pub struct ExtractIter<'a, 'd> {
    txt: &'a str,
    begin: &'d str,
    end: &'d str,
    pos: usize,
}

impl<'a> Iterator for ExtractIter<'a, '_> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (value, pos) = extract(self.txt, self.begin, self.end, self.pos);
        let value = value?;

        // Two empty delimiters would never advance
        if pos == self.pos {
            return None;
        }

        self.pos = pos;
        Some(value)
    }
}

/// Yields every substring found between `begin` and `end`, in order of appearance.
pub const fn extract_iter<'a, 'd>(txt: &'a str, begin: &'d str, end: &'d str) -> ExtractIter<'a, 'd> {
    ExtractIter {
        txt,
        begin,
        end,
        pos: 0,
    }
}

/// Parses a number out of scraped text, falling back to `default` on any failure.
#[inline]
pub fn safe_int<T: FromStr>(value: Option<&str>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Percent-decodes the input. Invalid UTF-8 sequences leave the input as it is.
pub fn unquote(s: &str) -> String {
    urlencoding::decode(s).map_or_else(|_| s.to_string(), |d| d.into_owned())
}

/// Name parts of the file pointed by a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExt {
    /// Full decoded file name, e.g. `abc.jpeg`
    pub filename: String,
    /// File name without the extension, e.g. `abc`
    pub name: String,
    /// Lowercase extension without the dot, e.g. `jpeg`. Empty if there is none.
    pub extension: String,
}

/// Splits the last path segment of `url` into its name and extension.
pub fn nameext_from_url(url: &str) -> NameExt {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let filename = unquote(path.rsplit('/').next().unwrap_or_default());

    let (name, extension) = match filename.rfind('.') {
        Some(idx) if idx > 0 => (
            filename[..idx].to_string(),
            filename[idx + 1..].to_lowercase(),
        ),
        _ => (filename.clone(), String::new()),
    };

    NameExt {
        filename,
        name,
        extension,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extract_between_delimiters() {
        let txt = "<li>Id: 123</li><li>Id: 456</li>";

        assert_eq!(extract(txt, "<li>Id: ", "<", 0), (Some("123"), 12));
        assert_eq!(extract(txt, "<li>Id: ", "<", 12), (Some("456"), 28));
        assert_eq!(extract(txt, "<li>Id: ", "<", 28), (None, 28));
    }

    #[test]
    fn extract_missing_end_keeps_cursor() {
        assert_eq!(extract("begin value", "begin ", "|", 0), (None, 0));
    }

    #[test]
    fn extract_empty_delimiters() {
        let txt = "Size: 800x600<";
        let (width, pos) = extract(txt, "Size: ", "x", 0);
        assert_eq!(width, Some("800"));

        let (height, _) = extract(txt, "", "<", pos);
        assert_eq!(height, Some("600"));

        // Empty end only moves the cursor past `begin`
        assert_eq!(extract(txt, "Size: ", "", 0), (Some(""), 6));
    }

    #[test]
    fn extract_out_of_bounds_position() {
        assert_eq!(extract("abc", "a", "c", 10), (None, 10));
    }

    #[test]
    fn extract_all_moves_cursor() {
        let txt = r#"<b>first</b> <i>skip</i> <b>second</b>"#;
        let rules: [Rule; 3] = [
            (Some("one"), "<b>", "<"),
            (None, "<i>", "<"),
            (Some("two"), "<b>", "<"),
        ];

        let (values, pos) = extract_all(txt, &rules, 0);

        assert_eq!(values.get("one"), Some(&"first"));
        assert_eq!(values.get("two"), Some(&"second"));
        assert_eq!(values.len(), 2);
        assert_eq!(pos, txt.len() - "/b>".len());
    }

    #[test]
    fn extract_all_skips_unmatched() {
        let rules: [Rule; 2] = [(Some("missing"), "[", "]"), (Some("found"), "(", ")")];

        let (values, _) = extract_all("(here)", &rules, 0);

        assert!(!values.contains_key("missing"));
        assert_eq!(values.get("found"), Some(&"here"));
    }

    #[test]
    fn iterate_matches() {
        let page = r#"<a id="p1"></a><a id="p22"></a><a id="p333"></a>"#;
        let ids: Vec<&str> = extract_iter(page, r#"<a id="p"#, "\"").collect();

        assert_eq!(ids, ["1", "22", "333"]);
        assert_eq!(extract_iter("", "a", "b").count(), 0);
        assert_eq!(extract_iter("abc", "", "").count(), 0);
    }

    #[test]
    fn lenient_integers() {
        assert_eq!(safe_int::<u64>(Some("313638"), 0), 313638);
        assert_eq!(safe_int::<u32>(Some(" 42 "), 0), 42);
        assert_eq!(safe_int::<i64>(Some("-3"), 0), -3);
        assert_eq!(safe_int::<u32>(Some("12a"), 7), 7);
        assert_eq!(safe_int::<u32>(None, 0), 0);
    }

    #[test]
    fn unquote_percent_encoding() {
        assert_eq!(unquote("touhou%20%28series%29"), "touhou (series)");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("%FF"), "%FF");
    }

    #[test]
    fn name_and_extension() {
        let ne = nameext_from_url(
            "http://simg4.gelbooru.com/images/63/ab/63ab7b5f76cc41d3b2eb63e2a5a7ab2e.JPG?313638",
        );
        assert_eq!(ne.filename, "63ab7b5f76cc41d3b2eb63e2a5a7ab2e.JPG");
        assert_eq!(ne.name, "63ab7b5f76cc41d3b2eb63e2a5a7ab2e");
        assert_eq!(ne.extension, "jpg");

        let ne = nameext_from_url("https://example.com/files/no_extension");
        assert_eq!(ne.name, "no_extension");
        assert!(ne.extension.is_empty());

        let ne = nameext_from_url("https://example.com/a%20b.png");
        assert_eq!(ne.filename, "a b.png");
    }
}
