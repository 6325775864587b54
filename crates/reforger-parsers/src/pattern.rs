use regex::Regex;

use crate::fields::Fields;

/// Matches `[<timestamp>] <TAG> = <body>` lines for one tag
#[derive(Debug, Clone)]
pub struct LinePattern {
    tag: &'static str,
    marker: String,
    regex: Regex,
}

/// A line that matched a [`LinePattern`]
#[derive(Debug, Clone)]
pub struct TaggedLine<'a> {
    pub timestamp: &'a str,
    pub fields: Fields<'a>,
}

impl LinePattern {
    pub fn new(tag: &'static str) -> Self {
        let regex = Regex::new(&format!(r"\[([^\]]+)\] {} = (.+)", regex::escape(tag)))
            .expect("escaped tag always forms a valid pattern");
        Self {
            tag,
            marker: format!("{} =", tag),
            regex,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn is_match(&self, line: &str) -> bool {
        line.contains(&self.marker) && self.regex.is_match(line)
    }

    /// Split a matching line into its timestamp and fields
    pub fn captures<'a>(&self, line: &'a str) -> Option<TaggedLine<'a>> {
        if !line.contains(&self.marker) {
            return None;
        }
        let caps = self.regex.captures(line)?;
        let timestamp = caps.get(1)?.as_str();
        let body = caps.get(2)?.as_str();
        Some(TaggedLine {
            timestamp,
            fields: Fields::parse(body),
        })
    }
}
