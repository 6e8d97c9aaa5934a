use anyhow::Result;
use regex::Regex;
use std::collections::BTreeMap;

/// Tag token shape: `{{UPPER_SNAKE}}`. Anything else, including lowercase
/// or unbalanced braces, is ordinary text.
pub const TAG_TOKEN: &str = r"\{\{([A-Z][A-Z0-9_]*)\}\}";

/// Tags whose values are themselves generated markup carrying per-page
/// remark tokens. Only these get a second substitution pass; values from
/// user-entered fields are always inserted verbatim.
pub const NESTED_TAGS: [&str; 3] = [
    "RESULTS_TABLE",
    "RESULTS_TABLE_ROWS",
    "MEASUREMENT_DETAILS_TABLE",
];

pub type TagMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Tag(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let re = Regex::new(TAG_TOKEN)?;
        Ok(Self {
            segments: split_segments(&re, source),
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct tag names in order of first appearance.
    pub fn tag_names(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for seg in &self.segments {
            if let Segment::Tag(name) = seg {
                if !seen.iter().any(|s| s == name) {
                    seen.push(name.clone());
                }
            }
        }
        seen
    }

    /// Substitutes every tag in one pass. Unknown tags render back as their
    /// literal token so a missing mapping is visible in the output rather
    /// than silently dropped.
    pub fn render(&self, tags: &TagMap) -> Result<String> {
        let re = Regex::new(TAG_TOKEN)?;
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Tag(name) => match tags.get(name) {
                    None => push_token(&mut out, name),
                    Some(value) if NESTED_TAGS.contains(&name.as_str()) => {
                        expand_nested(&re, value, tags, &mut out)
                    }
                    Some(value) => out.push_str(value),
                },
            }
        }
        Ok(out)
    }
}

fn split_segments(re: &Regex, source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(source) {
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        let name = caps.get(1).map(|m| m.as_str());
        if let (Some((start, end)), Some(name)) = (whole, name) {
            if start > last {
                segments.push(Segment::Text(source[last..start].to_string()));
            }
            segments.push(Segment::Tag(name.to_string()));
            last = end;
        }
    }
    if last < source.len() {
        segments.push(Segment::Text(source[last..].to_string()));
    }
    segments
}

/// One extra level, no recursion: tags inside a generated value resolve to
/// their literal mapping or render back verbatim.
fn expand_nested(re: &Regex, value: &str, tags: &TagMap, out: &mut String) {
    for seg in split_segments(re, value) {
        match seg {
            Segment::Text(t) => out.push_str(&t),
            Segment::Tag(name) => match tags.get(&name) {
                Some(v) => out.push_str(v),
                None => push_token(out, &name),
            },
        }
    }
}

fn push_token(out: &mut String, name: &str) {
    out.push_str("{{");
    out.push_str(name);
    out.push_str("}}");
}
