//! Splitting annotated text into plain and term segments.
//!
//! Annotated text marks vocabulary with a start/end marker pair, e.g.
//! `我喜欢<读书>。`. Markers are toggles: a start marker switches term state
//! on, an end marker switches it off. Unbalanced input never fails; text
//! after a dangling marker keeps whatever state was last active.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: String,
    pub end: String,
}

impl MarkerPair {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl Default for MarkerPair {
    fn default() -> Self {
        Self::new("<", ">")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Plain,
    Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    /// Position of this part in the marker-split sequence. Markers and
    /// empty parts take up an index too, so keys stay stable per line.
    pub part_index: usize,
}

impl Segment {
    pub fn is_term(&self) -> bool {
        self.kind == SegmentKind::Term
    }

    /// Key unique to this rendered occurrence, e.g. `line-3-term-5`
    pub fn occurrence_key(&self, base_key: &str) -> String {
        format!("{base_key}-term-{}", self.part_index)
    }
}

enum Part<'a> {
    Start,
    End,
    Text(&'a str),
}

/// Split `line` at every marker, keeping the markers as their own parts.
/// Text between adjacent markers (or at either end) appears as an empty part.
fn split_parts<'a>(line: &'a str, markers: &MarkerPair) -> Vec<Part<'a>> {
    let mut parts = Vec::new();
    let mut rest = line;
    let mut text_start = 0;
    let mut offset = 0;

    while !rest.is_empty() {
        let marker = if !markers.start.is_empty() && rest.starts_with(&markers.start) {
            Some((Part::Start, markers.start.len()))
        } else if !markers.end.is_empty() && rest.starts_with(&markers.end) {
            Some((Part::End, markers.end.len()))
        } else {
            None
        };

        match marker {
            Some((part, len)) => {
                parts.push(Part::Text(&line[text_start..offset]));
                parts.push(part);
                offset += len;
                text_start = offset;
            }
            None => {
                let ch_len = rest.chars().next().map_or(1, char::len_utf8);
                offset += ch_len;
            }
        }
        rest = &line[offset..];
    }
    parts.push(Part::Text(&line[text_start..]));

    parts
}

/// Parse one annotated line into ordered segments.
///
/// A line without any start marker comes back as a single plain segment,
/// unchanged. An empty line yields nothing.
pub fn parse_line(line: &str, markers: &MarkerPair) -> Vec<Segment> {
    if line.is_empty() {
        return Vec::new();
    }

    if markers.start.is_empty() || !line.contains(&markers.start) {
        return vec![Segment {
            kind: SegmentKind::Plain,
            text: line.to_string(),
            part_index: 0,
        }];
    }

    let mut in_term = false;
    let mut segments = Vec::new();

    for (index, part) in split_parts(line, markers).into_iter().enumerate() {
        match part {
            Part::Start => in_term = true,
            Part::End => in_term = false,
            Part::Text("") => {}
            Part::Text(text) => segments.push(Segment {
                kind: if in_term {
                    SegmentKind::Term
                } else {
                    SegmentKind::Plain
                },
                text: text.to_string(),
                part_index: index,
            }),
        }
    }

    segments
}

/// The line with all markers removed
pub fn strip_markers(line: &str, markers: &MarkerPair) -> String {
    parse_line(line, markers)
        .into_iter()
        .map(|segment| segment.text)
        .collect()
}
