//! Markdown section replacement.
//!
//! A section runs from its heading line up to the next heading of the same or
//! a higher weight (fewer `#`), or to the end of the document. Replacing one
//! deletes that span and places the new block in front of the first
//! second-level heading of what remains.

use std::sync::LazyLock;

use regex::Regex;

use super::{Outcome, Transform};

/// The "Support us" block written into package readmes.
pub const SUPPORT_US: &str = "## Support us

We invest a lot of resources into creating [best in class open source packages](https://spatie.be/open-source). You can support us by [buying one of our paid products](https://spatie.be/open-source/support-us).

We highly appreciate you sending us a postcard from your hometown, mentioning which of our package(s) you are using. You'll find our address on [our contact page](https://spatie.be/about-us). We publish all received postcards on [our virtual postcard wall](https://spatie.be/open-source/postcards).
";

static BLANK_LINES_BEFORE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}(#)").expect("invalid regex"));

/// An ATX heading found in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#` characters.
    pub level: usize,
    pub title: String,
    /// Byte offset of the start of the heading line.
    pub start: usize,
    /// Byte offset just past the heading line, including its newline.
    pub end: usize,
}

/// Scans a document for ATX headings, skipping fenced code blocks.
pub fn scan_headings(source: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut offset = 0;
    let mut fence: Option<&str> = None;

    for line in source.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            continue;
        }

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if let Some((level, title)) = parse_heading(trimmed) {
            headings.push(Heading {
                level,
                title,
                start,
                end: offset,
            });
        }
    }

    headings
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let rest = &line[level..];
    if !(rest.is_empty() || rest.starts_with([' ', '\t', '\r', '\n'])) {
        return None;
    }

    let title = rest.trim().trim_end_matches('#').trim_end().to_string();
    Some((level, title))
}

/// Collapses runs of blank lines in front of headings and trims the end of
/// the document to a single newline.
pub fn normalize_spacing(source: &str) -> String {
    let collapsed = BLANK_LINES_BEFORE_HEADING.replace_all(source, "\n\n$1");
    let mut result = collapsed.trim_end().to_string();
    result.push('\n');
    result
}

/// Replaces a named Markdown section with a fixed block.
#[derive(Debug, Clone)]
pub struct SectionReplace {
    level: usize,
    title: String,
    replacement: String,
}

impl SectionReplace {
    /// Creates a replacement for the section under `heading`, e.g. `"## Support us"`.
    ///
    /// A heading given without `#` markers is taken to be second level.
    pub fn new(heading: &str, replacement: impl Into<String>) -> Self {
        let (level, title) = parse_heading(heading.trim()).unwrap_or((2, heading.trim().to_string()));
        Self {
            level,
            title,
            replacement: replacement.into(),
        }
    }

    /// The "Support us" section migration.
    pub fn support_us() -> Self {
        Self::new("## Support us", SUPPORT_US)
    }

    fn find_section(&self, source: &str) -> Option<(usize, usize)> {
        let headings = scan_headings(source);
        let index = headings
            .iter()
            .position(|h| h.level == self.level && h.title.eq_ignore_ascii_case(&self.title))?;

        let start = headings[index].start;
        let end = headings[index + 1..]
            .iter()
            .find(|h| h.level <= self.level)
            .map_or(source.len(), |h| h.start);

        Some((start, end))
    }

    fn replace_lf(&self, source: &str) -> Outcome {
        let Some((start, end)) = self.find_section(source) else {
            return Outcome::Unchanged;
        };

        if source[start..end].trim() == self.replacement.trim() {
            return Outcome::Unchanged;
        }

        let mut remaining = String::with_capacity(source.len() + self.replacement.len());
        remaining.push_str(&source[..start]);
        remaining.push_str(&source[end..]);

        let block = format!("{}\n\n", self.replacement.trim());
        let insert_at = scan_headings(&remaining)
            .into_iter()
            .find(|h| h.level == 2)
            .map(|h| h.start);

        match insert_at {
            Some(position) => remaining.insert_str(position, &block),
            None => {
                if !remaining.is_empty() {
                    remaining.push_str("\n\n");
                }
                remaining.push_str(&block);
            }
        }

        let result = normalize_spacing(&remaining);
        if result == source {
            Outcome::Unchanged
        } else {
            Outcome::Changed(result)
        }
    }
}

impl Transform for SectionReplace {
    fn apply(&self, source: &str) -> Outcome {
        if !source.contains("\r\n") {
            return self.replace_lf(source);
        }

        // Work on LF and write the result back with the file's own line endings.
        let normalized = source.replace("\r\n", "\n");
        match self.replace_lf(&normalized) {
            Outcome::Changed(result) => {
                let result = result.replace('\n', "\r\n");
                if result == source {
                    Outcome::Unchanged
                } else {
                    Outcome::Changed(result)
                }
            }
            Outcome::Unchanged => Outcome::Unchanged,
        }
    }

    fn describe(&self) -> String {
        format!("Replace section '{} {}'", "#".repeat(self.level), self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_BLOCK: &str = "## Support us\n\nBuy our products.\n";

    fn transform() -> SectionReplace {
        SectionReplace::new("## Support us", NEW_BLOCK)
    }

    #[test]
    fn test_scan_headings() {
        let doc = "# Title\n\ntext\n\n## Install\n\n```bash\n# not a heading\n```\n\n### Usage ###\n#nope\n";
        let headings = scan_headings(doc);
        let summary: Vec<_> = headings.iter().map(|h| (h.level, h.title.as_str())).collect();
        assert_eq!(summary, vec![(1, "Title"), (2, "Install"), (3, "Usage")]);
        assert_eq!(&doc[headings[1].start..headings[1].end], "## Install\n");
    }

    #[test]
    fn test_replaces_section_before_next_same_level_heading() {
        let doc = "# Package\n\nIntro.\n\n## Support us\n\nOld text.\n\n### Details\n\nMore old text.\n\n## Installation\n\ncomposer require\n";
        let outcome = transform().apply(doc);
        assert_eq!(
            outcome,
            Outcome::Changed(
                "# Package\n\nIntro.\n\n## Support us\n\nBuy our products.\n\n## Installation\n\ncomposer require\n"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_stops_at_top_level_heading() {
        let doc = "# Package\n\n## Installation\n\nSteps.\n\n## Support us\n\nOld text.\n\n# Appendix\n\nKeep me.\n";
        let Outcome::Changed(result) = transform().apply(doc) else {
            panic!("expected a change");
        };
        assert!(!result.contains("Old text."));
        assert!(result.contains("# Appendix\n\nKeep me.\n"));
        assert_eq!(
            result,
            "# Package\n\n## Support us\n\nBuy our products.\n\n## Installation\n\nSteps.\n\n# Appendix\n\nKeep me.\n"
        );
    }

    #[test]
    fn test_section_at_end_of_file() {
        let doc = "# Package\n\nIntro.\n\n## Support us\n\nOld text.\n\nStill old.\n\n\n";
        let Outcome::Changed(result) = transform().apply(doc) else {
            panic!("expected a change");
        };
        assert!(!result.contains("old"));
        assert_eq!(result, "# Package\n\nIntro.\n\n## Support us\n\nBuy our products.\n");
    }

    #[test]
    fn test_idempotent() {
        let doc = "# Package\n\n## Usage\n\nUse it.\n\n## Support us\n\nOld text.\n\n## License\n\nMIT\n";
        let once = transform().apply(doc).into_content(doc);
        let twice = transform().apply(&once);
        assert_eq!(twice, Outcome::Unchanged);
        assert!(once.starts_with("# Package\n\n## Support us\n\nBuy our products.\n\n## Usage\n"));
    }

    #[test]
    fn test_missing_section_is_unchanged() {
        let doc = "# Package\n\n## Installation\n\nSteps.\n";
        assert_eq!(transform().apply(doc), Outcome::Unchanged);
    }

    #[test]
    fn test_renamed_section() {
        let replace = SectionReplace::new("## Postcardware", NEW_BLOCK);
        let doc = "# Package\n\n## Postcardware\n\nSend a postcard.\n\n## Credits\n\n- Freek\n";
        let once = replace.apply(doc).into_content(doc);
        assert_eq!(
            once,
            "# Package\n\n## Support us\n\nBuy our products.\n\n## Credits\n\n- Freek\n"
        );
        assert_eq!(replace.apply(&once), Outcome::Unchanged);
    }

    #[test]
    fn test_collapses_blank_lines_before_headings() {
        assert_eq!(normalize_spacing("a\n\n\n\n## b\n\n\n"), "a\n\n## b\n");
        assert_eq!(normalize_spacing("a\n\n\n\nb\n"), "a\n\n\n\nb\n");
    }

    #[test]
    fn test_heading_without_markers_defaults_to_second_level() {
        let replace = SectionReplace::new("Support us", NEW_BLOCK);
        assert_eq!(replace.describe(), "Replace section '## Support us'");
    }

    #[test]
    fn test_support_us_block_is_a_single_section() {
        let headings = scan_headings(SUPPORT_US);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].title, "Support us");
    }

    #[test]
    fn test_keeps_crlf_line_endings() {
        let doc = "# P\r\n\r\n## Support us\r\n\r\nOld.\r\n\r\n## Usage\r\n\r\nRun it.\r\n\r\n## License\r\n\r\nMIT\r\n";
        let transform = SectionReplace::new("## Support us", "## Support us\n\nBuy.\n");

        let updated = transform.apply(doc).into_content(doc);
        assert_eq!(
            updated,
            "# P\r\n\r\n## Support us\r\n\r\nBuy.\r\n\r\n## Usage\r\n\r\nRun it.\r\n\r\n## License\r\n\r\nMIT\r\n"
        );
        assert!(!updated.replace("\r\n", "").contains('\n'));
        assert_eq!(transform.apply(&updated), Outcome::Unchanged);
    }
}
