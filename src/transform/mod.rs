//! Text transformations applied to repository files.

pub mod notice;
pub mod section;

pub use notice::NoticeReplace;
pub use section::{Heading, SectionReplace};

/// Result of applying a transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing applicable was found; no write should happen.
    Unchanged,
    /// The content to write back.
    Changed(String),
}

impl Outcome {
    /// Returns true if the transformation produced new content.
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }

    /// Returns the new content, or the given original when unchanged.
    pub fn into_content(self, original: &str) -> String {
        match self {
            Outcome::Changed(content) => content,
            Outcome::Unchanged => original.to_string(),
        }
    }
}

/// A pure text transformation applied to a single file.
pub trait Transform: Send + Sync {
    /// Applies the transformation to the given content.
    fn apply(&self, source: &str) -> Outcome;

    /// Returns a description of the transformation.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_into_content() {
        assert_eq!(Outcome::Unchanged.into_content("same"), "same");
        assert_eq!(Outcome::Changed("new".into()).into_content("old"), "new");
    }
}
