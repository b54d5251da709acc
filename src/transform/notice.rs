//! Literal replacement of a known notice paragraph.

use super::{Outcome, Transform};

/// The security notice every readme should carry.
pub const SECURITY_NOTICE: &str = "If you've found a bug regarding security please mail [security@spatie.be](mailto:security@spatie.be) instead of using the issue tracker.";

/// Earlier wordings of the security notice.
pub const LEGACY_SECURITY_NOTICES: [&str; 2] = [
    "If you've found a bug regarding security please mail [freek@spatie.be](mailto:freek@spatie.be) instead of using the issue tracker.",
    "If you discover any security related issues, please email freek@spatie.be instead of using the issue tracker.",
];

/// Replaces any of a set of outdated notices with the current one.
///
/// Each outdated notice is checked in order and its first occurrence is
/// replaced.
#[derive(Debug, Clone)]
pub struct NoticeReplace {
    old: Vec<String>,
    new: String,
}

impl NoticeReplace {
    pub fn new(old: impl IntoIterator<Item = impl Into<String>>, new: impl Into<String>) -> Self {
        Self {
            old: old.into_iter().map(Into::into).collect(),
            new: new.into(),
        }
    }

    /// The security contact notice migration.
    pub fn security_contact() -> Self {
        Self::new(LEGACY_SECURITY_NOTICES, SECURITY_NOTICE)
    }
}

impl Transform for NoticeReplace {
    fn apply(&self, source: &str) -> Outcome {
        let mut content = source.to_string();
        let mut replaced = false;

        for old in self.old.iter().filter(|o| !o.is_empty()) {
            if content.contains(old.as_str()) {
                content = content.replacen(old.as_str(), &self.new, 1);
                replaced = true;
            }
        }

        if replaced && content != source {
            Outcome::Changed(content)
        } else {
            Outcome::Unchanged
        }
    }

    fn describe(&self) -> String {
        format!("Replace {} outdated notice(s) with '{}'", self.old.len(), self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readme(notice: &str) -> String {
        format!("# Array to xml\n\n## Security\n\n{}\n\n## Credits\n", notice)
    }

    #[test]
    fn test_replaces_first_legacy_notice() {
        let source = readme(LEGACY_SECURITY_NOTICES[0]);
        let outcome = NoticeReplace::security_contact().apply(&source);
        assert_eq!(outcome, Outcome::Changed(readme(SECURITY_NOTICE)));
    }

    #[test]
    fn test_replaces_second_legacy_notice() {
        let source = readme(LEGACY_SECURITY_NOTICES[1]);
        let outcome = NoticeReplace::security_contact().apply(&source);
        assert_eq!(outcome, Outcome::Changed(readme(SECURITY_NOTICE)));
    }

    #[test]
    fn test_short_example() {
        let transform = NoticeReplace::new(["mail freek@spatie.be"], "mail security@spatie.be");
        let outcome = transform.apply("...mail freek@spatie.be instead...");
        assert_eq!(
            outcome,
            Outcome::Changed("...mail security@spatie.be instead...".to_string())
        );
    }

    #[test]
    fn test_unchanged_without_notice() {
        let source = readme("Please report issues on GitHub.");
        assert_eq!(NoticeReplace::security_contact().apply(&source), Outcome::Unchanged);
    }

    #[test]
    fn test_already_current_is_unchanged() {
        let source = readme(SECURITY_NOTICE);
        assert_eq!(NoticeReplace::security_contact().apply(&source), Outcome::Unchanged);
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let transform = NoticeReplace::new(["old"], "new");
        assert_eq!(
            transform.apply("old and old"),
            Outcome::Changed("new and old".to_string())
        );
    }
}
