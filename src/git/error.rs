//! Recognizable git failures
//!
//! Most git failures are fatal and simply propagate. A few messages signal an
//! empty or not-yet-initialized remote and switch the job onto a fallback path.

/// Known git failure shapes, matched on the (redacted) error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitFailure {
    /// `error: src refspec main does not match any`: nothing has been pushed yet
    UnmatchedRefspec,
    /// `Remote branch X not found in upstream origin`: clone of a missing branch
    RemoteBranchNotFound,
    /// `no such ref was fetched` / `couldn't find remote ref`: pull from an empty remote
    MissingRemoteRef,
}

impl GitFailure {
    pub fn classify(message: &str) -> Option<Self> {
        if message.contains("src refspec") && message.contains("does not match any") {
            Some(GitFailure::UnmatchedRefspec)
        } else if message.contains("Remote branch") && message.contains("not found") {
            Some(GitFailure::RemoteBranchNotFound)
        } else if message.contains("no such ref was fetched")
            || message.contains("couldn't find remote ref")
        {
            Some(GitFailure::MissingRemoteRef)
        } else {
            None
        }
    }

    /// Whether `message` describes a remote without any usable branch yet
    pub fn is_empty_remote(message: &str) -> bool {
        matches!(
            Self::classify(message),
            Some(GitFailure::UnmatchedRefspec | GitFailure::RemoteBranchNotFound)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_messages() {
        assert_eq!(
            GitFailure::classify("error: src refspec main does not match any"),
            Some(GitFailure::UnmatchedRefspec)
        );
        assert_eq!(
            GitFailure::classify("warning: Remote branch prod not found in upstream origin"),
            Some(GitFailure::RemoteBranchNotFound)
        );
        assert_eq!(
            GitFailure::classify("fatal: couldn't find remote ref refs/heads/main"),
            Some(GitFailure::MissingRemoteRef)
        );
        assert_eq!(
            GitFailure::classify("There is no tracking information; no such ref was fetched."),
            Some(GitFailure::MissingRemoteRef)
        );
    }

    #[test]
    fn test_classify_requires_both_fragments() {
        assert_eq!(GitFailure::classify("error: src refspec is odd"), None);
        assert_eq!(GitFailure::classify("Remote branch exists"), None);
        assert_eq!(GitFailure::classify("! [rejected] main -> main (fetch first)"), None);
    }

    #[test]
    fn test_is_empty_remote() {
        assert!(GitFailure::is_empty_remote("src refspec main does not match any"));
        assert!(GitFailure::is_empty_remote("Remote branch dev not found"));
        assert!(!GitFailure::is_empty_remote("couldn't find remote ref main"));
    }
}
