//! Branch listings.

use crate::objects::ObjectId;

/// A branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// The branch name, without the `refs/heads/` prefix.
    pub name: String,
    /// The commit the branch points at, or `None` for an unborn branch.
    pub id: Option<ObjectId>,
    /// True if HEAD points at this branch.
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_fields() {
        let branch = Branch {
            name: "master".to_string(),
            id: Some(ObjectId::from_bytes([1; 20])),
            is_current: true,
        };
        assert_eq!(branch.name, "master");
        assert!(branch.is_current);
    }
}
