//! Ownership policy - who may mutate a post or comment.

use uuid::Uuid;

/// True iff `viewer` is the entity's author.
///
/// Anonymous viewers fail every check: no session, no owned entities.
/// What a failed check turns into is route-specific - a redirect to the
/// post's detail view for post mutations, a hard denial for comment
/// mutations - and is decided by the handlers, not here.
pub fn can_modify(author_id: Uuid, viewer: Option<Uuid>) -> bool {
    viewer == Some(author_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_may_modify() {
        let author = Uuid::new_v4();
        assert!(can_modify(author, Some(author)));
    }

    #[test]
    fn other_user_may_not_modify() {
        assert!(!can_modify(Uuid::new_v4(), Some(Uuid::new_v4())));
    }

    #[test]
    fn anonymous_never_owns_anything() {
        assert!(!can_modify(Uuid::new_v4(), None));
    }
}
