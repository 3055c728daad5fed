//! Cache key generators for consistent key naming.
//!
//! Key formats are shared with existing deployments and must stay byte-for-byte
//! stable.

use roster_core::{PageRequest, UserId};

/// Namespace of every list and search key; swept after each mutation.
pub const COLLECTIONS_PREFIX: &str = "users:";

/// Key for a single user.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("user:{id}")
}

/// Key for one page of the unfiltered listing.
#[must_use]
pub fn user_list(page: PageRequest) -> String {
    format!("users:skip:{}:limit:{}", page.skip, page.limit)
}

/// Key for one page of a search.
#[must_use]
pub fn user_search(term: &str, page: PageRequest) -> String {
    format!("users:search:{term}:skip:{}:limit:{}", page.skip, page.limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_by_id_key() {
        assert_eq!(user_by_id(UserId(42)), "user:42");
    }

    #[test]
    fn test_user_list_key() {
        assert_eq!(user_list(PageRequest::new(0, 10)), "users:skip:0:limit:10");
        assert_eq!(user_list(PageRequest::new(20, 5)), "users:skip:20:limit:5");
    }

    #[test]
    fn test_user_search_key() {
        assert_eq!(
            user_search("ali", PageRequest::new(0, 10)),
            "users:search:ali:skip:0:limit:10"
        );
    }

    #[test]
    fn test_collection_keys_share_sweep_prefix() {
        assert!(user_list(PageRequest::default()).starts_with(COLLECTIONS_PREFIX));
        assert!(user_search("x", PageRequest::default()).starts_with(COLLECTIONS_PREFIX));
        assert!(!user_by_id(UserId(1)).starts_with(COLLECTIONS_PREFIX));
    }
}
