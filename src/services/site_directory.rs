//! Site and user directory lookups.

use anyhow::Result;
use std::collections::HashSet;

use super::types::{Site, User};

/// Abstraction over the platform's site registry.
pub trait SiteDirectory {
    /// Returns every site whose property `key` equals `value`, in id order.
    fn sites_with_property(&self, key: &str, value: &str) -> Result<Vec<Site>>;

    /// Internal ids of users holding `permission` in the site.
    fn users_allowed(&self, site_id: &str, permission: &str) -> Result<HashSet<String>>;

    /// Personal workspace sites are prefixed with `~`.
    fn is_user_site(&self, site_id: &str) -> bool {
        site_id.starts_with('~')
    }

    /// Platform-reserved sites are prefixed with `!`.
    fn is_special_site(&self, site_id: &str) -> bool {
        site_id.starts_with('!')
    }
}

/// Resolves internal user ids into user records.
pub trait UserDirectory {
    /// Unknown ids are silently dropped.
    fn users(&self, ids: &HashSet<String>) -> Result<Vec<User>>;
}
