//! Enumerates the course sites belonging to a term.

use anyhow::Result;
use tracing::debug;

use crate::services::{Site, SiteDirectory};

/// Site property holding the term a site belongs to.
pub const TERM_PROPERTY: &str = "term_eid";

/// Returns every site of `term_eid`, minus workspace and special sites.
pub fn select_sites(term_eid: &str, directory: &dyn SiteDirectory) -> Result<Vec<Site>> {
    let sites = directory
        .sites_with_property(TERM_PROPERTY, term_eid)?
        .into_iter()
        .filter(|site| !directory.is_user_site(&site.id) && !directory.is_special_site(&site.id))
        .inspect(|site| debug!(site_id = %site.id, "Site selected"))
        .collect();

    Ok(sites)
}
