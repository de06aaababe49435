//! One full export run: terms, sites, traversal, then both artifacts.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{error, info, warn};

use super::records::RecordSet;
use super::sections::{SectionMembers, expand_provider_sections};
use super::sites::select_sites;
use super::terms::resolve_terms;
use super::traversal::{SiteOutcome, SkipReason, TraversalEngine};
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::output::{clear_artifact, write_artifact};
use crate::services::{Collaborators, Site};

pub const JOB_NAME: &str = "GradebookExport";

/// Per-site counts for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiteTally {
    pub exported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What a run produced. Each artifact succeeds or fails on its own.
#[derive(Debug)]
pub struct RunReport {
    pub terms: Vec<String>,
    pub sites: SiteTally,
    /// Rows written to the assessment artifact.
    pub assessments: ExportResult<usize>,
    /// Rows written to the score artifact.
    pub scores: ExportResult<usize>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.assessments.is_ok() && self.scores.is_ok()
    }
}

/// Runs the export once.
///
/// Previous artifacts are removed before any site is read, so a run that
/// produces no rows leaves empty artifacts behind rather than stale ones.
///
/// # Errors
///
/// Only fails when the active terms cannot be resolved; nothing has been
/// touched on disk at that point. Artifact failures are reported in the
/// returned [`RunReport`].
#[tracing::instrument(skip_all, fields(output_dir = %config.output_dir.display(), use_provider = config.use_provider))]
pub fn run_export(
    collaborators: Collaborators<'_>,
    config: &ExportConfig,
    run_started: NaiveDateTime,
) -> Result<RunReport> {
    info!(job = JOB_NAME, "Export started");

    let terms = resolve_terms(&config.terms, collaborators.course_management)?;
    if terms.is_empty() {
        info!("No terms to export");
    }

    let assessments_path = config.assessments_path();
    let scores_path = config.scores_path();
    let assessments_cleared = clear_artifact(&assessments_path);
    let scores_cleared = clear_artifact(&scores_path);

    let (records, sites) = collect_records(collaborators, &terms, config.use_provider, run_started);
    let sorted = records.into_sorted();

    let assessments = assessments_cleared
        .and_then(|_| write_artifact(&assessments_path, &sorted.assessments));
    let scores = scores_cleared.and_then(|_| write_artifact(&scores_path, &sorted.scores));
    log_artifact(&assessments_path, &assessments);
    log_artifact(&scores_path, &scores);

    info!(
        job = JOB_NAME,
        exported = sites.exported,
        skipped = sites.skipped,
        failed = sites.failed,
        "Export ended"
    );

    Ok(RunReport {
        terms,
        sites,
        assessments,
        scores,
    })
}

/// Walks every site of every term and returns the accumulated rows.
pub fn collect_records(
    collaborators: Collaborators<'_>,
    terms: &[String],
    use_provider: bool,
    run_started: NaiveDateTime,
) -> (RecordSet, SiteTally) {
    let mut engine = TraversalEngine::new(collaborators, run_started);
    let mut tally = SiteTally::default();

    for term in terms {
        let sites = match select_sites(term, collaborators.sites) {
            Ok(sites) => sites,
            Err(e) => {
                error!(term = %term, error = %e, "Could not list sites for term");
                continue;
            }
        };
        info!(term = %term, sites = sites.len(), "Sites to process for term");

        for site in &sites {
            match export_site(&mut engine, collaborators, site, use_provider) {
                Ok(SiteOutcome::Exported {
                    assessments,
                    scores,
                }) => {
                    tally.exported += 1;
                    info!(site_id = %site.id, assessments, scores, "Site exported");
                }
                Ok(SiteOutcome::Skipped(reason)) => {
                    tally.skipped += 1;
                    info!(site_id = %site.id, %reason, "Skipping site");
                }
                Err(e) => {
                    tally.failed += 1;
                    error!(site_id = %site.id, error = %e, "Problem while processing site");
                }
            }
        }
    }

    (engine.into_records(), tally)
}

fn export_site(
    engine: &mut TraversalEngine<'_>,
    collaborators: Collaborators<'_>,
    site: &Site,
    use_provider: bool,
) -> Result<SiteOutcome> {
    let sections = if use_provider {
        match expand_provider_sections(site, collaborators.course_management) {
            Ok(sections) => sections,
            Err(e) => {
                warn!(site_id = %site.id, error = %e, "Section membership lookup failed");
                return Ok(SiteOutcome::Skipped(SkipReason::MembershipUnavailable));
            }
        }
    } else {
        SectionMembers::new()
    };

    engine.process_site(site, &sections)
}

fn log_artifact(path: &Path, result: &ExportResult<usize>) {
    match result {
        Ok(rows) => info!(path = %path.display(), rows, "Artifact written"),
        Err(e) => error!(path = %path.display(), error = %e, "Artifact not written"),
    }
}
