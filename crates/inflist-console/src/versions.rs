#![forbid(unsafe_code)]

//! Workflow version listing and selection.
//!
//! The version picker searches as the user types. Search text settles
//! through a [`Debounced`] before it becomes part of the key
//! `["workflow", workflow_id, "versions", search]`, so each settled search is
//! its own collection and the list starts over from the first page.

use inflist_query::{
    DEFAULT_BATCH_SIZE, DEFAULT_DEBOUNCE, Debounced, FetchError, InfiniteQuery, OffsetPaging,
    PageParam, PageRequest, QueryKey, QueryStore,
};
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

use crate::payload::{ListPage, decode_list};

/// Version shown when nothing else decides.
pub const FALLBACK_VERSION: u32 = 1;

/// One saved version of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowVersion {
    pub id: String,
    pub workflow_id: String,
    pub version: u32,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: String,
}

/// Query-string parameters for one page of versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionListParams {
    pub limit: usize,
    pub offset: usize,
    pub search: String,
}

/// Versions of one workflow, filtered by debounced search text.
#[derive(Debug, Clone)]
pub struct VersionListQuery {
    workflow_id: String,
    search: Debounced<String>,
    limit: usize,
}

impl VersionListQuery {
    #[must_use]
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            search: Debounced::new(String::new(), DEFAULT_DEBOUNCE),
            limit: DEFAULT_BATCH_SIZE,
        }
    }

    /// Use a different quiet period for search input.
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.search = Debounced::new(self.search.settled().clone(), delay);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    /// Search text currently part of the key.
    #[must_use]
    pub fn search(&self) -> &str {
        self.search.settled()
    }

    /// Record a keystroke's worth of search text.
    pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search.set(text.into(), now);
    }

    /// Settle pending search text. Returns `true` when the key changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let changed = self.search.poll(now).is_some();
        if changed {
            tracing::debug!(
                target: "inflist.console",
                workflow_id = %self.workflow_id,
                search = %self.search.settled(),
                "version search settled"
            );
        }
        changed
    }

    /// Identity of the listing for the settled search.
    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::new("workflow")
            .with(&self.workflow_id)
            .with("versions")
            .with(self.search.settled())
    }

    #[must_use]
    pub fn paging(&self) -> OffsetPaging {
        OffsetPaging::new(self.limit)
    }

    #[must_use]
    pub fn build(&self) -> InfiniteQuery<WorkflowVersion> {
        InfiniteQuery::new(self.key(), self.paging())
    }

    /// The listing for the settled search in `store`, created on first use.
    pub fn activate<'s>(
        &self,
        store: &'s mut QueryStore<WorkflowVersion>,
    ) -> &'s mut InfiniteQuery<WorkflowVersion> {
        store.activate(&self.key(), self.paging())
    }

    /// Parameters to send for `request`; `None` for a non-offset request.
    #[must_use]
    pub fn params(&self, request: &PageRequest) -> Option<VersionListParams> {
        let &PageParam::Offset(offset) = &request.param else {
            return None;
        };
        Some(VersionListParams {
            limit: self.limit,
            offset,
            search: self.search.settled().clone(),
        })
    }

    /// Decode a response body into versions.
    pub fn decode_page(body: &str) -> Result<ListPage<WorkflowVersion>, FetchError> {
        decode_list(body, "versions")
    }
}

/// The version number the picker shows as selected.
///
/// An explicit selection wins, then the `version` URL parameter, then the
/// first loaded version, then [`FALLBACK_VERSION`]. Version `0` never counts
/// as an explicit selection.
#[must_use]
pub fn resolve_selected_version(
    explicit: Option<u32>,
    url_param: Option<u32>,
    versions: &[WorkflowVersion],
) -> u32 {
    explicit
        .filter(|&v| v != 0)
        .or(url_param)
        .or_else(|| versions.first().map(|v| v.version))
        .unwrap_or(FALLBACK_VERSION)
}

/// The loaded entry for `version`, if it has been fetched.
#[must_use]
pub fn find_version(versions: &[WorkflowVersion], version: u32) -> Option<&WorkflowVersion> {
    versions.iter().find(|v| v.version == version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(n: u32) -> WorkflowVersion {
        WorkflowVersion {
            id: format!("v{n}"),
            workflow_id: "wf".into(),
            version: n,
            comment: None,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn selection_precedence() {
        let loaded = [version(7), version(6)];
        assert_eq!(resolve_selected_version(Some(3), Some(5), &loaded), 3);
        assert_eq!(resolve_selected_version(None, Some(5), &loaded), 5);
        assert_eq!(resolve_selected_version(None, None, &loaded), 7);
        assert_eq!(resolve_selected_version(None, None, &[]), 1);
        assert_eq!(resolve_selected_version(Some(0), None, &loaded), 7);
    }

    #[test]
    fn find_loaded_version() {
        let loaded = [version(2), version(1)];
        assert_eq!(find_version(&loaded, 1).map(|v| v.id.as_str()), Some("v1"));
        assert!(find_version(&loaded, 9).is_none());
    }

    #[test]
    fn settled_search_changes_key() {
        let t0 = Instant::now();
        let mut q = VersionListQuery::new("wf_9");
        assert_eq!(q.key().to_string(), "workflow,wf_9,versions,");

        q.set_search("fi", t0);
        q.set_search("fix", t0 + Duration::from_millis(100));
        assert!(!q.poll(t0 + Duration::from_millis(200)));
        assert_eq!(q.search(), "");
        assert!(q.poll(t0 + Duration::from_millis(350)));
        assert_eq!(q.key().to_string(), "workflow,wf_9,versions,fix");
    }

    #[test]
    fn custom_debounce_applies() {
        let t0 = Instant::now();
        let mut q = VersionListQuery::new("wf").with_debounce(Duration::from_millis(10));
        q.set_search("a", t0);
        assert!(q.poll(t0 + Duration::from_millis(10)));
    }
}
