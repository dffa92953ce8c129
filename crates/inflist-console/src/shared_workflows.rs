#![forbid(unsafe_code)]

//! Shared-workflow listing.
//!
//! One listing per `(search, limit, user_id)` combination, paged by offset.
//! The key is `["shared-workflows", search, limit, user_id]`, which displays
//! as `shared-workflows,<search>,<limit>,<user_id>`.
//!
//! ```
//! use inflist_console::SharedWorkflowsQuery;
//!
//! let query = SharedWorkflowsQuery::new().with_search("flux").with_user_id("u_1");
//! assert_eq!(query.key().to_string(), "shared-workflows,flux,20,u_1");
//! ```

use inflist_query::{
    DEFAULT_BATCH_SIZE, FetchError, InfiniteQuery, MutationError, MutationId, OffsetPaging,
    Optimistic, PageParam, PageRequest, QueryKey, QueryStore,
};
use serde::{Deserialize, Serialize};

use crate::payload::{ListPage, decode_list};

/// Scope segment of every shared-workflow key.
pub const SHARED_WORKFLOWS_SCOPE: &str = "shared-workflows";

/// A workflow version published for others to import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedWorkflow {
    pub id: String,
    pub user_id: String,
    pub org_id: Option<String>,
    pub workflow_id: String,
    pub workflow_version_id: String,
    /// Exported workflow graph; opaque here.
    #[serde(default)]
    pub workflow_export: serde_json::Map<String, serde_json::Value>,
    pub share_slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub is_public: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub download_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Filter set that identifies one shared-workflow listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedWorkflowsQuery {
    /// Settled (debounced) search text.
    pub search: String,
    /// Owner filter; empty for everyone.
    pub user_id: String,
    /// Page size.
    pub limit: usize,
}

impl Default for SharedWorkflowsQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            user_id: String::new(),
            limit: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Query-string parameters for one page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedWorkflowsParams {
    pub limit: usize,
    pub offset: usize,
    pub search: String,
    pub user_id: String,
}

impl SharedWorkflowsQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Identity of this listing.
    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::new(SHARED_WORKFLOWS_SCOPE)
            .with(&self.search)
            .with(self.limit)
            .with(&self.user_id)
    }

    /// Offset paging with this listing's page size.
    #[must_use]
    pub fn paging(&self) -> OffsetPaging {
        OffsetPaging::new(self.limit)
    }

    /// A standalone query for this listing.
    #[must_use]
    pub fn build(&self) -> InfiniteQuery<SharedWorkflow> {
        InfiniteQuery::new(self.key(), self.paging())
    }

    /// This listing's query in `store`, created on first use.
    pub fn activate<'s>(
        &self,
        store: &'s mut QueryStore<SharedWorkflow>,
    ) -> &'s mut InfiniteQuery<SharedWorkflow> {
        store.activate(&self.key(), self.paging())
    }

    /// Parameters to send for `request`; `None` for a non-offset request.
    #[must_use]
    pub fn params(&self, request: &PageRequest) -> Option<SharedWorkflowsParams> {
        let &PageParam::Offset(offset) = &request.param else {
            return None;
        };
        Some(SharedWorkflowsParams {
            limit: self.limit,
            offset,
            search: self.search.clone(),
            user_id: self.user_id.clone(),
        })
    }

    /// Decode a response body into items and total.
    pub fn decode_page(body: &str) -> Result<ListPage<SharedWorkflow>, FetchError> {
        decode_list(body, "shared_workflows")
    }
}

/// Body of a visibility change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityUpdate {
    pub id: String,
    pub is_public: bool,
}

/// Public/private switch for one shared workflow, shown optimistically.
#[derive(Debug)]
pub struct PublicToggle {
    id: String,
    state: Optimistic<bool>,
}

impl PublicToggle {
    /// Track `workflow`'s visibility as last confirmed by the server.
    #[must_use]
    pub fn new(workflow: &SharedWorkflow) -> Self {
        Self {
            id: workflow.id.clone(),
            state: Optimistic::new(workflow.is_public),
        }
    }

    /// Visibility to display.
    #[must_use]
    pub fn is_public(&self) -> bool {
        *self.state.value()
    }

    /// Visibility the server last confirmed.
    #[must_use]
    pub fn confirmed(&self) -> bool {
        *self.state.confirmed()
    }

    /// Whether a change awaits the server.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.pending_count() > 0
    }

    /// Show `public` immediately and return the request to send.
    pub fn set_public(&mut self, public: bool) -> (MutationId, VisibilityUpdate) {
        let id = self.state.apply(move |v| *v = public);
        tracing::debug!(
            target: "inflist.console",
            share = %self.id,
            is_public = public,
            mutation = id.raw(),
            "visibility change applied"
        );
        (
            id,
            VisibilityUpdate {
                id: self.id.clone(),
                is_public: public,
            },
        )
    }

    /// The server accepted `mutation`, optionally reporting the stored value.
    pub fn confirm(&mut self, mutation: MutationId, server: Option<bool>) -> Result<(), MutationError> {
        self.state.commit(mutation, server)
    }

    /// The server rejected `mutation`.
    pub fn reject(&mut self, mutation: MutationId) -> Result<(), MutationError> {
        self.state.rollback(mutation)
    }

    /// Take a freshly fetched copy of the workflow as the confirmed state.
    pub fn sync(&mut self, workflow: &SharedWorkflow) {
        if workflow.id == self.id {
            self.state.reconcile(workflow.is_public);
        }
    }
}
