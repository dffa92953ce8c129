#![forbid(unsafe_code)]

//! Console list hooks.
//!
//! The console's paginated pickers, expressed as query descriptions for
//! `inflist-query`: each one knows its key, its paging, the parameters to
//! send for a page request, and how to decode the response.
//!
//! - [`SharedWorkflowsQuery`]: shared workflows filtered by search and owner.
//! - [`VersionListQuery`]: versions of one workflow with debounced search,
//!   plus [`resolve_selected_version`] for the picker's selection.
//! - [`PublicToggle`]: optimistic public/private switch for a shared workflow.

pub mod payload;
pub mod shared_workflows;
pub mod versions;

pub use payload::{ListPage, decode_list};
pub use shared_workflows::{
    PublicToggle, SHARED_WORKFLOWS_SCOPE, SharedWorkflow, SharedWorkflowsParams,
    SharedWorkflowsQuery, VisibilityUpdate,
};
pub use versions::{
    FALLBACK_VERSION, VersionListParams, VersionListQuery, WorkflowVersion, find_version,
    resolve_selected_version,
};
