//! Project code list cache and its refresh command.
//!
//! The UI reads [`ProjectCodeListCompute`] via `ctx.cached` and calls
//! [`request_refresh_if_stale`] once per frame; the fetch itself runs in
//! [`RefreshProjectCodesCommand`].

use std::any::Any;

use log::{debug, info, warn};
use stockroom_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, State, StateCtx, Updater,
    state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use super::api::{ProjectCodePage, list_project_codes};
use super::model::ProjectCode;
use crate::{
    BusinessConfig,
    table::{ListQuery, TableController, TableSort},
};

#[derive(Debug, Clone, Default)]
pub enum ProjectCodeListResult {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Fetch in flight; the last loaded page stays visible until it lands.
    Loading { previous: Option<ProjectCodePage> },
    Loaded(ProjectCodePage),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProjectCodeListCompute {
    pub result: ProjectCodeListResult,
    /// Controller generation this result was fetched for.
    pub generation: u64,
}

impl ProjectCodeListCompute {
    pub fn is_loading(&self) -> bool {
        matches!(self.result, ProjectCodeListResult::Loading { .. })
    }

    /// Latest page, including the one shown while a refetch is running.
    pub fn page(&self) -> Option<&ProjectCodePage> {
        match &self.result {
            ProjectCodeListResult::Loaded(page)
            | ProjectCodeListResult::Loading {
                previous: Some(page),
            } => Some(page),
            _ => None,
        }
    }

    pub fn records(&self) -> Option<&[ProjectCode]> {
        self.page().map(|page| page.records.as_slice())
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            ProjectCodeListResult::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl State for ProjectCodeListCompute {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

impl Compute for ProjectCodeListCompute {
    fn deps(&self) -> ComputeDeps {
        Vec::new()
    }

    // Network IO happens in `RefreshProjectCodesCommand` only.
    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}
}

/// What the next fetch asks for.
#[derive(Debug, Clone, Default)]
pub struct ProjectCodeListInput {
    pub query: ListQuery,
    pub generation: u64,
}

impl State for ProjectCodeListInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Sort and search chosen in the table view.
#[derive(Debug, Clone, Default)]
pub struct ProjectCodeTableState {
    pub sort: Option<TableSort>,
    pub search: String,
    requested: Option<u64>,
}

impl ProjectCodeTableState {
    pub fn query(&self) -> ListQuery {
        ListQuery {
            ordering: self.sort,
            search: self.search.clone(),
        }
    }

    /// Generation of the last fetch that was started.
    pub fn requested_generation(&self) -> Option<u64> {
        self.requested
    }
}

impl State for ProjectCodeTableState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Queue a fetch when the controller moved past the last requested generation.
///
/// Returns whether a fetch was queued.
pub fn request_refresh_if_stale(ctx: &mut StateCtx, controller: &TableController) -> bool {
    let generation = controller.generation();
    let view = ctx.state::<ProjectCodeTableState>();
    if view.requested == Some(generation) {
        return false;
    }

    let query = view.query();
    debug!("Fetching project codes for generation {generation}: {query:?}");
    ctx.update::<ProjectCodeTableState>(|view| view.requested = Some(generation));
    ctx.update::<ProjectCodeListInput>(|input| {
        input.query = query;
        input.generation = generation;
    });
    ctx.enqueue_command::<RefreshProjectCodesCommand>();
    true
}

/// Manual-only command fetching the project code list.
#[derive(Debug, Default)]
pub struct RefreshProjectCodesCommand;

impl Command for RefreshProjectCodesCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<ProjectCodeListInput>().clone();
        let config = snap.state::<BusinessConfig>().clone();
        let previous = snap
            .try_state::<ProjectCodeListCompute>()
            .and_then(|list| list.page().cloned());

        Box::pin(async move {
            let generation = input.generation;
            updater.set(ProjectCodeListCompute {
                result: ProjectCodeListResult::Loading { previous },
                generation,
            });

            let fetched = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Project code fetch for generation {generation} superseded");
                    return;
                }
                fetched = list_project_codes(&config, &input.query) => fetched,
            };

            let result = match fetched {
                Ok(page) => {
                    info!("Loaded {} of {} project codes", page.records.len(), page.count);
                    ProjectCodeListResult::Loaded(page)
                }
                Err(err) => {
                    warn!("Failed to load project codes: {err}");
                    ProjectCodeListResult::Error(err.to_string())
                }
            };
            updater.set(ProjectCodeListCompute { result, generation });
        })
    }
}
