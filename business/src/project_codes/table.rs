use std::sync::Arc;

use log::{info, warn};

use super::model::{FIELD_CODE, FIELD_DESCRIPTION, ProjectCode};
use crate::{
    BusinessConfig,
    api_paths::{ApiPaths, Pk, api_url},
    forms::{ApiFormProps, FieldSet, FormHost, FormKind, FormOutcome, decode_submitted},
    i18n::MessageKey,
    notifications::Notifier,
    roles::{Permission, RuleSetName, UserRoles},
    table::{RowAction, RowActionKind, TableAction, TableActionKind, TableColumn, TableController},
};

/// Name shared by every project code table's controller.
pub const PROJECT_CODE_TABLE: &str = "project-code";

/// Rule set gating changes to project codes.
pub const PROJECT_CODE_RULESET: RuleSetName = RuleSetName::Admin;

/// Settings table listing project codes with add, edit and delete forms.
///
/// Cheap to clone; clones share the controller and column list.
#[derive(Debug, Clone)]
pub struct ProjectCodeTable {
    controller: TableController,
    columns: Arc<[TableColumn]>,
    fields: FieldSet,
}

impl Default for ProjectCodeTable {
    fn default() -> Self {
        Self::new(TableController::new(PROJECT_CODE_TABLE))
    }
}

impl ProjectCodeTable {
    pub fn new(controller: TableController) -> Self {
        Self {
            controller,
            columns: Arc::from([
                TableColumn::sortable(FIELD_CODE).titled(MessageKey::ProjectCode),
                TableColumn::plain(FIELD_DESCRIPTION).titled(MessageKey::Description),
            ]),
            fields: FieldSet::new([FIELD_CODE, FIELD_DESCRIPTION])
                .labelled(FIELD_CODE, MessageKey::ProjectCode)
                .labelled(FIELD_DESCRIPTION, MessageKey::Description),
        }
    }

    pub fn controller(&self) -> &TableController {
        &self.controller
    }

    /// Column list; the same allocation is returned for the life of the table.
    pub fn columns(&self) -> Arc<[TableColumn]> {
        Arc::clone(&self.columns)
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn list_url(&self, config: &BusinessConfig) -> String {
        api_url(config, ApiPaths::ProjectCodeList, None)
    }

    /// Edit and delete entries for one row, filtered by the user's roles.
    pub fn row_actions(&self, record: &ProjectCode, roles: &UserRoles) -> Vec<RowAction> {
        [
            (RowActionKind::Edit, Permission::Change),
            (RowActionKind::Delete, Permission::Delete),
        ]
        .into_iter()
        .filter(|(_, permission)| roles.check(PROJECT_CODE_RULESET, *permission))
        .map(|(kind, _)| RowAction {
            kind,
            pk: record.pk,
        })
        .collect()
    }

    pub fn table_actions(&self, roles: &UserRoles) -> Vec<TableAction> {
        if roles.check(PROJECT_CODE_RULESET, Permission::Add) {
            vec![TableAction {
                kind: TableActionKind::Add,
                tooltip: MessageKey::AddProjectCode,
            }]
        } else {
            Vec::new()
        }
    }

    pub fn create_form(&self) -> ApiFormProps {
        ApiFormProps {
            kind: FormKind::Create,
            url: ApiPaths::ProjectCodeList,
            pk: None,
            title: MessageKey::AddProjectCode,
            fields: self.fields.clone(),
            success_message: MessageKey::AddedProjectCode,
            pre_form_content: None,
        }
    }

    pub fn edit_form(&self, pk: Pk) -> ApiFormProps {
        ApiFormProps {
            kind: FormKind::Edit,
            url: ApiPaths::ProjectCodeList,
            pk: Some(pk),
            title: MessageKey::EditProjectCode,
            fields: self.fields.clone(),
            success_message: MessageKey::ProjectCodeUpdated,
            pre_form_content: None,
        }
    }

    pub fn delete_form(&self, pk: Pk) -> ApiFormProps {
        ApiFormProps {
            kind: FormKind::Delete,
            url: ApiPaths::ProjectCodeList,
            pk: Some(pk),
            title: MessageKey::DeleteProjectCode,
            fields: self.fields.clone(),
            success_message: MessageKey::ProjectCodeDeleted,
            pre_form_content: Some(MessageKey::ConfirmRemoveProjectCode),
        }
    }

    /// Open the create form. On success the table refreshes once and a success
    /// notification is shown.
    pub async fn add<H: FormHost + ?Sized>(
        &self,
        host: &H,
        notifier: &Notifier,
    ) -> FormOutcome<ProjectCode> {
        let props = self.create_form();
        let message = props.success_message;
        let outcome = decode_submitted(host.open_create(props).await);
        self.finish("create", outcome, message, notifier)
    }

    pub async fn edit<H: FormHost + ?Sized>(
        &self,
        host: &H,
        notifier: &Notifier,
        pk: Pk,
    ) -> FormOutcome<ProjectCode> {
        let props = self.edit_form(pk);
        let message = props.success_message;
        let outcome = decode_submitted(host.open_edit(props).await);
        self.finish("edit", outcome, message, notifier)
    }

    pub async fn delete<H: FormHost + ?Sized>(
        &self,
        host: &H,
        notifier: &Notifier,
        pk: Pk,
    ) -> FormOutcome<()> {
        let props = self.delete_form(pk);
        let message = props.success_message;
        let outcome = host.open_delete(props).await;
        self.finish("delete", outcome, message, notifier)
    }

    fn finish<T>(
        &self,
        action: &str,
        outcome: FormOutcome<T>,
        message: MessageKey,
        notifier: &Notifier,
    ) -> FormOutcome<T> {
        match &outcome {
            FormOutcome::Submitted(_) => {
                info!("Project code {action} succeeded");
                notifier.success(message);
                self.controller.refresh();
            }
            FormOutcome::Cancelled => info!("Project code {action} cancelled"),
            FormOutcome::Failed(err) => warn!("Project code {action} failed: {err}"),
        }
        outcome
    }
}
