//! `ProjectCodeTable` against a scripted form host: which forms it opens, and when it
//! refreshes and notifies.

use std::{collections::VecDeque, sync::Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use stockroom_business::{
    ApiError, ApiFormProps, FormError, FormHost, FormKind, FormOutcome, MessageKey, Pk,
    ProjectCodeTable, TableController,
    notifications::{NotificationLevel, NotificationText, notification_channel},
    project_codes::PROJECT_CODE_TABLE,
};

#[derive(Default)]
struct ScriptedFormHost {
    opened: Mutex<Vec<ApiFormProps>>,
    outcomes: Mutex<VecDeque<FormOutcome<Value>>>,
}

impl ScriptedFormHost {
    fn answering(outcome: FormOutcome<Value>) -> Self {
        let host = Self::default();
        host.outcomes.lock().unwrap().push_back(outcome);
        host
    }

    fn next(&self, props: ApiFormProps) -> FormOutcome<Value> {
        self.opened.lock().unwrap().push(props);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(FormOutcome::Cancelled)
    }

    fn opened(&self) -> Vec<ApiFormProps> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl FormHost for ScriptedFormHost {
    async fn open_create(&self, props: ApiFormProps) -> FormOutcome<Value> {
        self.next(props)
    }

    async fn open_edit(&self, props: ApiFormProps) -> FormOutcome<Value> {
        self.next(props)
    }

    async fn open_delete(&self, props: ApiFormProps) -> FormOutcome<()> {
        self.next(props).map(|_| ())
    }
}

fn table() -> ProjectCodeTable {
    ProjectCodeTable::new(TableController::new(PROJECT_CODE_TABLE))
}

#[tokio::test]
async fn edit_opens_form_for_selected_record() {
    let table = table();
    let (notifier, notes) = notification_channel();
    let host = ScriptedFormHost::answering(FormOutcome::Submitted(
        json!({"pk": 7, "code": "PRJ-7", "description": "Seven"}),
    ));

    let outcome = table.edit(&host, &notifier, Pk(7)).await;

    let opened = host.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].kind, FormKind::Edit);
    assert_eq!(opened[0].pk, Some(Pk(7)));
    assert_eq!(opened[0].title, MessageKey::EditProjectCode);
    assert_eq!(opened[0].fields.names(), ["code", "description"]);
    assert!(outcome.is_submitted());
    assert_eq!(table.controller().generation(), 1);
    assert_eq!(
        notes.try_recv().unwrap().text,
        NotificationText::Key(MessageKey::ProjectCodeUpdated)
    );
}

#[tokio::test]
async fn delete_form_asks_for_confirmation() {
    let table = table();
    let (notifier, _notes) = notification_channel();
    let host = ScriptedFormHost::answering(FormOutcome::Submitted(Value::Null));

    let outcome = table.delete(&host, &notifier, Pk(4)).await;

    let opened = host.opened();
    assert_eq!(opened[0].kind, FormKind::Delete);
    assert_eq!(opened[0].pk, Some(Pk(4)));
    assert_eq!(
        opened[0].pre_form_content.map(MessageKey::source_text),
        Some("Are you sure you want to remove this project code?")
    );
    assert_eq!(opened[0].success_message, MessageKey::ProjectCodeDeleted);
    assert_eq!(outcome, FormOutcome::Submitted(()));
    assert_eq!(table.controller().generation(), 1);
}

#[tokio::test]
async fn cancelled_forms_do_not_refresh() {
    let table = table();
    let (notifier, notes) = notification_channel();
    let host = ScriptedFormHost::default();

    assert_eq!(table.add(&host, &notifier).await, FormOutcome::Cancelled);
    assert_eq!(
        table.delete(&host, &notifier, Pk(1)).await,
        FormOutcome::Cancelled
    );

    assert_eq!(table.controller().generation(), 0);
    assert!(notes.try_recv().is_err());
}

#[tokio::test]
async fn failed_forms_do_not_refresh() {
    let table = table();
    let (notifier, notes) = notification_channel();
    let host = ScriptedFormHost::answering(FormOutcome::Failed(FormError::Api(
        ApiError::Transport("connection refused".to_string()),
    )));

    let outcome = table.add(&host, &notifier).await;

    assert!(matches!(outcome, FormOutcome::Failed(FormError::Api(_))));
    assert_eq!(table.controller().generation(), 0);
    assert!(notes.try_recv().is_err());
}

#[tokio::test]
async fn undecodable_create_response_is_a_failure() {
    let table = table();
    let (notifier, _notes) = notification_channel();
    let host = ScriptedFormHost::answering(FormOutcome::Submitted(json!({"unexpected": true})));

    let outcome = table.add(&host, &notifier).await;

    assert!(matches!(outcome, FormOutcome::Failed(FormError::Decode(_))));
    assert_eq!(table.controller().generation(), 0);
}

#[tokio::test]
async fn each_success_refreshes_once() {
    let table = table();
    let (notifier, notes) = notification_channel();
    let host = ScriptedFormHost::default();
    host.outcomes.lock().unwrap().extend([
        FormOutcome::Submitted(json!({"pk": 1, "code": "A", "description": ""})),
        FormOutcome::Submitted(json!({"pk": 2, "code": "B"})),
    ]);

    table.add(&host, &notifier).await;
    table.add(&host, &notifier).await;

    assert_eq!(table.controller().generation(), 2);
    let levels: Vec<_> = notes.try_iter().map(|n| n.level).collect();
    assert_eq!(
        levels,
        vec![NotificationLevel::Success, NotificationLevel::Success]
    );
    assert_eq!(host.opened()[0].title, MessageKey::AddProjectCode);
}

#[tokio::test]
async fn tables_with_same_name_refresh_independently() {
    let first = table();
    let second = table();
    let (notifier, _notes) = notification_channel();
    let host = ScriptedFormHost::answering(FormOutcome::Submitted(Value::Null));

    first.delete(&host, &notifier, Pk(1)).await;

    assert_ne!(first.controller().key(), second.controller().key());
    assert_eq!(first.controller().generation(), 1);
    assert_eq!(second.controller().generation(), 0);
}
