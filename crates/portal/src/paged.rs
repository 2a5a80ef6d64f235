//! Generic paged-resource controller.
//!
//! One state machine serves every listed resource: it owns the visible page,
//! the total count and an optional inline create/edit form, and applies the
//! same reconciliation after every mutation:
//!
//! - create succeeded: close the form, go back to page 1, reload
//! - update succeeded: close the form, reload the current page
//! - delete succeeded: reload the current page (an emptied page stays empty)
//! - any write failed: keep everything as it was, report the failure
//!
//! Loads carry a generation number. Only the completion of the most recently
//! started load is applied; older completions are dropped.

use serde_json::Value;

use campus_core::{DomainError, Entity, PageRequest, PagedResponse, DEFAULT_PAGE_SIZE};

use crate::api::ApiError;
use crate::draft::FormDraft;
use crate::endpoint::{ItemId, Noun, PagedEndpoint};
use crate::prompt::Confirm;

/// Shown when local validation rejects a draft.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Whether an open form creates a new item or edits an existing one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenForm<D, Id> {
    pub mode: FormMode<Id>,
    pub draft: D,
    pub validation_error: Option<String>,
}

impl<D, Id> OpenForm<D, Id> {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<D, Id> {
    Closed,
    Open(OpenForm<D, Id>),
}

/// Handle for one in-flight load, returned by [`PagedResource::begin_load`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub request: PageRequest,
}

/// Successful form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    /// The entity as the server returned it.
    Created(Value),
    Updated,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("no form is open")]
    FormClosed,
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
}

pub struct PagedResource<E: PagedEndpoint> {
    endpoint: E,
    page: PageRequest,
    items: Vec<E::Item>,
    total_items: u64,
    state: LoadState,
    form: FormState<E::Draft, ItemId<E>>,
    generation: u64,
}

impl<E: PagedEndpoint> PagedResource<E> {
    pub fn new(endpoint: E) -> Self {
        Self::with_page_size(endpoint, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(endpoint: E, page_size: u32) -> Self {
        Self {
            endpoint,
            page: PageRequest::new(1, page_size),
            items: Vec::new(),
            total_items: 0,
            state: LoadState::Idle,
            form: FormState::Closed,
            generation: 0,
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn noun(&self) -> Noun {
        self.endpoint.noun()
    }

    pub fn items(&self) -> &[E::Item] {
        &self.items
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    pub fn page_number(&self) -> u32 {
        self.page.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page.page_size
    }

    /// 0-based index for paginator controls.
    pub fn page_index(&self) -> u32 {
        self.page.index()
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.page.page_size))
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Resource-scoped error of the last load, if it failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn form(&self) -> &FormState<E::Draft, ItemId<E>> {
        &self.form
    }

    pub fn open_form(&self) -> Option<&OpenForm<E::Draft, ItemId<E>>> {
        match &self.form {
            FormState::Open(form) => Some(form),
            FormState::Closed => None,
        }
    }

    /// Mutable access to the draft of the open form.
    pub fn draft_mut(&mut self) -> Option<&mut E::Draft> {
        match &mut self.form {
            FormState::Open(form) => Some(&mut form.draft),
            FormState::Closed => None,
        }
    }

    /// Start a load of the current page. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
            request: self.page,
        }
    }

    /// Apply the outcome of a load. Returns `false` when the ticket is stale
    /// and the outcome was dropped.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<PagedResponse<E::Item>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                resource = self.noun().plural,
                stale = ticket.generation,
                current = self.generation,
                "dropping stale page response"
            );
            return false;
        }

        match outcome {
            Ok(res) => {
                let page_number = res.page_number_or(ticket.request.page_number);
                let page_size = res.page_size_or(ticket.request.page_size);
                let total_items = res.total();

                let mut items = res.items;
                if items.len() > page_size as usize {
                    tracing::warn!(
                        resource = self.noun().plural,
                        received = items.len(),
                        page_size,
                        "server returned more items than the page size; truncating"
                    );
                    items.truncate(page_size as usize);
                }

                self.page = PageRequest::new(page_number, page_size);
                self.items = items;
                self.total_items = total_items;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                let noun = self.noun();
                tracing::warn!(resource = noun.plural, "error loading {}: {err}", noun.plural);
                self.items.clear();
                self.total_items = 0;
                self.state = LoadState::Error(format!("Error loading {}.", noun.plural));
            }
        }
        true
    }

    /// Fetch the current page.
    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let outcome = self.endpoint.list(ticket.request).await;
        self.complete_load(ticket, outcome);
    }

    /// Paginator event: `page_index` is 0-based, the wire page is
    /// `page_index + 1`.
    pub async fn change_page(&mut self, page_index: u32, page_size: u32) {
        self.page = PageRequest::from_index(page_index, page_size);
        self.load().await;
    }

    pub fn open_create(&mut self) {
        self.form = FormState::Open(OpenForm {
            mode: FormMode::Create,
            draft: E::Draft::default(),
            validation_error: None,
        });
    }

    pub fn open_edit(&mut self, item: &E::Item) {
        self.form = FormState::Open(OpenForm {
            mode: FormMode::Edit(item.id()),
            draft: E::Draft::from_item(item),
            validation_error: None,
        });
    }

    pub fn close_form(&mut self) {
        self.form = FormState::Closed;
    }

    /// Validate and save the open form.
    ///
    /// Validation failures never reach the network. Network failures keep
    /// the form open with its draft intact so the user can retry.
    pub async fn submit(&mut self) -> Result<Submitted, SubmitError> {
        let noun = self.endpoint.noun();
        let form = match &mut self.form {
            FormState::Open(form) => form,
            FormState::Closed => return Err(SubmitError::FormClosed),
        };

        if let Err(err) = form.draft.validate() {
            form.validation_error = Some(REQUIRED_FIELDS_MESSAGE.to_string());
            return Err(err.into());
        }

        let outcome = match form.mode {
            FormMode::Create => self.endpoint.create(&form.draft).await.map(Submitted::Created),
            FormMode::Edit(id) => self
                .endpoint
                .update(id, &form.draft)
                .await
                .map(|()| Submitted::Updated),
        };

        match outcome {
            Ok(submitted) => {
                self.form = FormState::Closed;
                if matches!(submitted, Submitted::Created(_)) {
                    self.page.page_number = 1;
                }
                self.load().await;
                Ok(submitted)
            }
            Err(err) => {
                tracing::warn!(resource = noun.plural, "failed to save {}: {err}", noun.singular);
                form.validation_error = Some(format!("Failed to save {}.", noun.singular));
                Err(err.into())
            }
        }
    }

    /// Delete one item after the user confirms.
    ///
    /// Declining sends nothing. A failed delete leaves the page as it was.
    pub async fn delete<C>(&mut self, id: ItemId<E>, confirm: &C) -> Result<DeleteOutcome, ApiError>
    where
        C: Confirm + ?Sized,
    {
        let noun = self.endpoint.noun();
        if !confirm.confirm(&format!("Are you sure you want to delete this {}?", noun.singular)) {
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(err) = self.endpoint.delete(id).await {
            tracing::warn!(resource = noun.plural, %id, "error deleting {}: {err}", noun.singular);
            return Err(err);
        }

        self.load().await;
        Ok(DeleteOutcome::Deleted)
    }
}

impl<E: PagedEndpoint> core::fmt::Debug for PagedResource<E>
where
    E::Item: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PagedResource")
            .field("resource", &self.noun().plural)
            .field("page", &self.page)
            .field("items", &self.items)
            .field("total_items", &self.total_items)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use campus_core::{Student, StudentId};
    use proptest::prelude::*;

    use crate::draft::StudentDraft;
    use crate::prompt::AutoConfirm;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(PageRequest),
        Create(StudentDraft),
        Update(StudentId, StudentDraft),
        Delete(StudentId),
    }

    /// In-memory student collection that records every call it receives.
    #[derive(Clone, Default)]
    struct FakeStudents {
        rows: Arc<Mutex<Vec<Student>>>,
        calls: Arc<Mutex<Vec<Call>>>,
        fail_reads: Arc<Mutex<bool>>,
        fail_writes: Arc<Mutex<bool>>,
        next_id: Arc<Mutex<i64>>,
    }

    impl FakeStudents {
        fn with_rows(n: i64) -> Self {
            let fake = Self::default();
            *fake.next_id.lock().unwrap() = n + 1;
            *fake.rows.lock().unwrap() = (1..=n).map(student).collect();
            fake
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn write_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| !matches!(c, Call::List(_)))
                .count()
        }

        fn last_list(&self) -> Option<PageRequest> {
            self.calls().iter().rev().find_map(|c| match c {
                Call::List(p) => Some(*p),
                _ => None,
            })
        }

        fn set_fail_reads(&self, fail: bool) {
            *self.fail_reads.lock().unwrap() = fail;
        }

        fn set_fail_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }

        fn write_result(&self) -> Result<(), ApiError> {
            if *self.fail_writes.lock().unwrap() {
                Err(ApiError::Api(500, "boom".into()))
            } else {
                Ok(())
            }
        }
    }

    fn student(id: i64) -> Student {
        Student {
            id: StudentId::new(id),
            full_name: format!("Student {id}"),
            email: format!("s{id}@campus.io"),
            phone_number: None,
        }
    }

    #[async_trait]
    impl PagedEndpoint for FakeStudents {
        type Item = Student;
        type Draft = StudentDraft;

        fn noun(&self) -> Noun {
            Noun::STUDENT
        }

        async fn list(&self, page: PageRequest) -> Result<PagedResponse<Student>, ApiError> {
            self.calls.lock().unwrap().push(Call::List(page));
            if *self.fail_reads.lock().unwrap() {
                return Err(ApiError::Network("connection refused".into()));
            }
            let rows = self.rows.lock().unwrap();
            let items = page.slice(&rows).to_vec();
            Ok(PagedResponse::new(items, rows.len() as u64, page))
        }

        async fn create(&self, draft: &StudentDraft) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(Call::Create(draft.clone()));
            self.write_result()?;
            let mut next = self.next_id.lock().unwrap();
            let created = Student {
                id: StudentId::new(*next),
                full_name: draft.full_name.clone(),
                email: draft.email.clone(),
                phone_number: None,
            };
            *next += 1;
            self.rows.lock().unwrap().push(created.clone());
            Ok(serde_json::json!({
                "id": created.id,
                "fullName": created.full_name,
                "defaultPassword": "Campus@123",
            }))
        }

        async fn update(&self, id: StudentId, draft: &StudentDraft) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Update(id, draft.clone()));
            self.write_result()?;
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|s| s.id == id) {
                row.full_name = draft.full_name.clone();
                row.email = draft.email.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: StudentId) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Delete(id));
            self.write_result()?;
            self.rows.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }
    }

    #[test]
    fn starts_idle_on_page_one_of_five() {
        let ctl = PagedResource::new(FakeStudents::default());
        assert_eq!(ctl.state(), &LoadState::Idle);
        assert_eq!(ctl.page_number(), 1);
        assert_eq!(ctl.page_size(), 5);
        assert_eq!(ctl.form(), &FormState::Closed);
    }

    #[tokio::test]
    async fn load_applies_server_page_and_total() {
        let fake = FakeStudents::with_rows(12);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.load().await;

        assert_eq!(ctl.state(), &LoadState::Loaded);
        assert_eq!(ctl.items().len(), 5);
        assert_eq!(ctl.total_items(), 12);
        assert_eq!(ctl.total_pages(), 3);
        assert_eq!(fake.last_list(), Some(PageRequest::new(1, 5)));
    }

    #[tokio::test]
    async fn change_page_translates_zero_based_index() {
        let fake = FakeStudents::with_rows(12);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.load().await;

        ctl.change_page(1, 5).await;
        assert_eq!(fake.last_list(), Some(PageRequest::new(2, 5)));
        assert_eq!(ctl.page_number(), 2);
        assert_eq!(ctl.page_index(), 1);

        ctl.change_page(2, 10).await;
        assert_eq!(fake.last_list(), Some(PageRequest::new(3, 10)));
        assert_eq!(ctl.page_number(), 3);
        assert_eq!(ctl.page_size(), 10);
        assert!(ctl.items().is_empty());
    }

    #[tokio::test]
    async fn failed_load_clears_items_and_total() {
        let fake = FakeStudents::with_rows(7);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.load().await;
        assert_eq!(ctl.items().len(), 5);

        fake.set_fail_reads(true);
        ctl.load().await;
        assert_eq!(ctl.error_message(), Some("Error loading students."));
        assert!(ctl.items().is_empty());
        assert_eq!(ctl.total_items(), 0);
        assert_eq!(ctl.page_number(), 1);

        fake.set_fail_reads(false);
        ctl.load().await;
        assert_eq!(ctl.error_message(), None);
        assert_eq!(ctl.total_items(), 7);
    }

    #[test]
    fn missing_metadata_keeps_prior_values() {
        let mut ctl = PagedResource::with_page_size(FakeStudents::default(), 4);
        ctl.page = PageRequest::new(3, 4);
        let ticket = ctl.begin_load();
        let res = PagedResponse {
            items: vec![student(9)],
            total_items: None,
            page_number: None,
            page_size: Some(0),
            total_pages: None,
        };
        assert!(ctl.complete_load(ticket, Ok(res)));
        assert_eq!(ctl.page(), PageRequest::new(3, 4));
        assert_eq!(ctl.total_items(), 0);
        assert_eq!(ctl.items().len(), 1);
    }

    #[test]
    fn oversized_pages_are_truncated() {
        let mut ctl = PagedResource::with_page_size(FakeStudents::default(), 2);
        let ticket = ctl.begin_load();
        let res = PagedResponse::new((1..=4).map(student).collect(), 4, PageRequest::new(1, 2));
        ctl.complete_load(ticket, Ok(res));
        assert_eq!(ctl.items().len(), 2);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut ctl = PagedResource::new(FakeStudents::default());
        let first = ctl.begin_load();
        ctl.page = PageRequest::new(1, 10);
        let second = ctl.begin_load();

        let newer = PagedResponse::new(vec![student(1)], 1, second.request);
        assert!(ctl.complete_load(second, Ok(newer)));

        let older = PagedResponse::new(vec![student(2), student(3)], 40, first.request);
        assert!(!ctl.complete_load(first, Ok(older)));

        assert_eq!(ctl.page_size(), 10);
        assert_eq!(ctl.total_items(), 1);
        assert_eq!(ctl.items()[0].id, StudentId::new(1));
    }

    #[tokio::test]
    async fn blank_full_name_never_reaches_network() {
        let fake = FakeStudents::with_rows(3);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.open_create();
        {
            let draft = ctl.draft_mut().unwrap();
            draft.full_name = "   ".into();
            draft.email = "new@campus.io".into();
        }

        let err = ctl.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Validation(_)));
        assert_eq!(fake.calls(), vec![]);
        let form = ctl.open_form().unwrap();
        assert_eq!(form.validation_error.as_deref(), Some(REQUIRED_FIELDS_MESSAGE));
        assert_eq!(form.draft.email, "new@campus.io");
    }

    #[tokio::test]
    async fn create_resets_to_first_page_and_surfaces_entity() {
        let fake = FakeStudents::with_rows(12);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.change_page(2, 5).await;
        assert_eq!(ctl.page_number(), 3);

        ctl.open_create();
        {
            let draft = ctl.draft_mut().unwrap();
            draft.full_name = "Nour Hassan".into();
            draft.email = "nour@campus.io".into();
        }
        let submitted = ctl.submit().await.unwrap();

        let Submitted::Created(entity) = submitted else {
            panic!("expected a created entity");
        };
        assert_eq!(entity["defaultPassword"], "Campus@123");
        assert_eq!(ctl.form(), &FormState::Closed);
        assert_eq!(ctl.page_number(), 1);
        assert_eq!(fake.last_list(), Some(PageRequest::new(1, 5)));
        assert_eq!(ctl.total_items(), 13);
    }

    #[tokio::test]
    async fn update_keeps_the_current_page() {
        let fake = FakeStudents::with_rows(12);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.change_page(1, 5).await;

        let target = ctl.items()[0].clone();
        ctl.open_edit(&target);
        assert!(ctl.open_form().unwrap().is_editing());
        ctl.draft_mut().unwrap().full_name = "Renamed".into();

        assert_eq!(ctl.submit().await.unwrap(), Submitted::Updated);
        assert_eq!(ctl.page_number(), 2);
        assert_eq!(fake.last_list(), Some(PageRequest::new(2, 5)));
        assert_eq!(ctl.items()[0].full_name, "Renamed");
        assert!(fake.calls().contains(&Call::Update(target.id, StudentDraft {
            full_name: "Renamed".into(),
            email: target.email.clone(),
            phone_number: None,
        })));
    }

    #[tokio::test]
    async fn failed_save_keeps_form_and_draft() {
        let fake = FakeStudents::with_rows(2);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.load().await;
        fake.set_fail_writes(true);

        ctl.open_create();
        {
            let draft = ctl.draft_mut().unwrap();
            draft.full_name = "Layla".into();
            draft.email = "layla@campus.io".into();
        }
        let err = ctl.submit().await.unwrap_err();
        assert!(matches!(err, SubmitError::Api(ApiError::Api(500, _))));

        let form = ctl.open_form().unwrap();
        assert_eq!(form.validation_error.as_deref(), Some("Failed to save student."));
        assert_eq!(form.draft.full_name, "Layla");

        // Retry without re-entering anything.
        fake.set_fail_writes(false);
        assert!(matches!(ctl.submit().await, Ok(Submitted::Created(_))));
        assert_eq!(ctl.total_items(), 3);
    }

    #[tokio::test]
    async fn submit_without_open_form_is_rejected() {
        let mut ctl = PagedResource::new(FakeStudents::default());
        assert_eq!(ctl.submit().await, Err(SubmitError::FormClosed));
    }

    #[tokio::test]
    async fn reopening_clears_previous_validation_error() {
        let mut ctl = PagedResource::new(FakeStudents::default());
        ctl.open_create();
        let _ = ctl.submit().await;
        assert!(ctl.open_form().unwrap().validation_error.is_some());

        ctl.open_create();
        assert_eq!(ctl.open_form().unwrap().validation_error, None);
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let fake = FakeStudents::with_rows(3);
        let mut ctl = PagedResource::new(fake.clone());
        let outcome = ctl.delete(StudentId::new(1), &AutoConfirm(false)).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(fake.calls(), vec![]);
    }

    #[tokio::test]
    async fn delete_reloads_and_accepts_empty_trailing_page() {
        let fake = FakeStudents::with_rows(6);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.change_page(1, 5).await;
        assert_eq!(ctl.items().len(), 1);

        let outcome = ctl.delete(StudentId::new(6), &AutoConfirm(true)).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(ctl.page_number(), 2);
        assert!(ctl.items().is_empty());
        assert_eq!(ctl.total_items(), 5);
    }

    #[tokio::test]
    async fn failed_delete_leaves_state_unchanged() {
        let fake = FakeStudents::with_rows(4);
        let mut ctl = PagedResource::new(fake.clone());
        ctl.load().await;
        let before: Vec<StudentId> = ctl.items().iter().map(|s| s.id).collect();
        let lists_before = fake.calls().len();

        fake.set_fail_writes(true);
        assert!(ctl.delete(StudentId::new(2), &AutoConfirm(true)).await.is_err());

        let after: Vec<StudentId> = ctl.items().iter().map(|s| s.id).collect();
        assert_eq!(before, after);
        assert_eq!(ctl.state(), &LoadState::Loaded);
        assert_eq!(fake.calls().len(), lists_before + 1);
        assert_eq!(fake.write_calls(), 1);
    }

    proptest! {
        /// Property: any paginator event requests page `index + 1` with the
        /// requested size.
        #[test]
        fn change_page_law(index in 0u32..50, size in 1u32..50) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let fake = FakeStudents::with_rows(30);
            let mut ctl = PagedResource::new(fake.clone());
            rt.block_on(ctl.change_page(index, size));
            prop_assert_eq!(fake.last_list(), Some(PageRequest::new(index + 1, size)));
            prop_assert!(ctl.items().len() <= ctl.page_size() as usize);
        }
    }
}
