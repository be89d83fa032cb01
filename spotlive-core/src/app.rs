//! Application state shared by every workflow.

use std::sync::Arc;

use crate::auth::{self, SignInForm, SignUpForm};
use crate::detail::{DeleteOutcome, DetailPanel};
use crate::error::WorkflowResult;
use crate::event::{Event, EventId};
use crate::form::EventForm;
use crate::gateway::Gateway;
use crate::refresh::RefreshCoordinator;
use crate::session::Session;
use crate::store::EventStore;

/// Owns the gateway handle, the session, the event store and the refresh
/// coordinator. Every mutation that succeeds triggers a refresh, so the
/// next `sync` refetches the collection.
pub struct App<G> {
    gateway: Arc<G>,
    session: Session,
    refresh: RefreshCoordinator,
    store: EventStore,
}

impl<G> App<G>
where
    G: Gateway,
{
    /// Build the app without talking to the backend.
    pub fn new(gateway: Arc<G>, session: Session) -> Self {
        let refresh = RefreshCoordinator::new();
        let store = EventStore::new(refresh.subscribe());
        App {
            gateway,
            session,
            refresh,
            store,
        }
    }

    /// Resolve the session once and load the collection.
    pub async fn start(gateway: Arc<G>) -> Self {
        let session = Session::resolve(gateway.as_ref()).await;
        let mut app = App::new(gateway, session);
        app.sync().await;
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Refetch the collection if a refresh was triggered since the last load.
    pub async fn sync(&mut self) {
        self.store.sync(self.gateway.as_ref()).await;
    }

    /// The filtered view, synced first.
    pub async fn events(&mut self) -> Vec<&Event> {
        self.sync().await;
        self.store.filtered()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.store.categories()
    }

    pub fn select_category(&mut self, category: Option<String>) {
        self.store.select_category(category);
    }

    pub fn open_detail(&self, id: &EventId) -> Option<DetailPanel> {
        self.store
            .find(id)
            .map(|event| DetailPanel::open(event.clone(), &self.session))
    }

    pub fn new_form(&self) -> EventForm {
        EventForm::create()
    }

    pub async fn submit_form(&mut self, form: &EventForm) -> WorkflowResult<()> {
        form.submit(&self.session, self.gateway.as_ref()).await?;
        self.refresh.trigger();
        Ok(())
    }

    pub async fn delete_event<F>(
        &mut self,
        panel: &mut DetailPanel,
        confirm: F,
    ) -> WorkflowResult<DeleteOutcome>
    where
        F: FnOnce(&Event) -> bool,
    {
        let outcome = panel.delete(self.gateway.as_ref(), confirm).await?;
        if let DeleteOutcome::Deleted(_) = outcome {
            self.refresh.trigger();
        }
        Ok(outcome)
    }

    pub async fn sign_up(&mut self, form: &mut SignUpForm) -> WorkflowResult<()> {
        if let Some(user) = form.submit(self.gateway.as_ref()).await? {
            self.session.set(user);
        }
        self.refresh.trigger();
        Ok(())
    }

    pub async fn sign_in(&mut self, form: &mut SignInForm) -> WorkflowResult<()> {
        let user = form.submit(self.gateway.as_ref()).await?;
        self.session.set(user);
        self.refresh.trigger();
        Ok(())
    }

    pub async fn sign_out(&mut self) -> WorkflowResult<()> {
        auth::sign_out(self.gateway.as_ref()).await?;
        self.session.clear();
        self.refresh.trigger();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::gateway::test::{Call, Op, TestGateway, event};

    fn names(events: Vec<&Event>) -> Vec<String> {
        events.into_iter().map(|e| e.name.clone()).collect()
    }

    #[tokio::test]
    async fn create_then_filter() {
        let gateway = Arc::new(TestGateway::new().signed_in_as("u1"));
        let mut app = App::start(Arc::clone(&gateway)).await;

        assert!(app.events().await.is_empty());
        assert!(app.categories().is_empty());

        let mut form = app.new_form();
        form.fields.name = "A".into();
        form.fields.description = "Opening night".into();
        form.fields.location = "Austin".into();
        form.fields.venue = "Mohawk".into();
        form.fields.date = "2025-03-14".into();
        form.fields.time = "19:00".into();
        form.fields.category = "Rock".into();
        app.submit_form(&form).await.unwrap();

        assert!(app.store().is_stale());
        assert_eq!(names(app.events().await), vec!["A"]);
        assert_eq!(app.categories(), vec!["Rock"]);

        app.select_category(Some("Rock".into()));
        assert_eq!(names(app.events().await), vec!["A"]);

        app.select_category(Some("Jazz".into()));
        assert!(app.events().await.is_empty());
    }

    #[tokio::test]
    async fn owner_deletes_own_event() {
        let gateway = Arc::new(
            TestGateway::new()
                .with_events(vec![
                    event("a", "A", "Rock", Some("u1")),
                    event("b", "B", "Jazz", Some("u2")),
                ])
                .signed_in_as("u1"),
        );
        let mut app = App::start(Arc::clone(&gateway)).await;

        let theirs = app.open_detail(&EventId::new("b")).unwrap();
        assert!(!theirs.can_edit());
        assert!(!theirs.can_delete());

        let mut mine = app.open_detail(&EventId::new("a")).unwrap();
        assert!(mine.can_edit());
        assert!(mine.can_delete());

        let outcome = app.delete_event(&mut mine, |_| true).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(EventId::new("a")));
        assert_eq!(gateway.writes(), vec![Call::Delete(EventId::new("a"))]);

        assert_eq!(names(app.events().await), vec!["B"]);
    }

    #[tokio::test]
    async fn failed_or_declined_mutations_do_not_refresh() {
        let gateway = Arc::new(
            TestGateway::new()
                .with_events(vec![event("a", "A", "Rock", Some("u1"))])
                .signed_in_as("u1"),
        );
        let mut app = App::start(Arc::clone(&gateway)).await;

        let mut panel = app.open_detail(&EventId::new("a")).unwrap();
        let outcome = app.delete_event(&mut panel, |_| false).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(!app.store().is_stale());

        let form = app.new_form();
        let err = app.submit_form(&form).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert!(!app.store().is_stale());
    }

    #[tokio::test]
    async fn rejected_insert_does_not_refresh() {
        let gateway = Arc::new(TestGateway::new().signed_in_as("u1").failing(Op::Insert));
        let mut app = App::start(Arc::clone(&gateway)).await;

        let mut form = app.new_form();
        form.fields.name = "A".into();
        form.fields.description = "Opening night".into();
        form.fields.location = "Austin".into();
        form.fields.venue = "Mohawk".into();
        form.fields.date = "2025-03-14".into();
        form.fields.time = "19:00".into();
        form.fields.category = "Rock".into();

        let err = app.submit_form(&form).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Gateway(_)));
        assert_eq!(err.notice(crate::form::SAVE_FAILED), "Failed to save event");
        assert!(!app.store().is_stale());
        assert!(gateway.stored_events().is_empty());
    }

    #[tokio::test]
    async fn dismissed_form_does_not_refresh() {
        let gateway = Arc::new(TestGateway::new().signed_in_as("u1"));
        let mut app = App::start(Arc::clone(&gateway)).await;

        let form = app.new_form();
        form.dismiss();
        let err = app.submit_form(&form).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Cancelled));
        assert!(!app.store().is_stale());
    }

    #[tokio::test]
    async fn sign_in_and_out_update_session_and_refresh() {
        let gateway = Arc::new(TestGateway::new().with_account("ada@example.com", "secret1", "u1"));
        let mut app = App::start(Arc::clone(&gateway)).await;
        assert!(!app.session().is_authenticated());

        let mut form = SignInForm {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        };
        app.sign_in(&mut form).await.unwrap();
        assert_eq!(app.session().identity().map(|id| id.as_str()), Some("u1"));
        assert!(app.store().is_stale());

        app.sync().await;
        app.sign_out().await.unwrap();
        assert!(!app.session().is_authenticated());
        assert!(app.store().is_stale());
    }

    #[tokio::test]
    async fn sign_up_signs_in_and_refreshes() {
        let gateway = Arc::new(TestGateway::new());
        let mut app = App::start(Arc::clone(&gateway)).await;

        let mut form = SignUpForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        app.sign_up(&mut form).await.unwrap();

        assert!(app.session().is_authenticated());
        assert!(app.store().is_stale());
    }
}
