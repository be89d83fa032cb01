use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::{GatewayError, GatewayResult};
use crate::event::{Event, EventId, EventRecord, UserId};
use crate::gateway::{
    AuthGateway, AuthUser, ImageUpload, ObjectStorage, RecordGateway, SignUpRequest,
};

/// Gateway operations, used to inject failures or stalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Insert,
    Update,
    Delete,
    Upload,
    SignUp,
    SignIn,
}

/// Every call the workflows made, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Insert(EventRecord),
    Update(EventId, EventRecord),
    Delete(EventId),
    Upload(String),
    SignUp(String),
    SignIn(String),
    SignOut,
}

type ListHook = Box<dyn Fn() + Send + Sync>;

/// Simple in-memory gateway used for unit tests.
#[derive(Default)]
pub struct TestGateway {
    events: Mutex<Vec<Event>>,
    user: Mutex<Option<AuthUser>>,
    accounts: Mutex<Vec<(String, String, AuthUser)>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Op>>,
    stalled: Mutex<HashSet<Op>>,
    list_hook: Mutex<Option<ListHook>>,
    clock: AtomicI64,
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Build an event the way the backend would return it.
pub fn event(id: &str, name: &str, category: &str, owner: Option<&str>) -> Event {
    Event {
        id: EventId::new(id),
        name: name.to_string(),
        description: format!("{name} live"),
        location: "Berlin".to_string(),
        venue: "Columbiahalle".to_string(),
        date: "2025-06-14".to_string(),
        time: "20:00".to_string(),
        category: category.to_string(),
        detailed_about: None,
        organizer: None,
        image_url: String::new(),
        user_id: owner.map(UserId::new),
        created_at: epoch(),
    }
}

impl TestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection. `created_at` is spread out in the given order.
    pub fn with_events(self, events: Vec<Event>) -> Self {
        let seeded = events
            .into_iter()
            .map(|mut e| {
                e.created_at = self.tick();
                e
            })
            .collect();
        *self.events.lock().unwrap() = seeded;
        self
    }

    pub fn signed_in_as(self, user_id: &str) -> Self {
        *self.user.lock().unwrap() = Some(AuthUser {
            id: UserId::new(user_id),
            email: Some(format!("{user_id}@example.com")),
        });
        self
    }

    pub fn with_account(self, email: &str, password: &str, user_id: &str) -> Self {
        let user = AuthUser {
            id: UserId::new(user_id),
            email: Some(email.to_string()),
        };
        self.accounts
            .lock()
            .unwrap()
            .push((email.to_string(), password.to_string(), user));
        self
    }

    /// Make `op` fail with a 500.
    pub fn failing(self, op: Op) -> Self {
        self.failing.lock().unwrap().insert(op);
        self
    }

    /// Make `op` never resolve.
    pub fn stalled(self, op: Op) -> Self {
        self.stalled.lock().unwrap().insert(op);
        self
    }

    /// Run `hook` every time the collection is listed, before it returns.
    pub fn on_list(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        *self.list_hook.lock().unwrap() = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change data (everything except listing).
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List))
            .collect()
    }

    pub fn stored_events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn tick(&self) -> DateTime<Utc> {
        epoch() + Duration::seconds(self.clock.fetch_add(1, Ordering::SeqCst))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn gate(&self, op: Op) -> GatewayResult<()> {
        let stalled = self.stalled.lock().unwrap().contains(&op);
        if stalled {
            std::future::pending::<()>().await;
        }
        let failing = self.failing.lock().unwrap().contains(&op);
        if failing {
            return Err(GatewayError::Api {
                status: 500,
                message: format!("{op:?} failed"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for TestGateway {
    async fn sign_up(&self, request: &SignUpRequest) -> GatewayResult<Option<AuthUser>> {
        self.record(Call::SignUp(request.email.clone()));
        self.gate(Op::SignUp).await?;

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|(email, _, _)| email == &request.email) {
            return Err(GatewayError::Auth("User already registered".into()));
        }

        let user = AuthUser {
            id: UserId::new(uuid::Uuid::new_v4().to_string()),
            email: Some(request.email.clone()),
        };
        accounts.push((request.email.clone(), request.password.clone(), user.clone()));
        *self.user.lock().unwrap() = Some(user.clone());

        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> GatewayResult<AuthUser> {
        self.record(Call::SignIn(email.to_string()));
        self.gate(Op::SignIn).await?;

        let user = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| GatewayError::Auth("Invalid login credentials".into()))?;

        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn current_user(&self) -> GatewayResult<Option<AuthUser>> {
        Ok(self.user.lock().unwrap().clone())
    }

    async fn sign_out(&self) -> GatewayResult<()> {
        self.record(Call::SignOut);
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

#[async_trait]
impl RecordGateway for TestGateway {
    async fn list_events(&self) -> GatewayResult<Vec<Event>> {
        self.record(Call::List);
        self.gate(Op::List).await?;

        if let Some(hook) = self.list_hook.lock().unwrap().as_ref() {
            hook();
        }

        let mut events = self.stored_events();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn insert_event(&self, record: &EventRecord) -> GatewayResult<()> {
        self.record(Call::Insert(record.clone()));
        self.gate(Op::Insert).await?;

        let event = Event {
            id: EventId::new(uuid::Uuid::new_v4().to_string()),
            name: record.name.clone(),
            description: record.description.clone(),
            location: record.location.clone(),
            venue: record.venue.clone(),
            date: record.date.clone(),
            time: record.time.clone(),
            category: record.category.clone(),
            detailed_about: record.detailed_about.clone(),
            organizer: record.organizer.clone(),
            image_url: record.image_url.clone(),
            user_id: record.user_id.clone(),
            created_at: self.tick(),
        };
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn update_event(&self, id: &EventId, record: &EventRecord) -> GatewayResult<()> {
        self.record(Call::Update(id.clone(), record.clone()));
        self.gate(Op::Update).await?;

        let mut events = self.events.lock().unwrap();
        if let Some(event) = events.iter_mut().find(|e| &e.id == id) {
            event.name = record.name.clone();
            event.description = record.description.clone();
            event.location = record.location.clone();
            event.venue = record.venue.clone();
            event.date = record.date.clone();
            event.time = record.time.clone();
            event.category = record.category.clone();
            event.detailed_about = record.detailed_about.clone();
            event.organizer = record.organizer.clone();
            event.image_url = record.image_url.clone();
            event.user_id = record.user_id.clone();
        }
        Ok(())
    }

    async fn delete_event(&self, id: &EventId) -> GatewayResult<()> {
        self.record(Call::Delete(id.clone()));
        self.gate(Op::Delete).await?;

        self.events.lock().unwrap().retain(|e| &e.id != id);
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for TestGateway {
    async fn upload_image(&self, name: &str, _upload: &ImageUpload) -> GatewayResult<()> {
        self.record(Call::Upload(name.to_string()));
        self.gate(Op::Upload).await
    }

    fn public_image_url(&self, name: &str) -> String {
        format!("https://storage.test/event-images/{name}")
    }
}
