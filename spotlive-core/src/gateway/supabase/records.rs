//! PostgREST (`/rest/v1/events`) calls.

use async_trait::async_trait;
use url::Url;

use super::{SupabaseClient, check};
use crate::error::GatewayResult;
use crate::event::{Event, EventId, EventRecord};
use crate::gateway::RecordGateway;

const EVENTS_TABLE: &str = "events";

impl SupabaseClient {
    fn events_url(&self) -> GatewayResult<Url> {
        self.endpoint(&["rest", "v1", EVENTS_TABLE])
    }

    /// `events?id=eq.<id>`
    fn event_url(&self, id: &EventId) -> GatewayResult<Url> {
        let mut url = self.events_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }
}

#[async_trait]
impl RecordGateway for SupabaseClient {
    async fn list_events(&self) -> GatewayResult<Vec<Event>> {
        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.asc");

        let request = self.authorized(self.http.get(url)).await?;
        let events = check(request.send().await?).await?.json().await?;

        Ok(events)
    }

    async fn insert_event(&self, record: &EventRecord) -> GatewayResult<()> {
        let request = self
            .authorized(self.http.post(self.events_url()?))
            .await?
            .header("Prefer", "return=minimal")
            .json(&[record]);

        check(request.send().await?).await?;
        Ok(())
    }

    async fn update_event(&self, id: &EventId, record: &EventRecord) -> GatewayResult<()> {
        let request = self
            .authorized(self.http.patch(self.event_url(id)?))
            .await?
            .header("Prefer", "return=minimal")
            .json(record);

        check(request.send().await?).await?;
        Ok(())
    }

    async fn delete_event(&self, id: &EventId) -> GatewayResult<()> {
        let request = self
            .authorized(self.http.delete(self.event_url(id)?))
            .await?;

        check(request.send().await?).await?;
        Ok(())
    }
}
