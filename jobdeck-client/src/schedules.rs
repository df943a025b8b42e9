//! Schedule endpoints

use chrono::{DateTime, Utc};
use jobdeck_core::domain::schedule::{Schedule, ScheduleId, ScheduleReport};
use jobdeck_core::dto::schedule::{ScheduleList, ScheduleRequest};
use reqwest::Url;

use crate::JobDeckClient;
use crate::error::{ClientError, Result};

impl JobDeckClient {
    /// URL of one schedule, optionally followed by a sub-resource
    ///
    /// The id is percent-encoded as a single path segment.
    fn schedule_url(&self, id: &ScheduleId, suffix: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.url("/api/schedules"))
            .map_err(|e| ClientError::ParseError(format!("Invalid server URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::ParseError("Server URL cannot carry a path".to_string()))?;
            segments.push(id.as_str());
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }

        Ok(url)
    }

    // =============================================================================
    // Schedule Query
    // =============================================================================

    /// List every schedule the server knows about, in server order
    pub async fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let response = self.client.get(self.url("/api/schedules")).send().await?;

        let list: ScheduleList = self.handle_response(response).await?;
        Ok(list.schedules)
    }

    /// Get the stored output of one schedule
    ///
    /// The server answers with an empty report for schedules that have not
    /// produced output yet.
    pub async fn schedule_report(&self, id: &ScheduleId) -> Result<ScheduleReport> {
        let url = self.schedule_url(id, Some("result"))?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Schedule Mutation
    // =============================================================================

    /// Create a schedule at `time`
    ///
    /// # Returns
    /// The created schedule. A rejected time (past, conflicting, malformed)
    /// comes back as an API error carrying the server's message.
    pub async fn create_schedule(&self, time: DateTime<Utc>) -> Result<Schedule> {
        let response = self
            .client
            .post(self.url("/api/schedules"))
            .json(&ScheduleRequest::new(time))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Move an existing schedule to `time`
    pub async fn update_schedule(&self, id: &ScheduleId, time: DateTime<Utc>) -> Result<Schedule> {
        let url = self.schedule_url(id, None)?;
        let response = self
            .client
            .put(url)
            .json(&ScheduleRequest::new(time))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete a schedule
    pub async fn delete_schedule(&self, id: &ScheduleId) -> Result<()> {
        let url = self.schedule_url(id, None)?;
        let response = self.client.delete(url).send().await?;

        self.handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, DurationRound, Utc};

    use crate::JobDeckClient;
    use crate::stub::spawn_stub;
    use jobdeck_core::{RunType, ScheduleId};

    fn in_hours(hours: i64) -> chrono::DateTime<Utc> {
        (Utc::now() + Duration::hours(hours))
            .duration_trunc(Duration::seconds(1))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_contains_time() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);
        let time = in_hours(2);

        let created = client.create_schedule(time).await.unwrap();
        assert_eq!(created.time, time);

        let list = client.list_schedules().await.unwrap();
        assert!(list.iter().any(|s| s.time == time && s.id == created.id));
    }

    #[tokio::test]
    async fn test_delete_then_list_omits_id() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        let keep = client.create_schedule(in_hours(1)).await.unwrap();
        let gone = client.create_schedule(in_hours(3)).await.unwrap();

        client.delete_schedule(&gone.id).await.unwrap();

        let list = client.list_schedules().await.unwrap();
        assert!(list.iter().any(|s| s.id == keep.id));
        assert!(list.iter().all(|s| s.id != gone.id));
    }

    #[tokio::test]
    async fn test_past_time_rejected_verbatim() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        let err = client.create_schedule(in_hours(-1)).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.rejection(), Some("time must be in the future"));
        assert!(client.list_schedules().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_schedule() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        let created = client.create_schedule(in_hours(1)).await.unwrap();
        let moved = in_hours(5);
        client.update_schedule(&created.id, moved).await.unwrap();

        let list = client.list_schedules().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].time, moved);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        let err = client
            .update_schedule(&ScheduleId::new("missing"), in_hours(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.rejection(), Some("not found"));
    }

    #[test]
    fn test_schedule_url_encodes_id() {
        let client = JobDeckClient::new("http://localhost:8080/");
        let id = ScheduleId::new("a/b?c#d");

        let url = client.schedule_url(&id, None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/schedules/a%2Fb%3Fc%23d");

        let url = client.schedule_url(&id, Some("result")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/schedules/a%2Fb%3Fc%23d/result"
        );
    }

    #[tokio::test]
    async fn test_id_with_slash_reaches_schedule_route() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        // Routed to the schedule handler, which answers with its own 404 body
        let err = client
            .update_schedule(&ScheduleId::new("x/y"), in_hours(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.rejection(), Some("not found"));
    }

    #[tokio::test]
    async fn test_report_of_unrun_schedule_is_empty() {
        let (base_url, _state) = spawn_stub().await;
        let client = JobDeckClient::new(base_url);

        let created = client.create_schedule(in_hours(1)).await.unwrap();
        let report = client.schedule_report(&created.id).await.unwrap();
        assert!(report.output.is_empty());
        assert_eq!(report.run_type, RunType::Manual);
    }
}
