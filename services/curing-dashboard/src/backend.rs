//! Typed client for the curing backend API

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::io::{HttpClient, HttpResponse};
use crate::model::{
    ActuatorState, ControlResponse, DashboardSnapshot, HeaterCommand, History, HistoryPoint,
    Notification, PumpCommand, SensorKind, SensorReading, SimTimePayload,
};

/// Client for every endpoint the dashboard consumes
pub struct BackendClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created BackendClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(url: &str, response: HttpResponse) -> crate::Result<HttpResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            tracing::debug!("Non-2xx response from {}: status={}", url, response.status);
            Err(crate::DashboardError::Status {
                status: response.status,
                url: url.to_string(),
            })
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> crate::Result<T> {
        let url = self.url(path);
        let response = Self::check(&url, self.http.get(&url).await?)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        let url = self.url(path);
        Self::check(&url, self.http.post_json(&url, body).await?)
    }

    async fn delete(&self, path: &str) -> crate::Result<HttpResponse> {
        let url = self.url(path);
        Self::check(&url, self.http.delete(&url).await?)
    }

    /// `GET /api/senzori/{beton|povrsina}`
    pub async fn sensor(&self, kind: SensorKind) -> crate::Result<SensorReading> {
        self.get_json(&format!("/api/senzori/{}", kind.path_segment()))
            .await
    }

    /// `GET /api/pumpa/stanje`
    pub async fn pump(&self) -> crate::Result<ActuatorState> {
        self.get_json("/api/pumpa/stanje").await
    }

    /// `GET /api/grijac/stanje`
    pub async fn heater(&self) -> crate::Result<ActuatorState> {
        self.get_json("/api/grijac/stanje").await
    }

    /// `GET /api/dashboard`
    pub async fn dashboard(&self) -> crate::Result<DashboardSnapshot> {
        self.get_json("/api/dashboard").await
    }

    /// `GET /api/istorija?hours=N`
    pub async fn history(&self, hours: u32) -> crate::Result<History> {
        self.get_json(&format!("/api/istorija?hours={}", hours))
            .await
    }

    /// `GET /api/sensor-history?device_type=...&limit=N`
    pub async fn sensor_history(
        &self,
        kind: SensorKind,
        limit: u32,
    ) -> crate::Result<Vec<HistoryPoint>> {
        self.get_json(&format!(
            "/api/sensor-history?device_type={}&limit={}",
            kind.device_type(),
            limit
        ))
        .await
    }

    /// `GET /api/sim-time`
    pub async fn sim_time(&self) -> crate::Result<SimTimePayload> {
        self.get_json("/api/sim-time").await
    }

    /// `GET /api/notifikacije`
    pub async fn notifications(&self) -> crate::Result<Vec<Notification>> {
        self.get_json("/api/notifikacije").await
    }

    /// `POST /api/notifikacije/{id}/acknowledge`
    pub async fn acknowledge(&self, id: u64) -> crate::Result<()> {
        self.post(
            &format!("/api/notifikacije/{}/acknowledge", id),
            &serde_json::json!({}),
        )
        .await?;
        Ok(())
    }

    /// `DELETE /api/notifikacije/{id}`
    pub async fn delete_notification(&self, id: u64) -> crate::Result<()> {
        self.delete(&format!("/api/notifikacije/{}", id)).await?;
        Ok(())
    }

    /// `POST /api/notifikacije/procitaj`
    pub async fn mark_read(&self, id: u64) -> crate::Result<()> {
        self.post("/api/notifikacije/procitaj", &serde_json::json!({ "id": id }))
            .await?;
        Ok(())
    }

    /// `POST /api/notifikacije/procitaj-sve`
    pub async fn mark_all_read(&self) -> crate::Result<()> {
        self.post("/api/notifikacije/procitaj-sve", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    /// `DELETE /api/notifikacije/obrisi-procitane`
    pub async fn clear_read(&self) -> crate::Result<()> {
        self.delete("/api/notifikacije/obrisi-procitane").await?;
        Ok(())
    }

    /// `DELETE /api/notifikacije/obrisi-sve`
    pub async fn clear_all(&self) -> crate::Result<()> {
        self.delete("/api/notifikacije/obrisi-sve").await?;
        Ok(())
    }

    /// `POST /api/pumpa/upravljanje`
    pub async fn control_pump(&self, command: PumpCommand) -> crate::Result<ControlResponse> {
        let response = self
            .post("/api/pumpa/upravljanje", &command.to_body())
            .await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// `POST /api/grijac/upravljanje`
    pub async fn control_heater(&self, command: HeaterCommand) -> crate::Result<ControlResponse> {
        let response = self
            .post("/api/grijac/upravljanje", &command.to_body())
            .await?;
        Ok(serde_json::from_str(&response.body)?)
    }
}
