//! Remote store gateway: one HTTP attempt per operation against the funnel endpoint.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::analytics::AnalyticsSnapshot;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{
    Action, ErrorBody, Lead, LeadEnvelope, LeadList, LeadUpdate, LeadUpdateRequest, NewLead,
    NewPurchase, Purchase, PurchaseEnvelope, PurchaseList, PurchaseUpdate, PurchaseUpdateRequest,
};

/// Remote side of the tracker. Every call either yields the remote value or a
/// [`GatewayError`] the caller can fall back on.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn create_purchase(&self, purchase: &NewPurchase) -> GatewayResult<Purchase>;

    async fn create_lead(&self, lead: &NewLead) -> GatewayResult<Lead>;

    async fn list_purchases(&self) -> GatewayResult<Vec<Purchase>>;

    async fn list_leads(&self) -> GatewayResult<Vec<Lead>>;

    async fn update_purchase(&self, id: &str, update: &PurchaseUpdate) -> GatewayResult<Purchase>;

    async fn update_lead(&self, id: &str, update: &LeadUpdate) -> GatewayResult<Lead>;

    async fn analytics(&self) -> GatewayResult<AnalyticsSnapshot>;
}

/// Gateway speaking the `?action=` JSON protocol over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    endpoint: Url,
}

impl HttpGateway {
    /// `endpoint` is the full resource URL, e.g. `http://localhost:3000/api/purchases`.
    pub fn new(endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self::with_client(Client::new(), Url::parse(endpoint)?))
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, action: Action) -> RequestBuilder {
        self.client
            .request(method, self.endpoint.clone())
            .query(&[("action", action.as_str())])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::network(format!("Request failed: {}", e)))?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        action: Action,
        body: &B,
    ) -> GatewayResult<T> {
        self.send(self.request(method, action).json(body)).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::decode(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn create_purchase(&self, purchase: &NewPurchase) -> GatewayResult<Purchase> {
        let envelope: PurchaseEnvelope = self.send_json(Method::POST, Action::Purchase, purchase).await?;
        Ok(envelope.purchase)
    }

    async fn create_lead(&self, lead: &NewLead) -> GatewayResult<Lead> {
        let envelope: LeadEnvelope = self.send_json(Method::POST, Action::Lead, lead).await?;
        Ok(envelope.lead)
    }

    async fn list_purchases(&self) -> GatewayResult<Vec<Purchase>> {
        let list: PurchaseList = self.send(self.request(Method::GET, Action::Purchases)).await?;
        Ok(list.purchases)
    }

    async fn list_leads(&self) -> GatewayResult<Vec<Lead>> {
        let list: LeadList = self.send(self.request(Method::GET, Action::Leads)).await?;
        Ok(list.leads)
    }

    async fn update_purchase(&self, id: &str, update: &PurchaseUpdate) -> GatewayResult<Purchase> {
        let body = PurchaseUpdateRequest {
            id: id.to_string(),
            update: update.clone(),
        };
        let envelope: PurchaseEnvelope = self.send_json(Method::PUT, Action::Purchase, &body).await?;
        Ok(envelope.purchase)
    }

    async fn update_lead(&self, id: &str, update: &LeadUpdate) -> GatewayResult<Lead> {
        let body = LeadUpdateRequest {
            id: id.to_string(),
            update: update.clone(),
        };
        let envelope: LeadEnvelope = self.send_json(Method::PUT, Action::Lead, &body).await?;
        Ok(envelope.lead)
    }

    async fn analytics(&self) -> GatewayResult<AnalyticsSnapshot> {
        self.send(self.request(Method::GET, Action::Analytics)).await
    }
}

/// Gateway for running without a backend: every call fails with a network error.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    fn unavailable<T>() -> GatewayResult<T> {
        Err(GatewayError::network("offline mode"))
    }
}

#[async_trait]
impl Gateway for OfflineGateway {
    async fn create_purchase(&self, _purchase: &NewPurchase) -> GatewayResult<Purchase> {
        Self::unavailable()
    }

    async fn create_lead(&self, _lead: &NewLead) -> GatewayResult<Lead> {
        Self::unavailable()
    }

    async fn list_purchases(&self) -> GatewayResult<Vec<Purchase>> {
        Self::unavailable()
    }

    async fn list_leads(&self) -> GatewayResult<Vec<Lead>> {
        Self::unavailable()
    }

    async fn update_purchase(&self, _id: &str, _update: &PurchaseUpdate) -> GatewayResult<Purchase> {
        Self::unavailable()
    }

    async fn update_lead(&self, _id: &str, _update: &LeadUpdate) -> GatewayResult<Lead> {
        Self::unavailable()
    }

    async fn analytics(&self) -> GatewayResult<AnalyticsSnapshot> {
        Self::unavailable()
    }
}
