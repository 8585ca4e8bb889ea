//! Stripe REST client.
//!
//! Write endpoints take form-encoded bodies with bracketed nested keys
//! (`line_items[0][price]`); reads return JSON. One attempt per call with
//! a fixed timeout.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::config::StripeConfig;

use super::types::{CatalogPrice, CatalogProduct, CheckoutSession, List, ShippingRate};
use super::StripeError;

/// Stripe API base URL.
const API_BASE: &str = "https://api.stripe.com/v1";

/// Fixed per-request timeout; there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error envelope returned by Stripe on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Input for one checkout line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLineItemInput {
    /// Stripe price id.
    pub price: String,
    pub quantity: u32,
}

/// Request to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession {
    pub line_items: Vec<SessionLineItemInput>,
    pub success_url: String,
    pub cancel_url: String,
    /// Collect a US shipping address on the payment page.
    pub collect_shipping_address: bool,
    /// Collect a phone number on the payment page.
    pub collect_phone_number: bool,
    /// Always create a customer record for the session.
    pub always_create_customer: bool,
    /// Session metadata (cart audit trail).
    pub metadata: Vec<(String, String)>,
    /// Shipping rate ids offered at checkout; empty omits the field.
    pub shipping_rates: Vec<String>,
}

impl CreateCheckoutSession {
    /// Serialize into the form pairs Stripe expects.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("mode".to_string(), "payment".to_string())];

        for (i, item) in self.line_items.iter().enumerate() {
            form.push((format!("line_items[{i}][price]"), item.price.clone()));
            form.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        form.push(("success_url".to_string(), self.success_url.clone()));
        form.push(("cancel_url".to_string(), self.cancel_url.clone()));

        if self.collect_shipping_address {
            form.push((
                "shipping_address_collection[allowed_countries][0]".to_string(),
                "US".to_string(),
            ));
        }

        if self.collect_phone_number {
            form.push((
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        if self.always_create_customer {
            form.push(("customer_creation".to_string(), "always".to_string()));
        }

        for (key, value) in &self.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        for (i, rate) in self.shipping_rates.iter().enumerate() {
            form.push((format!("shipping_options[{i}][shipping_rate]"), rate.clone()));
        }

        form
    }
}

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: secrecy::SecretString,
    base_url: String,
}

impl StripeClient {
    /// Create a new Stripe API client.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            secret_key: config.secret_key.clone(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails or Stripe rejects it.
    pub async fn create_checkout_session(
        &self,
        request: &CreateCheckoutSession,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&request.to_form())
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Retrieve a checkout session expanded with line items (down to their
    /// products) and the customer.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails or the session is unknown.
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions/{session_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(&[
                ("expand[]", "line_items"),
                ("expand[]", "line_items.data.price.product"),
                ("expand[]", "customer"),
            ])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// List active catalog products, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails.
    pub async fn list_products(&self, limit: u32) -> Result<List<CatalogProduct>, StripeError> {
        let url = format!("{}/products", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(&[("limit", limit.to_string().as_str()), ("active", "true")])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// List a product's prices, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails.
    pub async fn list_prices_for_product(
        &self,
        product_id: &str,
        limit: u32,
    ) -> Result<List<CatalogPrice>, StripeError> {
        let url = format!("{}/prices", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(&[("product", product_id), ("limit", &limit.to_string())])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// List active shipping rates, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StripeError` if the request fails.
    pub async fn list_shipping_rates(&self, limit: u32) -> Result<List<ShippingRate>, StripeError> {
        let url = format!("{}/shipping_rates", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.secret_key.expose_secret())
            .query(&[("active", "true"), ("limit", &limit.to_string())])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Decode a response, mapping non-2xx statuses to `StripeError::Api`.
    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);

            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreateCheckoutSession {
        CreateCheckoutSession {
            line_items: vec![
                SessionLineItemInput {
                    price: "price_A".to_string(),
                    quantity: 2,
                },
                SessionLineItemInput {
                    price: "price_B".to_string(),
                    quantity: 1,
                },
            ],
            success_url: "https://shop.test/checkout/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://shop.test".to_string(),
            collect_shipping_address: true,
            collect_phone_number: true,
            always_create_customer: true,
            metadata: vec![
                (
                    "cart_items".to_string(),
                    "{\"price_A\":2,\"price_B\":1}".to_string(),
                ),
                ("source".to_string(), "website_store".to_string()),
            ],
            shipping_rates: vec!["shr_1".to_string()],
        }
    }

    #[test]
    fn test_form_contains_all_line_items() {
        let form = sample_request().to_form();

        assert!(form.contains(&("line_items[0][price]".to_string(), "price_A".to_string())));
        assert!(form.contains(&("line_items[0][quantity]".to_string(), "2".to_string())));
        assert!(form.contains(&("line_items[1][price]".to_string(), "price_B".to_string())));
        assert!(form.contains(&("line_items[1][quantity]".to_string(), "1".to_string())));
    }

    #[test]
    fn test_form_checkout_options() {
        let form = sample_request().to_form();

        assert!(form.contains(&("mode".to_string(), "payment".to_string())));
        assert!(form.contains(&(
            "shipping_address_collection[allowed_countries][0]".to_string(),
            "US".to_string()
        )));
        assert!(form.contains(&(
            "phone_number_collection[enabled]".to_string(),
            "true".to_string()
        )));
        assert!(form.contains(&("customer_creation".to_string(), "always".to_string())));
        assert!(form.contains(&(
            "metadata[source]".to_string(),
            "website_store".to_string()
        )));
        assert!(form.contains(&(
            "shipping_options[0][shipping_rate]".to_string(),
            "shr_1".to_string()
        )));
    }

    #[test]
    fn test_form_omits_shipping_options_when_empty() {
        let mut request = sample_request();
        request.shipping_rates.clear();
        let form = request.to_form();

        assert!(!form.iter().any(|(k, _)| k.starts_with("shipping_options")));
    }
}
