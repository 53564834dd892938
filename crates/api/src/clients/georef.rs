//! Client for the georef address-normalization API.
//!
//! Recharges carry the depositing store's address; before an entry is
//! recorded the address is checked against the public georef service. The
//! check fails closed: a network error, a non-2xx status or a response
//! with zero matches all treat the address as invalid.

use monedero_core::ledger::Address;
use serde::Deserialize;
use tracing::warn;

/// Response envelope of the `direcciones` endpoint. Only the match count
/// matters here.
#[derive(Debug, Deserialize)]
struct DireccionesResponse {
    #[serde(default)]
    cantidad: u64,
}

/// HTTP client for address verification.
#[derive(Debug, Clone)]
pub struct GeorefClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeorefClient {
    /// Creates a client against the given base URL.
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Verifies that the address resolves to at least one real location.
    ///
    /// Returns `false` on any failure; callers must treat an unverifiable
    /// address as invalid.
    pub async fn verify(&self, address: &Address) -> bool {
        let url = format!("{}/direcciones", self.base_url);
        let direccion = format!("{} {}", address.street, address.number);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("direccion", direccion.as_str()),
                ("provincia", address.province.as_str()),
                ("departamento", address.department.as_str()),
                ("localidad", address.locality.as_str()),
                ("max", "1"),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "address verification request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "address verification returned an error status");
            return false;
        }

        match response.json::<DireccionesResponse>().await {
            Ok(body) => body.cantidad > 0,
            Err(e) => {
                warn!(error = %e, "address verification response was not parseable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized_away() {
        let client = GeorefClient::new("https://apis.datos.gob.ar/georef/api/".to_string());
        assert_eq!(client.base_url, "https://apis.datos.gob.ar/georef/api");
    }

    #[test]
    fn zero_matches_means_invalid() {
        let body: DireccionesResponse = serde_json::from_str(r#"{"cantidad": 0}"#).unwrap();
        assert_eq!(body.cantidad, 0);

        let body: DireccionesResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.cantidad, 0);
    }
}
