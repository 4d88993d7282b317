// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway to a remote node over its HTTP surface.

use std::time::Duration;

use base64ct::{Base64, Encoding};
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use super::{Committed, Gateway, GatewayError};
use crate::auth::MSP_ID_HEADER;
use crate::contract::ErrorCode;
use crate::error::ErrorBody;
use crate::models::{EvaluateRequest, SubmitRequest, SubmitResponse, Transient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SUBMIT_PATH: &str = "v1/transactions/submit";
const EVALUATE_PATH: &str = "v1/transactions/evaluate";

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    msp_id: String,
    http: Client,
}

impl HttpGateway {
    /// Gateway for `msp_id` against the node at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str, msp_id: impl Into<String>) -> Result<Self, GatewayError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid node URL {base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            msp_id: msp_id.into(),
            http,
        })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, GatewayError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .header(MSP_ID_HEADER, &self.msp_id)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejection(response).await)
        }
    }
}

/// Rebuild the node's structured failure from an error response.
async fn rejection(response: Response) -> GatewayError {
    let status = response.status();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return GatewayError::Transport(format!("HTTP {status}: {e}")),
    };

    let Ok(body) = serde_json::from_slice::<ErrorBody>(&bytes) else {
        return GatewayError::Transport(format!("HTTP {status} from node"));
    };

    match serde_json::from_value::<ErrorCode>(serde_json::Value::String(body.error_code)) {
        Ok(code) => GatewayError::Rejected {
            code,
            message: body.error,
            details: body.details,
        },
        Err(_) => GatewayError::Transport(format!("HTTP {status}: {}", body.error)),
    }
}

impl Gateway for HttpGateway {
    fn msp_id(&self) -> &str {
        &self.msp_id
    }

    async fn submit(&self, operation: &str, transient: Transient) -> Result<Committed, GatewayError> {
        let request = SubmitRequest::new(operation, &transient);
        let response: SubmitResponse = self
            .post(SUBMIT_PATH, &request)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let result = Base64::decode_vec(&response.result)
            .map_err(|e| GatewayError::Transport(format!("invalid result encoding: {e}")))?;
        Ok(Committed {
            tx_id: response.tx_id,
            result,
        })
    }

    async fn evaluate(&self, operation: &str, args: Vec<String>) -> Result<Vec<u8>, GatewayError> {
        let request = EvaluateRequest {
            operation: operation.to_string(),
            args,
        };
        let bytes = self
            .post(EVALUATE_PATH, &request)
            .await?
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
