// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Classify transport results into successes and failures.

use std::fmt::{Display, Formatter};

use bytes::Bytes;
use http::StatusCode;
use jwplatform_core::{Error, Result};
use serde_json::Value;

use crate::constants::UPLOAD_STATUS_OK;

/// Outcome of a call that reached the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The call succeeded; carries the parsed JSON payload.
    Success(Value),
    /// The platform refused the call.
    Failure(Failure),
}

/// Why the platform refused a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Non-2xx HTTP status, with the raw body kept verbatim for diagnostics.
    Http {
        /// HTTP status code.
        status: StatusCode,
        /// Raw response body, not parsed.
        body: String,
    },
    /// Upload answered with a `status` other than `ok`.
    Upload {
        /// Value of the `status` field.
        status: String,
        /// Raw response body.
        body: String,
    },
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Http { status, body } => write!(f, "status code: {status} - {body}"),
            Failure::Upload { status, body } => write!(f, "status: {status} - {body}"),
        }
    }
}

impl ApiResponse {
    /// Whether the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// Parsed payload of a successful call.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success(v) => Some(v),
            ApiResponse::Failure(_) => None,
        }
    }

    /// Failure details of a refused call.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure(f) => Some(f),
        }
    }

    /// `status.code` of a standard success payload.
    pub fn status_code(&self) -> Option<u64> {
        self.payload()?.pointer("/status/code")?.as_u64()
    }

    /// `status.message` of a standard success payload.
    pub fn status_message(&self) -> Option<&str> {
        self.payload()?.pointer("/status/message")?.as_str()
    }

    /// Turn a failure into an [`Error`] so callers can use `?`.
    pub fn into_result(self) -> Result<Value> {
        match self {
            ApiResponse::Success(v) => Ok(v),
            ApiResponse::Failure(f @ Failure::Http { .. }) => {
                Err(Error::response_failed(f.to_string()))
            }
            ApiResponse::Failure(f @ Failure::Upload { .. }) => {
                Err(Error::upload_failed(f.to_string()))
            }
        }
    }
}

/// Validate the response of a signed API call.
///
/// Any 2xx status parses the body as JSON; anything else becomes
/// [`Failure::Http`] without looking at the body.
pub fn validate_response(resp: http::Response<Bytes>) -> Result<ApiResponse> {
    let (parts, body) = resp.into_parts();

    if !parts.status.is_success() {
        return Ok(ApiResponse::Failure(Failure::Http {
            status: parts.status,
            body: String::from_utf8_lossy(&body).to_string(),
        }));
    }

    Ok(ApiResponse::Success(parse_json(&body)?))
}

/// Validate the response of an upload transfer.
///
/// The upload endpoint reports its result in a top-level `status` string.
/// Failures keep the body exactly as the server sent it.
pub fn validate_upload_response(resp: http::Response<Bytes>) -> Result<ApiResponse> {
    let (parts, body) = resp.into_parts();
    let raw = String::from_utf8_lossy(&body).to_string();

    if !parts.status.is_success() {
        return Ok(ApiResponse::Failure(Failure::Http {
            status: parts.status,
            body: raw,
        }));
    }

    let payload = parse_json(&body)?;
    let status = match payload.get("status") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => {
            return Err(Error::response_invalid(format!(
                "upload response has no status: {raw}"
            )))
        }
        Some(other) => other.to_string(),
    };

    if status == UPLOAD_STATUS_OK {
        Ok(ApiResponse::Success(payload))
    } else {
        Ok(ApiResponse::Failure(Failure::Upload { status, body: raw }))
    }
}

fn parse_json(body: &Bytes) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| {
        Error::response_invalid(format!(
            "response body is not valid json: {}",
            String::from_utf8_lossy(body)
        ))
        .with_source(e)
    })
}
