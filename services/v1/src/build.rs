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

//! Turn a method, path and parameters into a dispatch-ready request.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Uri;
use jwplatform_core::{Error, Result};

use crate::constants::*;
use crate::sign_request::{Params, RequestSigner};
use crate::Credential;

/// Request methods accepted by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Parameters always travel in the query string.
    Get,
    /// Parameters travel in the query string or in a form-encoded body.
    Post,
}

impl FromStr for Method {
    type Err = Error;

    /// Parse a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Method::Post)
        } else {
            Err(Error::method_unsupported(format!(
                "request method {s:?} is not supported, expected GET or POST"
            )))
        }
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = Error;

    fn try_from(m: &http::Method) -> Result<Self> {
        m.as_str().parse()
    }
}

impl From<Method> for http::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// A signed request before it is bound to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Request method.
    pub method: Method,
    /// Request path, relative to the endpoint.
    pub path: String,
    /// Signed query string, without the leading `?`.
    pub query: Option<String>,
    /// Signed form-encoded body.
    pub body: Option<String>,
}

impl SignedRequest {
    /// Bind the request to `endpoint` and build an [`http::Request`].
    pub fn into_request(self, endpoint: &str) -> Result<http::Request<Bytes>> {
        let mut uri = join_path(endpoint, &self.path);
        if let Some(query) = &self.query {
            uri.push('?');
            uri.push_str(query);
        }
        let uri: Uri = uri.parse()?;

        let mut req = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(uri);
        let body = match self.body {
            Some(body) => {
                req = req.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
                Bytes::from(body)
            }
            None => Bytes::new(),
        };

        Ok(req.body(body)?)
    }
}

/// RequestBuilder signs parameters and lays them out for the chosen method.
///
/// - GET: signed query string.
/// - POST without body parameters: signed query string.
/// - POST with body parameters: signed form-encoded body, bare path.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: String,
    signer: RequestSigner,
}

impl RequestBuilder {
    /// Create a builder that targets `endpoint`.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            signer: RequestSigner::new(),
        }
    }

    /// Target another endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Replace the signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Endpoint requests are bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sign the request without binding it to the endpoint.
    ///
    /// No I/O happens here; a blank path fails with
    /// [`jwplatform_core::ErrorKind::PathMissing`].
    pub fn sign(
        &self,
        cred: &Credential,
        method: Method,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<SignedRequest> {
        if path.trim().is_empty() {
            return Err(Error::path_missing("request path must be provided"));
        }

        let signed = self.signer.sign(cred, params)?;
        let (query, body) = match (method, has_body_params) {
            (Method::Post, true) => (None, Some(signed)),
            _ => (Some(signed), None),
        };

        Ok(SignedRequest {
            method,
            path: path.to_string(),
            query,
            body,
        })
    }

    /// Sign the request and build it against the endpoint.
    pub fn build(
        &self,
        cred: &Credential,
        method: Method,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<http::Request<Bytes>> {
        self.sign(cred, method, path, params, has_body_params)?
            .into_request(&self.endpoint)
    }

    /// Same as [`RequestBuilder::build`] but with the method given by name.
    ///
    /// The path is checked before the method, so a blank path is always
    /// reported as missing even when the method is unsupported too.
    pub fn build_from_str(
        &self,
        cred: &Credential,
        method: &str,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<http::Request<Bytes>> {
        if path.trim().is_empty() {
            return Err(Error::path_missing("request path must be provided"));
        }

        self.build(cred, method.parse()?, path, params, has_body_params)
    }
}

/// Join endpoint and path with exactly one `/`.
pub(crate) fn join_path(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
