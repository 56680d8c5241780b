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

use std::time::Duration;

use bytes::Bytes;
use http::Uri;
use jwplatform_core::{Context, Error, ProvideCredential, Result};
use log::debug;

use crate::build::{Method, RequestBuilder};
use crate::constants::DEFAULT_ENDPOINT;
use crate::response::{validate_response, ApiResponse};
use crate::sign_request::{Params, RequestSigner};
use crate::upload::{Upload, UploadFile};
use crate::{Config, Credential};

/// Client for the JW Platform management API.
///
/// A client only holds immutable state, so it can be cloned freely and
/// shared across tasks; every clone reuses the transport of its [`Context`].
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    credential: Credential,
    builder: RequestBuilder,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client against the default endpoint.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self {
            ctx,
            credential,
            builder: RequestBuilder::new(DEFAULT_ENDPOINT),
            timeout: None,
        }
    }

    /// Create a client from a fully populated config.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let credential = Credential::new(
            config.api_key.clone().unwrap_or_default(),
            config.api_secret.clone().unwrap_or_default(),
        )?;

        Self::with_config(ctx, credential, config)
    }

    /// Create a client whose credential comes from `provider`.
    ///
    /// Endpoint and timeout are still taken from `config`.
    pub async fn load(
        ctx: Context,
        config: &Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let credential = provider.provide_credential(&ctx).await?.ok_or_else(|| {
            Error::credential_invalid("no credential found from the configured providers")
        })?;

        Self::with_config(ctx, credential, config)
    }

    fn with_config(ctx: Context, credential: Credential, config: &Config) -> Result<Self> {
        let endpoint = config.endpoint();
        check_endpoint(endpoint)?;

        let mut client = Self::new(ctx, credential);
        client.builder = RequestBuilder::new(endpoint);
        client.timeout = config.timeout;
        Ok(client)
    }

    /// Send requests to `endpoint` instead.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        check_endpoint(endpoint)?;
        self.builder = self.builder.with_endpoint(endpoint);
        Ok(self)
    }

    /// Abandon any transport call that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.builder = self.builder.with_signer(signer);
        self
    }

    /// Credential used to sign requests.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.builder.endpoint()
    }

    /// Default deadline of each transport call.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Signed GET.
    pub async fn get(&self, path: &str, params: Option<&Params>) -> Result<ApiResponse> {
        self.call(Method::Get, path, params, false).await
    }

    /// Signed POST; `has_body_params` moves the parameters into a form body.
    pub async fn post(
        &self,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<ApiResponse> {
        self.call(Method::Post, path, params, has_body_params).await
    }

    /// Signed call with the client's default deadline.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<ApiResponse> {
        self.call_with_deadline(method, path, params, has_body_params, self.timeout)
            .await
    }

    /// Signed call with the method given by name, e.g. `"GET"`.
    pub async fn call_by_name(
        &self,
        method: &str,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<ApiResponse> {
        let req =
            self.builder
                .build_from_str(&self.credential, method, path, params, has_body_params)?;
        validate_response(self.send(req, self.timeout).await?)
    }

    /// Signed call bounded by `deadline` instead of the client's default.
    ///
    /// `None` waits for the transport as long as it takes.
    pub async fn call_with_deadline(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
        deadline: Option<Duration>,
    ) -> Result<ApiResponse> {
        let req = self.build(method, path, params, has_body_params)?;
        validate_response(self.send(req, deadline).await?)
    }

    /// Create a video from `metadata` and upload the file at `file_path`.
    ///
    /// The file is read before any network call, so a missing file fails
    /// with [`jwplatform_core::ErrorKind::FileMissing`] and nothing is
    /// created on the platform.
    pub async fn upload(&self, metadata: Option<&Params>, file_path: &str) -> Result<ApiResponse> {
        self.start_upload(metadata, file_path).await?.run().await
    }

    /// Load the file and return an upload that has not sent anything yet.
    pub async fn start_upload<'a>(
        &'a self,
        metadata: Option<&'a Params>,
        file_path: &str,
    ) -> Result<Upload<'a>> {
        let file = UploadFile::load(&self.ctx, file_path).await?;
        debug!("loaded {file:?} for upload");
        Ok(Upload::new(self, metadata, file))
    }

    pub(crate) fn build(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        has_body_params: bool,
    ) -> Result<http::Request<Bytes>> {
        self.builder
            .build(&self.credential, method, path, params, has_body_params)
    }

    pub(crate) async fn send(
        &self,
        req: http::Request<Bytes>,
        deadline: Option<Duration>,
    ) -> Result<http::Response<Bytes>> {
        debug!("sending {} {}", req.method(), req.uri().path());

        let resp = match deadline {
            Some(d) => tokio::time::timeout(d, self.ctx.http_send(req))
                .await
                .map_err(|e| {
                    Error::timeout(format!("no response within {d:?}")).with_source(e)
                })??,
            None => self.ctx.http_send(req).await?,
        };

        debug!("received response with status {}", resp.status());
        Ok(resp)
    }
}

fn check_endpoint(endpoint: &str) -> Result<()> {
    let uri: Uri = endpoint.parse()?;
    if uri.scheme().is_none() || uri.host().is_none() {
        return Err(Error::config_invalid(format!(
            "endpoint {endpoint:?} must be an absolute url"
        )));
    }
    Ok(())
}
