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

//! Two-phase video upload.
//!
//! A signed `POST /videos/create` registers the metadata and returns a
//! pre-authorized link; the file bytes are then pushed to that link without
//! a signature.

use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use jwplatform_core::{Context, Error, Result};
use log::debug;
use percent_encoding::utf8_percent_encode;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::build::Method;
use crate::constants::*;
use crate::response::{validate_response, validate_upload_response, ApiResponse};
use crate::sign_request::Params;
use crate::Client;

/// Upload link issued by the create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadLink {
    /// Scheme of the upload host, e.g. `https`.
    pub protocol: String,
    /// Host (and optional port) of the upload server.
    pub address: String,
    /// Path on the upload server.
    pub path: String,
    /// Authorization for this upload.
    pub query: UploadQuery,
}

/// Query part of an [`UploadLink`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UploadQuery {
    /// Upload key.
    pub key: String,
    /// One-shot upload token.
    pub token: String,
}

impl Debug for UploadQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadQuery")
            .field("key", &self.key)
            .field("token", &jwplatform_core::utils::Redact::from(&self.token))
            .finish()
    }
}

impl UploadLink {
    /// Extract the link from the payload of a create call.
    pub fn from_create_response(payload: &Value) -> Result<Self> {
        let link = payload.get("link").ok_or_else(|| {
            Error::response_invalid(format!("create response has no upload link: {payload}"))
        })?;

        UploadLink::deserialize(link).map_err(|e| {
            Error::response_invalid(format!("upload link is incomplete: {link}")).with_source(e)
        })
    }

    /// Build `protocol://address/path?api_format=json&key=..&token=..`.
    pub fn upload_url(&self) -> String {
        let query = format!(
            "{API_FORMAT}={API_FORMAT_JSON}&key={}&token={}",
            utf8_percent_encode(&self.query.key, &PARAM_ENCODE_SET),
            utf8_percent_encode(&self.query.token, &PARAM_ENCODE_SET),
        );

        let sep = if self.path.starts_with('/') { "" } else { "/" };
        format!(
            "{}://{}{sep}{}?{query}",
            self.protocol, self.address, self.path
        )
    }
}

/// A local file loaded for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    content: Bytes,
}

impl Debug for UploadFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}

impl UploadFile {
    /// Wrap in-memory content.
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read the whole file through the context's file reader.
    pub async fn load(ctx: &Context, path: &str) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(Error::file_missing("upload file path must be provided"));
        }

        let content = ctx.file_read(path).await?;
        let name = Path::new(path)
            .file_name()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());

        Ok(Self::new(name, content))
    }

    /// File name sent in the form part.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Build the unsigned multipart request that carries the file to `url`.
    pub fn to_request(&self, url: &str) -> Result<http::Request<Bytes>> {
        let boundary = generate_boundary();
        let filename = self.name.replace('"', "%22").replace(['\r', '\n'], "");

        let mut body = BytesMut::with_capacity(self.content.len() + 256);
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{UPLOAD_FORM_FIELD}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.put_slice(&self.content);
        body.put_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = http::Request::post(url)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(body.freeze())?;
        Ok(req)
    }
}

fn generate_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("------------------------{suffix}")
}

/// Where an upload stands.
#[derive(Debug)]
pub enum UploadState {
    /// Nothing has been sent yet.
    Pending,
    /// The create call succeeded; carries its payload.
    Created(Value),
    /// The upload URL has been assembled.
    LinkParsed(String),
    /// The file has been sent; carries the raw response.
    FileTransferred(http::Response<Bytes>),
    /// Final outcome. A failed create call lands here directly.
    Validated(ApiResponse),
}

/// A single upload, advanced one phase at a time.
///
/// Every phase consumes the upload, so an error ends it for good.
#[derive(Debug)]
pub struct Upload<'a> {
    client: &'a Client,
    metadata: Option<&'a Params>,
    file: UploadFile,
    deadline: Option<Duration>,
    state: UploadState,
}

impl<'a> Upload<'a> {
    pub(crate) fn new(client: &'a Client, metadata: Option<&'a Params>, file: UploadFile) -> Self {
        Self {
            client,
            metadata,
            file,
            deadline: client.timeout(),
            state: UploadState::Pending,
        }
    }

    /// Override the deadline applied to each network phase.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Current state.
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Whether the upload has reached its final state.
    pub fn is_done(&self) -> bool {
        matches!(self.state, UploadState::Validated(_))
    }

    /// Run a single phase.
    pub async fn next(self) -> Result<Self> {
        let Upload {
            client,
            metadata,
            file,
            deadline,
            state,
        } = self;

        let state = match state {
            UploadState::Pending => {
                let req = client.build(Method::Post, VIDEOS_CREATE_PATH, metadata, true)?;
                let resp = client.send(req, deadline).await?;
                match validate_response(resp)? {
                    ApiResponse::Success(payload) => UploadState::Created(payload),
                    failure => {
                        debug!("video create failed, upload aborted: {failure:?}");
                        UploadState::Validated(failure)
                    }
                }
            }
            UploadState::Created(payload) => {
                let link = UploadLink::from_create_response(&payload)?;
                debug!("upload link issued: {link:?}");
                UploadState::LinkParsed(link.upload_url())
            }
            UploadState::LinkParsed(url) => {
                let req = file.to_request(&url)?;
                UploadState::FileTransferred(client.send(req, deadline).await?)
            }
            UploadState::FileTransferred(resp) => {
                UploadState::Validated(validate_upload_response(resp)?)
            }
            done @ UploadState::Validated(_) => done,
        };

        Ok(Upload {
            client,
            metadata,
            file,
            deadline,
            state,
        })
    }

    /// Run every remaining phase and return the outcome.
    pub async fn run(self) -> Result<ApiResponse> {
        let mut upload = self;
        loop {
            upload = match upload.state {
                UploadState::Validated(resp) => return Ok(resp),
                _ => upload.next().await?,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwplatform_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn create_payload() -> Value {
        json!({
            "status": "ok",
            "media": {"type": "video", "key": "MEDIA_ID"},
            "link": {
                "protocol": "https",
                "address": "upload.jwplatform.com",
                "path": "/v1/videos/upload",
                "query": {"key": "MEDIA_ID", "token": "TOKEN"}
            }
        })
    }

    #[test]
    fn test_upload_url() {
        let link = UploadLink::from_create_response(&create_payload()).unwrap();

        assert_eq!(
            link.upload_url(),
            "https://upload.jwplatform.com/v1/videos/upload?api_format=json&key=MEDIA_ID&token=TOKEN"
        );
    }

    #[test]
    fn test_upload_url_without_leading_slash() {
        let mut payload = create_payload();
        payload["link"]["path"] = json!("v1/videos/upload");
        let link = UploadLink::from_create_response(&payload).unwrap();

        assert!(link
            .upload_url()
            .starts_with("https://upload.jwplatform.com/v1/videos/upload?"));
    }

    #[test]
    fn test_upload_url_encodes_token() {
        let mut payload = create_payload();
        payload["link"]["query"]["token"] = json!("a&b=c");
        let link = UploadLink::from_create_response(&payload).unwrap();

        assert!(link.upload_url().ends_with("&token=a%26b%3Dc"));
    }

    #[test]
    fn test_upload_url_encodes_spaces_as_percent() {
        let mut payload = create_payload();
        payload["link"]["query"]["token"] = json!("a b~c");
        let link = UploadLink::from_create_response(&payload).unwrap();

        assert!(link.upload_url().ends_with("&token=a%20b~c"));
    }

    #[test_case("/link"; "link")]
    #[test_case("/link/protocol"; "protocol")]
    #[test_case("/link/address"; "address")]
    #[test_case("/link/path"; "path")]
    #[test_case("/link/query"; "query")]
    #[test_case("/link/query/key"; "query key")]
    #[test_case("/link/query/token"; "query token")]
    fn test_missing_link_field(pointer: &str) {
        let mut payload = create_payload();
        let (parent, field) = pointer.rsplit_once('/').unwrap();
        let parent = if parent.is_empty() {
            &mut payload
        } else {
            payload.pointer_mut(parent).unwrap()
        };
        parent.as_object_mut().unwrap().remove(field);

        let err = UploadLink::from_create_response(&payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
    }

    #[test]
    fn test_multipart_request() {
        let file = UploadFile::new("video.mp4", &b"\x00\x01video bytes"[..]);
        let req = file
            .to_request("https://upload.jwplatform.com/v1/videos/upload?api_format=json")
            .unwrap();

        assert_eq!(req.method(), http::Method::POST);
        let content_type = req.headers()[CONTENT_TYPE].to_str().unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();

        let body = req.body();
        let expected_head = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"video.mp4\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        );
        let expected_tail = format!("\r\n--{boundary}--\r\n");
        assert!(body.starts_with(expected_head.as_bytes()));
        assert!(body.ends_with(expected_tail.as_bytes()));
        assert_eq!(
            body.len(),
            expected_head.len() + b"\x00\x01video bytes".len() + expected_tail.len()
        );
    }

    #[test]
    fn test_boundary_is_fresh() {
        assert_ne!(generate_boundary(), generate_boundary());
    }

    #[tokio::test]
    async fn test_load_empty_path() {
        let err = UploadFile::load(&Context::new(), " ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileMissing);
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"clip").unwrap();

        let ctx = Context::new().with_file_read(jwplatform_file_read_tokio::TokioFileRead);
        let file = UploadFile::load(&ctx, path.to_str().unwrap()).await.unwrap();

        assert_eq!(file.name(), "clip.mp4");
        assert_eq!(file.content().as_ref(), b"clip");
    }
}
