//! Signed requests and video uploads for the JW Platform management API (v1).
//!
//! ## Overview
//!
//! Every call is signed: the caller's parameters are merged with `api_key`,
//! `api_format`, `api_nonce` and `api_timestamp`, sorted by key,
//! percent-encoded and hashed together with the API secret. The resulting
//! `api_signature` travels with the parameters in the query string or in a
//! form-encoded body.
//!
//! Uploads take two round trips: a signed `/videos/create` call returns a
//! one-shot upload link and the file is then posted to that link.
//!
//! ## Quick Start
//!
//! ```no_run
//! use jwplatform_core::{Context, OsEnv, Result};
//! use jwplatform_file_read_tokio::TokioFileRead;
//! use jwplatform_http_send_reqwest::ReqwestHttpSend;
//! use jwplatform_v1::{Client, Config, DefaultCredentialProvider, Params};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     let config = Config::new().from_env(&ctx);
//!     let provider = DefaultCredentialProvider::new(config.clone().into());
//!     let client = Client::load(ctx, &config, provider).await?;
//!
//!     let params = Params::from([("video_key".to_string(), "MEDIA_ID".to_string())]);
//!     let resp = client.get("/videos/show", Some(&params)).await?;
//!     println!("{:?}", resp.into_result()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ```bash
//! export JWPLATFORM_API_KEY=your-api-key
//! export JWPLATFORM_API_SECRET=your-api-secret
//! # Optional
//! export JWPLATFORM_ENDPOINT=https://api.jwplatform.com/v1
//! export JWPLATFORM_TIMEOUT=30
//! ```
//!
//! ## Failures
//!
//! Caller mistakes (blank path, unsupported method, missing file, reserved
//! parameter) are returned as [`jwplatform_core::Error`] before anything is
//! sent. Refusals from the platform come back as [`ApiResponse::Failure`];
//! use [`ApiResponse::into_result`] to treat them as errors.

mod constants;
pub use constants::{DEFAULT_ENDPOINT, VIDEOS_CREATE_PATH};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{encode_params, signature, Params, RequestSigner};

mod build;
pub use build::{Method, RequestBuilder, SignedRequest};

mod response;
pub use response::{validate_response, validate_upload_response, ApiResponse, Failure};

mod upload;
pub use upload::{Upload, UploadFile, UploadLink, UploadQuery, UploadState};

mod client;
pub use client::Client;
