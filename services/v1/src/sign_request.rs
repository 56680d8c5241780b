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

//! Parameter canonicalization and request signatures.
//!
//! Every call carries the caller's parameters plus `api_key`, `api_format`,
//! `api_nonce` and `api_timestamp`. The merged set is sorted by key,
//! percent-encoded pair by pair and joined with `&`. The signature is the hex
//! SHA-1 of that string with the raw secret appended, sent as
//! `api_signature`.

use std::collections::BTreeMap;
use std::collections::HashMap;

use jwplatform_core::hash::hex_sha1;
use jwplatform_core::time::{now, unix_seconds, DateTime};
use jwplatform_core::{Error, Result, SigningCredential};
use log::debug;
use percent_encoding::utf8_percent_encode;
use rand::Rng;

use crate::constants::*;
use crate::Credential;

/// Parameters supplied by the caller for a single request.
pub type Params = HashMap<String, String>;

/// RequestSigner canonicalizes parameters and signs them.
///
/// A signer holds no per-call state: nonce and timestamp are drawn fresh for
/// every call unless pinned with [`RequestSigner::with_nonce`] or
/// [`RequestSigner::with_time`].
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a signer that draws a fresh nonce and timestamp per call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the nonce.
    ///
    /// # Note
    ///
    /// A fixed nonce makes every signature replayable.
    /// Only use this function for testing.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Merge caller parameters with the platform parameters and sort them by key.
    ///
    /// Caller parameters named like a platform parameter are rejected with
    /// [`jwplatform_core::ErrorKind::ParameterReserved`].
    pub fn canonicalize(
        &self,
        cred: &Credential,
        params: Option<&Params>,
    ) -> Result<Vec<(String, String)>> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "api key and api secret must not be empty",
            ));
        }

        let mut merged: BTreeMap<String, String> = BTreeMap::new();

        for (k, v) in params.into_iter().flatten() {
            if RESERVED_PARAMS.contains(&k.as_str()) {
                return Err(Error::parameter_reserved(format!(
                    "parameter {k} is set by the client and can't be overridden"
                )));
            }
            merged.insert(k.clone(), v.clone());
        }

        let time = self.time.unwrap_or_else(now);
        let nonce = self.nonce.clone().unwrap_or_else(generate_nonce);

        merged.insert(API_KEY.to_string(), cred.api_key().to_string());
        merged.insert(API_FORMAT.to_string(), API_FORMAT_JSON.to_string());
        merged.insert(API_NONCE.to_string(), nonce);
        merged.insert(API_TIMESTAMP.to_string(), unix_seconds(time).to_string());

        Ok(merged.into_iter().collect())
    }

    /// Canonicalize, encode and sign the parameters.
    ///
    /// Returns the encoded pairs followed by `&api_signature=<hex>`. The same
    /// string serves as a query string and as a form-encoded body.
    pub fn sign(&self, cred: &Credential, params: Option<&Params>) -> Result<String> {
        let canonical = self.canonicalize(cred, params)?;
        let encoded = encode_params(&canonical);
        debug!("string to sign: {encoded}");

        let signature = signature(&encoded, cred.api_secret());
        Ok(format!("{encoded}&{API_SIGNATURE}={signature}"))
    }
}

/// Percent-encode every key and value and join them as `k=v&k=v`.
pub fn encode_params(params: &[(String, String)]) -> String {
    let mut s = String::with_capacity(params.iter().map(|(k, v)| k.len() + v.len() + 2).sum());

    for (idx, (k, v)) in params.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.extend(utf8_percent_encode(k, &PARAM_ENCODE_SET));
        s.push('=');
        s.extend(utf8_percent_encode(v, &PARAM_ENCODE_SET));
    }

    s
}

/// Lowercase hex SHA-1 of the encoded parameters followed by the raw secret.
pub fn signature(encoded: &str, secret: &str) -> String {
    let mut content = String::with_capacity(encoded.len() + secret.len());
    content.push_str(encoded);
    content.push_str(secret);

    hex_sha1(content.as_bytes())
}

fn generate_nonce() -> String {
    let n = rand::thread_rng().gen_range(0..10u32.pow(NONCE_WIDTH as u32));
    format!("{n:0width$}", width = NONCE_WIDTH)
}
