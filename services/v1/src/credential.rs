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

use std::fmt::{Debug, Formatter};

use jwplatform_core::{utils::Redact, Error, Result, SigningCredential};

/// Credential for the JW Platform management API.
///
/// Both halves are required; [`Credential::new`] refuses empty values so a
/// constructed credential is always usable for signing.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    api_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let cred = Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        };

        match (cred.api_key.is_empty(), cred.api_secret.is_empty()) {
            (false, false) => Ok(cred),
            (true, true) => Err(Error::credential_invalid(
                "api key and api secret must be provided",
            )),
            (true, false) => Err(Error::credential_invalid("api key must be provided")),
            (false, true) => Err(Error::credential_invalid("api secret must be provided")),
        }
    }

    /// API key, sent in clear as `api_key`.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// API secret, only ever mixed into the signature.
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("api_secret", &Redact::from(&self.api_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
