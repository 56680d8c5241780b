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

use std::sync::Arc;

use jwplatform_core::{Context, OsEnv, Result};
use jwplatform_file_read_tokio::TokioFileRead;
use jwplatform_http_send_reqwest::ReqwestHttpSend;
use jwplatform_v1::{Client, Config, DefaultCredentialProvider};

/// Context backed by tokio file reads, a reqwest client and the process environment.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Client configured from `JWPLATFORM_*` environment variables.
///
/// Fails with [`crate::ErrorKind::CredentialInvalid`] when no key and
/// secret can be found.
pub async fn default_client() -> Result<Client> {
    let ctx = default_context();
    let config = Config::new().from_env(&ctx);
    let provider = DefaultCredentialProvider::new(Arc::new(config.clone()));

    Client::load(ctx, &config, provider).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::time::Duration;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn test_default_client_from_env() {
        temp_env::with_vars(
            vec![
                ("JWPLATFORM_API_KEY", Some("env_key")),
                ("JWPLATFORM_API_SECRET", Some("env_secret")),
                ("JWPLATFORM_ENDPOINT", None),
                ("JWPLATFORM_TIMEOUT", Some("30")),
            ],
            || {
                let client = block_on(default_client()).unwrap();
                assert_eq!(client.credential().api_key(), "env_key");
                assert_eq!(client.endpoint(), jwplatform_v1::DEFAULT_ENDPOINT);
                assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
            },
        );
    }

    #[test]
    fn test_default_client_without_credential() {
        temp_env::with_vars_unset(vec!["JWPLATFORM_API_KEY", "JWPLATFORM_API_SECRET"], || {
            let err = block_on(default_client()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        });
    }
}
