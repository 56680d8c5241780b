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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used by jwplatform.
pub const JWPLATFORM_API_KEY: &str = "JWPLATFORM_API_KEY";
pub const JWPLATFORM_API_SECRET: &str = "JWPLATFORM_API_SECRET";
pub const JWPLATFORM_ENDPOINT: &str = "JWPLATFORM_ENDPOINT";
pub const JWPLATFORM_TIMEOUT: &str = "JWPLATFORM_TIMEOUT";

/// Base endpoint of the management API.
pub const DEFAULT_ENDPOINT: &str = "https://api.jwplatform.com/v1";

/// Path used to create the video record before an upload.
pub const VIDEOS_CREATE_PATH: &str = "/videos/create";

// Parameters added to every signed request.
pub const API_KEY: &str = "api_key";
pub const API_FORMAT: &str = "api_format";
pub const API_NONCE: &str = "api_nonce";
pub const API_TIMESTAMP: &str = "api_timestamp";
pub const API_SIGNATURE: &str = "api_signature";

pub const API_FORMAT_JSON: &str = "json";

/// Names callers may not use for their own parameters.
pub const RESERVED_PARAMS: [&str; 5] = [API_KEY, API_FORMAT, API_NONCE, API_TIMESTAMP, API_SIGNATURE];

/// Width of the zero-padded numeric nonce.
pub const NONCE_WIDTH: usize = 8;

/// Status value of a successful upload response.
pub const UPLOAD_STATUS_OK: &str = "ok";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form field that carries the file in an upload transfer.
pub const UPLOAD_FORM_FIELD: &str = "file";

/// AsciiSet for parameter keys and values.
///
/// Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static PARAM_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
