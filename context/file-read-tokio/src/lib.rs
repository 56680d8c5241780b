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

//! Tokio-based file reading implementation for jwplatform.
//!
//! This crate provides `TokioFileRead`, an async file reader that implements
//! the `FileRead` trait from `jwplatform_core` using Tokio's file system operations.
//! Uploads use it to load the video file before contacting the platform.
//!
//! ## Example
//!
//! ```no_run
//! use jwplatform_core::Context;
//! use jwplatform_file_read_tokio::TokioFileRead;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_file_read(TokioFileRead);
//!
//!     match ctx.file_read("/path/to/video.mp4").await {
//!         Ok(content) => println!("Read {} bytes", content.len()),
//!         Err(e) => eprintln!("Failed to read file: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use jwplatform_core::{Error, FileRead, Result};
use std::io::ErrorKind;

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                Error::file_missing(format!("file does not exist: {path}")).with_source(e)
            }
            _ => Error::unexpected(format!("failed to read file: {path}")).with_source(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_existing_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"not really a video")?;

        let path = file.path().to_string_lossy().to_string();
        let content = TokioFileRead.file_read(&path).await?;
        assert_eq!(content, b"not really a video");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let path = dir.path().join("missing.mp4");

        let err = TokioFileRead
            .file_read(&path.to_string_lossy())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), jwplatform_core::ErrorKind::FileMissing);
        assert!(err.is_caller_error());
    }
}
