// SPDX-License-Identifier: MIT

//! One JSON object per connection: read until the writer shuts down (or a
//! trailing newline arrives, whichever comes first), then parse.

use crate::error::{Result, WireError};
use crate::message::{Request, Response};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Reads the single request carried by this connection. Tolerates both a
/// newline-terminated body and a body ended by the client shutting down its
/// write half.
pub async fn read_request<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Request> {
    let bytes = read_one_message(reader).await?;
    serde_json::from_slice(&bytes).map_err(|e| WireError::Malformed(e.to_string()))
}

pub async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<()> {
    let mut bytes = serde_json::to_vec(response).map_err(|e| WireError::Malformed(e.to_string()))?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Client-side counterpart of [`read_request`]/[`write_response`], used by
/// CLI callers and tests that speak the protocol from the other end.
pub async fn write_request<W: AsyncWrite + Unpin>(writer: &mut W, request: &Request) -> Result<()> {
    let mut bytes = serde_json::to_vec(request).map_err(|e| WireError::Malformed(e.to_string()))?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

pub async fn read_response<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Response> {
    let bytes = read_one_message(reader).await?;
    serde_json::from_slice(&bytes).map_err(|e| WireError::Malformed(e.to_string()))
}

async fn read_one_message<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf).await?;
    while buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.is_empty() {
        return Err(WireError::Malformed("empty request".to_string()));
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
