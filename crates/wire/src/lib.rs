// SPDX-License-Identifier: MIT

//! mc-wire: the control-socket wire format (§4.5, §6.1).
//!
//! Each connection carries exactly one JSON request and one JSON reply.
//! [`Request::require_str`] gives verb handlers a uniform way to reject
//! missing or wrong-typed arguments without aborting the connection.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod error;
mod message;

pub use codec::{read_request, read_response, write_request, write_response};
pub use error::{Result, WireError};
pub use message::{Request, Response};
