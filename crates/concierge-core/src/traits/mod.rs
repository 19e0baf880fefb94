// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the runtime and its pluggable backends.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod responder;
pub mod store;

pub use responder::Responder;
pub use store::Store;
