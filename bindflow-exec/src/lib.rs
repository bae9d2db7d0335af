// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Drives streams into async handlers.
//!
//! A binder typically subscribes to a view model's output with
//! [`subscribe`](SubscribeExt::subscribe) and renders every emission.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod logging;
pub mod subscribe;

pub use self::subscribe::SubscribeExt;
