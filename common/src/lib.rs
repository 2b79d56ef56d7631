// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facilities shared by the MMT failure-tracking service and its consumers
//!
//! The main export is [`Error`], the service-level error type produced by the
//! storage and workflow layers and folded into a `dropshot::HttpError` at the
//! HTTP boundary.

pub mod error;

pub use error::Error;
pub use error::LookupType;
pub use error::ResourceType;
