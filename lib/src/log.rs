// Smoldot
// Copyright (C) 2019-2022  Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Reporting of events to the API user.
//!
//! Rather than depending on a logging framework, components of this library that have something
//! to report accept an implementation of [`LogCallback`]. It is the responsibility of the API
//! user to decide what to do with the messages.
//!
//! Messages follow the `event-name; key=value; key=value` format.
//!
//! Any closure `Fn(LogLevel, String)` implements [`LogCallback`]:
//!
//! ```
//! use light_certifier::log::{LogCallback, LogLevel};
//! use std::sync::Arc;
//!
//! let callback: Arc<dyn LogCallback + Send + Sync> =
//!     Arc::new(|level: LogLevel, message: String| {
//!         if level <= LogLevel::Warn {
//!             eprintln!("{message}");
//!         }
//!     });
//! callback.log(LogLevel::Debug, "ignored".to_owned());
//! ```

use alloc::string::String;

/// Severity of a log message.
///
/// Variants are ordered from the most severe to the least severe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum LogLevel {
    #[display("error")]
    Error = 1,
    #[display("warn")]
    Warn = 2,
    #[display("info")]
    Info = 3,
    #[display("debug")]
    Debug = 4,
    #[display("trace")]
    Trace = 5,
}

/// Destination of the log messages emitted by this library.
pub trait LogCallback {
    /// Called whenever a component has something to report.
    fn log(&self, log_level: LogLevel, message: String);
}

impl<T: ?Sized + Fn(LogLevel, String)> LogCallback for T {
    fn log(&self, log_level: LogLevel, message: String) {
        (*self)(log_level, message)
    }
}
