// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Repository-layer abstractions the domain depends on but does not
//! implement: the injected I/O adapter (§6 "IoLocation") and the
//! status-callback contract for long-running, cancellable operations
//! (§5, §6).

mod io_location;
mod status_callback;

pub use io_location::{IoAdapter, IoLocation};
pub use status_callback::{CancellationSignal, StatusCallback, StatusUpdate};
