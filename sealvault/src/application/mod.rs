// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Application-level use cases (§6 "Public API of the core library"):
//! thin orchestration over the domain's sync codec/merge functions, adding
//! only what those functions must not know about themselves — I/O,
//! `tokio::task::spawn_blocking` offload of the CPU-bound key-strengthening
//! loop (§5), lock-file bookkeeping, and observability.

pub mod use_cases;
