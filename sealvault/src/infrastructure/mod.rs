// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Everything that touches the outside world or a third-party crate: the
//! whole-file codec (§4), settings, the local-filesystem I/O adapter and
//! lock file (§6), and operation observability (§1 `[AMBIENT]`).

pub mod codec;
pub mod config;
pub mod io;
pub mod observability;
