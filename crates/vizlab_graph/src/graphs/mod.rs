// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bundled graphs used by demos and tests.

pub mod undirected;
