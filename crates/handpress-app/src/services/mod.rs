// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — the conversion pipeline driven by the CLI.

pub mod pipeline;

pub use pipeline::{Pipeline, RunSummary};
