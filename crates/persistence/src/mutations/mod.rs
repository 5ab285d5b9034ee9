// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL; the only backend-specific helper is
//! `get_last_insert_rowid()` from the `backend` module.
//!
//! ## Module Organization
//!
//! - `catalog`: Seeding clients, staff and procedures
//! - `cases`: Case rows and the per-outcome row changes of a command
//! - `events`: The per-case audit trail
//! - `installments`: Installment schedules and settlement
//!
//! None of these functions open a transaction; the `Persistence` adapter
//! wraps every command in one.

pub mod cases;
pub mod catalog;
pub mod events;
pub mod installments;
