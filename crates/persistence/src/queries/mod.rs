// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `catalog`: Clients, staff and procedures
//! - `cases`: Cases, items, payments, commissions and the loaded `CaseState`
//! - `installments`: Installment schedules
//! - `events`: The per-case audit trail
//! - `reports`: Cross-case reports

pub mod cases;
pub mod catalog;
pub mod events;
pub mod installments;
pub mod reports;
