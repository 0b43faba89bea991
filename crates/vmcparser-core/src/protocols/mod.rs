//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: wire constants and tables (source of truth)
//! - `reader`: bounds-checked byte access and protocol conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! `osc` is the generic transport encoding; `vmc` decodes the VMC message
//! catalogue carried inside OSC messages. Both are pure and perform no I/O.

pub mod osc;
pub mod vmc;
