//! The update cycle: revision bookkeeping, endpoint access, package
//! extraction, and the check/apply orchestration.

pub mod cycle;
pub mod fetch;
pub mod revision;
pub mod unpack;
