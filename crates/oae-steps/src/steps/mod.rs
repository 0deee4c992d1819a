//! Step logic, one module per concern.
//!
//! Each function acts as the identity the phrase names, issues its
//! requests, and checks the statuses. A mismatch is logged and returned
//! as an error; identity switches are scoped and undone on every path
//! unless the step documents otherwise.

pub mod activity;
pub mod administration;
pub mod documents;
pub mod groups;
pub mod registration;
pub mod search;
