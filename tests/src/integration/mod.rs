//! Cross-crate integration flows.

mod connectivity_flows;
mod registration_flows;
mod runtime_flows;
