//! Staff Onboard — multi-step onboarding wizard core.

pub mod config;
pub mod error;
pub mod sessions;
pub mod submit;
pub mod wizard;
