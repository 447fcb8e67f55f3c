//! HTTP middleware built from settings.

pub mod cors;
