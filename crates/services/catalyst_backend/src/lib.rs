// --- File: crates/services/catalyst_backend/src/lib.rs ---
pub mod app;
