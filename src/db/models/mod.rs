pub mod allowlist;
