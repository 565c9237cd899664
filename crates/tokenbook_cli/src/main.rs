//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tokenbook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("tokenbook_core ping={}", tokenbook_core::ping());
    println!("tokenbook_core version={}", tokenbook_core::core_version());
}
