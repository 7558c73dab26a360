pub mod commands;
pub mod shims;
pub mod trace_init;
