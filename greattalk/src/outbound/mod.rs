//! Outbound adapters binding the domain ports.

pub mod memory;

pub use memory::MemoryRepository;
