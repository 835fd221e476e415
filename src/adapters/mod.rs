// Adapters layer: concrete command channels for external systems.

pub mod adb;
