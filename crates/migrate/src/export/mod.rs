//! Export converted items for import by other software.

pub mod bitwarden;
