//! Utils module providing shared datatypes for r2rmod
//! Includes validated bases, strands, modification codes and types,
//! alignment states and ascending coordinate lists.

pub mod allowed_agctn;
pub mod ascending;
pub mod mod_char;
pub mod mod_strand;
pub mod mod_type;
pub mod read_state;

// Re-export public utility types and functions to expose the utils API
pub use allowed_agctn::*;
pub use ascending::*;
pub use mod_char::*;
pub use mod_strand::*;
pub use mod_type::*;
pub use read_state::*;
