pub mod alignment_set;
pub mod alignment_utility;
pub mod block;
pub mod block_multiple_alignment;
pub mod config;
pub mod coordinates;
pub mod error;
mod io;
pub mod master_slave;
pub mod pssm;
pub mod record;
pub mod sequence;
