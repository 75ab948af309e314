#![no_std]
extern crate alloc;

pub mod header;
pub mod prdt;

pub use header::{CommandType, DataDirection, RequestDescriptorHeader, CCI_LIMIT};
pub use prdt::{PrdtEntry, ScatterGatherTable, PRDT_ENTRY_SIZE};
