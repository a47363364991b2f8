//! Decrement (service) table construction

mod table;

pub use table::{
    build_decrement_table, build_from_rates, DecrementAdjustment, DecrementTable, DecrementTableEntry, RADIX,
};
