#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level state for Balanced Zones: the grid layout laid over the play area and
//! the ledger of zones committed to it.

mod layout;
mod ledger;

pub use layout::GridLayout;
pub use ledger::Ledger;
