pub mod events;
pub mod ledger;
pub mod packages;
pub mod partners;
pub mod payments;
pub mod spins;
pub mod users;
