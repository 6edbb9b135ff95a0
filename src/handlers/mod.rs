pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod vendor;
