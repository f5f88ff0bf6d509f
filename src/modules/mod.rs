pub mod payments;
pub mod providers;
pub mod unipay;
