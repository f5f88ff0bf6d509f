pub mod unipay_service;

pub use unipay_service::Unipay;
