pub mod services;

pub use services::Unipay;
