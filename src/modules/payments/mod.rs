pub mod models;

pub use models::{
    BasePayment, Metadata, PaymentData, PaymentMethod, PaymentStatus, Transaction,
    TransactionType, VirtualAccountData,
};
