pub mod payment;
pub mod payment_data;
pub mod transaction;

pub use payment::{BasePayment, Metadata, PaymentMethod, PaymentStatus};
pub use payment_data::{PaymentData, VirtualAccountData};
pub use transaction::{Transaction, TransactionType};
