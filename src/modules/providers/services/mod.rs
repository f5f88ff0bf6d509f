pub mod base_provider;
pub mod midtrans;
pub mod normalize;
pub mod provider_trait;
pub mod registry;
pub mod xendit;

pub use base_provider::{BaseProvider, ProviderCore};
pub use midtrans::{
    CoreApi, MidtransClients, MidtransHttpClient, MidtransProvider, SnapApi, SnapTransaction,
};
pub use provider_trait::{Capability, PaymentProvider, VendorClient};
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use xendit::{InvoiceApi, PaymentRequestApi, XenditClients, XenditHttpClient, XenditProvider};
