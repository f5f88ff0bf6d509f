pub mod services;

pub use services::{
    BaseProvider, Capability, CoreApi, InvoiceApi, MidtransClients, MidtransHttpClient,
    MidtransProvider, PaymentProvider, PaymentRequestApi, ProviderConstructor, ProviderCore,
    ProviderRegistry, SnapApi, SnapTransaction, VendorClient, XenditClients, XenditHttpClient,
    XenditProvider,
};
