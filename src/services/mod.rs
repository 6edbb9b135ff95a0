pub mod checkout;
pub mod messaging;

pub use checkout::{CheckoutService, CheckoutView, DeliverySelection, StartCheckoutRequest};
pub use messaging::{MessagingService, SendMessageRequest, VendorMessage};
