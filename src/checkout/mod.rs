//! Cart, coupon and checkout-wizard rules.

pub mod cart;
pub mod coupon;
pub mod order;
pub mod quote;
pub mod session;

pub use cart::{Cart, CartError, CartLine};
pub use coupon::{evaluate_coupon, AppliedCoupon, CouponError};
pub use order::Order;
pub use quote::{quote_cart, CartQuote, CartQuoteRequest};
pub use session::{
    CheckoutError, CheckoutSession, CheckoutStep, CheckoutTotals, DeliveryAddress, PaymentMethod,
    PaymentSelection,
};
