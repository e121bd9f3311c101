//! Checkout commands.

use std::error::Error;
use std::fmt::Write as _;

use chrono::Utc;
use clap::{Args, ValueEnum};
use menu_cart_core::order::{CheckoutForm, CustomerInfo, DeliveryAddress, PaymentMethod};

use super::Session;

/// Payment method chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentArg {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    MealVoucher,
}

/// Checkout form fields.
#[derive(Debug, Clone, Args)]
pub struct FormArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,

    /// Customer phone
    #[arg(long)]
    pub phone: String,

    /// Street
    #[arg(long)]
    pub street: String,

    /// House or building number
    #[arg(long, default_value = "")]
    pub number: String,

    /// Apartment, block, etc.
    #[arg(long)]
    pub complement: Option<String>,

    #[arg(long)]
    pub neighborhood: String,

    #[arg(long)]
    pub city: String,

    #[arg(long, default_value = "")]
    pub state: String,

    #[arg(long, default_value = "")]
    pub zip_code: String,

    /// Landmark for the courier
    #[arg(long)]
    pub reference: Option<String>,

    /// Payment method
    #[arg(long, value_enum)]
    pub payment: PaymentArg,

    /// Amount the courier should bring change for (cash only)
    #[arg(long)]
    pub change_for: Option<String>,

    /// Notes for the vendor
    #[arg(long)]
    pub notes: Option<String>,

    /// Coupon code to apply to this order
    #[arg(long)]
    pub coupon: Option<String>,
}

impl FormArgs {
    /// The checkout form these arguments describe.
    #[must_use]
    pub fn to_form(&self) -> CheckoutForm {
        let payment_method = match self.payment {
            PaymentArg::Cash => PaymentMethod::Cash {
                change_for: self.change_for.clone(),
            },
            PaymentArg::CreditCard => PaymentMethod::CreditCard,
            PaymentArg::DebitCard => PaymentMethod::DebitCard,
            PaymentArg::Pix => PaymentMethod::Pix,
            PaymentArg::MealVoucher => PaymentMethod::MealVoucher,
        };

        CheckoutForm {
            customer: CustomerInfo {
                name: self.name.clone(),
                phone: self.phone.clone(),
            },
            address: DeliveryAddress {
                street: self.street.clone(),
                number: self.number.clone(),
                complement: self.complement.clone(),
                neighborhood: self.neighborhood.clone(),
                city: self.city.clone(),
                state: self.state.clone(),
                zip_code: self.zip_code.clone(),
                reference: self.reference.clone(),
            },
            payment_method: Some(payment_method),
            notes: self.notes.clone(),
        }
    }
}

/// Prepare the order message and chat link, then clear the cart.
///
/// # Errors
///
/// Returns an error if the coupon, form or cart is rejected, or the vendor
/// contact number cannot be dialed.
pub async fn chat(session: &mut Session, args: &FormArgs) -> Result<String, Box<dyn Error>> {
    session.apply_coupon(args.coupon.as_deref()).await?;

    let vendor = session.catalog.vendor().clone();
    let checkout = session
        .checkout
        .checkout_via_chat(&args.to_form(), &vendor, Utc::now())?;

    let mut out = checkout.message;
    let _ = write!(out, "\n\nOpen to send:\n{}", checkout.link);
    Ok(out)
}

/// Submit the order to the hosted backend.
///
/// # Errors
///
/// Returns an error if no backend is configured, the coupon, form or cart is
/// rejected, or the backend refuses the order.
pub async fn submit(session: &mut Session, args: &FormArgs) -> Result<String, Box<dyn Error>> {
    let backend = session.backend()?;
    session.apply_coupon(args.coupon.as_deref()).await?;

    let submitted = session
        .checkout
        .checkout_via_backend(&backend, &args.to_form(), Utc::now())
        .await?;

    let currency = session.config.currency();
    Ok(format!(
        "Order {} placed\nTracking code: {}\nTotal: {}\nRecord: {}",
        submitted.order.order_number,
        submitted.order.tracking_code,
        currency.format(submitted.order.total_amount),
        submitted.record.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(payment: PaymentArg) -> FormArgs {
        FormArgs {
            name: "Maria Silva".to_string(),
            phone: "11 98888-7777".to_string(),
            street: "Rua das Flores".to_string(),
            number: "123".to_string(),
            complement: None,
            neighborhood: "Centro".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
            zip_code: String::new(),
            reference: None,
            payment,
            change_for: Some("100".to_string()),
            notes: None,
            coupon: None,
        }
    }

    #[test]
    fn test_cash_keeps_change_for() {
        let form = args(PaymentArg::Cash).to_form();
        assert_eq!(
            form.payment_method,
            Some(PaymentMethod::Cash {
                change_for: Some("100".to_string())
            })
        );
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_change_for_ignored_for_cards() {
        let form = args(PaymentArg::CreditCard).to_form();
        assert_eq!(form.payment_method, Some(PaymentMethod::CreditCard));
    }
}
