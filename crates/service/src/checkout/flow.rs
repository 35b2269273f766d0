use std::fmt;

use models::{CardType, DeliveryAddress, OrderReceipt};
use serde::Serialize;

use crate::cart::CartState;
use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Review,
    Delivery,
    Payment,
    Placed,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckoutStep::Review => "review",
            CheckoutStep::Delivery => "delivery",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Placed => "placed",
        };
        f.write_str(s)
    }
}

/// Everything needed to submit an order besides the cart itself.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutDraft {
    pub address: DeliveryAddress,
    pub card_type: CardType,
}

/// Review → Delivery → Payment → Placed. Each forward step validates its input.
#[derive(Clone, Debug)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    address: Option<DeliveryAddress>,
    card_type: Option<CardType>,
    receipt: Option<OrderReceipt>,
}

impl Default for CheckoutFlow {
    fn default() -> Self { Self::new() }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self { step: CheckoutStep::Review, address: None, card_type: None, receipt: None }
    }

    pub fn step(&self) -> CheckoutStep { self.step }

    pub fn receipt(&self) -> Option<&OrderReceipt> { self.receipt.as_ref() }

    fn expect_step(&self, expected: CheckoutStep) -> Result<(), ServiceError> {
        if self.step != expected {
            return Err(ServiceError::Validation(format!(
                "checkout is at the {} step, expected {}",
                self.step, expected
            )));
        }
        Ok(())
    }

    pub fn confirm_items(&mut self, cart: &CartState) -> Result<(), ServiceError> {
        self.expect_step(CheckoutStep::Review)?;
        if cart.is_empty() {
            return Err(ServiceError::Validation("cart is empty".into()));
        }
        self.step = CheckoutStep::Delivery;
        Ok(())
    }

    pub fn set_address(&mut self, address: DeliveryAddress) -> Result<(), ServiceError> {
        self.expect_step(CheckoutStep::Delivery)?;
        address.validate()?;
        self.address = Some(address);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    pub fn choose_payment(&mut self, card_type: CardType) -> Result<CheckoutDraft, ServiceError> {
        self.expect_step(CheckoutStep::Payment)?;
        self.card_type = Some(card_type);
        self.draft().ok_or_else(|| ServiceError::Validation("delivery address missing".into()))
    }

    /// Ready to submit once both address and card type are chosen.
    pub fn draft(&self) -> Option<CheckoutDraft> {
        match (&self.address, self.card_type) {
            (Some(address), Some(card_type)) if self.step == CheckoutStep::Payment => {
                Some(CheckoutDraft { address: address.clone(), card_type })
            }
            _ => None,
        }
    }

    pub(crate) fn mark_placed(&mut self, receipt: OrderReceipt) {
        self.receipt = Some(receipt);
        self.step = CheckoutStep::Placed;
    }

    /// Step back one page; entered data is kept. No-op once placed.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Review | CheckoutStep::Delivery => CheckoutStep::Review,
            CheckoutStep::Payment => CheckoutStep::Delivery,
            CheckoutStep::Placed => CheckoutStep::Placed,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{reduce, CartAction};
    use models::ProductDescriptor;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            full_name: "Muhammad".into(),
            street: "House #12, Street 45".into(),
            city: "Islamabad".into(),
            postal_code: "44000".into(),
            country: "Pakistan".into(),
            phone: "+92 300 1234567".into(),
        }
    }

    fn one_line_cart() -> CartState {
        let product = ProductDescriptor::new("p1", "Oil", 1450.0, 5);
        reduce(&CartState::new(), CartAction::Add { product, quantity: 1 }).0
    }

    #[test]
    fn walks_all_steps_to_a_draft() -> Result<(), anyhow::Error> {
        let mut flow = CheckoutFlow::new();
        flow.confirm_items(&one_line_cart())?;
        assert_eq!(flow.step(), CheckoutStep::Delivery);
        flow.set_address(address())?;
        assert_eq!(flow.step(), CheckoutStep::Payment);
        let draft = flow.choose_payment(CardType::Mastercard)?;
        assert_eq!(draft.card_type, CardType::Mastercard);
        assert_eq!(draft.address.city, "Islamabad");
        Ok(())
    }

    #[test]
    fn empty_cart_cannot_start() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.confirm_items(&CartState::new()).is_err());
        assert_eq!(flow.step(), CheckoutStep::Review);
    }

    #[test]
    fn invalid_address_keeps_delivery_step() -> Result<(), anyhow::Error> {
        let mut flow = CheckoutFlow::new();
        flow.confirm_items(&one_line_cart())?;
        let err = flow.set_address(DeliveryAddress { phone: String::new(), ..address() });
        assert!(matches!(err, Err(ServiceError::Model(_))));
        assert_eq!(flow.step(), CheckoutStep::Delivery);
        Ok(())
    }

    #[test]
    fn out_of_order_step_is_rejected() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.set_address(address()).is_err());
        assert!(flow.choose_payment(CardType::Visa).is_err());
    }

    #[test]
    fn back_keeps_entered_address() -> Result<(), anyhow::Error> {
        let mut flow = CheckoutFlow::new();
        flow.confirm_items(&one_line_cart())?;
        flow.set_address(address())?;
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Delivery);
        assert!(flow.draft().is_none());
        flow.set_address(address())?;
        assert!(flow.choose_payment(CardType::Amex).is_ok());
        Ok(())
    }
}
