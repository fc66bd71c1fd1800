//! Postal code (CEP) address lookup.
//!
//! The user form can prefill its address from an 8-digit CEP through any
//! [`AddressLookup`]. Bookfy ships no network implementation; clients plug in
//! their own. A failed lookup never blocks the form: the address is cleared
//! and the user can type it by hand.
//!
//! Nothing in the crate calls [`UserForm::apply_address_lookup`] yet; it is
//! the hook for clients that own a lookup.

use crate::forms::UserForm;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} - {}",
            self.street, self.district, self.city, self.state
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressLookupError {
    /// The service answered but knows no such code.
    #[error("postal code not found")]
    NotFound,
    /// The service could not be reached or answered garbage.
    #[error("address lookup unavailable: {0}")]
    Unavailable(String),
}

pub trait AddressLookup {
    /// `cep` is always 8 ASCII digits.
    fn lookup(&self, cep: &str) -> Result<Address, AddressLookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressFill {
    Filled,
    /// CEP incomplete; nothing was looked up.
    Skipped,
    /// Lookup failed; the address field was cleared. Carries the alert text.
    Failed(String),
}

impl UserForm {
    pub fn apply_address_lookup(&mut self, lookup: &impl AddressLookup) -> AddressFill {
        let Some(cep) = self.cep_digits() else {
            return AddressFill::Skipped;
        };
        match lookup.lookup(&cep) {
            Ok(address) => {
                self.address = address.to_string();
                AddressFill::Filled
            }
            Err(e) => {
                tracing::warn!(cep = %cep, error = %e, "address lookup failed");
                self.address.clear();
                AddressFill::Failed(format!("Could not find an address for CEP {}: {}", cep, e))
            }
        }
    }
}
