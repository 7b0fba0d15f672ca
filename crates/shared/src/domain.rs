use serde::{Deserialize, Serialize};

/// Which snack bundle the student is paying for. The rosemilk add-on is the
/// default because most bookings take it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductSelection {
    Standard,
    #[default]
    WithRosemilk,
}

impl ProductSelection {
    pub fn from_rosemilk(selected: bool) -> Self {
        if selected {
            Self::WithRosemilk
        } else {
            Self::Standard
        }
    }

    pub fn has_rosemilk(self) -> bool {
        matches!(self, Self::WithRosemilk)
    }
}

/// Rupee prices for the two bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub standard: u32,
    pub with_rosemilk: u32,
}

impl PriceTable {
    pub fn amount_for(&self, selection: ProductSelection) -> u32 {
        match selection {
            ProductSelection::Standard => self.standard,
            ProductSelection::WithRosemilk => self.with_rosemilk,
        }
    }
}

/// A payment recipient: display name plus UPI virtual payment address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    pub name: String,
    pub vpa: String,
}

/// The free-text fields of the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFields {
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub utr: String,
}
