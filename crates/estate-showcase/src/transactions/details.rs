use serde::Serialize;

use crate::listings::currency::group_thousands;
use crate::listings::Property;

pub const MOCK_ETH_PRICE_USD: f64 = 3500.0;
/// Share of the listing price sent as the simulated deposit.
pub const DEPOSIT_SHARE: f64 = 0.0001;
pub const BASE_GAS: u64 = 21_000;

/// Display fields for the simulated purchase confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDetails {
    pub to: String,
    pub value: String,
    pub gas: String,
}

impl TransactionDetails {
    pub fn for_property(property: &Property) -> Self {
        let contract = u64::from(property.id.0) * 1337;
        let eth_value = property.price as f64 * DEPOSIT_SHARE / MOCK_ETH_PRICE_USD;
        let gas = BASE_GAS + property.price / 100_000;

        Self {
            to: format!(
                "0x{contract:04x}... (Property {} Contract)",
                property.id
            ),
            value: format!("{eth_value:.4} Sepolia ETH"),
            gas: group_thousands(gas, ','),
        }
    }
}
