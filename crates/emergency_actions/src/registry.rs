use alloy_primitives::Address;
use safe_multisig::Call;
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::{
    action::{ActionKind, EmergencyAction},
    error::Result,
    schema::Field,
};

/// One row of the registry as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    #[serde(rename = "type")]
    pub tag: &'static str,
    pub fields: &'static [Field],
}

/// The closed set of emergency actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionRegistry;

impl ActionRegistry {
    pub fn kinds(&self) -> Vec<ActionSpec> {
        ActionKind::iter()
            .map(|kind| ActionSpec { tag: kind.into(), fields: kind.schema() })
            .collect()
    }

    pub fn validate(&self, tag: &str, params: &Value) -> Result<EmergencyAction> {
        EmergencyAction::validate(tag, params)
    }

    /// Validates and lowers in one go, in input order.
    pub fn lower_all<'a>(
        &self,
        actions: impl IntoIterator<Item = (&'a str, &'a Value)>,
        market_configurator: Address,
    ) -> Result<Vec<Call>> {
        actions
            .into_iter()
            .map(|(tag, params)| Ok(self.validate(tag, params)?.lower(market_configurator)))
            .collect()
    }
}
