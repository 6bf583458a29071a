use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use safe_multisig::Call;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    contracts::{
        ICreditConfigure, ILossPolicyConfigure, IMarketConfigurator, IMultiPause, IPoolConfigure,
        IPriceOracleConfigure,
    },
    error::{ActionError, Result},
    schema::{field, Field, FieldReader, FieldType},
};

const POOL: Field = field("pool", FieldType::Address);
const CREDIT_MANAGER: Field = field("creditManager", FieldType::Address);
const TOKEN: Field = field("token", FieldType::Address);
const ADAPTER: Field = field("adapter", FieldType::Address);
const PRICE_FEED: Field = field("priceFeed", FieldType::Address);
const MULTIPAUSE: Field = field("multipause", FieldType::Address);
const MODE: Field = field("mode", FieldType::Uint8);
const ENABLED: Field = field("enabled", FieldType::Bool);

/// Tag of every emergency action, in its kebab-case wire form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ActionKind {
    PoolPause,
    PoolZeroCreditManagerDebtLimit,
    PoolSetTokenLimitZero,
    CreditSuitePause,
    CreditSuiteForbidBorrowing,
    CreditSuiteForbidToken,
    CreditSuiteForbidAdapter,
    PriceOracleSetPriceFeed,
    LossPolicySetAccessMode,
    LossPolicySetChecksEnabled,
    GlobalPause,
    MarketPause,
}

impl ActionKind {
    pub fn schema(self) -> &'static [Field] {
        match self {
            Self::PoolPause => &[POOL],
            Self::PoolZeroCreditManagerDebtLimit => &[POOL, CREDIT_MANAGER],
            Self::PoolSetTokenLimitZero => &[POOL, TOKEN],
            Self::CreditSuitePause | Self::CreditSuiteForbidBorrowing => &[CREDIT_MANAGER],
            Self::CreditSuiteForbidToken => &[CREDIT_MANAGER, TOKEN],
            Self::CreditSuiteForbidAdapter => &[CREDIT_MANAGER, ADAPTER],
            Self::PriceOracleSetPriceFeed => &[POOL, TOKEN, PRICE_FEED],
            Self::LossPolicySetAccessMode => &[POOL, MODE],
            Self::LossPolicySetChecksEnabled => &[POOL, ENABLED],
            Self::GlobalPause => &[MULTIPAUSE],
            Self::MarketPause => &[MULTIPAUSE, POOL],
        }
    }
}

/// The `{ "type", "params" }` document an action is read from, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAction {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    params: Value,
}

impl TryFrom<RawAction> for EmergencyAction {
    type Error = ActionError;

    fn try_from(raw: RawAction) -> Result<Self> {
        Self::validate(&raw.tag, &raw.params)
    }
}

/// A validated emergency intent. Only [`EmergencyAction::validate`] builds one from raw input,
/// deserialization included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case", try_from = "RawAction")]
pub enum EmergencyAction {
    #[serde(rename_all = "camelCase")]
    PoolPause { pool: Address },
    #[serde(rename_all = "camelCase")]
    PoolZeroCreditManagerDebtLimit { pool: Address, credit_manager: Address },
    #[serde(rename_all = "camelCase")]
    PoolSetTokenLimitZero { pool: Address, token: Address },
    #[serde(rename_all = "camelCase")]
    CreditSuitePause { credit_manager: Address },
    #[serde(rename_all = "camelCase")]
    CreditSuiteForbidBorrowing { credit_manager: Address },
    #[serde(rename_all = "camelCase")]
    CreditSuiteForbidToken { credit_manager: Address, token: Address },
    #[serde(rename_all = "camelCase")]
    CreditSuiteForbidAdapter { credit_manager: Address, adapter: Address },
    #[serde(rename_all = "camelCase")]
    PriceOracleSetPriceFeed { pool: Address, token: Address, price_feed: Address },
    #[serde(rename_all = "camelCase")]
    LossPolicySetAccessMode { pool: Address, mode: u8 },
    #[serde(rename_all = "camelCase")]
    LossPolicySetChecksEnabled { pool: Address, enabled: bool },
    #[serde(rename_all = "camelCase")]
    GlobalPause { multipause: Address },
    #[serde(rename_all = "camelCase")]
    MarketPause { multipause: Address, pool: Address },
}

impl EmergencyAction {
    /// Checks `params` against the schema of `tag` and builds the typed action.
    pub fn validate(tag: &str, params: &Value) -> Result<Self> {
        let kind: ActionKind =
            tag.parse().map_err(|_| ActionError::UnknownAction(tag.to_string()))?;
        let p = FieldReader::new(params, kind.schema())?;

        let action = match kind {
            ActionKind::PoolPause => Self::PoolPause { pool: p.address("pool")? },
            ActionKind::PoolZeroCreditManagerDebtLimit => Self::PoolZeroCreditManagerDebtLimit {
                pool: p.address("pool")?,
                credit_manager: p.address("creditManager")?,
            },
            ActionKind::PoolSetTokenLimitZero => {
                Self::PoolSetTokenLimitZero { pool: p.address("pool")?, token: p.address("token")? }
            }
            ActionKind::CreditSuitePause => {
                Self::CreditSuitePause { credit_manager: p.address("creditManager")? }
            }
            ActionKind::CreditSuiteForbidBorrowing => {
                Self::CreditSuiteForbidBorrowing { credit_manager: p.address("creditManager")? }
            }
            ActionKind::CreditSuiteForbidToken => Self::CreditSuiteForbidToken {
                credit_manager: p.address("creditManager")?,
                token: p.address("token")?,
            },
            ActionKind::CreditSuiteForbidAdapter => Self::CreditSuiteForbidAdapter {
                credit_manager: p.address("creditManager")?,
                adapter: p.address("adapter")?,
            },
            ActionKind::PriceOracleSetPriceFeed => Self::PriceOracleSetPriceFeed {
                pool: p.address("pool")?,
                token: p.address("token")?,
                price_feed: p.address("priceFeed")?,
            },
            ActionKind::LossPolicySetAccessMode => {
                Self::LossPolicySetAccessMode { pool: p.address("pool")?, mode: p.uint8("mode")? }
            }
            ActionKind::LossPolicySetChecksEnabled => {
                let (pool, enabled) = (p.address("pool")?, p.bool("enabled")?);
                Self::LossPolicySetChecksEnabled { pool, enabled }
            }
            ActionKind::GlobalPause => Self::GlobalPause { multipause: p.address("multipause")? },
            ActionKind::MarketPause => {
                Self::MarketPause { multipause: p.address("multipause")?, pool: p.address("pool")? }
            }
        };

        Ok(action)
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::PoolPause { .. } => ActionKind::PoolPause,
            Self::PoolZeroCreditManagerDebtLimit { .. } => {
                ActionKind::PoolZeroCreditManagerDebtLimit
            }
            Self::PoolSetTokenLimitZero { .. } => ActionKind::PoolSetTokenLimitZero,
            Self::CreditSuitePause { .. } => ActionKind::CreditSuitePause,
            Self::CreditSuiteForbidBorrowing { .. } => ActionKind::CreditSuiteForbidBorrowing,
            Self::CreditSuiteForbidToken { .. } => ActionKind::CreditSuiteForbidToken,
            Self::CreditSuiteForbidAdapter { .. } => ActionKind::CreditSuiteForbidAdapter,
            Self::PriceOracleSetPriceFeed { .. } => ActionKind::PriceOracleSetPriceFeed,
            Self::LossPolicySetAccessMode { .. } => ActionKind::LossPolicySetAccessMode,
            Self::LossPolicySetChecksEnabled { .. } => ActionKind::LossPolicySetChecksEnabled,
            Self::GlobalPause { .. } => ActionKind::GlobalPause,
            Self::MarketPause { .. } => ActionKind::MarketPause,
        }
    }

    /// The call that carries out this action.
    ///
    /// Market-scoped actions go through `market_configurator`, which forwards the inner
    /// calldata to the pool, credit suite, price oracle or loss policy. Pauses go straight to
    /// the multipause contract.
    pub fn lower(&self, market_configurator: Address) -> Call {
        let configure = |data: Vec<u8>| Call::new(market_configurator, U256::ZERO, data);

        match *self {
            Self::PoolPause { pool } => {
                configure(pool_call(pool, IPoolConfigure::pauseCall {}.abi_encode()))
            }
            Self::PoolZeroCreditManagerDebtLimit { pool, credit_manager } => {
                let inner = IPoolConfigure::setCreditManagerDebtLimitToZeroCall {
                    creditManager: credit_manager,
                };
                configure(pool_call(pool, inner.abi_encode()))
            }
            Self::PoolSetTokenLimitZero { pool, token } => {
                let inner = IPoolConfigure::setTokenLimitToZeroCall { token };
                configure(pool_call(pool, inner.abi_encode()))
            }
            Self::CreditSuitePause { credit_manager } => {
                configure(credit_call(credit_manager, ICreditConfigure::pauseCall {}.abi_encode()))
            }
            Self::CreditSuiteForbidBorrowing { credit_manager } => {
                let inner = ICreditConfigure::forbidBorrowingCall {};
                configure(credit_call(credit_manager, inner.abi_encode()))
            }
            Self::CreditSuiteForbidToken { credit_manager, token } => {
                let inner = ICreditConfigure::forbidTokenCall { token };
                configure(credit_call(credit_manager, inner.abi_encode()))
            }
            Self::CreditSuiteForbidAdapter { credit_manager, adapter } => {
                let inner = ICreditConfigure::forbidAdapterCall { adapter };
                configure(credit_call(credit_manager, inner.abi_encode()))
            }
            Self::PriceOracleSetPriceFeed { pool, token, price_feed } => {
                let inner =
                    IPriceOracleConfigure::setPriceFeedCall { token, priceFeed: price_feed };
                let outer = IMarketConfigurator::emergencyConfigurePriceOracleCall {
                    pool,
                    data: inner.abi_encode().into(),
                };
                configure(outer.abi_encode())
            }
            Self::LossPolicySetAccessMode { pool, mode } => {
                let inner = ILossPolicyConfigure::setAccessModeCall { mode };
                configure(loss_policy_call(pool, inner.abi_encode()))
            }
            Self::LossPolicySetChecksEnabled { pool, enabled } => {
                let inner = ILossPolicyConfigure::setChecksEnabledCall { enabled };
                configure(loss_policy_call(pool, inner.abi_encode()))
            }
            Self::GlobalPause { multipause } => {
                let data = IMultiPause::pauseAllContractsCall {}.abi_encode();
                Call::new(multipause, U256::ZERO, data)
            }
            Self::MarketPause { multipause, pool } => {
                let data = IMultiPause::pauseMarketCall { pool }.abi_encode();
                Call::new(multipause, U256::ZERO, data)
            }
        }
    }

    /// One-line summary for operators.
    pub fn describe(&self) -> String {
        match self {
            Self::PoolPause { pool } => format!("Pause pool {pool}"),
            Self::PoolZeroCreditManagerDebtLimit { pool, credit_manager } => {
                format!("Set debt limit of credit manager {credit_manager} to zero in pool {pool}")
            }
            Self::PoolSetTokenLimitZero { pool, token } => {
                format!("Set quota limit of token {token} to zero in pool {pool}")
            }
            Self::CreditSuitePause { credit_manager } => {
                format!("Pause credit suite {credit_manager}")
            }
            Self::CreditSuiteForbidBorrowing { credit_manager } => {
                format!("Forbid borrowing in credit suite {credit_manager}")
            }
            Self::CreditSuiteForbidToken { credit_manager, token } => {
                format!("Forbid token {token} in credit suite {credit_manager}")
            }
            Self::CreditSuiteForbidAdapter { credit_manager, adapter } => {
                format!("Forbid adapter {adapter} in credit suite {credit_manager}")
            }
            Self::PriceOracleSetPriceFeed { pool, token, price_feed } => {
                format!(
                    "Set price feed of token {token} to {price_feed} in the price oracle of pool \
                     {pool}"
                )
            }
            Self::LossPolicySetAccessMode { pool, mode } => {
                format!("Set loss policy access mode of pool {pool} to {mode}")
            }
            Self::LossPolicySetChecksEnabled { pool, enabled } => {
                let verb = if *enabled { "Enable" } else { "Disable" };
                format!("{verb} loss policy checks of pool {pool}")
            }
            Self::GlobalPause { multipause } => format!("Pause every market through {multipause}"),
            Self::MarketPause { multipause, pool } => {
                format!("Pause market of pool {pool} through {multipause}")
            }
        }
    }
}

fn pool_call(pool: Address, inner: Vec<u8>) -> Vec<u8> {
    IMarketConfigurator::emergencyConfigurePoolCall { pool, data: Bytes::from(inner) }.abi_encode()
}

fn credit_call(credit_manager: Address, inner: Vec<u8>) -> Vec<u8> {
    IMarketConfigurator::emergencyConfigureCreditSuiteCall {
        creditManager: credit_manager,
        data: Bytes::from(inner),
    }
    .abi_encode()
}

fn loss_policy_call(pool: Address, inner: Vec<u8>) -> Vec<u8> {
    IMarketConfigurator::emergencyConfigureLossPolicyCall { pool, data: Bytes::from(inner) }
        .abi_encode()
}
