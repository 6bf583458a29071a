use alloy_primitives::Address;
use serde::Serialize;
use serde_json::{Map, Value};

use std::{fmt, str::FromStr};

use crate::error::{ActionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Checksummed or lowercase hex, never the zero address.
    Address,
    Uint8,
    Bool,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Address => "address",
            Self::Uint8 => "uint8",
            Self::Bool => "bool",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

pub(crate) const fn field(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty }
}

/// Reads typed values out of raw parameters, naming the field on every failure.
pub(crate) struct FieldReader<'a> {
    params: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    /// Fails on the first parameter that `schema` does not declare.
    pub(crate) fn new(params: &'a Value, schema: &[Field]) -> Result<Self> {
        let params = params.as_object().ok_or(ActionError::NotAnObject)?;

        let declared = |key: &&String| schema.iter().any(|f| f.name == key.as_str());
        if let Some(unknown) = params.keys().find(|key| !declared(key)) {
            return Err(ActionError::field(unknown, "unexpected field"));
        }

        Ok(Self { params })
    }

    fn get(&self, name: &str) -> Result<&'a Value> {
        self.params.get(name).ok_or_else(|| ActionError::field(name, "missing"))
    }

    pub(crate) fn address(&self, name: &str) -> Result<Address> {
        let raw = self
            .get(name)?
            .as_str()
            .ok_or_else(|| ActionError::field(name, "expected an address string"))?;
        let address = Address::from_str(raw).map_err(|e| ActionError::field(name, e.to_string()))?;

        if address.is_zero() {
            return Err(ActionError::field(name, "zero address"));
        }
        Ok(address)
    }

    pub(crate) fn uint8(&self, name: &str) -> Result<u8> {
        let value = self.get(name)?;
        let number = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse::<u64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ActionError::field(name, "expected an unsigned integer"))?;

        u8::try_from(number)
            .map_err(|_| ActionError::field(name, format!("{number} does not fit in uint8")))
    }

    pub(crate) fn bool(&self, name: &str) -> Result<bool> {
        self.get(name)?.as_bool().ok_or_else(|| ActionError::field(name, "expected true or false"))
    }
}
