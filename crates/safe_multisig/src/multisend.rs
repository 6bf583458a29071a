//! Packing and unpacking of MultiSend relay payloads.
//!
//! Every call is encoded as
//! `operation (1) | to (20) | value (32, big-endian) | data length (32, big-endian) | data`
//! and the segments are concatenated without padding. The result is the single `bytes`
//! argument of `multiSend(bytes)`.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{
    contracts::IMultiSend,
    error::{Result, SafeError},
    transaction_data::{Call, OperationType},
};

const OPERATION_LEN: usize = 1;
const ADDRESS_LEN: usize = 20;
const WORD_LEN: usize = 32;
const HEADER_LEN: usize = OPERATION_LEN + ADDRESS_LEN + WORD_LEN + WORD_LEN;

/// Packs `calls` into one segment per call, without the `multiSend` wrapper.
pub fn pack(calls: &[Call]) -> Vec<u8> {
    let capacity = calls.iter().map(|call| HEADER_LEN + call.data.len()).sum();
    let mut packed = Vec::with_capacity(capacity);

    for call in calls {
        packed.push(OperationType::Call.as_u8());
        packed.extend_from_slice(call.to.as_slice());
        packed.extend_from_slice(&call.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(call.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&call.data);
    }

    packed
}

/// Packs `calls` and wraps them as `multiSend(bytes)` calldata.
pub fn encode(calls: &[Call]) -> Bytes {
    IMultiSend::multiSendCall { transactions: pack(calls).into() }.abi_encode().into()
}

/// Strips the `multiSend(bytes)` wrapper and unpacks the calls.
pub fn decode(payload: &[u8]) -> Result<Vec<Call>> {
    let call = IMultiSend::multiSendCall::abi_decode(payload, true)
        .map_err(|e| SafeError::MalformedMultisend(format!("invalid multiSend calldata: {e}")))?;

    unpack(&call.transactions)
}

/// Unpacks a bare concatenation of segments.
///
/// Rejects any entry whose operation is not a plain call.
pub fn unpack(mut buf: &[u8]) -> Result<Vec<Call>> {
    let mut calls = Vec::new();

    while !buf.is_empty() {
        let offset = calls.len();
        if buf.len() < HEADER_LEN {
            return Err(SafeError::MalformedMultisend(format!(
                "call {offset}: truncated header, {} bytes left",
                buf.len()
            )));
        }

        let (header, rest) = buf.split_at(HEADER_LEN);
        let operation = header[0];
        if operation != OperationType::Call.as_u8() {
            return Err(SafeError::UnsupportedOperation(operation));
        }

        let to = Address::from_slice(&header[OPERATION_LEN..OPERATION_LEN + ADDRESS_LEN]);
        let value =
            U256::from_be_slice(&header[OPERATION_LEN + ADDRESS_LEN..HEADER_LEN - WORD_LEN]);
        let length = U256::from_be_slice(&header[HEADER_LEN - WORD_LEN..]);

        let length = usize::try_from(length)
            .ok()
            .filter(|length| *length <= rest.len())
            .ok_or_else(|| {
                SafeError::MalformedMultisend(format!(
                    "call {offset}: data length {length} exceeds the {} remaining bytes",
                    rest.len()
                ))
            })?;

        let (data, tail) = rest.split_at(length);
        calls.push(Call::new(to, value, Bytes::copy_from_slice(data)));
        buf = tail;
    }

    Ok(calls)
}
