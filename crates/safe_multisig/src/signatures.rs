//! Approval tracking and signature blob assembly.
//!
//! The wallet contract walks the signature blob expecting strictly ascending owner addresses,
//! so every entry is placed by numeric address order.

use alloy_primitives::{Address, Bytes, Signature, B256};
use itertools::Itertools;
use serde::Serialize;

use std::collections::BTreeMap;

use crate::{
    error::{Result, SafeError},
    transaction_data::WalletParams,
};

pub const SIGNATURE_LEN: usize = 65;

/// Trailing byte of a pre-validated (on-chain approved or sender) signature.
const PRE_VALIDATED_V: u8 = 1;

/// `v` offset the wallet contract uses to tell `eth_sign` signatures apart.
const ETH_SIGN_V_OFFSET: u8 = 4;

/// On-chain approval state of every owner for one hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Approvals {
    pub hash: B256,
    /// Owners in the order the wallet reported them, with their `approvedHashes` flag.
    pub owners: Vec<(Address, bool)>,
}

impl Approvals {
    pub fn approved(&self) -> impl Iterator<Item = Address> + '_ {
        self.owners.iter().filter(|(_, approved)| *approved).map(|(owner, _)| *owner)
    }

    pub fn has_approved(&self, owner: &Address) -> bool {
        self.owners.iter().any(|(o, approved)| o == owner && *approved)
    }

    pub fn count(&self) -> usize {
        self.approved().count()
    }
}

/// A single 65-byte entry of the signature blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureEntry {
    /// `approveHash` was called on-chain, or the owner submits the execution itself.
    PreValidated(Address),
    /// An off-chain ECDSA signature by `signer`, already normalized.
    Ecdsa { signer: Address, signature: [u8; SIGNATURE_LEN] },
}

impl SignatureEntry {
    pub fn signer(&self) -> Address {
        match self {
            Self::PreValidated(signer) | Self::Ecdsa { signer, .. } => *signer,
        }
    }

    /// `12 zero bytes | owner | 32 zero bytes | 0x01` for pre-validated entries.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        match self {
            Self::PreValidated(signer) => {
                let mut entry = [0u8; SIGNATURE_LEN];
                entry[12..32].copy_from_slice(signer.as_slice());
                entry[SIGNATURE_LEN - 1] = PRE_VALIDATED_V;
                entry
            }
            Self::Ecdsa { signature, .. } => *signature,
        }
    }
}

/// The concatenated signatures and how many distinct owners they cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBlob {
    pub bytes: Bytes,
    pub signers: Vec<Address>,
}

impl SignatureBlob {
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

/// Rewrites the recovery byte of an `eth_sign` signature to the wallet's convention.
///
/// `0x00`/`0x1b` become `0x1f` and `0x01`/`0x1c` become `0x20`. Any other value belongs to a
/// different scheme and is left untouched.
pub fn process_own_signature(raw: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
    let mut signature: [u8; SIGNATURE_LEN] = raw.try_into().map_err(|_| {
        SafeError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            raw.len()
        ))
    })?;

    let v = &mut signature[SIGNATURE_LEN - 1];
    *v = match *v {
        0x00 | 0x1b => 0x1b + ETH_SIGN_V_OFFSET,
        0x01 | 0x1c => 0x1c + ETH_SIGN_V_OFFSET,
        other => other,
    };

    Ok(signature)
}

/// Checks that a normalized `eth_sign` signature over `hash` was produced by `signer`.
///
/// Entries of other schemes carry no recoverable key and pass through unchecked.
pub fn verify_own_signature(
    hash: B256,
    signer: Address,
    signature: &[u8; SIGNATURE_LEN],
) -> Result<()> {
    let v = signature[SIGNATURE_LEN - 1];
    if v != 0x1b + ETH_SIGN_V_OFFSET && v != 0x1c + ETH_SIGN_V_OFFSET {
        return Ok(());
    }

    let parity = u64::from(v - ETH_SIGN_V_OFFSET);
    let recovered = Signature::from_bytes_and_parity(&signature[..SIGNATURE_LEN - 1], parity)
        .and_then(|sig| sig.recover_address_from_msg(hash))
        .map_err(|e| SafeError::InvalidSignature(e.to_string()))?;

    if recovered != signer {
        return Err(SafeError::InvalidSignature(format!(
            "signature was produced by {recovered}, not {signer}"
        )));
    }
    Ok(())
}

/// Tracks approvals of one hash against the wallet's owners and threshold.
#[derive(Debug, Clone)]
pub struct SignatureCollector {
    params: WalletParams,
    approvals: Approvals,
}

impl SignatureCollector {
    pub fn new(params: &WalletParams, approvals: Approvals) -> Self {
        Self { params: params.clone(), approvals }
    }

    pub fn threshold(&self) -> u64 {
        self.params.threshold
    }

    pub fn hash(&self) -> B256 {
        self.approvals.hash
    }

    pub fn approvals(&self) -> &Approvals {
        &self.approvals
    }

    /// `true` iff `signer` owns the wallet and has not approved the hash yet.
    pub fn can_approve(&self, signer: &Address) -> bool {
        self.params.is_signer(signer) && !self.approvals.has_approved(signer)
    }

    /// Like [`Self::can_approve`] but says why not.
    pub fn check_can_approve(&self, signer: &Address) -> Result<()> {
        if !self.params.is_signer(signer) {
            return Err(SafeError::NotAnOwner(*signer));
        }
        if self.approvals.has_approved(signer) {
            return Err(SafeError::AlreadyApproved(*signer));
        }
        Ok(())
    }

    pub fn is_threshold_met(&self, approvals: usize) -> bool {
        approvals as u64 >= self.params.threshold
    }

    /// Concatenates one entry per approving owner in ascending address order.
    ///
    /// `executor` is the owner that will send `execTransaction` and counts as pre-validated.
    /// `own_signature` is an `eth_sign` signature by an owner that has not approved on-chain;
    /// it is ignored when that owner is already covered and rejected when another key made it.
    pub fn build_signature_blob(
        &self,
        executor: Option<Address>,
        own_signature: Option<(Address, &[u8])>,
    ) -> Result<SignatureBlob> {
        let mut entries: BTreeMap<Address, SignatureEntry> = self
            .approvals
            .approved()
            .filter(|owner| self.params.is_signer(owner))
            .map(|owner| (owner, SignatureEntry::PreValidated(owner)))
            .collect();

        if let Some(executor) = executor {
            if !self.params.is_signer(&executor) {
                return Err(SafeError::NotAnOwner(executor));
            }
            entries.entry(executor).or_insert(SignatureEntry::PreValidated(executor));
        }

        if let Some((signer, raw)) = own_signature {
            if !self.params.is_signer(&signer) {
                return Err(SafeError::NotAnOwner(signer));
            }
            if !entries.contains_key(&signer) {
                let signature = process_own_signature(raw)?;
                verify_own_signature(self.approvals.hash, signer, &signature)?;
                entries.insert(signer, SignatureEntry::Ecdsa { signer, signature });
            }
        }

        let bytes = entries.values().flat_map(|entry| entry.to_bytes()).collect::<Vec<u8>>();
        let signers = entries.keys().copied().collect_vec();

        Ok(SignatureBlob { bytes: bytes.into(), signers })
    }

    /// Builds the blob and refuses to return it unless it reaches the threshold.
    pub fn build_executable_blob(
        &self,
        executor: Option<Address>,
        own_signature: Option<(Address, &[u8])>,
    ) -> Result<SignatureBlob> {
        let blob = self.build_signature_blob(executor, own_signature)?;
        if !self.is_threshold_met(blob.len()) {
            return Err(SafeError::ThresholdNotMet {
                approvals: blob.len(),
                threshold: self.params.threshold,
            });
        }
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, U256};
    use alloy_signer::Signer;
    use alloy_signer_local::PrivateKeySigner;

    const LOW: Address = address!("1111111111111111111111111111111111111111");
    const MID: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const HIGH: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    const OUTSIDER: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

    fn params(threshold: u64) -> WalletParams {
        WalletParams { threshold, signers: vec![HIGH, LOW, MID], nonce: U256::ZERO }
    }

    fn approvals(approved: &[Address]) -> Approvals {
        Approvals {
            hash: B256::repeat_byte(0x42),
            owners: [HIGH, LOW, MID].iter().map(|o| (*o, approved.contains(o))).collect(),
        }
    }

    fn pre_validated(owner: Address) -> Vec<u8> {
        let mut entry = vec![0u8; 12];
        entry.extend_from_slice(owner.as_slice());
        entry.extend_from_slice(&[0u8; 32]);
        entry.push(1);
        entry
    }

    #[test]
    fn blob_is_sorted_by_address() {
        let collector = SignatureCollector::new(&params(3), approvals(&[HIGH, LOW, MID]));

        let blob = collector.build_signature_blob(None, None).unwrap();

        let expected = [pre_validated(LOW), pre_validated(MID), pre_validated(HIGH)].concat();
        assert_eq!(blob.bytes.as_ref(), expected.as_slice());
        assert_eq!(blob.signers, vec![LOW, MID, HIGH]);
    }

    #[test]
    fn pre_validated_entry_layout() {
        let bytes = SignatureEntry::PreValidated(MID).to_bytes();
        assert_eq!(bytes.len(), SIGNATURE_LEN);
        assert!(bytes[..12].iter().all(|b| *b == 0));
        assert_eq!(&bytes[12..32], MID.as_slice());
        assert!(bytes[32..64].iter().all(|b| *b == 0));
        assert_eq!(bytes[64], 1);
    }

    #[test]
    fn threshold_gating() {
        let collector = SignatureCollector::new(&params(2), approvals(&[HIGH]));

        assert!(!collector.is_threshold_met(1));
        assert!(collector.is_threshold_met(2));

        let err = collector.build_executable_blob(None, None).unwrap_err();
        assert!(matches!(err, SafeError::ThresholdNotMet { approvals: 1, threshold: 2 }));

        let blob = collector.build_executable_blob(Some(LOW), None).unwrap();
        assert_eq!(blob.signers, vec![LOW, HIGH]);
    }

    #[test]
    fn can_approve_only_fresh_owners() {
        let collector = SignatureCollector::new(&params(2), approvals(&[HIGH]));

        assert!(collector.can_approve(&LOW));
        assert!(!collector.can_approve(&HIGH));
        assert!(!collector.can_approve(&OUTSIDER));
        assert!(matches!(collector.check_can_approve(&HIGH), Err(SafeError::AlreadyApproved(_))));
        assert!(matches!(collector.check_can_approve(&OUTSIDER), Err(SafeError::NotAnOwner(_))));
    }

    async fn sign(key: &PrivateKeySigner, hash: B256) -> [u8; SIGNATURE_LEN] {
        key.sign_message(hash.as_slice()).await.unwrap().as_bytes()
    }

    #[tokio::test]
    async fn own_signature_is_normalized_and_placed_in_order() {
        let key = PrivateKeySigner::random();
        let owner = key.address();
        let wallet =
            WalletParams { threshold: 2, signers: vec![HIGH, LOW, owner], nonce: U256::ZERO };
        let approvals = Approvals {
            hash: B256::repeat_byte(0x42),
            owners: vec![(HIGH, true), (LOW, false), (owner, false)],
        };
        let collector = SignatureCollector::new(&wallet, approvals);
        let raw = sign(&key, collector.hash()).await;

        let blob = collector.build_executable_blob(None, Some((owner, &raw))).unwrap();

        let mut expected = vec![owner, HIGH];
        expected.sort();
        assert_eq!(blob.signers, expected);

        let at = blob.signers.iter().position(|s| *s == owner).unwrap() * SIGNATURE_LEN;
        let entry = &blob.bytes[at..at + SIGNATURE_LEN];
        assert_eq!(&entry[..64], &raw[..64]);
        assert_eq!(entry[64], raw[64] + 4);
    }

    #[tokio::test]
    async fn signature_by_another_key_is_rejected() {
        let collector = SignatureCollector::new(
            &WalletParams { threshold: 2, signers: vec![LOW, MID], nonce: U256::ZERO },
            Approvals { hash: B256::repeat_byte(0x42), owners: vec![(LOW, true), (MID, false)] },
        );
        let raw = sign(&PrivateKeySigner::random(), collector.hash()).await;

        let err = collector.build_executable_blob(None, Some((MID, &raw))).unwrap_err();
        assert!(matches!(err, SafeError::InvalidSignature(_)));
    }

    #[tokio::test]
    async fn signature_over_another_hash_is_rejected() {
        let key = PrivateKeySigner::random();
        let signed = process_own_signature(&sign(&key, B256::repeat_byte(0x01)).await).unwrap();

        assert!(verify_own_signature(B256::repeat_byte(0x01), key.address(), &signed).is_ok());
        assert!(matches!(
            verify_own_signature(B256::repeat_byte(0x02), key.address(), &signed),
            Err(SafeError::InvalidSignature(_))
        ));
    }

    #[test]
    fn own_signature_is_not_counted_twice() {
        let collector = SignatureCollector::new(&params(2), approvals(&[HIGH]));
        let raw = [7u8; SIGNATURE_LEN];

        let blob = collector.build_signature_blob(None, Some((HIGH, &raw))).unwrap();

        assert_eq!(blob.len(), 1);
        assert_eq!(blob.bytes.as_ref(), pre_validated(HIGH).as_slice());
    }

    #[test]
    fn outsiders_cannot_sign() {
        let collector = SignatureCollector::new(&params(1), approvals(&[]));
        let raw = [0u8; SIGNATURE_LEN];

        assert!(matches!(
            collector.build_signature_blob(None, Some((OUTSIDER, &raw))),
            Err(SafeError::NotAnOwner(_))
        ));
        assert!(matches!(
            collector.build_signature_blob(Some(OUTSIDER), None),
            Err(SafeError::NotAnOwner(_))
        ));
    }

    #[test]
    fn recovery_byte_normalization() {
        let cases =
            [(0x00, 0x1f), (0x1b, 0x1f), (0x01, 0x20), (0x1c, 0x20), (0x1f, 0x1f), (0x02, 0x02)];
        for (raw_v, expected) in cases {
            let mut raw = [0u8; SIGNATURE_LEN];
            raw[64] = raw_v;
            assert_eq!(process_own_signature(&raw).unwrap()[64], expected, "v = {raw_v:#x}");
        }

        assert!(matches!(process_own_signature(&[0u8; 64]), Err(SafeError::InvalidSignature(_))));
    }

    #[tokio::test]
    async fn eth_sign_signature_gets_wallet_v() {
        let signer = PrivateKeySigner::random();
        let hash = B256::repeat_byte(0x42);

        let signature = signer.sign_message(hash.as_slice()).await.unwrap();
        let raw = signature.as_bytes();
        let processed = process_own_signature(&raw).unwrap();

        assert_eq!(&processed[..64], &raw[..64]);
        assert_eq!(processed[64], raw[64] + 4);
        assert!(processed[64] == 0x1f || processed[64] == 0x20);
    }
}
