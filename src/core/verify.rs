// Input verification glue
//
// Script execution and elliptic-curve verification live outside this crate;
// both are consumed through the traits below. Verification is pure glue:
// combine the scripts, hand the engine a digest-backed signature checker,
// and return the engine's verdict.

use crate::core::{Transaction, TxOutput};
use crate::core::sighash::{SigHashType, signature_digest};
use crate::core::Hash256;
use secp256k1::{Secp256k1, Message, PublicKey, ecdsa::Signature};

/// Opaque elliptic-curve verification predicate
pub trait SignatureVerifier {
    /// Check `signature` over `digest` against `public_key`
    fn verify(&self, digest: &Hash256, signature: &[u8], public_key: &[u8]) -> Result<bool, String>;
}

/// Signature-check capability handed to the script engine
///
/// The engine calls this with the public key, signature, and hash type it
/// extracted during execution.
pub trait SignatureChecker {
    fn check_signature(
        &self,
        public_key: &[u8],
        signature: &[u8],
        hash_type: SigHashType,
    ) -> Result<bool, String>;
}

/// External script interpreter contract
///
/// Executes a combined unlocking + locking script; the result is the final
/// stack truthiness per the engine's own rules.
pub trait ScriptEngine {
    fn execute(&self, script: &[u8], checker: &dyn SignatureChecker) -> Result<bool, String>;
}

/// Checker bound to one input of one transaction
///
/// Built fresh per verification call, so concurrent verifications share no
/// state.
struct InputSignatureChecker<'a> {
    tx: &'a Transaction,
    input_index: usize,
    script_pubkey: &'a [u8],
    verifier: &'a dyn SignatureVerifier,
}

impl SignatureChecker for InputSignatureChecker<'_> {
    fn check_signature(
        &self,
        public_key: &[u8],
        signature: &[u8],
        hash_type: SigHashType,
    ) -> Result<bool, String> {
        let digest = signature_digest(self.tx, self.input_index, self.script_pubkey, hash_type)
            .map_err(|e| e.to_string())?;
        self.verifier.verify(&digest, signature, public_key)
    }
}

/// Verify that an input satisfies the output it claims to spend
///
/// The input's scriptSig is concatenated with the referenced output's
/// scriptPubKey and executed by the engine. A `false` return is a legitimate
/// outcome (the script did not verify), not an error; errors come only from
/// the external capabilities.
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    referenced_output: &TxOutput,
    engine: &dyn ScriptEngine,
    verifier: &dyn SignatureVerifier,
) -> Result<bool, String> {
    let input = tx
        .inputs()
        .get(input_index)
        .ok_or_else(|| format!("input index {} out of range", input_index))?;

    let mut combined = input.script_sig.clone();
    combined.extend_from_slice(&referenced_output.script_pubkey);

    let checker = InputSignatureChecker {
        tx,
        input_index,
        script_pubkey: &referenced_output.script_pubkey,
        verifier,
    };
    engine.execute(&combined, &checker)
}

/// ECDSA verification over secp256k1
///
/// Signatures are DER encoded, public keys SEC1 encoded.
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, digest: &Hash256, signature: &[u8], public_key: &[u8]) -> Result<bool, String> {
        let secp = Secp256k1::verification_only();

        let public_key = PublicKey::from_slice(public_key)
            .map_err(|e| format!("Invalid public key: {}", e))?;

        let signature = Signature::from_der(signature)
            .map_err(|e| format!("Invalid signature: {}", e))?;

        let message = Message::from_digest_slice(digest.as_bytes())
            .map_err(|e| format!("Invalid message: {}", e))?;

        Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
    }
}
