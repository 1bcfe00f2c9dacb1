//! Thor transaction body, its RLP encoding and the hashes derived from it.

use crate::domain::Clause;
use alloy_primitives::{Address, B256};
use alloy_rlp::{Encodable, Header};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// Base cost of any transaction.
pub const TX_GAS: u64 = 5_000;
/// Per clause that targets an address.
pub const CLAUSE_GAS: u64 = 16_000;
/// Per clause without a target (contract creation semantics on Thor).
pub const CLAUSE_GAS_CONTRACT_CREATION: u64 = 48_000;
pub const ZERO_BYTE_GAS: u64 = 4;
pub const NON_ZERO_BYTE_GAS: u64 = 68;
/// Added on top of simulated execution gas when any clause invokes the VM.
pub const VM_INVOCATION_GAS: u64 = 15_000;

type Blake2b256 = Blake2b<U32>;

pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Gas charged before any execution happens.
pub fn intrinsic_gas(clauses: &[Clause]) -> u64 {
    if clauses.is_empty() {
        return TX_GAS + CLAUSE_GAS;
    }

    clauses.iter().fold(TX_GAS, |gas, clause| {
        let clause_gas = if clause.to.is_some() {
            CLAUSE_GAS
        } else {
            CLAUSE_GAS_CONTRACT_CREATION
        };
        let data_gas: u64 = clause
            .data
            .iter()
            .map(|b| if *b == 0 { ZERO_BYTE_GAS } else { NON_ZERO_BYTE_GAS })
            .sum();
        gas + clause_gas + data_gas
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
    pub chain_tag: u8,
    pub block_ref: u64,
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    pub depends_on: Option<B256>,
    pub nonce: u64,
}

impl TransactionBody {
    /// Block reference from a block id: its first 8 bytes.
    pub fn block_ref_from_id(block_id: &str) -> Option<u64> {
        let clean = block_id.strip_prefix("0x").unwrap_or(block_id);
        let head = clean.get(..16)?;
        u64::from_str_radix(head, 16).ok()
    }

    fn encode_fields(&self, out: &mut Vec<u8>) {
        self.chain_tag.encode(out);
        self.block_ref.encode(out);
        self.expiration.encode(out);

        let mut clauses = Vec::new();
        for clause in &self.clauses {
            encode_clause(clause, &mut clauses);
        }
        encode_list(&clauses, out);

        self.gas_price_coef.encode(out);
        self.gas.encode(out);
        match &self.depends_on {
            Some(id) => id.as_slice().encode(out),
            None => (&[] as &[u8]).encode(out),
        }
        self.nonce.encode(out);
        // reserved
        encode_list(&[], out);
    }

    pub fn encode_unsigned(&self) -> Vec<u8> {
        let mut fields = Vec::new();
        self.encode_fields(&mut fields);
        let mut out = Vec::new();
        encode_list(&fields, &mut out);
        out
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        blake2b256(&[&self.encode_unsigned()])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub body: TransactionBody,
    pub signature: Vec<u8>,
    pub origin: Address,
}

impl SignedTransaction {
    pub fn encode(&self) -> Vec<u8> {
        let mut fields = Vec::new();
        self.body.encode_fields(&mut fields);
        self.signature.as_slice().encode(&mut fields);
        let mut out = Vec::new();
        encode_list(&fields, &mut out);
        out
    }

    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }

    /// Transaction id: blake2b-256 over the signing hash and the origin.
    pub fn id(&self) -> String {
        let id = blake2b256(&[&self.body.signing_hash(), self.origin.as_slice()]);
        format!("0x{}", hex::encode(id))
    }
}

fn encode_clause(clause: &Clause, out: &mut Vec<u8>) {
    let mut fields = Vec::new();
    match &clause.to {
        Some(to) => to.as_slice().encode(&mut fields),
        None => (&[] as &[u8]).encode(&mut fields),
    }
    clause.value.encode(&mut fields);
    clause.data.as_slice().encode(&mut fields);
    encode_list(&fields, out);
}

fn encode_list(payload: &[u8], out: &mut Vec<u8>) {
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(out);
    out.extend_from_slice(payload);
}
