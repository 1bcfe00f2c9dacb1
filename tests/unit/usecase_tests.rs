use std::sync::Arc;
use trustseal::application::cost::{self, BATCH_DOCUMENT_GAS, SINGLE_DOCUMENT_GAS};
use trustseal::application::{
    NotarizationEncoder, NotarizeUseCase, RegistryUseCase, TransactionSubmitter, VerifyUseCase,
};
use trustseal::domain::{
    DecodedNotarization, DocumentDigest, DocumentRegistration, EmbeddedNotarization,
    EncodingMode, NotarizationRequest,
};
use trustseal::infrastructure::ledger::{ClauseRecord, TransactionReceipt, TransactionRecord};
use trustseal::infrastructure::{LocalKeySigner, MockLedger, WalletProviders};
use alloy_primitives::Address;

const DIGEST: &str = "a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2a1b2";

fn providers() -> WalletProviders {
    let signer = LocalKeySigner::from_hex("server", &format!("{:064x}", 42)).unwrap();
    WalletProviders::new().with(Arc::new(signer))
}

fn notarize_usecase(ledger: &MockLedger, contract: Option<Address>) -> NotarizeUseCase {
    NotarizeUseCase::new(
        NotarizationEncoder::new(contract),
        TransactionSubmitter::new(Arc::new(ledger.clone())),
        "https://explore-testnet.vechain.org",
    )
}

#[cfg(test)]
mod encoder_tests {
    use super::*;

    #[test]
    fn test_mode_never_alternates() {
        let with_contract = NotarizationEncoder::new(Some(Address::repeat_byte(7)));
        let without = NotarizationEncoder::new(None);

        for comment in [None, Some("a"), Some("{\"h\":1}")] {
            let request = NotarizationRequest::new(DIGEST, "0xuser", comment).unwrap();
            assert_eq!(with_contract.encode(&request).mode, EncodingMode::ContractEvent);
            assert_eq!(without.encode(&request).mode, EncodingMode::DataEmbed);
        }
    }

    #[test]
    fn test_data_embed_payload_fields() {
        let request = NotarizationRequest::new(DIGEST, "0xuser", Some("Lease")).unwrap();
        let encoded = NotarizationEncoder::new(None).encode(&request);

        let payload: EmbeddedNotarization =
            serde_json::from_slice(&encoded.clauses[0].data).unwrap();
        assert_eq!(payload.h, format!("0x{}", DIGEST));
        assert_eq!(payload.c, "Lease");
        assert!(payload.timestamp().is_some());
    }
}

#[cfg(test)]
mod round_trip_tests {
    use super::*;

    #[tokio::test]
    async fn test_data_embed_submit_then_decode() {
        let ledger = MockLedger::new();
        let request = NotarizationRequest::new(DIGEST, "0xuser", Some("Signed lease")).unwrap();

        let result = notarize_usecase(&ledger, None)
            .execute(&request, &providers())
            .await
            .unwrap();
        assert_eq!(result.comment, "Signed lease");
        assert_eq!(result.mode, EncodingMode::DataEmbed);

        let verify = VerifyUseCase::new(Arc::new(ledger));
        let decoded = verify
            .execute(&result.transaction_id, None)
            .await
            .unwrap()
            .unwrap();

        match decoded {
            DecodedNotarization::DataEmbed {
                hash,
                comment,
                timestamp,
            } => {
                assert_eq!(hash, format!("0x{}", DIGEST));
                assert_eq!(comment, "Signed lease");
                assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
            }
            other => panic!("expected data-embed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_contract_event_submit_then_decode() {
        let ledger = MockLedger::new();
        let contract = Address::repeat_byte(0xc0);
        let request = NotarizationRequest::new(DIGEST, "0xuser", Some("memo")).unwrap();

        let result = notarize_usecase(&ledger, Some(contract))
            .execute(&request, &providers())
            .await
            .unwrap();
        assert_eq!(result.mode, EncodingMode::ContractEvent);

        let decoded = VerifyUseCase::new(Arc::new(ledger))
            .execute(&result.transaction_id, Some(result.mode))
            .await
            .unwrap()
            .unwrap();

        match decoded {
            DecodedNotarization::ContractEvent {
                document_hash,
                comment,
                ..
            } => {
                assert_eq!(document_hash, format!("0x{}", DIGEST));
                assert_eq!(comment, "memo");
            }
            other => panic!("expected contract event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unrecognised_payload_returns_raw() {
        let ledger = MockLedger::new();
        let id = format!("0x{}", "5a".repeat(32));
        ledger.insert_transaction(
            TransactionRecord {
                id: id.clone(),
                origin: String::new(),
                clauses: vec![ClauseRecord {
                    to: None,
                    value: "0x0".to_string(),
                    data: "0xdeadbeef".to_string(),
                }],
                gas: 21_000,
            },
            TransactionReceipt {
                gas_used: 21_000,
                reverted: false,
                outputs: vec![],
            },
        );

        let decoded = VerifyUseCase::new(Arc::new(ledger))
            .execute(&id, None)
            .await
            .unwrap()
            .unwrap();

        match decoded {
            DecodedNotarization::Raw { data, warning } => {
                assert_eq!(data, "0xdeadbeef");
                assert!(!warning.is_empty());
            }
            other => panic!("expected raw fallback, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_none() {
        let decoded = VerifyUseCase::new(Arc::new(MockLedger::new()))
            .execute(&"00".repeat(32), None)
            .await
            .unwrap();
        assert!(decoded.is_none());
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    fn registry(ledger: &MockLedger) -> RegistryUseCase {
        RegistryUseCase::new(
            Arc::new(ledger.clone()),
            TransactionSubmitter::new(Arc::new(ledger.clone())),
            Some(Address::repeat_byte(0xee)),
        )
    }

    fn doc(seed: u8) -> DocumentRegistration {
        DocumentRegistration {
            hash: DocumentDigest::of_bytes(&[seed]).to_hex(),
            reference: format!("ref-{}", seed),
            metadata_uri: format!("ipfs://doc-{}", seed),
        }
    }

    #[tokio::test]
    async fn test_batch_of_two_reports_gas_per_document() {
        let ledger = MockLedger::new().with_clause_gas(35_001);

        let batch = registry(&ledger)
            .batch_register(&[doc(1), doc(2)], &providers())
            .await
            .unwrap();

        assert_eq!(batch.documents_count, 2);
        assert_eq!(batch.estimated_gas, 70_002);
        assert_eq!(
            batch.gas_per_document,
            (batch.estimated_gas as f64 / 2.0).round() as u64
        );

        let sent = ledger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body.clauses.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_document_blocks_whole_batch() {
        let ledger = MockLedger::new();
        let mut bad = doc(2);
        bad.hash = "abc".to_string();

        let err = registry(&ledger)
            .batch_register(&[doc(1), bad], &providers())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("32 bytes"));
        assert!(ledger.sent().is_empty());
    }
}

#[cfg(test)]
mod cost_tests {
    use super::*;

    #[test]
    fn test_batch_gas_below_single() {
        let table = cost::cost_table();
        assert!(table.batch_document.gas_estimate < table.single_document.gas_estimate);
    }

    #[test]
    fn test_savings_matches_rounding_rule() {
        let expected =
            ((1.0 - BATCH_DOCUMENT_GAS as f64 / SINGLE_DOCUMENT_GAS as f64) * 100.0).round() as u64;
        assert_eq!(cost::savings_percent(), expected);
        assert_eq!(cost::estimate(10).savings_percent, expected);
        assert_eq!(
            cost::cost_table().batch_document.savings.as_deref(),
            Some("30%")
        );
    }
}
