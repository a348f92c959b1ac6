// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use virtual_wallet_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("bad value".into());
        assert_eq!(err.to_string(), "Serialization error: bad value");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("unexpected EOF".into());
        assert_eq!(err.to_string(), "Deserialization error: unexpected EOF");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn corrupted_value() {
        let err = CoreError::CorruptedValue {
            key: "BTC".into(),
            message: "'abc' is not a number".into(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupted value for key 'BTC': 'abc' is not a number"
        );
    }

    #[test]
    fn api() {
        let err = CoreError::Api {
            provider: "Coinbase".into(),
            message: "HTTP 503".into(),
        };
        assert_eq!(err.to_string(), "API error (Coinbase): HTTP 503");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("timeout".into());
        assert_eq!(err.to_string(), "Network error: timeout");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("amount must be positive".into());
        assert_eq!(err.to_string(), "Validation failed: amount must be positive");
    }

    #[test]
    fn unsupported_symbol() {
        let err = CoreError::UnsupportedSymbol("DOGE".into());
        assert_eq!(err.to_string(), "Unsupported currency symbol: DOGE");
    }

    #[test]
    fn insufficient_balance() {
        let err = CoreError::InsufficientBalance {
            symbol: "ETH".into(),
            requested: 3.0,
            available: 1.5,
        };
        assert_eq!(err.to_string(), "Cannot remove 3 ETH: only 1.5 available");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod from_impls {
    use super::*;

    #[test]
    fn io_error_becomes_file_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "wallet.json missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("wallet.json missing")));
    }

    #[test]
    fn question_mark_converts_io_error() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here/wallet.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }

    #[test]
    fn errors_are_debug_printable() {
        let err = CoreError::UnsupportedSymbol("XRP".into());
        assert!(format!("{err:?}").contains("UnsupportedSymbol"));
    }
}
