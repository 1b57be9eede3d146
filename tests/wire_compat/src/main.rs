fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use corpus_protocol::auth::{LoginResponse, SendOtpResponse, User, VerifyOtpResponse};
    use corpus_protocol::records::{MediaRecord, RecordStatus};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        serde_json::from_str(&read_fixture(name))
            .unwrap_or_else(|e| panic!("failed to parse fixture {name}: {e}"))
    }

    /// Normalizes JSON values so that integer-valued floats compare equal.
    ///
    /// The server may send `12` where we serialize `12.0`.
    fn normalize_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => serde_json::json!(f),
                None => v.clone(),
            },
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect(),
            ),
            serde_json::Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(normalize_value).collect())
            }
            _ => v.clone(),
        }
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent, float-normalized comparison).
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            normalize_value(&fixture),
            normalize_value(&reserialized),
            "roundtrip mismatch for {name}:\n  Server: {fixture}\n  Rust:   {reserialized}"
        );
        parsed
    }

    // --- Records ---

    #[test]
    fn fixture_media_record() {
        let record: MediaRecord = roundtrip_test("media_record.json");
        assert_eq!(record.status, RecordStatus::Pending);
        assert!(!record.reviewed);
        let location = record.location.unwrap();
        assert_eq!(location.latitude, 17.385);
        assert_eq!(record.file_size, 2_621_440);
    }

    #[test]
    fn fixture_media_record_reviewed() {
        let record: MediaRecord = roundtrip_test("media_record_reviewed.json");
        assert_eq!(record.status, RecordStatus::Approved);
        assert_eq!(record.reviewed_by.as_deref(), Some("reviewer-7"));
        assert!(record.location.is_none());
        assert!(record.duration_seconds.is_none());
    }

    #[test]
    fn media_record_unknown_status_tolerated() {
        let mut fixture = load_fixture("media_record.json");
        fixture["status"] = serde_json::json!("flagged");
        let record: MediaRecord = serde_json::from_value(fixture).unwrap();
        assert_eq!(record.status, RecordStatus::Unknown);
    }

    #[test]
    fn media_record_sparse_server_response() {
        let mut fixture = load_fixture("media_record.json");
        let map = fixture.as_object_mut().unwrap();
        for key in ["description", "location", "reviewed_by", "reviewed_at", "duration_seconds"] {
            map.remove(key);
        }
        let record: MediaRecord = serde_json::from_value(fixture).unwrap();
        assert!(record.description.is_none());
        assert!(record.location.is_none());
    }

    // --- Errors ---

    #[test]
    fn fixture_error_detail_first_message() {
        let body = read_fixture("error_detail.json");
        assert_eq!(
            corpus_protocol::extract_error_message(body.as_bytes()).as_deref(),
            Some("Not all chunks were received")
        );
    }

    // --- Auth ---

    #[test]
    fn fixture_login_response() {
        let resp: LoginResponse = roundtrip_test("login_response.json");
        assert_eq!(resp.token_type, "bearer");
    }

    #[test]
    fn fixture_user() {
        let user: User = roundtrip_test("user.json");
        assert_eq!(user.phone, "+919876543210");
        assert!(user.has_given_consent);
    }

    #[test]
    fn fixture_send_otp_response() {
        let resp: SendOtpResponse = roundtrip_test("send_otp_response.json");
        assert_eq!(resp.status, "success");
    }

    #[test]
    fn fixture_verify_otp_response() {
        let resp: VerifyOtpResponse = roundtrip_test("verify_otp_response.json");
        assert_eq!(resp.roles, vec!["contributor".to_string()]);
    }
}
