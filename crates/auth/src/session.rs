use wareops_core::UserId;

/// Parse an opaque `session` cookie value into a user id.
///
/// The cookie is either a bare user-id string or a JSON object carrying at
/// least a string `id` field. Anything that fails to decode as such an object
/// falls back to the raw value — a deliberate graceful-degradation choice
/// inherited from the stored-cookie format, not an error path. The cookie is
/// trusted as a raw lookup key; there is no signature to verify.
///
/// Returns `None` only when no non-empty id can be derived at all.
pub fn parse_session_token(raw: &str) -> Option<UserId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let id = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => match map.get("id").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    };

    if id.is_empty() {
        return None;
    }

    Some(UserId::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_and_bare_value_resolve_identically() {
        let from_json = parse_session_token(r#"{"id":"u1"}"#).unwrap();
        let from_raw = parse_session_token("u1").unwrap();
        assert_eq!(from_json, from_raw);
        assert_eq!(from_json.as_str(), "u1");
    }

    #[test]
    fn object_without_string_id_falls_back_to_raw() {
        let token = parse_session_token(r#"{"name":"x"}"#).unwrap();
        assert_eq!(token.as_str(), r#"{"name":"x"}"#);

        let token = parse_session_token(r#"{"id":7}"#).unwrap();
        assert_eq!(token.as_str(), r#"{"id":7}"#);
    }

    #[test]
    fn non_object_json_is_treated_as_raw() {
        assert_eq!(parse_session_token("123").unwrap().as_str(), "123");
        assert_eq!(parse_session_token(r#""u1""#).unwrap().as_str(), r#""u1""#);
    }

    #[test]
    fn empty_values_do_not_resolve() {
        assert!(parse_session_token("").is_none());
        assert!(parse_session_token("   ").is_none());
        assert!(parse_session_token(r#"{"id":""}"#).is_none());
    }
}
