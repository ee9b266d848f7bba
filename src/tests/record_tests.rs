#[cfg(test)]
mod tests {
    use crate::models::record_model::Record;
    use crate::tests::record;

    #[test]
    fn test_serialization_keeps_field_order() {
        let r = record(&[("Zeta", "1"), ("Email", "a@x.com"), ("Alpha", "2")]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Email":"a@x.com","Alpha":"2"}"#);
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let r: Record = serde_json::from_str(r#"{"Email":null,"Full Name":"Ana"}"#).unwrap();
        assert!(r.contains_key("Email"));
        assert_eq!(r.get("Email"), None);
        assert_eq!(r.email(), None);
        assert_eq!(r.display_name(), Some("Ana"));
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["Email", "Full Name"]);
    }

    #[test]
    fn test_email_is_trimmed() {
        let r = record(&[("Email", "  a@x.com \t")]);
        assert_eq!(r.email(), Some("a@x.com"));

        let blank = record(&[("Email", "   ")]);
        assert_eq!(blank.email(), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut r = record(&[("A", "1"), ("B", "2")]);
        r.insert("A", Some("3".to_string()));
        assert_eq!(r.len(), 2);
        assert_eq!(r.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(r.get("A"), Some("3"));
    }
}
