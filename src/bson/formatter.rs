//! BSON value rendering for the string-typed attribute surface.

use mongodb::bson::Bson;

use crate::bson::bson_to_relaxed_extjson_string;

/// Render a key-document value as the literal text a key pair would carry.
///
/// Numbers and booleans print bare (`1`, `-1`, `true`), strings print raw
/// (`text`, `2dsphere`), anything else falls back to relaxed extended JSON.
pub fn bson_value_literal(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => n.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        other => bson_to_relaxed_extjson_string(other),
    }
}

/// Whole-number view of a numeric value, whatever width or type the server stored.
pub fn bson_as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(n) if n.is_finite() => Some(n.trunc() as i64),
        _ => None,
    }
}

/// Boolean view of a flag; numbers count as set when nonzero.
pub fn bson_truthy(value: &Bson) -> Option<bool> {
    match value {
        Bson::Boolean(b) => Some(*b),
        Bson::Int32(n) => Some(*n != 0),
        Bson::Int64(n) => Some(*n != 0),
        Bson::Double(n) => Some(*n != 0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_literals() {
        assert_eq!(bson_value_literal(&Bson::Int32(1)), "1");
        assert_eq!(bson_value_literal(&Bson::Int32(-1)), "-1");
        assert_eq!(bson_value_literal(&Bson::Int64(1)), "1");
        assert_eq!(bson_value_literal(&Bson::Double(1.0)), "1");
        assert_eq!(bson_value_literal(&Bson::Double(-1.0)), "-1");
        assert_eq!(bson_value_literal(&Bson::Double(0.5)), "0.5");
        assert_eq!(bson_value_literal(&Bson::Boolean(true)), "true");
        assert_eq!(bson_value_literal(&Bson::String("2dsphere".into())), "2dsphere");
    }

    #[test]
    fn test_fallback_is_extjson() {
        let value = Bson::Document(doc! { "a": 1 });
        assert_eq!(bson_value_literal(&value), r#"{"a":1}"#);
    }

    #[test]
    fn test_numeric_and_flag_views() {
        assert_eq!(bson_as_i64(&Bson::Int32(60)), Some(60));
        assert_eq!(bson_as_i64(&Bson::Int64(3600)), Some(3600));
        assert_eq!(bson_as_i64(&Bson::Double(3600.0)), Some(3600));
        assert_eq!(bson_as_i64(&Bson::Double(f64::NAN)), None);
        assert_eq!(bson_as_i64(&Bson::String("60".into())), None);

        assert_eq!(bson_truthy(&Bson::Boolean(true)), Some(true));
        assert_eq!(bson_truthy(&Bson::Int32(0)), Some(false));
        assert_eq!(bson_truthy(&Bson::Double(1.0)), Some(true));
        assert_eq!(bson_truthy(&Bson::Null), None);
    }
}
