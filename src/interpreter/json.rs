use crate::interpreter::value::Value;

pub fn serialize_value(value: &Value) -> Result<String, serde_json::Error> { serde_json::to_string(value) }

pub fn deserialize_value(json: &str) -> Result<Value, serde_json::Error> { serde_json::from_str(json) }

#[cfg(test)]
mod test_value_serialization {
    use super::*;
    use crate::interpreter::{Builtin, Frame};
    use crate::lerr;

    #[test]
    fn test_list_serialization() {
        let list = Value::literal_list(vec![Value::number(1), Value::symbol("x"), lerr!("bad")]);

        let json = serialize_value(&list).unwrap();
        assert_eq!(
            json,
            r#"{"type":"LiteralList","value":[{"type":"Number","value":1},{"type":"Symbol","value":"x"},{"type":"Error","value":"bad"}]}"#
        );

        assert_eq!(deserialize_value(&json).unwrap(), list);
    }

    #[test]
    fn test_builtin_serializes_by_name() {
        let json = serialize_value(&Value::builtin(Builtin::Join)).unwrap();
        assert_eq!(json, r#"{"type":"Function","value":{"Builtin":"join"}}"#);
        assert_eq!(deserialize_value(&json).unwrap(), Value::builtin(Builtin::Join));
    }

    #[test]
    fn test_unknown_builtin_rejected() {
        assert!(deserialize_value(r#"{"type":"Function","value":{"Builtin":"frobnicate"}}"#).is_err());
    }

    #[test]
    fn test_lambda_keeps_bound_arguments() {
        let mut env = Frame::new();
        env.put("x", Value::number(2));
        let f = Value::lambda(vec![Value::symbol("y")], vec![Value::symbol("+"), Value::symbol("x"), Value::symbol("y")], env);

        let back = deserialize_value(&serialize_value(&f).unwrap()).unwrap();
        match back {
            Value::Function(crate::interpreter::Function::Lambda(lambda)) => {
                assert_eq!(lambda.env.lookup("x"), Some(&Value::number(2)));
                assert_eq!(lambda.env.parent(), None);
            }
            other => panic!("expected a lambda, got {:?}", other),
        }
    }
}
