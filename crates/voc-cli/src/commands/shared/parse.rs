use voc_core::ParamValue;

/// Parse a `key=value` build parameter. Values `true`/`false` become
/// booleans, integers become integers, anything else stays a string.
pub fn parse_param(raw: &str) -> anyhow::Result<(String, ParamValue)> {
    let Some((key, value)) = raw.split_once('=') else {
        anyhow::bail!("invalid param '{raw}': expected key=value");
    };

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("invalid param '{raw}': key is empty");
    }
    if key.contains([':', ',']) {
        anyhow::bail!("invalid param '{raw}': key must not contain ':' or ','");
    }

    Ok((key.to_string(), ParamValue::parse_loose(value)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use voc_core::ParamValue;

    use super::parse_param;

    #[test]
    fn values_are_typed() {
        assert_eq!(
            parse_param("strict=true").unwrap(),
            ("strict".to_string(), ParamValue::Bool(true))
        );
        assert_eq!(
            parse_param("every=5").unwrap(),
            ("every".to_string(), ParamValue::Int(5))
        );
        assert_eq!(
            parse_param("label=cat").unwrap(),
            ("label".to_string(), ParamValue::Str("cat".into()))
        );
    }

    #[test]
    fn only_first_equals_splits() {
        assert_eq!(
            parse_param("filter=a=b").unwrap(),
            ("filter".to_string(), ParamValue::Str("a=b".into()))
        );
    }

    #[test]
    fn empty_value_is_an_empty_string() {
        assert_eq!(
            parse_param("prefix=").unwrap(),
            ("prefix".to_string(), ParamValue::Str(String::new()))
        );
    }

    #[test]
    fn malformed_params_are_rejected() {
        assert!(parse_param("no-equals").is_err());
        assert!(parse_param("=value").is_err());
        assert!(parse_param("a:b=c").is_err());
    }
}
