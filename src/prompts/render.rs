use std::collections::BTreeMap;

use crate::error::TemplateError;

/// Named values substituted into a template
pub type TemplateParams = BTreeMap<&'static str, String>;

/// Replaces every `{{ name }}` placeholder in `source` with its value from `params`.
///
/// Unused parameters are allowed. A placeholder without a value is an error.
pub fn render(template: &str, source: &str, params: &TemplateParams) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut consumed = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open.find("}}").ok_or_else(|| TemplateError::Unterminated {
            template: template.to_string(),
            offset: consumed + start,
        })?;

        let name = after_open[..end].trim();
        let value = params
            .get(name)
            .ok_or_else(|| TemplateError::MissingParameter {
                template: template.to_string(),
                name: name.to_string(),
            })?;
        out.push_str(value);

        let advance = start + 2 + end + 2;
        consumed += advance;
        rest = &rest[advance..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&'static str, &str)]) -> TemplateParams {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn substitutes_with_and_without_spaces() {
        let p = params(&[("topic", "trust"), ("n", "3")]);
        let out = render("t", "About {{ topic }} in {{n}} rounds ({{topic}})", &p).unwrap();
        assert_eq!(out, "About trust in 3 rounds (trust)");
    }

    #[test]
    fn missing_parameter_is_reported() {
        let err = render("player_action", "{{ current_scenario }}", &params(&[])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingParameter {
                template: "player_action".into(),
                name: "current_scenario".into()
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_reported() {
        let err = render("t", "ok {{ a }} then {{ broken", &params(&[("a", "x")])).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unterminated {
                template: "t".into(),
                offset: 16
            }
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let p = params(&[("a", "1"), ("b", "2")]);
        let first = render("t", "{{a}}-{{b}}", &p).unwrap();
        let second = render("t", "{{a}}-{{b}}", &p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn values_are_not_rescanned() {
        let p = params(&[("a", "{{ b }}")]);
        assert_eq!(render("t", "x {{a}} y", &p).unwrap(), "x {{ b }} y");
    }
}
