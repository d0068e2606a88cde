//! Stage 3: `{{name}}` placeholder substitution.

use super::Variables;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{key}}` whose key is present in `variables`.
///
/// Tokens with no matching key stay verbatim. A present key with an empty
/// value clears its token. Substituted values are never rescanned, so a value
/// containing another token is emitted as-is.
pub fn substitute_placeholders(template: &str, variables: &Variables) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        match variables.get(&after_open[..end]) {
            Some(value) => {
                output.push_str(&rest[..start]);
                output.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Step one brace forward so `{{{key}}` still finds `{{key}}`.
                output.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let out = substitute_placeholders("Hello, {{name}}!", &vars(&[("name", "World")]));
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn test_substitute_repeated_token() {
        let out = substitute_placeholders(
            "Order {{order_id}} / {{order_id}} via {{carrier}}",
            &vars(&[("order_id", "ORD-123"), ("carrier", "FedEx")]),
        );
        assert_eq!(out, "Order ORD-123 / ORD-123 via FedEx");
    }

    #[test]
    fn test_missing_key_left_verbatim() {
        let out = substitute_placeholders("<p>{{missing}}</p>", &Variables::new());
        assert_eq!(out, "<p>{{missing}}</p>");
    }

    #[test]
    fn test_empty_value_clears_token() {
        let out = substitute_placeholders("<p>{{x}}</p>", &vars(&[("x", "")]));
        assert_eq!(out, "<p></p>");
    }

    #[test]
    fn test_fit_keys_are_substituted_too() {
        let out = substitute_placeholders("fit={{hero_fit}}", &vars(&[("hero_fit", "cover")]));
        assert_eq!(out, "fit=cover");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = substitute_placeholders(
            "{{a}}|{{b}}",
            &vars(&[("a", "{{b}}"), ("b", "B")]),
        );
        assert_eq!(out, "{{b}}|B");
    }

    #[test]
    fn test_extra_leading_brace_is_preserved() {
        let out = substitute_placeholders("{{{a}}}", &vars(&[("a", "x")]));
        assert_eq!(out, "{x}");
    }

    #[test]
    fn test_unterminated_token_left_alone() {
        let out = substitute_placeholders("{{a}} {{b", &vars(&[("a", "1"), ("b", "2")]));
        assert_eq!(out, "1 {{b");
    }

    #[test]
    fn test_multibyte_text_around_tokens() {
        let out = substitute_placeholders("héllo {{név}} ✓", &vars(&[("név", "Ádám")]));
        assert_eq!(out, "héllo Ádám ✓");
    }
}
