// Shared prompt utilities.
// Each flow that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the templating they all go through.

/// Fills `{name}` slots in `template` with the matching value from `slots`.
///
/// Single pass over the template: substituted values are never rescanned, so user
/// text that happens to contain `{job_description}` or similar is passed through
/// verbatim. Unknown `{...}` sequences in the template are left as they are.
pub fn render_template(template: &str, slots: &[(&str, &str)]) -> String {
    let extra: usize = slots.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            slots
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_fills_slots() {
        let out = render_template("Hi {name}, role: {role}.", &[("name", "Jane"), ("role", "SRE")]);
        assert_eq!(out, "Hi Jane, role: SRE.");
    }

    #[test]
    fn test_render_template_does_not_rescan_values() {
        let out = render_template(
            "A: {a}\nB: {b}",
            &[("a", "literal {b} inside"), ("b", "second")],
        );
        assert_eq!(out, "A: literal {b} inside\nB: second");
    }

    #[test]
    fn test_render_template_keeps_unknown_braces() {
        let out = render_template("{\"json\": {x}} {unknown}", &[("x", "1")]);
        assert_eq!(out, "{\"json\": 1} {unknown}");
    }

    #[test]
    fn test_render_template_unclosed_brace() {
        assert_eq!(render_template("tail {open", &[("open", "x")]), "tail {open");
    }
}
