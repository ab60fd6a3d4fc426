pub const PRICING_TABLE_SCRIPT_SRC: &str = "https://js.stripe.com/v3/pricing-table.js";

/// Server-rendered embed for the hosted Stripe pricing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTable {
    pub pricing_table_id: String,
    pub publishable_key: String,
    pub client_reference_id: Option<String>,
}

impl PricingTable {
    /// Container plus a loader that adds the widget script only when the
    /// page does not already carry it.
    pub fn render(&self) -> String {
        let reference = self
            .client_reference_id
            .as_deref()
            .map(|id| format!(" client-reference-id=\"{}\"", escape_html(id)))
            .unwrap_or_default();

        format!(
            concat!(
                "<div class=\"flex flex-1 flex-col w-full\">\n",
                "  <stripe-pricing-table pricing-table-id=\"{table}\" publishable-key=\"{key}\"{reference}>\n",
                "  </stripe-pricing-table>\n",
                "</div>\n",
                "<script>\n",
                "(function () {{\n",
                "  var src = \"{src}\";\n",
                "  if (document.querySelector('script[src=\"' + src + '\"]')) return;\n",
                "  var script = document.createElement(\"script\");\n",
                "  script.src = src;\n",
                "  script.async = true;\n",
                "  document.body.appendChild(script);\n",
                "}})();\n",
                "</script>\n"
            ),
            table = escape_html(&self.pricing_table_id),
            key = escape_html(&self.publishable_key),
            reference = reference,
            src = PRICING_TABLE_SCRIPT_SRC,
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PricingTable {
        PricingTable {
            pricing_table_id: "prctbl_123".into(),
            publishable_key: "pk_test_abc".into(),
            client_reference_id: None,
        }
    }

    #[test]
    fn renders_configured_identifiers() {
        let html = table().render();
        assert!(html.contains(
            r#"<stripe-pricing-table pricing-table-id="prctbl_123" publishable-key="pk_test_abc">"#
        ));
        assert!(!html.contains("client-reference-id"));
    }

    #[test]
    fn loader_references_script_exactly_once() {
        let html = table().render();
        assert_eq!(html.matches(PRICING_TABLE_SCRIPT_SRC).count(), 1);
        assert!(html.contains("document.querySelector"));
        assert!(html.contains("script.async = true;"));
    }

    #[test]
    fn client_reference_is_escaped() {
        let html = PricingTable {
            client_reference_id: Some("\"><script>alert(1)</script>".into()),
            ..table()
        }
        .render();
        assert!(html.contains("client-reference-id=\"&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;\""));
        assert!(!html.contains("<script>alert(1)"));
    }
}
