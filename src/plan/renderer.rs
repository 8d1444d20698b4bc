//! Renderers for plan views
//!
//! This module provides ASCII (terminal) and HTML renderers for
//! displaying a [`PlanView`] in a formatted, color-coded manner.

use super::address::ROOT_MODULE;
use super::types::{
    AttributeChange, AttributeChangeType, DiffRenderOptions, PlanView, ResourceSummary,
    ResourceView,
};

const SENSITIVE: &str = "(sensitive)";
const KNOWN_AFTER_APPLY: &str = "(known after apply)";

/// Trait for plan view renderers
pub trait DiffRenderer {
    /// Render the plan view to a string
    fn render(&self, plan: &PlanView, options: &DiffRenderOptions) -> String;
}

/// Display text for the old value of an attribute
fn old_display(attr: &AttributeChange, options: &DiffRenderOptions) -> Option<String> {
    let value = attr.old_value.as_deref()?;
    Some(mask(value, attr, options))
}

/// Display text for the new value of an attribute
fn new_display(attr: &AttributeChange, options: &DiffRenderOptions) -> Option<String> {
    if attr.computed && attr.new_value.as_deref().is_none_or(|value| value == "null") {
        return Some(KNOWN_AFTER_APPLY.to_string());
    }
    let value = attr.new_value.as_deref()?;
    Some(mask(value, attr, options))
}

/// Display text for the observed value of an attribute
fn current_display(attr: &AttributeChange, options: &DiffRenderOptions) -> Option<String> {
    let value = attr.current_value.as_deref()?;
    Some(mask(value, attr, options))
}

fn mask(value: &str, attr: &AttributeChange, options: &DiffRenderOptions) -> String {
    if attr.sensitive && !options.show_sensitive {
        return SENSITIVE.to_string();
    }
    truncate_str(value, options.max_value_width)
}

/// ASCII renderer for terminal output
pub struct AsciiRenderer;

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render summary section
    fn render_summary(&self, summary: &ResourceSummary) -> String {
        let mut output = String::new();

        output.push_str("Plan Summary:\n");

        let mut parts = Vec::new();

        if summary.to_add > 0 {
            parts.push(format!("+{} to add", summary.to_add));
        }

        if summary.to_change > 0 {
            parts.push(format!("~{} to change", summary.to_change));
        }

        if summary.to_replace > 0 {
            parts.push(format!("±{} to replace", summary.to_replace));
        }

        if summary.to_destroy > 0 {
            parts.push(format!("-{} to destroy", summary.to_destroy));
        }

        if summary.to_read > 0 {
            parts.push(format!("≤{} to read", summary.to_read));
        }

        if parts.is_empty() {
            output.push_str("  No changes.\n");
        } else {
            output.push_str(&format!("  {}\n", parts.join(", ")));
        }

        output.push('\n');
        output
    }

    /// Render a single resource
    fn render_resource(&self, resource: &ResourceView, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        let symbol = resource.class.symbol();
        let label = resource.class.label();

        output.push_str(&format!("{} {} ({})\n", symbol, resource.address, label));

        for attr in &resource.attributes {
            if attr.change_type == AttributeChangeType::Unchanged
                && !attr.drifted
                && !options.show_unchanged
            {
                continue;
            }

            output.push_str(&self.render_attribute(attr, options));
        }

        for line in &resource.line_diff {
            output.push_str(&format!("    {} {}\n", line.symbol(), line.text()));
        }

        if !options.compact_mode {
            output.push('\n');
        }

        output
    }

    /// Render a single attribute change
    fn render_attribute(&self, attr: &AttributeChange, options: &DiffRenderOptions) -> String {
        let symbol = attr.change_type.symbol();
        let mut line = format!("    {} {}", symbol, attr.name);

        let old = old_display(attr, options);
        let new = new_display(attr, options);

        match attr.change_type {
            AttributeChangeType::Added => {
                if let Some(value) = new {
                    line.push_str(&format!(" = {}", value));
                }
            }
            AttributeChangeType::Removed => {
                if let Some(value) = old {
                    line.push_str(&format!(" = {}", value));
                }
            }
            AttributeChangeType::Modified => {
                let old = old.unwrap_or_else(|| "null".to_string());
                let new = new.unwrap_or_else(|| "null".to_string());
                line.push_str(&format!(" = {} -> {}", old, new));
            }
            AttributeChangeType::Unchanged => {
                if let Some(value) = new.or(old) {
                    line.push_str(&format!(" = {}", value));
                }
            }
        }

        if attr.drifted {
            if let Some(current) = current_display(attr, options) {
                line.push_str(&format!(" (observed: {})", current));
            }
        }

        // Add markers
        if attr.forces_replacement {
            line.push_str(" # forces replacement");
        }

        if attr.drifted {
            line.push_str(" # drifted");
        }

        line.push('\n');
        line
    }

    /// Render side-by-side view
    fn render_side_by_side(&self, resource: &ResourceView, options: &DiffRenderOptions) -> String {
        let mut output = String::new();
        let half_width = (options.terminal_width / 2).saturating_sub(2).max(16);

        let symbol = resource.class.symbol();
        let label = resource.class.label();
        output.push_str(&format!("{} {} ({})\n", symbol, resource.address, label));

        output.push_str(&format!(
            "    {:<width$} | {}\n",
            "OLD",
            "NEW",
            width = half_width
        ));
        output.push_str(&format!(
            "    {:-<width$}-+-{:-<width$}\n",
            "",
            "",
            width = half_width
        ));

        for attr in &resource.attributes {
            if attr.change_type == AttributeChangeType::Unchanged
                && !attr.drifted
                && !options.show_unchanged
            {
                continue;
            }

            let old_value = old_display(attr, options).unwrap_or_else(|| "-".to_string());
            let new_value = new_display(attr, options).unwrap_or_else(|| "-".to_string());

            let cell_width = half_width.saturating_sub(4);
            let left = truncate_str(&format!("{}: {}", attr.name, old_value), cell_width);
            let right = truncate_str(&new_value, cell_width);

            output.push_str(&format!(
                "  {} {:<width$} | {}\n",
                attr.change_type.symbol(),
                left,
                right,
                width = half_width
            ));
        }

        if !options.compact_mode {
            output.push('\n');
        }

        output
    }
}

impl DiffRenderer for AsciiRenderer {
    fn render(&self, plan: &PlanView, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        output.push_str(&self.render_summary(&plan.summary));

        let mut current_module: Option<&str> = None;

        for resource in &plan.resources {
            if current_module != Some(resource.module_address.as_str()) {
                current_module = Some(resource.module_address.as_str());
                if resource.module_address != ROOT_MODULE {
                    output.push_str(&format!("[{}]\n", resource.module_address));
                }
            }

            if options.side_by_side {
                output.push_str(&self.render_side_by_side(resource, options));
            } else {
                output.push_str(&self.render_resource(resource, options));
            }
        }

        output
    }
}

/// HTML renderer for file export
pub struct HtmlRenderer;

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Generate CSS styles
    fn generate_styles(&self) -> String {
        r#"
<style>
    body {
        font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', monospace;
        background-color: #1e1e1e;
        color: #d4d4d4;
        padding: 20px;
        line-height: 1.5;
    }
    .summary {
        background-color: #2d2d2d;
        padding: 15px;
        border-radius: 5px;
        margin-bottom: 20px;
    }
    .summary h2 { margin: 0 0 10px 0; color: #ffffff; }
    .summary-item {
        display: inline-block;
        margin-right: 20px;
        padding: 5px 10px;
        border-radius: 3px;
    }
    .module { color: #9cdcfe; margin: 20px 0 10px 0; }
    .resource {
        background-color: #2d2d2d;
        padding: 15px;
        border-radius: 5px;
        margin-bottom: 15px;
        border-left: 4px solid;
    }
    .resource.create { border-left-color: rgb(152, 225, 152); }
    .resource.update { border-left-color: rgb(255, 230, 160); }
    .resource.delete { border-left-color: rgb(255, 160, 160); }
    .resource.replace { border-left-color: rgb(181, 174, 254); }
    .resource.read { border-left-color: rgb(160, 200, 255); }
    .resource-header { font-weight: bold; margin-bottom: 10px; }
    .attribute, .line { padding: 2px 0; margin-left: 20px; }
    .symbol {
        display: inline-block;
        width: 20px;
        text-align: center;
        font-weight: bold;
    }
    .add { color: rgb(152, 225, 152); }
    .remove { color: rgb(255, 160, 160); }
    .modify { color: rgb(255, 230, 160); }
    .unchanged { color: rgb(160, 160, 160); }
    .value { color: #ce9178; }
    .arrow { color: #569cd6; margin: 0 5px; }
    .marker { color: #6a9955; font-style: italic; }
    .attr-name { color: #9cdcfe; }
</style>
"#
        .to_string()
    }

    /// Render summary section
    fn render_summary(&self, summary: &ResourceSummary) -> String {
        let mut output = String::new();

        output.push_str("<div class=\"summary\">\n");
        output.push_str("  <h2>Plan Summary</h2>\n");

        let items = [
            (summary.to_add, "add", "+", "to add"),
            (summary.to_change, "modify", "~", "to change"),
            (summary.to_replace, "replace", "±", "to replace"),
            (summary.to_destroy, "remove", "-", "to destroy"),
            (summary.to_read, "read", "≤", "to read"),
        ];

        for (count, class, symbol, label) in items {
            if count > 0 {
                output.push_str(&format!(
                    "  <span class=\"summary-item {}\">{}{} {}</span>\n",
                    class,
                    html_escape(symbol),
                    count,
                    label
                ));
            }
        }

        if !summary.has_changes() {
            output.push_str("  <span class=\"summary-item unchanged\">No changes</span>\n");
        }

        output.push_str("</div>\n\n");
        output
    }

    /// Render a single resource
    fn render_resource(&self, resource: &ResourceView, options: &DiffRenderOptions) -> String {
        let mut output = String::new();
        let class = resource.class.name();

        output.push_str(&format!("<div class=\"resource {}\">\n", class));
        output.push_str(&format!(
            "  <div class=\"resource-header\">\n    <span class=\"symbol {}\">{}</span> {} ({})\n  </div>\n",
            class,
            html_escape(resource.class.symbol()),
            html_escape(&resource.address),
            resource.class.label()
        ));

        for attr in &resource.attributes {
            if attr.change_type == AttributeChangeType::Unchanged
                && !attr.drifted
                && !options.show_unchanged
            {
                continue;
            }

            output.push_str(&self.render_attribute(attr, options));
        }

        for line in &resource.line_diff {
            output.push_str(&format!(
                "  <div class=\"line\"><span class=\"symbol\">{}</span> <span class=\"value\">{}</span></div>\n",
                html_escape(line.symbol()),
                html_escape(line.text())
            ));
        }

        output.push_str("</div>\n\n");
        output
    }

    /// Render a single attribute
    fn render_attribute(&self, attr: &AttributeChange, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "  <div class=\"attribute {}\">\n",
            attr.change_type.css_class()
        ));
        output.push_str(&format!(
            "    <span class=\"symbol\">{}</span>",
            html_escape(attr.change_type.symbol())
        ));
        output.push_str(&format!(
            " <span class=\"attr-name\">{}</span>",
            html_escape(&attr.name)
        ));

        let old = old_display(attr, options);
        let new = new_display(attr, options);

        match attr.change_type {
            AttributeChangeType::Added | AttributeChangeType::Unchanged => {
                if let Some(value) = new.or(old) {
                    output.push_str(&format!(
                        " = <span class=\"value\">{}</span>",
                        html_escape(&value)
                    ));
                }
            }
            AttributeChangeType::Removed => {
                if let Some(value) = old {
                    output.push_str(&format!(
                        " = <span class=\"value\">{}</span>",
                        html_escape(&value)
                    ));
                }
            }
            AttributeChangeType::Modified => {
                output.push_str(&format!(
                    " = <span class=\"value\">{}</span><span class=\"arrow\">→</span><span class=\"value\">{}</span>",
                    html_escape(old.as_deref().unwrap_or("null")),
                    html_escape(new.as_deref().unwrap_or("null"))
                ));
            }
        }

        if attr.forces_replacement {
            output.push_str(" <span class=\"marker\"># forces replacement</span>");
        }

        if attr.drifted {
            let observed = current_display(attr, options).unwrap_or_else(|| "null".to_string());
            output.push_str(&format!(
                " <span class=\"marker\"># drifted, observed {}</span>",
                html_escape(&observed)
            ));
        }

        output.push_str("\n  </div>\n");
        output
    }
}

impl DiffRenderer for HtmlRenderer {
    fn render(&self, plan: &PlanView, options: &DiffRenderOptions) -> String {
        let mut output = String::new();

        output.push_str("<!DOCTYPE html>\n");
        output.push_str("<html lang=\"en\">\n");
        output.push_str("<head>\n");
        output.push_str("  <meta charset=\"UTF-8\">\n");
        output.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        output.push_str("  <title>Plan Diff</title>\n");
        output.push_str(&self.generate_styles());
        output.push_str("</head>\n");
        output.push_str("<body>\n\n");

        output.push_str(&self.render_summary(&plan.summary));

        let mut current_module: Option<&str> = None;

        for resource in &plan.resources {
            if current_module != Some(resource.module_address.as_str()) {
                current_module = Some(resource.module_address.as_str());
                output.push_str(&format!(
                    "<h3 class=\"module\">{}</h3>\n",
                    html_escape(&resource.module_address)
                ));
            }
            output.push_str(&self.render_resource(resource, options));
        }

        output.push_str("</body>\n");
        output.push_str("</html>\n");

        output
    }
}

/// Truncate a string to at most `max_len` characters
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
