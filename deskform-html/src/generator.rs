//! Renders a form snapshot to HTML text.

use deskform::{
    FieldKind, FieldView, Form, LayoutDirection, REQUIRED_MARKER, RenderItem, SubmitAffordance,
};

/// How `to_html` wraps and styles its output.
#[derive(Debug, Clone, Default)]
pub struct HtmlOptions {
    /// Shown as `<title>` and as the heading above the form.
    pub title: Option<String>,
    /// Embed the stylesheet in `<head>`. Ignored for fragments.
    pub include_styles: bool,
    /// Wrap the form in a standalone page. When false only the form
    /// fragment is produced.
    pub full_document: bool,
    /// Every generated class starts with this.
    pub class_prefix: String,
    /// Value of the form's `action` attribute.
    pub action: Option<String>,
}

impl HtmlOptions {
    /// A styled standalone page with the `deskform` class prefix.
    pub fn new() -> Self {
        Self {
            title: None,
            include_styles: true,
            full_document: true,
            class_prefix: "deskform".to_string(),
            action: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_styles(mut self, include: bool) -> Self {
        self.include_styles = include;
        self
    }

    pub fn full_document(mut self, full: bool) -> Self {
        self.full_document = full;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Set the form's action URL.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Page head up to and including the opening `<body>` tag.
fn document_head(options: &HtmlOptions) -> String {
    let title = options
        .title
        .as_deref()
        .map(|t| format!("<title>{}</title>\n", escape_html(t)))
        .unwrap_or_default();
    let styles = if options.include_styles {
        generate_styles(&options.class_prefix)
    } else {
        String::new()
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width\">\n{title}{styles}</head>\n<body>\n"
    )
}

/// Generate HTML for the current state of a form.
///
/// Values and error lines reflect the form as it is now, so rendering after a
/// rejected submit shows the error messages.
pub fn to_html<E: AsRef<str>>(form: &Form<E>, options: &HtmlOptions) -> String {
    let rendered = form.render();
    let prefix = &options.class_prefix;
    let mut html = if options.full_document {
        document_head(options)
    } else {
        String::new()
    };

    if let Some(title) = &options.title {
        html.push_str(&format!(
            "<h1 class=\"{prefix}-title\">{}</h1>\n",
            escape_html(title)
        ));
    }

    if let Some(hint) = rendered.required_hint {
        html.push_str(&format!(
            "<p class=\"{prefix}-hint\">{}</p>\n",
            escape_html(hint)
        ));
    }

    let direction = match rendered.direction {
        LayoutDirection::Row => "row",
        LayoutDirection::Column => "col",
    };
    let action = options
        .action
        .as_deref()
        .map(|a| format!(" action=\"{}\"", escape_html(a)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<form class=\"{prefix}-form {prefix}-{direction}\" method=\"post\"{action}>\n"
    ));

    for item in &rendered.items {
        match item {
            RenderItem::Field(view) => html.push_str(&generate_field(view, prefix, 1)),
            RenderItem::Custom(element) => {
                html.push_str("  ");
                html.push_str(element.as_ref());
                html.push('\n');
            }
        }
    }

    match rendered.submit {
        SubmitAffordance::Default { label } => html.push_str(&format!(
            "  <button type=\"submit\" class=\"{prefix}-submit\">{}</button>\n",
            escape_html(label)
        )),
        SubmitAffordance::Children(children) => {
            for child in children {
                html.push_str("  ");
                html.push_str(child.as_ref());
                html.push('\n');
            }
        }
    }

    html.push_str("</form>\n");

    if options.full_document {
        html.push_str("</body>\n</html>\n");
    }

    html
}

/// Generate HTML for a single bound field: label, input and error line.
fn generate_field(view: &FieldView<'_>, prefix: &str, indent: usize) -> String {
    let ind = "  ".repeat(indent);
    let name = escape_html(view.name().as_str());
    let value = view.value();
    let mut html = String::new();

    let extra_class = view
        .class_name()
        .map(|c| format!(" {}", escape_html(c)))
        .unwrap_or_default();
    html.push_str(&format!("{ind}<div class=\"{prefix}-field{extra_class}\">\n"));

    let marker = if view.is_required() {
        format!("<span class=\"{prefix}-required\">{REQUIRED_MARKER}</span>")
    } else {
        String::new()
    };
    html.push_str(&format!(
        "{ind}  <label for=\"{name}\">{}{marker}:</label>\n",
        escape_html(&view.label())
    ));

    let placeholder = view
        .kind()
        .placeholder()
        .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
        .unwrap_or_default();
    let required = if view.is_required() { " required" } else { "" };

    match view.kind() {
        FieldKind::Text { input, .. } => {
            // Don't echo password values back into the markup
            let value_attr = if value.is_empty() || input.as_html_type() == "password" {
                String::new()
            } else {
                format!(" value=\"{}\"", escape_html(value))
            };
            html.push_str(&format!(
                "{ind}  <input type=\"{}\" id=\"{name}\" name=\"{name}\" class=\"{prefix}-input\"{placeholder}{value_attr}{required}>\n",
                input.as_html_type()
            ));
        }

        FieldKind::TextArea { rows, .. } => {
            html.push_str(&format!(
                "{ind}  <textarea id=\"{name}\" name=\"{name}\" rows=\"{rows}\" class=\"{prefix}-textarea\"{placeholder}{required}>{}</textarea>\n",
                escape_html(value)
            ));
        }

        FieldKind::Select { options, placeholder } => {
            html.push_str(&format!(
                "{ind}  <select id=\"{name}\" name=\"{name}\" class=\"{prefix}-select\"{required}>\n"
            ));
            let empty_selected = if value.is_empty() { " selected" } else { "" };
            html.push_str(&format!(
                "{ind}    <option value=\"\"{empty_selected}>{}</option>\n",
                escape_html(placeholder.as_deref().unwrap_or("--"))
            ));
            for option in options {
                let selected = if option.value == value { " selected" } else { "" };
                html.push_str(&format!(
                    "{ind}    <option value=\"{}\"{selected}>{}</option>\n",
                    escape_html(&option.value),
                    escape_html(&option.label)
                ));
            }
            html.push_str(&format!("{ind}  </select>\n"));
        }

        FieldKind::Checkbox => {
            let checked = if value == "true" { " checked" } else { "" };
            html.push_str(&format!(
                "{ind}  <input type=\"checkbox\" id=\"{name}\" name=\"{name}\" value=\"true\"{checked}>\n"
            ));
        }

        FieldKind::File { accept } => {
            let accept = accept
                .as_deref()
                .map(|a| format!(" accept=\"{}\"", escape_html(a)))
                .unwrap_or_default();
            html.push_str(&format!(
                "{ind}  <input type=\"file\" id=\"{name}\" name=\"{name}\" class=\"{prefix}-input\"{accept}{required}>\n"
            ));
        }
    }

    let error_class = if view.error().is_message() {
        format!("{prefix}-error")
    } else {
        format!("{prefix}-error-placeholder")
    };
    html.push_str(&format!(
        "{ind}  <p class=\"{error_class}\">{}</p>\n",
        escape_html(view.error().text())
    ));
    html.push_str(&format!("{ind}</div>\n"));

    html
}

/// Entity-escape text for use in attributes and content.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Built-in stylesheet with every selector scoped by `prefix`.
fn generate_styles(prefix: &str) -> String {
    format!(
        r#"  <style>
    .{prefix}-form {{
      max-width: 600px;
      margin: 2rem auto;
      padding: 1rem;
      font-family: sans-serif;
    }}
    .{prefix}-hint {{
      color: #94a3b8;
    }}
    .{prefix}-field {{
      margin-bottom: 1.25rem;
    }}
    .{prefix}-row .{prefix}-field {{
      display: flex;
      justify-content: space-between;
    }}
    .{prefix}-col .{prefix}-field {{
      display: flex;
      flex-direction: column;
    }}
    .{prefix}-required {{
      color: #ef4444;
    }}
    .{prefix}-input, .{prefix}-textarea, .{prefix}-select {{
      min-width: 200px;
      max-width: 350px;
      padding: 0.25rem 0.75rem;
      box-sizing: border-box;
    }}
    .{prefix}-error {{
      color: #dc2626;
      font-size: 0.75rem;
    }}
    .{prefix}-error-placeholder {{
      color: transparent;
      font-size: 0.75rem;
    }}
    .{prefix}-submit {{
      margin-top: 1rem;
      padding: 0.5rem 3rem;
    }}
  </style>
"#
    )
}
