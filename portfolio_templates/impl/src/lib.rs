use std::sync::Arc;

use portfolio_di::Build;
use portfolio_templates_contracts::{
    RenderedTemplate, Template, TemplateService, BASE_TEMPLATE, TEMPLATES,
};
use portfolio_utils::trace_instrument;
use tera::Tera;

#[derive(Debug, Clone, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

fn html_name(name: &str) -> String {
    format!("{name}.html")
}

fn text_name(name: &str) -> String {
    format!("{name}.txt")
}

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        let mut templates = vec![("base.html".to_owned(), BASE_TEMPLATE)];
        for &(name, html, text) in TEMPLATES {
            templates.push((html_name(name), html));
            templates.push((text_name(name), text));
        }

        tera.add_raw_templates(templates).unwrap();

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    #[trace_instrument(skip(self, template))]
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<RenderedTemplate> {
        let context = tera::Context::from_serialize(template)?;
        let html = self.state.0.render(&html_name(T::NAME), &context)?;
        let text = self.state.0.render(&text_name(T::NAME), &context)?;
        Ok(RenderedTemplate { html, text })
    }
}

#[cfg(test)]
mod tests {
    use portfolio_templates_contracts::ContactTemplate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_sut() -> TemplateServiceImpl {
        TemplateServiceImpl {
            state: Default::default(),
        }
    }

    #[test]
    fn contact() {
        // Arrange
        let sut = make_sut();
        let template = ContactTemplate {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello".into(),
            message: "Hi there,\nnice portfolio!".into(),
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(result.html.contains("New Contact Form Submission"));
        assert!(result.html.contains("<strong>Name:</strong> Jane Doe"));
        assert!(result.html.contains("<strong>Email:</strong> jane@example.com"));
        assert!(result.html.contains("<strong>Subject:</strong> Hello"));
        assert!(result.html.contains("Hi there,\nnice portfolio!"));
        assert!(result
            .html
            .contains("Reply directly to this email to respond to Jane Doe."));

        assert_eq!(
            result.text.trim_end(),
            "New Contact Form Submission\n\nName: Jane Doe\nEmail: jane@example.com\nSubject: \
             Hello\n\nMessage:\nHi there,\nnice portfolio!\n\n---\nThis message was sent from \
             your portfolio contact form.\nReply directly to this email to respond to Jane \
             Doe."
        );
    }

    #[test]
    fn contact_html_is_escaped() {
        // Arrange
        let sut = make_sut();
        let template = ContactTemplate {
            name: "<b>Mallory</b>".into(),
            email: "mallory@example.com".into(),
            subject: "<script>alert(1)</script>".into(),
            message: "<img src=x onerror=alert(1)>".into(),
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(!result.html.contains("<script>"));
        assert!(!result.html.contains("<img"));
        assert!(!result.html.contains("<b>Mallory</b>"));
        assert!(result.html.contains("&lt;script&gt;"));
        assert!(result.text.contains("<script>alert(1)</script>"));
        assert!(result.text.contains("<img src=x onerror=alert(1)>"));
    }
}
