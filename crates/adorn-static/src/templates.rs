//! Template engine for rendering documentation pages.

use adorn_html::HeadingNode;
use minijinja::{context, Environment};

/// A navigation item.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Child items
    pub children: Vec<NavItem>,
    /// Whether this is the active page
    pub active: bool,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Page description, if any
    pub description: Option<String>,
    /// Site title
    pub site_title: String,
    /// Rendered content HTML
    pub content: String,
    /// Navigation items
    pub nav: Vec<NavItem>,
    /// Heading outline
    pub toc: Vec<HeadingNode>,
    /// Base URL
    pub base_url: String,
    /// Extra stylesheets, relative to the site root
    pub extra_css: Vec<String>,
    /// Extra scripts, relative to the site root
    pub extra_javascript: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)?;
        env.add_template("doc.html", DOC_TEMPLATE)?;
        env.add_template("nav.html", NAV_TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            description => &context.description,
            site_title => &context.site_title,
            content => &context.content,
            nav => &context.nav,
            toc => &context.toc,
            base_url => &context.base_url,
            extra_css => &context.extra_css,
            extra_javascript => &context.extra_javascript,
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  {% if description %}<meta name="description" content="{{ description }}">
  {% endif %}<link rel="stylesheet" href="{{ base_url }}assets/main.css">
  {% for href in extra_css %}<link rel="stylesheet" href="{{ base_url }}{{ href }}">
  {% endfor %}
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {% include "nav.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url }}assets/main.js"></script>
  {% for src in extra_javascript %}<script src="{{ base_url }}{{ src }}"></script>
  {% endfor %}
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  <div class="content">
    {{ content | safe }}
  </div>
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc recursive %}
    <li>
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
      {% if entry.children %}<ul>{{ loop(entry.children) }}</ul>{% endif %}
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const NAV_TEMPLATE: &str = r##"<a href="{{ base_url }}" class="nav-logo">{{ site_title }}</a>
<ul class="nav-list">
{% for item in nav %}
  <li class="nav-item{% if item.active %} active{% endif %}">
    <a href="{{ item.path }}">{{ item.title }}</a>
    {% if item.children %}
    <ul class="nav-children">
      {% for child in item.children %}
      <li class="nav-item{% if child.active %} active{% endif %}">
        <a href="{{ child.path }}">{{ child.title }}</a>
      </li>
      {% endfor %}
    </ul>
    {% endif %}
  </li>
{% endfor %}
</ul>"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context(title: &str) -> Context {
        Context {
            title: title.to_string(),
            description: None,
            site_title: "Docs".to_string(),
            content: String::new(),
            nav: vec![],
            toc: vec![],
            base_url: "/".to_string(),
            extra_css: vec![],
            extra_javascript: vec![],
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new().unwrap();

        let context = Context {
            site_title: "My Docs".to_string(),
            content: "<p>Hello world</p>".to_string(),
            ..context("Install")
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains("<title>Install - My Docs</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(!html.contains("name=\"description\""));
        assert!(!html.contains("On this page"));
    }

    #[test]
    fn renders_navigation() {
        let engine = TemplateEngine::new().unwrap();

        let context = Context {
            nav: vec![
                NavItem {
                    title: "Home".to_string(),
                    path: "/".to_string(),
                    children: vec![],
                    active: true,
                },
                NavItem {
                    title: "Guide".to_string(),
                    path: "/guide/".to_string(),
                    children: vec![NavItem {
                        title: "Setup".to_string(),
                        path: "/guide/setup/".to_string(),
                        children: vec![],
                        active: false,
                    }],
                    active: false,
                },
            ],
            ..context("Home")
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(r#"<li class="nav-item active">"#));
        assert!(html.contains(">Setup</a>"));
        assert!(html.find(">Guide</a>").unwrap() < html.find(">Setup</a>").unwrap());
    }

    #[test]
    fn renders_nested_outline() {
        let engine = TemplateEngine::new().unwrap();

        let mut usage = HeadingNode::new("Usage", "_usage");
        usage.children.push(HeadingNode::new("Flags", "_flags"));
        let context = Context {
            toc: vec![usage, HeadingNode::new("FAQ", "_faq")],
            ..context("Guide")
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(r##"<a href="#_usage">Usage</a>"##));
        assert!(html.contains(r##"<a href="#_flags">Flags</a>"##));
        assert!(html.contains(r##"<a href="#_faq">FAQ</a>"##));
        let usage_at = html.find("#_usage").unwrap();
        let flags_at = html.find("#_flags").unwrap();
        let faq_at = html.find("#_faq").unwrap();
        assert!(usage_at < flags_at && flags_at < faq_at);
    }

    #[test]
    fn includes_extra_assets_and_description() {
        let engine = TemplateEngine::new().unwrap();

        let context = Context {
            description: Some("How to install".to_string()),
            base_url: "/docs/".to_string(),
            extra_css: vec!["assets/asciidoc.css".to_string()],
            extra_javascript: vec!["assets/strip_callouts_like_antora.js".to_string()],
            ..context("Install")
        };

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(r#"<meta name="description" content="How to install">"#));
        assert!(html.contains("asciidoc.css\">"));
        assert!(html.contains("strip_callouts_like_antora.js\"></script>"));
    }
}
