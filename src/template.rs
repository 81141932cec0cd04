use crate::{
    bundle::BundleDocument,
    error::{Error, Result},
};
use serde::Serialize;
use tera::{Context, Tera};

const BUNDLE_TEMPLATE: &str = "bundle.md";

#[derive(Serialize)]
struct DocumentView<'a> {
    title: &'a str,
    files: Vec<FragmentView<'a>>,
}

#[derive(Serialize)]
struct FragmentView<'a> {
    path: &'a str,
    language: &'a str,
    fence: String,
    content: &'a str,
}

/// Template engine rendering a [`BundleDocument`] to Markdown.
pub(crate) struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Creates a new template engine with the built-in bundle template.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in template fails to parse.
    pub(crate) fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_template(BUNDLE_TEMPLATE, include_str!("../templates/bundle.md.tera"))
            .map_err(|e| Error::template(BUNDLE_TEMPLATE, &e))?;

        Ok(Self { tera })
    }

    /// Renders the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub(crate) fn render(&self, document: &BundleDocument) -> Result<String> {
        let view = DocumentView {
            title: document.title(),
            files: document
                .fragments()
                .iter()
                .map(|fragment| FragmentView {
                    path: &fragment.path,
                    language: fragment.language,
                    fence: fragment.fence(),
                    content: &fragment.content,
                })
                .collect(),
        };

        let context =
            Context::from_serialize(&view).map_err(|e| Error::template(BUNDLE_TEMPLATE, &e))?;

        self.tera
            .render(BUNDLE_TEMPLATE, &context)
            .map_err(|e| Error::template(BUNDLE_TEMPLATE, &e))
    }
}
