use std::sync::Arc;

use crate::{
    compose::compositor::Compositor,
    document::values::{RuntimeValue, RuntimeValueStore},
    encode::pdf::DocumentEncoder,
    foundation::error::{InkformError, InkformResult},
    model::{binding::FieldBinding, field::FieldConfig, page::PageLayout},
    signature::snapshot::SignatureSnapshot,
    template::runtime::RuntimeTemplate,
};

struct TemplateDocument {
    template: Arc<RuntimeTemplate>,
    layouts: Vec<PageLayout>,
    values: RuntimeValueStore,
    compositor: Compositor,
    encoder: Arc<dyn DocumentEncoder>,
}

enum Backing {
    Template(Box<TemplateDocument>),
    Bytes(Arc<Vec<u8>>),
}

/// A fillable document, or a pre-rendered one wrapped as bytes.
///
/// Template-backed documents own a value store that [`Self::generate`] composites onto the
/// resolved template. Byte-backed documents only return their bytes; every template operation
/// fails with [`InkformError::InvalidState`].
pub struct Document {
    backing: Backing,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.backing {
            Backing::Template(t) => f
                .debug_struct("Document")
                .field("source", &t.template.source())
                .field("pages", &t.template.pages().len())
                .finish_non_exhaustive(),
            Backing::Bytes(b) => f.debug_struct("Document").field("bytes", &b.len()).finish(),
        }
    }
}

impl Document {
    pub(crate) fn from_template(
        template: Arc<RuntimeTemplate>,
        layouts: Vec<PageLayout>,
        compositor: Compositor,
        encoder: Arc<dyn DocumentEncoder>,
    ) -> Self {
        Self {
            backing: Backing::Template(Box::new(TemplateDocument {
                template,
                layouts,
                values: RuntimeValueStore::new(),
                compositor,
                encoder,
            })),
        }
    }

    /// Wrap an already rendered document.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            backing: Backing::Bytes(Arc::new(bytes.into())),
        }
    }

    /// `true` for documents created with [`Self::from_bytes`].
    pub fn is_byte_backed(&self) -> bool {
        matches!(self.backing, Backing::Bytes(_))
    }

    fn inner(&self) -> InkformResult<&TemplateDocument> {
        match &self.backing {
            Backing::Template(t) => Ok(t.as_ref()),
            Backing::Bytes(_) => Err(byte_backed()),
        }
    }

    fn inner_mut(&mut self) -> InkformResult<&mut TemplateDocument> {
        match &mut self.backing {
            Backing::Template(t) => Ok(t.as_mut()),
            Backing::Bytes(_) => Err(byte_backed()),
        }
    }

    /// Runtime values and signatures.
    pub fn values(&self) -> InkformResult<&RuntimeValueStore> {
        Ok(&self.inner()?.values)
    }

    /// Mutable runtime values and signatures.
    pub fn values_mut(&mut self) -> InkformResult<&mut RuntimeValueStore> {
        Ok(&mut self.inner_mut()?.values)
    }

    /// Set or remove (`None`) the value bound to `binding`.
    pub fn set_value<V: Into<RuntimeValue>>(
        &mut self,
        binding: &str,
        value: Option<V>,
    ) -> InkformResult<()> {
        let values = self.values_mut()?;
        values.set_value(&FieldBinding::new(binding)?, value);
        Ok(())
    }

    /// Set or remove (`None`) a text value.
    pub fn set_text(&mut self, binding: &str, text: Option<&str>) -> InkformResult<()> {
        self.set_value(binding, text)
    }

    /// Store a signature; `None` or a snapshot without ink clears it.
    pub fn set_signature(
        &mut self,
        binding: &str,
        snapshot: Option<SignatureSnapshot>,
    ) -> InkformResult<()> {
        let values = self.values_mut()?;
        values.set_signature(&FieldBinding::new(binding)?, snapshot);
        Ok(())
    }

    /// Value bound to `binding`.
    pub fn value(&self, binding: &str) -> InkformResult<Option<&RuntimeValue>> {
        let values = self.values()?;
        Ok(values.value(&FieldBinding::new(binding)?))
    }

    /// Signature captured for `binding`.
    pub fn signature(&self, binding: &str) -> InkformResult<Option<&SignatureSnapshot>> {
        let values = self.values()?;
        Ok(values.signature(&FieldBinding::new(binding)?))
    }

    /// Every field of the resolved template, page by page.
    pub fn fields(&self) -> InkformResult<Vec<&FieldConfig>> {
        Ok(self.inner()?.template.fields().collect())
    }

    /// Layouts the document was declared with.
    pub fn layouts(&self) -> InkformResult<&[PageLayout]> {
        Ok(&self.inner()?.layouts)
    }

    /// Resolved template.
    pub fn template(&self) -> InkformResult<&Arc<RuntimeTemplate>> {
        Ok(&self.inner()?.template)
    }

    /// Composite the current values onto the template and encode the result.
    ///
    /// Byte-backed documents return a copy of their bytes. The value store is not modified, so
    /// repeated calls produce independent outputs.
    #[tracing::instrument(skip(self), fields(byte_backed = self.is_byte_backed()))]
    pub fn generate(&self) -> InkformResult<Vec<u8>> {
        match &self.backing {
            Backing::Bytes(bytes) => Ok(bytes.to_vec()),
            Backing::Template(t) => {
                let out = t
                    .compositor
                    .generate(&t.template, &t.values, t.encoder.as_ref())?;
                tracing::debug!(bytes = out.len(), "document generated");
                Ok(out)
            }
        }
    }
}

fn byte_backed() -> InkformError {
    InkformError::invalid_state("document is byte-backed and has no template")
}

#[cfg(test)]
#[path = "../../tests/unit/document/doc.rs"]
mod tests;
