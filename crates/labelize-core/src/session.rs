//! Labelize session
//!
//! A [`Session`] owns the one taxonomy and the one document being edited and
//! routes every operation through the codecs. Each call either applies fully
//! or fails with the session unchanged; callers re-read state afterwards.
//!
//! # Workflow
//! 1. `load_document` / `load_from`: descriptor → taxonomy (or inference), markers → mentions
//! 2. taxonomy edits and `apply_label` / `set_parameter_value` / `remove_mention`
//! 3. `serialize_for_save` / `save_to`: strip affordances, sync colors, embed descriptor

use crate::config::LabelizeConfig;
use crate::error::{SessionError, SessionResult};
use crate::fingerprint::Fingerprint;
use crate::io::{DocumentSink, DocumentSource};
use crate::stats::SessionStats;
use labelize_document::{infer_taxonomy, CodecError, Document, Mention, MentionCodec, MentionId, SchemaCodec, Selection};
use labelize_taxonomy::{Label, LabelPath, LabelTaxonomy, Palette, ParameterSpec};
use serde::Serialize;

/// Where the current taxonomy came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyOrigin {
    /// Built by hand; no document loaded yet
    New,
    /// Read from the embedded descriptor
    Descriptor,
    /// Inferred from markers; the document had no descriptor
    Inferred,
    /// Inferred from markers after the descriptor failed to parse
    Recovered,
}

/// Editing session over one document
#[derive(Debug)]
pub struct Session {
    config: LabelizeConfig,
    taxonomy: LabelTaxonomy,
    document: Option<Document>,
    origin: TaxonomyOrigin,
    file_name: Option<String>,
    mentions: MentionCodec,
    schema: SchemaCodec,
    palette: Palette,
    saved: Fingerprint,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new(config: LabelizeConfig) -> Self {
        let palette = config.palette();
        let schema = SchemaCodec::new(config.markup.schema_sentinel.clone());
        let mut session = Self {
            config,
            taxonomy: LabelTaxonomy::new(),
            document: None,
            origin: TaxonomyOrigin::New,
            file_name: None,
            mentions: MentionCodec::new(),
            schema,
            palette,
            saved: Fingerprint::of_parts(std::iter::empty::<&[u8]>()),
        };
        session.mark_saved();
        session
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LabelizeConfig {
        &self.config
    }

    /// Current taxonomy
    #[inline]
    #[must_use]
    pub fn taxonomy(&self) -> &LabelTaxonomy {
        &self.taxonomy
    }

    /// Loaded document, if any
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Source of the current taxonomy
    #[inline]
    #[must_use]
    pub fn origin(&self) -> TaxonomyOrigin {
        self.origin
    }

    /// Parse `text` and rebuild taxonomy and mentions from it
    ///
    /// A missing or malformed descriptor is not an error: label definitions
    /// are then inferred from the markers.
    pub fn load_document(&mut self, text: &str) -> (&LabelTaxonomy, Vec<Mention>) {
        let document = Document::parse(text, &self.config.markup);

        let (taxonomy, origin) = match self.schema.try_extract(&document) {
            Ok(Some(descriptor)) => match self.schema.build(&descriptor) {
                Ok(taxonomy) => (taxonomy, TaxonomyOrigin::Descriptor),
                Err(error) => {
                    tracing::warn!(%error, "descriptor rejected, inferring labels from markers");
                    (infer_taxonomy(&document, &mut self.palette), TaxonomyOrigin::Recovered)
                }
            },
            Ok(None) => (infer_taxonomy(&document, &mut self.palette), TaxonomyOrigin::Inferred),
            Err(error) => {
                tracing::warn!(%error, "descriptor unreadable, inferring labels from markers");
                (infer_taxonomy(&document, &mut self.palette), TaxonomyOrigin::Recovered)
            }
        };

        let mentions = self.mentions.decode_all(&document, &taxonomy);
        tracing::info!(
            labels = taxonomy.label_count(),
            mentions = mentions.len(),
            origin = ?origin,
            "document loaded"
        );

        self.taxonomy = taxonomy;
        self.document = Some(document);
        self.origin = origin;
        self.file_name = None;
        self.mark_saved();
        (&self.taxonomy, mentions)
    }

    /// Read a document from `source` and load it
    ///
    /// The source name becomes the suggested file name for saving.
    ///
    /// # Errors
    /// Whatever `source` reports; the session is unchanged on failure
    pub async fn load_from<S>(&mut self, source: &S) -> SessionResult<(&LabelTaxonomy, Vec<Mention>)>
    where
        S: DocumentSource + ?Sized,
    {
        let text = source.read().await?;
        let mentions = self.load_document(&text).1;
        self.file_name = source.name();
        Ok((&self.taxonomy, mentions))
    }

    /// Locate the `nth` occurrence of `needle` in the document text
    ///
    /// # Errors
    /// `NoDocument`, or `InvalidSelection` if there is no such occurrence
    pub fn select_text(&self, needle: &str, nth: usize) -> SessionResult<Selection> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        document.find_nth_text(needle, nth).ok_or_else(|| {
            CodecError::InvalidSelection(format!("occurrence {nth} of {needle:?} not found")).into()
        })
    }

    /// Tag `selection` with the label at `path`
    ///
    /// # Errors
    /// `NoDocument`, `UnknownLabel`, `InvalidSelection`, or `EmptySelection`
    /// for whitespace-only selections (the document is left untouched)
    pub fn apply_label(&mut self, selection: &Selection, path: &LabelPath) -> SessionResult<Mention> {
        let document = self.document.as_mut().ok_or(SessionError::NoDocument)?;
        Ok(self.mentions.encode(document, selection, path, &self.taxonomy)?)
    }

    /// Change one parameter value of one mention
    ///
    /// # Errors
    /// `NoDocument`, `UnknownMention`, `UnknownParameter`, `InvalidValue`
    pub fn set_parameter_value(&mut self, id: MentionId, name: &str, value: &str) -> SessionResult<Mention> {
        let document = self.document.as_mut().ok_or(SessionError::NoDocument)?;
        Ok(self
            .mentions
            .set_parameter_value(document, id, name, value, &self.taxonomy)?)
    }

    /// Revert a mention to plain text, returning that text
    ///
    /// # Errors
    /// `NoDocument` or `UnknownMention`
    pub fn remove_mention(&mut self, id: MentionId) -> SessionResult<String> {
        let document = self.document.as_mut().ok_or(SessionError::NoDocument)?;
        Ok(self.mentions.remove(document, id)?)
    }

    /// All mentions in document order
    #[must_use]
    pub fn mentions(&self) -> Vec<Mention> {
        self.document
            .as_ref()
            .map(|document| self.mentions.decode_all(document, &self.taxonomy))
            .unwrap_or_default()
    }

    /// One mention by id
    ///
    /// # Errors
    /// `NoDocument` or `UnknownMention`
    pub fn mention(&self, id: MentionId) -> SessionResult<Mention> {
        let document = self.document.as_ref().ok_or(SessionError::NoDocument)?;
        Ok(self.mentions.decode_one(document, id, &self.taxonomy)?)
    }

    /// Add a label; without `color` one is drawn from the palette
    ///
    /// # Errors
    /// As [`LabelTaxonomy::add_label`]
    pub fn add_label(&mut self, parent: &LabelPath, name: &str, color: Option<&str>) -> SessionResult<&Label> {
        let color = match color {
            Some(color) => color.to_string(),
            None => self.palette.next_color(),
        };
        Ok(self.taxonomy.add_label(parent, name, &color)?)
    }

    /// Remove a label and its subtree
    ///
    /// Mentions of removed labels stay in the document, unresolved.
    ///
    /// # Errors
    /// `UnknownPath`
    pub fn remove_label(&mut self, path: &LabelPath) -> SessionResult<Label> {
        Ok(self.taxonomy.remove_label(path)?)
    }

    /// Recolor a label
    ///
    /// # Errors
    /// `UnknownPath` or `InvalidColor`
    pub fn set_label_color(&mut self, path: &LabelPath, color: &str) -> SessionResult<()> {
        Ok(self.taxonomy.set_color(path, color)?)
    }

    /// Insert or overwrite a parameter spec
    ///
    /// Existing mentions keep their values.
    ///
    /// # Errors
    /// As [`LabelTaxonomy::add_parameter`]
    pub fn add_parameter(
        &mut self,
        path: &LabelPath,
        name: &str,
        spec: ParameterSpec,
    ) -> SessionResult<Option<ParameterSpec>> {
        Ok(self.taxonomy.add_parameter(path, name, spec)?)
    }

    /// Delete a parameter spec
    ///
    /// # Errors
    /// `UnknownPath` or `UnknownParameter`
    pub fn remove_parameter(&mut self, path: &LabelPath, name: &str) -> SessionResult<ParameterSpec> {
        Ok(self.taxonomy.remove_parameter(path, name)?)
    }

    /// Rename and/or retype a parameter in place
    ///
    /// # Errors
    /// As [`LabelTaxonomy::rename_parameter`]
    pub fn rename_parameter(
        &mut self,
        path: &LabelPath,
        old_name: &str,
        new_name: &str,
        spec: ParameterSpec,
    ) -> SessionResult<()> {
        Ok(self.taxonomy.rename_parameter(path, old_name, new_name, spec)?)
    }

    /// Every label path, for pickers
    #[must_use]
    pub fn label_options(&self) -> Vec<LabelPath> {
        self.taxonomy.label_paths()
    }

    /// Final document text with the descriptor embedded
    ///
    /// Drops delete affordances and syncs marker colors with the taxonomy
    /// first. The session keeps the normalized document.
    ///
    /// # Errors
    /// `NoDocument`, or `Schema` if the descriptor cannot be serialized
    pub fn serialize_for_save(&mut self) -> SessionResult<String> {
        let document = self.document.as_mut().ok_or(SessionError::NoDocument)?;
        document.strip_affordances();
        self.mentions.refresh_styles(document, &self.taxonomy);
        self.schema.embed(document, &self.taxonomy)?;
        Ok(document.render())
    }

    /// File name offered when saving
    #[must_use]
    pub fn suggested_filename(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.config.default_filename)
    }

    /// Serialize and hand the text to `sink`, returning the suggested name
    ///
    /// # Errors
    /// As [`serialize_for_save`](Self::serialize_for_save), plus sink failures
    pub async fn save_to<S>(&mut self, sink: &S) -> SessionResult<String>
    where
        S: DocumentSink + ?Sized,
    {
        let text = self.serialize_for_save()?;
        let name = self.suggested_filename().to_string();
        sink.write(&text, &name).await?;
        self.mark_saved();
        tracing::info!(file = %name, bytes = text.len(), "document saved");
        Ok(name)
    }

    /// Mention and label counts
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        SessionStats::collect(&self.taxonomy, &self.mentions())
    }

    /// True if anything changed since the last load or save
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.fingerprint() != self.saved
    }

    /// Drop the document and every label
    pub fn clear(&mut self) {
        self.taxonomy.clear();
        self.document = None;
        self.file_name = None;
        self.origin = TaxonomyOrigin::New;
        self.mark_saved();
        tracing::info!("session cleared");
    }

    fn fingerprint(&self) -> Fingerprint {
        let rendered = self.document.as_ref().map(Document::render).unwrap_or_default();
        let descriptor = serde_json::to_vec(&self.schema.describe(&self.taxonomy)).unwrap_or_default();
        Fingerprint::of_parts([rendered.as_bytes(), descriptor.as_slice()])
    }

    fn mark_saved(&mut self) {
        self.saved = self.fingerprint();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LabelizeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "<html><head></head><body><p>Marie Curie was born in Warsaw.</p></body></html>";

    fn session() -> Session {
        let mut s = Session::new(LabelizeConfig::default().with_color_seed(1));
        s.load_document(PAGE);
        s.add_label(&LabelPath::root(), "Person", Some("#6aa3ff")).unwrap();
        s
    }

    #[test]
    fn operations_need_a_document() {
        let mut s = Session::default();
        let sel = Selection::new(0, 0..1);
        assert!(matches!(
            s.apply_label(&sel, &LabelPath::single("X")),
            Err(SessionError::NoDocument)
        ));
        assert!(matches!(s.serialize_for_save(), Err(SessionError::NoDocument)));
        assert!(s.mentions().is_empty());
    }

    #[test]
    fn plain_document_loads_with_empty_taxonomy() {
        let mut s = Session::default();
        let (taxonomy, mentions) = s.load_document(PAGE);
        assert!(taxonomy.is_empty());
        assert!(mentions.is_empty());
        assert_eq!(s.origin(), TaxonomyOrigin::Inferred);
        assert!(!s.is_dirty());
    }

    #[test]
    fn failed_apply_leaves_session_unchanged() {
        let mut s = session();
        let before = s.document().unwrap().render();
        let sel = s.select_text(" ", 0).unwrap();
        assert!(matches!(
            s.apply_label(&sel, &LabelPath::single("Person")),
            Err(SessionError::Codec(CodecError::EmptySelection))
        ));
        let sel = s.select_text("Warsaw", 0).unwrap();
        assert!(matches!(
            s.apply_label(&sel, &LabelPath::single("City")),
            Err(SessionError::Codec(CodecError::UnknownLabel(_)))
        ));
        assert_eq!(s.document().unwrap().render(), before);
    }

    #[test]
    fn dirty_tracking_follows_edits_and_saves() {
        let mut s = session();
        assert!(s.is_dirty());
        s.serialize_for_save().unwrap();
        s.mark_saved();
        assert!(!s.is_dirty());

        let sel = s.select_text("Warsaw", 0).unwrap();
        s.apply_label(&sel, &LabelPath::single("Person")).unwrap();
        assert!(s.is_dirty());
    }

    #[test]
    fn palette_colors_new_labels() {
        let mut s = session();
        let color = s.add_label(&LabelPath::root(), "Place", None).unwrap().color().to_string();
        assert!(labelize_taxonomy::DEFAULT_PALETTE.contains(&color.as_str()));
    }

    #[test]
    fn stats_count_mentions_and_labels() {
        let mut s = session();
        s.add_label(&LabelPath::single("Person"), "Author", None).unwrap();
        let sel = s.select_text("Marie Curie", 0).unwrap();
        s.apply_label(&sel, &LabelPath::single("Person")).unwrap();

        let stats = s.stats();
        assert_eq!(stats.total_mentions, 1);
        assert_eq!(stats.label_types, 2);
        assert_eq!(stats.mentions_per_label["Person"], 1);
        assert_eq!(stats.mentions_per_label["Person/Author"], 0);
    }

    #[test]
    fn removed_label_leaves_unresolved_mentions() {
        let mut s = session();
        let sel = s.select_text("Marie Curie", 0).unwrap();
        s.apply_label(&sel, &LabelPath::single("Person")).unwrap();
        s.remove_label(&LabelPath::single("Person")).unwrap();

        let mentions = s.mentions();
        assert_eq!(mentions.len(), 1);
        assert!(!mentions[0].resolved);
        assert_eq!(s.stats().unresolved_mentions, 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = session();
        s.clear();
        assert!(s.taxonomy().is_empty());
        assert!(s.document().is_none());
        assert_eq!(s.suggested_filename(), "labeled.html");
        assert!(!s.is_dirty());
    }
}
