use std::collections::BTreeMap;

/// Describes one output field of an [IndexingModel](crate::IndexingModel).
///
/// A field binds the values reachable through `path` (starting from the parent
/// binding) to the document key `label`. Fields nest recursively through
/// subfields; a field that has subfields never carries a scalar value — it
/// renders as a JSON object, or as an array of objects when multivalued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingField {
    label: String,
    datatype: String,
    path: String,
    multivalued: bool,
    analyzed: bool,
    optional: bool,
    analyzer: Option<String>,
    ignore_above: Option<u32>,
    filter_deleted: bool,
    subfields: BTreeMap<String, IndexingField>,
}

impl IndexingField {
    /// Creates a field with the default attributes of the schema description:
    /// multivalued, analyzed, optional, deletion-filtered.
    pub fn new(
        label: impl Into<String>,
        datatype: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            datatype: datatype.into(),
            path: path.into(),
            multivalued: true,
            analyzed: true,
            optional: true,
            analyzer: None,
            ignore_above: None,
            filter_deleted: true,
            subfields: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_multivalued(&self) -> bool {
        self.multivalued
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn analyzer(&self) -> Option<&str> {
        self.analyzer.as_deref()
    }

    /// `None` when the schema description does not cap the value length.
    pub fn ignore_above(&self) -> Option<u32> {
        self.ignore_above
    }

    pub fn is_filter_deleted(&self) -> bool {
        self.filter_deleted
    }

    pub fn set_multivalued(&mut self, multivalued: bool) {
        self.multivalued = multivalued;
    }

    pub fn set_analyzed(&mut self, analyzed: bool) {
        self.analyzed = analyzed;
    }

    pub fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    pub fn set_analyzer(&mut self, analyzer: impl Into<String>) {
        self.analyzer = Some(analyzer.into());
    }

    pub fn set_ignore_above(&mut self, ignore_above: u32) {
        self.ignore_above = Some(ignore_above);
    }

    pub fn set_filter_deleted(&mut self, filter_deleted: bool) {
        self.filter_deleted = filter_deleted;
    }

    pub fn add_subfield(&mut self, field: IndexingField) {
        self.subfields.insert(field.label.clone(), field);
    }

    pub fn subfield(&self, label: &str) -> Option<&IndexingField> {
        self.subfields.get(label)
    }

    pub fn subfield_mut(&mut self, label: &str) -> Option<&mut IndexingField> {
        self.subfields.get_mut(label)
    }

    pub fn subfields(&self) -> impl Iterator<Item = &IndexingField> {
        self.subfields.values()
    }

    pub fn has_subfields(&self) -> bool {
        !self.subfields.is_empty()
    }

    /// Renders this field's graph-pattern block with `subject` as the parent
    /// binding.
    ///
    /// The block binds `?<label>`, nests the subfield blocks under that
    /// variable, appends the soft-deletion exclusion when the field is
    /// deletion-filtered, and wraps everything in `OPTIONAL` when the field is
    /// optional.
    pub fn pattern_block(&self, subject: &str) -> String {
        let mut block = String::new();

        if self.optional {
            block.push_str("OPTIONAL {\n");
        }

        block.push_str("    ");
        block.push_str(subject);
        block.push(' ');
        block.push_str(&self.path);
        block.push_str(" ?");
        block.push_str(&self.label);
        block.push_str(" .\n");

        let own_binding = format!("?{}", self.label);
        for subfield in self.subfields.values() {
            block.push_str("    ");
            block.push_str(&subfield.pattern_block(&own_binding));
        }

        if self.filter_deleted {
            block.push_str("    FILTER NOT EXISTS { ?");
            block.push_str(&self.label);
            block.push_str(" mnx:hasDeletion/rdf:type mnx:Deletion }\n");
        }

        if self.optional {
            block.push_str("}\n");
        }

        block
    }
}
