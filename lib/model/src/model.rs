use crate::vocab::{mnx, rdf};
use crate::{class_label, index_name, ConfigurationError, IndexingField};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Declarative mapping from one RDF class to one search-index document shape.
///
/// Models are created and refreshed by the registry whenever the schema
/// description changes for their class; document assembly never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingModel {
    class_uri: String,
    class_label: String,
    index_name: String,
    prefixes: BTreeMap<String, String>,
    fields: BTreeMap<String, IndexingField>,
}

impl IndexingModel {
    /// Creates an empty model for `class_uri`.
    ///
    /// The class label is the local name of the URI and the target index name
    /// is derived from it; an illegal derived index name fails hard and keeps
    /// the class out of the registry.
    pub fn new(class_uri: impl Into<String>) -> Result<Self, ConfigurationError> {
        let class_uri = class_uri.into();
        let class_label = class_label(&class_uri);
        let index_name = index_name(&class_label)?;
        Ok(Self {
            class_uri,
            class_label,
            index_name,
            prefixes: BTreeMap::new(),
            fields: BTreeMap::new(),
        })
    }

    pub fn class_uri(&self) -> &str {
        &self.class_uri
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    /// The document-store index receiving this model's documents.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    pub fn add_field(&mut self, field: IndexingField) {
        self.fields.insert(field.label().to_owned(), field);
    }

    pub fn field(&self, label: &str) -> Option<&IndexingField> {
        self.fields.get(label)
    }

    pub fn field_mut(&mut self, label: &str) -> Option<&mut IndexingField> {
        self.fields.get_mut(label)
    }

    pub fn fields(&self) -> impl Iterator<Item = &IndexingField> {
        self.fields.values()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The prefix declarations heading every query synthesized from this
    /// model. `rdf` and `mnx` are always available because the deletion
    /// filter relies on them.
    pub fn prefix_header(&self) -> String {
        let mut header = String::new();
        for (prefix, namespace) in &self.prefixes {
            let _ = writeln!(header, "PREFIX {prefix}: <{namespace}>");
        }
        if !self.prefixes.contains_key("rdf") {
            let _ = writeln!(header, "PREFIX rdf: <{}>", rdf::NS);
        }
        if !self.prefixes.contains_key("mnx") {
            let _ = writeln!(header, "PREFIX mnx: <{}>", mnx::NS);
        }
        header
    }

    /// SPARQL query enumerating the instances of the model's class.
    ///
    /// Restricted to IRIs: blank nodes have no stable identity to key a
    /// document on.
    pub fn instance_enumeration_query(&self) -> String {
        let mut query = self.prefix_header();
        query.push_str("SELECT DISTINCT ?instance WHERE {\n");
        let _ = writeln!(query, "    ?instance a <{}> .", self.class_uri);
        query.push_str("    FILTER(isIRI(?instance))\n}\n");
        query
    }

    /// SPARQL query describing one instance of this model.
    ///
    /// Binds `?instance` to the given URI and emits one pattern block per
    /// top-level field. The result table is the cross-product of all
    /// multivalued matches; collapsing it into correct multiplicity is the
    /// document assembler's job.
    pub fn instance_description_query(&self, instance_uri: &str) -> String {
        let mut query = self.prefix_header();
        query.push_str("SELECT DISTINCT * WHERE {\n");
        let _ = writeln!(query, "    VALUES ?instance {{ <{instance_uri}> }}");
        for field in self.fields.values() {
            query.push_str(&field.pattern_block("?instance"));
        }
        query.push_str("}\n");
        query
    }

    /// Existence check covering the model's class membership and non-optional
    /// fields.
    ///
    /// An empty result means the instance does not satisfy the model's
    /// required fields and no document may be produced for it. Models whose
    /// fields are all optional only check class membership.
    pub fn completeness_query(&self, instance_uri: &str) -> String {
        let mut query = self.prefix_header();
        query.push_str("SELECT ?instance WHERE {\n");
        let _ = writeln!(query, "    VALUES ?instance {{ <{instance_uri}> }}");
        let _ = writeln!(query, "    ?instance a <{}> .", self.class_uri);
        for field in self.fields.values().filter(|f| !f.is_optional()) {
            query.push_str(&field.pattern_block("?instance"));
        }
        query.push_str("}\nLIMIT 1\n");
        query
    }
}
