//! Vocabularies used by the synthesized queries and the change classifier.

pub mod im {
    //! The indexing-model description ontology.
    //!
    //! Instances of `im:IndexingModel` declare, inside the graph store itself,
    //! how a class's instances map to search-index documents.

    use oxrdf::NamedNodeRef;

    pub const NS: &str = "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#";

    pub const INDEXING_MODEL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#IndexingModel",
    );

    // Object properties linking the parts of a model description.
    pub const FIELD: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#field",
    );
    pub const INDEXING_MODEL_OF: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#indexingModelOf",
    );
    pub const PREFIX: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#prefix",
    );
    pub const SUBFIELD: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#subfield",
    );

    // Datatype properties describing field attributes.
    pub const ANALYZED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#analyzed",
    );
    pub const ANALYZER: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#analyzer",
    );
    pub const DATA_PATH: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#dataPath",
    );
    pub const FIELD_DATATYPE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#fieldDatatype",
    );
    pub const FILTER_DELETED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#filterDeleted",
    );
    pub const IGNORE_ABOVE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#ignore_above",
    );
    pub const MULTIVALUED: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#multivalued",
    );
    pub const OPTIONAL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#optional",
    );
    pub const VALUE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://ns.mnemotix.com/ontologies/2019/1/indexing-model#value",
    );

    /// Object properties of the description ontology, the closed set used for
    /// schema-edge classification.
    pub const OBJECT_PROPERTIES: [NamedNodeRef<'_>; 4] =
        [FIELD, INDEXING_MODEL_OF, PREFIX, SUBFIELD];

    /// Datatype properties of the description ontology, the closed set used
    /// for schema-edge classification.
    pub const DATATYPE_PROPERTIES: [NamedNodeRef<'_>; 8] = [
        ANALYZED,
        ANALYZER,
        DATA_PATH,
        FILTER_DELETED,
        IGNORE_ABOVE,
        MULTIVALUED,
        OPTIONAL,
        VALUE,
    ];

    pub fn is_object_property(uri: &str) -> bool {
        OBJECT_PROPERTIES.iter().any(|p| p.as_str() == uri)
    }

    pub fn is_datatype_property(uri: &str) -> bool {
        DATATYPE_PROPERTIES.iter().any(|p| p.as_str() == uri)
    }

    /// Whether `uri` governs the description of indexing models rather than
    /// application data. Membership is decided by predicate URI only.
    pub fn is_schema_property(uri: &str) -> bool {
        is_object_property(uri) || is_datatype_property(uri)
    }
}

pub mod mnx {
    //! Soft-deletion markers from the surrounding data-model ontology.

    pub const NS: &str = "http://ns.mnemotix.com/ontologies/2019/1/datamodel#";
}

pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
}

pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
}
