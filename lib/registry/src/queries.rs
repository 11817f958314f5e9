//! Queries over the schema-description ontology.
//!
//! These are independent of any particular model: they read the description
//! graph that the models are extracted from.

use graphsync_model::vocab::{im, rdfs};
use std::fmt::Write;

/// The header shared by all schema queries.
fn schema_prefix_header() -> String {
    format!("PREFIX rdfs: <{}>\nPREFIX im: <{}>\n", rdfs::NS, im::NS)
}

/// The fixed join over the description ontology: model -> class -> field ->
/// optional subfield, with every attribute column optional.
///
/// Grouping the result rows on `(class, field label)` and then on
/// `(field label, subfield label)` reconstructs the field trees. When
/// `target` is given, the query is restricted to that class.
pub fn schema_extraction_query(target: Option<&str>) -> String {
    let mut query = schema_prefix_header();
    query.push_str(
        "SELECT ?class ?fLabel ?dt ?path ?multi ?analyzed ?optional ?analyzer ?ignore ?filterDeleted \
         ?subfield ?subfieldLabel ?subfieldDatatype ?subfieldPath ?subfieldMulti ?subfieldAnalyzed \
         ?subfieldAnalyzer ?subfieldOptional ?subfieldIgnore WHERE {\n",
    );
    query.push_str("    ?im a im:IndexingModel ; im:indexingModelOf ?class ; im:field ?field .\n");
    query.push_str("    ?field rdfs:label ?fLabel ; im:fieldDatatype ?dt ; im:dataPath ?path .\n");
    query.push_str("    OPTIONAL { ?field im:multivalued ?multi }\n");
    query.push_str("    OPTIONAL { ?field im:analyzed ?analyzed }\n");
    query.push_str("    OPTIONAL { ?field im:optional ?optional }\n");
    query.push_str("    OPTIONAL { ?field im:analyzer ?analyzer }\n");
    query.push_str("    OPTIONAL { ?field im:ignore_above ?ignore }\n");
    query.push_str("    OPTIONAL { ?field im:filterDeleted ?filterDeleted }\n");
    query.push_str("    OPTIONAL {\n");
    query.push_str("        ?field im:subfield ?subfield .\n");
    query.push_str(
        "        ?subfield rdfs:label ?subfieldLabel ; im:fieldDatatype ?subfieldDatatype ; im:dataPath ?subfieldPath .\n",
    );
    query.push_str("        OPTIONAL { ?subfield im:multivalued ?subfieldMulti }\n");
    query.push_str("        OPTIONAL { ?subfield im:analyzed ?subfieldAnalyzed }\n");
    query.push_str("        OPTIONAL { ?subfield im:analyzer ?subfieldAnalyzer }\n");
    query.push_str("        OPTIONAL { ?subfield im:optional ?subfieldOptional }\n");
    query.push_str("        OPTIONAL { ?subfield im:ignore_above ?subfieldIgnore }\n");
    query.push_str("    }\n");
    if let Some(class_uri) = target {
        let _ = writeln!(query, "    FILTER(?class = <{class_uri}>)");
    }
    query.push_str("}\n");
    query
}

/// The namespace prefixes a model declares for its property paths.
pub fn prefix_query(class_uri: &str) -> String {
    let mut query = schema_prefix_header();
    query.push_str("SELECT DISTINCT ?prefix ?namespace WHERE {\n");
    let _ = writeln!(
        query,
        "    ?im a im:IndexingModel ; im:indexingModelOf <{class_uri}> ; im:prefix ?pref ."
    );
    query.push_str("    ?pref rdfs:label ?prefix ; im:value ?namespace .\n");
    query.push_str("}\n");
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_query_joins_models_fields_and_subfields() {
        let query = schema_extraction_query(None);
        assert!(query.contains("?im a im:IndexingModel ; im:indexingModelOf ?class ; im:field ?field ."));
        assert!(query.contains("?field im:subfield ?subfield ."));
        assert!(query.contains("OPTIONAL { ?field im:multivalued ?multi }"));
        assert!(!query.contains("FILTER(?class"));
    }

    #[test]
    fn extraction_query_restricts_to_target_class() {
        let query = schema_extraction_query(Some("https://schema.org/Person"));
        assert!(query.contains("FILTER(?class = <https://schema.org/Person>)"));
    }

    #[test]
    fn prefix_query_reads_label_and_value() {
        let query = prefix_query("https://schema.org/Person");
        assert!(query.contains("im:indexingModelOf <https://schema.org/Person>"));
        assert!(query.contains("?pref rdfs:label ?prefix ; im:value ?namespace ."));
    }
}
