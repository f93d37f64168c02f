//! Cypher text built from fixture data.
//!
//! Labels and relationship types cannot be parameters, so they are quoted
//! with backticks. Everything else goes through query parameters.

/// Deletes up to `$limit` nodes with their relationships.
pub const DELETE_BATCH: &str = "MATCH (n) WITH n LIMIT $limit DETACH DELETE n RETURN count(*) AS deleted";

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `:`A`:`B`` for the given labels (empty when there are none).
pub fn label_clause(labels: &[String]) -> String {
    labels.iter().map(|l| format!(":{}", quote_identifier(l))).collect()
}

/// CREATE statement for a node with `$props`, returning its element id.
pub fn create_node(labels: &[String]) -> String {
    format!(
        "CREATE (n{} $props) RETURN elementId(n) AS id",
        label_clause(labels)
    )
}

/// CREATE statement for a relationship between `$from` and `$to` element ids.
pub fn create_relationship(rel_type: &str) -> String {
    format!(
        "MATCH (a), (b) WHERE elementId(a) = $from AND elementId(b) = $to \
         CREATE (a)-[r:{} $props]->(b) RETURN count(r) AS created",
        quote_identifier(rel_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("User"), "`User`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_create_node() {
        let labels = vec!["User".to_string(), "Admin".to_string()];
        assert_eq!(
            create_node(&labels),
            "CREATE (n:`User`:`Admin` $props) RETURN elementId(n) AS id"
        );
        assert_eq!(create_node(&[]), "CREATE (n $props) RETURN elementId(n) AS id");
    }

    #[test]
    fn test_create_relationship() {
        let cypher = create_relationship("HAS_ROLE");
        assert!(cypher.contains("CREATE (a)-[r:`HAS_ROLE` $props]->(b)"));
        assert!(cypher.contains("elementId(a) = $from"));
    }
}
