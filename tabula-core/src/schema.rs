// Tables, views and the relations between them, as referenced by fields

use serde::{Deserialize, Serialize};

/// Foreign key from a table's columns to another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub name: String,
    pub foreign_table: String,
    pub local_fields: Vec<String>,
    pub foreign_fields: Vec<String>,
}

/// Join between a local and a foreign table, by field alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub local_table: String,
    pub foreign_table: String,
    pub local_fields: Vec<String>,
    pub foreign_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub alias: Option<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            alias: None,
            foreign_keys: Vec::new(),
        }
    }

    /// One relation per foreign key, with this table on the local side
    pub fn relations(&self) -> Vec<Relation> {
        self.foreign_keys
            .iter()
            .map(|fk| Relation {
                local_table: self.name.clone(),
                foreign_table: fk.foreign_table.clone(),
                local_fields: fk.local_fields.clone(),
                foreign_fields: fk.foreign_fields.clone(),
            })
            .collect()
    }
}

/// A view joins a master table with related tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub master_table: String,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl View {
    pub fn new(name: impl Into<String>, master_table: impl Into<String>) -> Self {
        View {
            name: name.into(),
            master_table: master_table.into(),
            relations: Vec::new(),
        }
    }

    /// Whether some relation joins `table` in as the foreign side
    pub fn joins_foreign(&self, table: &str) -> bool {
        self.relations.iter().any(|r| r.foreign_table == table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_relations_follow_foreign_keys() {
        let mut orders = Table::new("ORDERS");
        orders.foreign_keys.push(ForeignKey {
            name: "FK_CUSTOMER".to_string(),
            foreign_table: "CUSTOMERS".to_string(),
            local_fields: vec!["CUSTOMER_ID".to_string()],
            foreign_fields: vec!["ID".to_string()],
        });
        let relations = orders.relations();
        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].local_table, "ORDERS");
        assert_eq!(relations[0].foreign_table, "CUSTOMERS");
    }
}
