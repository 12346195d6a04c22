use clap::{Parser, Subcommand};
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tabula_core::definition::FieldListDef;
use tabula_core::json::{value_from_json, value_to_json};
use tabula_core::messages::{MessageSource, MessageTemplates};
use tabula_core::properties::FieldProperties;
use tabula_core::{FieldList, Order, Record};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Validate, sort and describe typed records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every row against the field validators
    Validate {
        /// Schema definition file
        #[arg(short, long)]
        schema: PathBuf,

        /// Rows as a JSON array of objects keyed by alias
        #[arg(short, long)]
        data: PathBuf,

        /// Message templates overriding the English defaults
        #[arg(short, long)]
        messages: Option<PathBuf>,
    },
    /// Print rows ordered by the primary key or by the given fields
    Sort {
        /// Schema definition file
        #[arg(short, long)]
        schema: PathBuf,

        /// Rows as a JSON array of objects keyed by alias
        #[arg(short, long)]
        data: PathBuf,

        /// Sort field as ALIAS or ALIAS:desc, repeatable
        #[arg(long)]
        by: Vec<String>,
    },
    /// Show the field metadata of a schema
    Describe {
        /// Schema definition file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

/// One row of a data file, keyed by field alias
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(transparent)]
struct JsonRow {
    values: serde_json::Map<String, serde_json::Value>,
}

impl JsonRow {
    fn from_record(fields: &FieldList, record: &Record) -> Result<Self> {
        let mut row = JsonRow::default();
        for (index, field) in fields.iter().enumerate() {
            row.values
                .insert(field.alias().to_string(), value_to_json(&record.value(index)?));
        }
        Ok(row)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Validate {
            schema,
            data,
            messages,
        } => {
            validate_rows(schema, data, messages.as_deref())?;
        }
        Commands::Sort { schema, data, by } => {
            sort_rows(schema, data, by)?;
        }
        Commands::Describe { schema } => {
            describe_schema(schema)?;
        }
    }

    Ok(())
}

fn load_fields(path: &Path, messages: Option<Rc<dyn MessageSource>>) -> Result<Rc<FieldList>> {
    let def = FieldListDef::from_json(&fs::read_to_string(path)?)?;
    let fields = def.to_field_list(messages)?;
    info!(path = %path.display(), fields = fields.len(), "loaded schema");
    Ok(Rc::new(fields))
}

fn load_records(fields: &Rc<FieldList>, path: &Path) -> Result<Vec<Record>> {
    let rows: Vec<JsonRow> = serde_json::from_str(&fs::read_to_string(path)?)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, JsonRow { values: object }) in rows.iter().enumerate() {
        for key in object.keys().filter(|key| !fields.contains(key)) {
            warn!(row, key = %key, "ignoring unknown field");
        }

        let mut values = Vec::with_capacity(fields.len());
        for field in fields.iter() {
            let json = object.get(field.alias()).unwrap_or(&serde_json::Value::Null);
            let value = value_from_json(field.kind(), json)
                .map_err(|e| eyre::eyre!("Row {}, field {}: {}", row, field.alias(), e))?;
            values.push(value);
        }
        records.push(Record::with_values(Rc::clone(fields), values)?);
    }

    info!(path = %path.display(), rows = records.len(), "loaded rows");
    Ok(records)
}

fn validate_rows(schema: &Path, data: &Path, messages: Option<&Path>) -> Result<()> {
    println!("Validating {} against {}", data.display(), schema.display());

    let templates = match messages {
        Some(path) => MessageTemplates::from_json(&fs::read_to_string(path)?)?,
        None => MessageTemplates::english(),
    };
    let fields = load_fields(schema, Some(Rc::new(templates)))?;
    let records = load_records(&fields, data)?;

    let mut failures = 0;
    for (row, record) in records.iter().enumerate() {
        for (index, field) in fields.iter().enumerate() {
            let value = record.value(index)?;
            if let Some(message) = field.validation_message(&value) {
                println!("Row {}: {}", row, message);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(eyre::eyre!("Validation: FAIL - {} problems", failures));
    }
    println!("Validation: PASS ({} rows)", records.len());
    Ok(())
}

fn parse_order(fields: &FieldList, by: &[String]) -> Result<Order> {
    let mut order = Order::new();
    for spec in by {
        let (alias, direction) = spec.split_once(':').unwrap_or((spec.as_str(), "asc"));
        let field = fields
            .field_by_alias(alias)
            .ok_or_else(|| eyre::eyre!("Unknown sort field: {}", alias))?
            .clone();
        match direction {
            "asc" => order.ascending(field),
            "desc" => order.descending(field),
            _ => return Err(eyre::eyre!("Unknown sort direction: {}", direction)),
        };
    }
    Ok(order)
}

fn sort_rows(schema: &Path, data: &Path, by: &[String]) -> Result<()> {
    let fields = load_fields(schema, None)?;
    let records = load_records(&fields, data)?;

    let order = if by.is_empty() {
        fields.primary_order().clone()
    } else {
        parse_order(&fields, by)?
    };
    if order.is_empty() {
        warn!("no primary key and no sort fields, keeping input order");
    }

    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        keyed.push((record.order_key(&order)?, record));
    }

    let mut failure = None;
    keyed.sort_by(|(a, _), (b, _)| {
        a.compare(b).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Ordering::Equal
        })
    });
    if let Some(e) = failure {
        return Err(e.into());
    }

    let rows = keyed
        .iter()
        .map(|(_, record)| JsonRow::from_record(&fields, record))
        .collect::<Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn describe_schema(schema: &Path) -> Result<()> {
    let fields = load_fields(schema, None)?;
    let properties = FieldProperties::new();

    println!("{}", properties.field_list().aliases().join("\t"));
    for field in fields.iter() {
        let record = properties.record(field)?;
        let cells = record.values().iter().map(|v| v.to_string()).collect::<Vec<_>>();
        println!("{}", cells.join("\t"));
    }

    let primary_key = fields
        .primary_key_fields()
        .iter()
        .map(|field| field.alias())
        .collect::<Vec<_>>();
    println!("Primary key: {}", primary_key.join(", "));
    if let Some(main) = fields.iter().find(|field| field.is_main_description()) {
        println!("Main description: {}", main.alias());
    }
    Ok(())
}
