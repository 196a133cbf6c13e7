//! Show command
//!
//! Usage: lazycols show --db <PATH> --table <TABLE> --id <KEY> [--lazy <COL>]... [--read <COL>]...

use super::declare::{declare, ModelArgs};
use clap::Args;
use lazycols_core::{LazyLoadable, Value};
use lazycols_store::{db, ModelRepo};

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Primary key of the record; integers are bound as integers
    #[arg(long)]
    pub id: String,

    /// Column to read after loading; lazy columns are fetched on demand
    #[arg(long, value_delimiter = ',')]
    pub read: Vec<String>,

    /// Fetch every missing lazy column
    #[arg(long)]
    pub all_lazy: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Execute show command
pub fn execute(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open(&args.model.db)?;
    let repo = ModelRepo::with_global(&conn);
    let schema = declare(&args.model, repo.backend())?;

    let mut record = repo.find(&schema, parse_key(&args.id))?;
    let after_load = repo.backend().stats().point_queries;

    let mut read = Vec::with_capacity(args.read.len());
    for column in &args.read {
        let value = repo.read(&mut record, column)?.clone();
        read.push((column.clone(), value));
    }
    if args.all_lazy {
        repo.load_lazy(&mut record)?;
    }
    let secondary_fetches = repo.backend().stats().point_queries - after_load;

    let lazy: Vec<String> = repo
        .registry()
        .lookup(schema.name())
        .map(|c| c.lazy_columns().iter().map(String::from).collect())
        .unwrap_or_default();

    if args.json {
        let attributes: serde_json::Map<String, serde_json::Value> = record
            .attributes()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect();
        let not_loaded: Vec<&String> = lazy
            .iter()
            .filter(|c| !record.attributes().contains(c.as_str()))
            .collect();
        let out = serde_json::json!({
            "model": schema.name(),
            "table": schema.table(),
            "primary_key": args.id,
            "lazy": &lazy,
            "attributes": attributes,
            "not_loaded": not_loaded,
            "secondary_fetches": secondary_fetches,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} #{} ({})", schema.name(), args.id, schema.table());
    for (column, value) in record.attributes().iter() {
        println!("  {} = {}", column, value);
    }
    for column in lazy.iter().filter(|c| !record.attributes().contains(c.as_str())) {
        println!("  {} = <not loaded>", column);
    }
    for (column, value) in &read {
        println!("read {} -> {}", column, value);
    }
    println!("secondary fetches: {}", secondary_fetches);

    Ok(())
}

fn parse_key(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("42"), Value::Integer(42));
        assert_eq!(parse_key("INV-7"), Value::from("INV-7"));
    }
}
