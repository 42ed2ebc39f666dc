use serde_json::Value;
use std::collections::BTreeSet;

/// Receives the `data` attached to timeline entries.
pub trait TableSink {
    fn write_table(&mut self, data: &Value);
}

impl<F: FnMut(&Value)> TableSink for F {
    fn write_table(&mut self, data: &Value) {
        self(data)
    }
}

/// Default tabular printer.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTable;

impl TableSink for StdoutTable {
    fn write_table(&mut self, data: &Value) {
        for row in render_table(data) {
            println!("{}", row);
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct BufferedTables {
    pub tables: Vec<Value>,
}

impl TableSink for BufferedTables {
    fn write_table(&mut self, data: &Value) {
        self.tables.push(data.clone());
    }
}

/// Renders a JSON value as aligned text rows.
///
/// Arrays of objects get one column per key seen in any element. Objects
/// become key/value rows. Anything else is a single cell.
pub fn render_table(data: &Value) -> Vec<String> {
    let rows: Vec<Vec<String>> = match data {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            let columns: BTreeSet<&str> = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|obj| obj.keys().map(String::as_str))
                .collect();
            let mut rows = vec![std::iter::once("(index)".to_string())
                .chain(columns.iter().map(|c| c.to_string()))
                .collect::<Vec<_>>()];
            for (i, item) in items.iter().enumerate() {
                let mut row = vec![i.to_string()];
                for column in &columns {
                    row.push(item.get(*column).map(cell).unwrap_or_default());
                }
                rows.push(row);
            }
            rows
        }
        Value::Array(items) => {
            let mut rows = vec![vec!["(index)".to_string(), "Values".to_string()]];
            rows.extend(items.iter().enumerate().map(|(i, v)| vec![i.to_string(), cell(v)]));
            rows
        }
        Value::Object(map) => {
            let mut rows = vec![vec!["(index)".to_string(), "Values".to_string()]];
            rows.extend(map.iter().map(|(k, v)| vec![k.clone(), cell(v)]));
            rows
        }
        other => vec![vec![cell(other)]],
    };
    align(&rows)
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn align(rows: &[Vec<String>]) -> Vec<String> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..width)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect()
}
