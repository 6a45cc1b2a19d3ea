//! Structure-aware JSON splitting.

use serde_json::{Map, Value};

/// Splits a JSON document along object boundaries.
///
/// Each chunk is an object that keeps the full key path of every value it
/// holds, so a chunk taken alone still says where its content lives in the
/// document. Chunk sizes are measured on the compact serialization.
#[derive(Debug, Clone)]
pub struct JsonSplitter {
    max_chunk_size: usize,
    min_chunk_size: usize,
    convert_lists: bool,
}

impl JsonSplitter {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            min_chunk_size: max_chunk_size.saturating_sub(200).max(50),
            convert_lists: false,
        }
    }

    /// Treat arrays as objects keyed by index so they can be split too.
    #[must_use]
    pub fn with_convert_lists(mut self, convert_lists: bool) -> Self {
        self.convert_lists = convert_lists;
        self
    }

    /// Split a parsed document into serialized chunks.
    pub fn split_value(&self, value: Value) -> Result<Vec<String>, serde_json::Error> {
        let value = if self.convert_lists {
            lists_to_objects(value)
        } else {
            value
        };

        let Value::Object(root) = value else {
            return Ok(vec![serde_json::to_string(&value)?]);
        };

        let mut chunks = vec![Map::new()];
        let mut path = Vec::new();
        self.split_object(root, &mut path, &mut chunks)?;

        if chunks.last().is_some_and(Map::is_empty) {
            chunks.pop();
        }

        chunks.iter().map(serde_json::to_string).collect()
    }

    fn split_object(
        &self,
        object: Map<String, Value>,
        path: &mut Vec<String>,
        chunks: &mut Vec<Map<String, Value>>,
    ) -> Result<(), serde_json::Error> {
        for (key, value) in object {
            let current_size = match chunks.last() {
                Some(chunk) => serialized_len(chunk)?,
                None => 0,
            };
            let entry_size = entry_len(&key, &value)?;
            let remaining = self.max_chunk_size.saturating_sub(current_size);

            path.push(key);
            if entry_size < remaining {
                set_nested(current_chunk(chunks), path, value);
            } else {
                if current_size >= self.min_chunk_size {
                    chunks.push(Map::new());
                }
                match value {
                    Value::Object(child) => self.split_object(child, path, chunks)?,
                    leaf => set_nested(current_chunk(chunks), path, leaf),
                }
            }
            path.pop();
        }
        Ok(())
    }
}

fn current_chunk(chunks: &mut Vec<Map<String, Value>>) -> &mut Map<String, Value> {
    if chunks.is_empty() {
        chunks.push(Map::new());
    }
    let last = chunks.len() - 1;
    &mut chunks[last]
}

fn serialized_len<T: serde::Serialize + ?Sized>(value: &T) -> Result<usize, serde_json::Error> {
    Ok(serde_json::to_string(value)?.chars().count())
}

/// Length of `{"key":value}` without building it.
fn entry_len(key: &str, value: &Value) -> Result<usize, serde_json::Error> {
    Ok(serialized_len(key)? + serialized_len(value)? + 3)
}

/// Insert `value` at `path`, creating intermediate objects.
fn set_nested(chunk: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = chunk;
    for key in parents {
        let entry = node
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        node = next;
    }
    node.insert(last.clone(), value);
}

/// Replace every array with an object keyed `"0"`, `"1"`, ...
fn lists_to_objects(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Object(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), lists_to_objects(item)))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, lists_to_objects(v)))
                .collect(),
        ),
        other => other,
    }
}
