use crate::core::labelled::LabelledArray;
use crate::core::tensor::Tensor;
use crate::core::value::{Scalar, Value};
use crate::engine::error::ProcessError;
use serde_json::Value as Json;

/// Converts JSON into a process argument.
///
/// - `{"process_id": "sum"}` is a callback
/// - `{"dims": [...], "data": [...], "coords": {...}}` is a labelled array
/// - any other object is a plain object (e.g. a `context`)
pub fn value_from_json(json: &Json) -> Result<Value, ProcessError> {
    Ok(match json {
        Json::Null => Value::null(),
        Json::Bool(b) => Value::from(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => Value::List(
            items
                .iter()
                .map(value_from_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Json::Object(map) => {
            if let Some(id) = map.get("process_id").and_then(Json::as_str) {
                return Ok(Value::callback(id));
            }
            if let (Some(dims), Some(data)) = (map.get("dims"), map.get("data")) {
                return labelled_from_json(dims, data, map.get("coords"));
            }
            let mut entries = indexmap::IndexMap::with_capacity(map.len());
            for (k, v) in map {
                entries.insert(k.clone(), value_from_json(v)?);
            }
            Value::Object(entries)
        }
    })
}

fn labelled_from_json(
    dims: &Json,
    data: &Json,
    coords: Option<&Json>,
) -> Result<Value, ProcessError> {
    let names = dims
        .as_array()
        .ok_or_else(|| ProcessError::invalid("dims", "expected a list of dimension names"))?
        .iter()
        .map(|d| {
            d.as_str()
                .map(str::to_string)
                .ok_or_else(|| ProcessError::invalid("dims", "dimension names must be strings"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tensor = match value_from_json(data)? {
        Value::List(items) => Tensor::from_list(&items)?,
        Value::Scalar(s) => Tensor::scalar(s),
        other => {
            return Err(ProcessError::invalid(
                "data",
                format!("expected nested lists, found a {}", other.type_name()),
            ))
        }
    };

    let mut array = LabelledArray::new(tensor, names)?;
    if let Some(Json::Object(coords)) = coords {
        for (dim, labels) in coords {
            let labels = match value_from_json(labels)? {
                Value::List(items) => items
                    .into_iter()
                    .map(|v| match v {
                        Value::Scalar(s) => Ok(s),
                        _ => Err(ProcessError::invalid("coords", "labels must be scalars")),
                    })
                    .collect::<Result<Vec<Scalar>, _>>()?,
                _ => return Err(ProcessError::invalid("coords", "labels must be lists")),
            };
            array = array.with_coords(dim.as_str(), labels)?;
        }
    }
    Ok(Value::Labelled(array))
}
