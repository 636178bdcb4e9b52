//! Pre-validation field transforms.
//!
//! String ops skip anything that is not a string; the validator reports the
//! type mismatch afterwards. Missing intermediate fields are never created.

use serde_json::Value;

use crate::config::{FieldTransform, TransformOp};

/// Apply every transform to `value` in declaration order.
pub fn apply_all(value: &mut Value, transforms: &[FieldTransform]) {
    for transform in transforms {
        apply(value, transform);
    }
}

/// Apply one transform to `value`.
pub fn apply(value: &mut Value, transform: &FieldTransform) {
    let segments: Vec<&str> = if transform.field_path.is_empty() {
        Vec::new()
    } else {
        transform.field_path.split('.').collect()
    };
    apply_at(value, &segments, &transform.op);
}

fn apply_at(value: &mut Value, segments: &[&str], op: &TransformOp) {
    let Some((head, rest)) = segments.split_first() else {
        apply_leaf(value, op);
        return;
    };

    if *head == "*" {
        match value {
            Value::Array(items) => items.iter_mut().for_each(|item| apply_at(item, rest, op)),
            Value::Object(map) => map.values_mut().for_each(|item| apply_at(item, rest, op)),
            _ => {}
        }
        return;
    }

    // `default` on the last segment may need to insert a key that is absent.
    if rest.is_empty() {
        if let (TransformOp::Default { value: fill }, Value::Object(map)) = (op, &mut *value) {
            match map.get_mut(*head) {
                Some(existing) if !existing.is_null() => {}
                _ => {
                    map.insert((*head).to_string(), fill.clone());
                }
            }
            return;
        }
    }

    let child = match value {
        Value::Object(map) => map.get_mut(*head),
        Value::Array(items) => head.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
        _ => None,
    };
    if let Some(child) = child {
        apply_at(child, rest, op);
    }
}

fn apply_leaf(value: &mut Value, op: &TransformOp) {
    match op {
        TransformOp::Trim => {
            if let Value::String(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
        }
        TransformOp::Lowercase => {
            if let Value::String(s) = value {
                *s = s.to_lowercase();
            }
        }
        TransformOp::Uppercase => {
            if let Value::String(s) = value {
                *s = s.to_uppercase();
            }
        }
        TransformOp::Default { value: fill } => {
            if value.is_null() {
                *value = fill.clone();
            }
        }
    }
}
