use super::model::{Cardinality, FieldKind, ModelDesc};
use super::rowset::ColumnMeta;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Case-insensitive lookup from column name to position.
pub(crate) struct ColumnIndex {
    by_name: HashMap<String, usize>,
}

impl ColumnIndex {
    pub(crate) fn new(columns: &[ColumnMeta]) -> Self {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            by_name.entry(column.name.to_lowercase()).or_insert(i);
        }
        ColumnIndex { by_name }
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Column for `field` under `prefix`.
    ///
    /// Tries `prefix.column`, then (root level only) the bare column name.
    fn find(&self, prefix: &str, field: &str, column: Option<&str>, root: bool) -> Option<usize> {
        if let Some(full) = column.filter(|c| c.contains('.')) {
            return self.get(full);
        }
        let name = column.unwrap_or(field);
        self.get(&format!("{prefix}.{name}"))
            .or_else(|| if root { self.get(name) } else { None })
    }
}

#[derive(Debug)]
pub(crate) struct ScalarSlot {
    pub field: usize,
    pub name: &'static str,
    pub column: usize,
    pub collect: bool,
}

#[derive(Debug)]
pub(crate) struct ChildPlan {
    pub field: usize,
    pub name: &'static str,
    pub cardinality: Cardinality,
    pub plan: LevelPlan,
}

/// Field-to-column bindings for one destination level, computed once per query.
#[derive(Debug)]
pub(crate) struct LevelPlan {
    pub prefix: String,
    pub scalars: Vec<ScalarSlot>,
    /// Columns holding this level's primary-key cells.
    pub keys: Vec<usize>,
    pub children: Vec<ChildPlan>,
}

impl LevelPlan {
    pub(crate) fn build(desc: &'static ModelDesc, index: &ColumnIndex) -> LevelPlan {
        let mut path = Vec::new();
        Self::build_level(desc, desc.prefix().to_string(), None, index, &mut path)
    }

    fn build_level(
        desc: &'static ModelDesc,
        prefix: String,
        key_override: Option<&'static [&'static str]>,
        index: &ColumnIndex,
        path: &mut Vec<(*const ModelDesc, String)>,
    ) -> LevelPlan {
        let root = path.is_empty();
        path.push((desc as *const ModelDesc, prefix.to_lowercase()));

        let mut plan = LevelPlan {
            prefix,
            scalars: Vec::new(),
            keys: Vec::new(),
            children: Vec::new(),
        };

        for (i, field) in desc.fields.iter().enumerate() {
            match field.kind {
                FieldKind::Scalar {
                    primary_key,
                    collect,
                } => {
                    let Some(column) = index.find(&plan.prefix, field.name, field.column, root)
                    else {
                        continue;
                    };
                    let is_key = match key_override {
                        Some(names) => names.iter().any(|n| n.eq_ignore_ascii_case(field.name)),
                        None => primary_key,
                    };
                    if is_key {
                        plan.keys.push(column);
                    }
                    plan.scalars.push(ScalarSlot {
                        field: i,
                        name: field.name,
                        column,
                        collect,
                    });
                }
                FieldKind::Nested {
                    model,
                    cardinality,
                    alias,
                    primary_key,
                } => {
                    let child_desc = model();
                    let child_prefix = alias.unwrap_or(child_desc.prefix()).to_string();
                    let seen = path.iter().any(|(ptr, p)| {
                        std::ptr::eq(*ptr, child_desc) && *p == child_prefix.to_lowercase()
                    });
                    if seen {
                        continue;
                    }
                    let child =
                        Self::build_level(child_desc, child_prefix, primary_key, index, path);
                    if child.is_empty() {
                        continue;
                    }
                    plan.children.push(ChildPlan {
                        field: i,
                        name: field.name,
                        cardinality,
                        plan: child,
                    });
                }
            }
        }

        path.pop();
        plan
    }

    /// No column feeds this level or any level below it.
    pub(crate) fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.children.is_empty()
    }

    pub(crate) fn matched_columns(&self) -> usize {
        self.scalars.len()
            + self
                .children
                .iter()
                .map(|c| c.plan.matched_columns())
                .sum::<usize>()
    }

    /// `prefix(<part>..)`, or empty when the level has no key material.
    ///
    /// Every part is length-prefixed (`3:abc`) and NULL is written as `~`, so
    /// distinct key tuples never share a key. Collections below this level do
    /// not contribute.
    pub(crate) fn group_key(&self, row: &[Value]) -> String {
        let mut parts = String::new();
        let mut cell = String::new();
        for &column in &self.keys {
            cell.clear();
            if row[column].write_key(&mut cell) {
                push_key_part(&mut parts, &cell);
            } else {
                parts.push('~');
            }
        }
        for child in &self.children {
            if child.cardinality == Cardinality::Many {
                continue;
            }
            let sub = child.plan.group_key(row);
            if !sub.is_empty() {
                push_key_part(&mut parts, &sub);
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("{}({parts})", self.prefix)
        }
    }
}

fn push_key_part(key: &mut String, part: &str) {
    let _ = write!(key, "{}:{part}", part.len());
}
