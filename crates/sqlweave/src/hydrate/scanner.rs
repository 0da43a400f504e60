use super::model::{ManySlot, Model, Nested, Record};
use super::plan::{ColumnIndex, LevelPlan};
use super::rowset::ColumnMeta;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use std::collections::HashMap;
use std::marker::PhantomData;

/// Forward-only hydration of rows into `Vec<T>`.
///
/// The binding plan is computed once from the column list; each pushed row
/// is merged into the records collected so far.
///
/// # Example
///
/// ```ignore
/// let mut scanner = Scanner::<Film>::new(&columns);
/// while let Some(row) = stream.next().await {
///     scanner.push(&row?)?;
/// }
/// let films = scanner.finish();
/// ```
pub struct Scanner<T: Model> {
    plan: LevelPlan,
    columns: Vec<ColumnMeta>,
    /// Element position per `parent key | field : group key`.
    seen: HashMap<String, usize>,
    items: Vec<T>,
    rows: usize,
    _model: PhantomData<fn() -> T>,
}

struct RowCtx<'a> {
    row: &'a [Value],
    index: usize,
    columns: &'a [ColumnMeta],
}

impl<T: Model> Scanner<T> {
    pub fn new(columns: &[ColumnMeta]) -> Self {
        let index = ColumnIndex::new(columns);
        let plan = LevelPlan::build(T::descriptor(), &index);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlweave.hydrate",
            model = T::descriptor().type_name,
            columns = columns.len(),
            matched = plan.matched_columns(),
            "hydration plan built"
        );

        Scanner {
            plan,
            columns: columns.to_vec(),
            seen: HashMap::new(),
            items: Vec::new(),
            rows: 0,
            _model: PhantomData,
        }
    }

    /// Merge one row, cells in column order.
    pub fn push(&mut self, row: &[Value]) -> SqlResult<()> {
        if row.len() != self.columns.len() {
            return Err(SqlError::config(format!(
                "row {} has {} cells, expected {}",
                self.rows,
                row.len(),
                self.columns.len()
            )));
        }
        let ctx = RowCtx {
            row,
            index: self.rows,
            columns: &self.columns,
        };
        map_slice(&self.plan, &mut self.items, "", "", &ctx, &mut self.seen)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows pushed so far.
    pub fn rows_seen(&self) -> usize {
        self.rows
    }

    /// Records collected so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<T> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlweave.hydrate",
            model = T::descriptor().type_name,
            rows = self.rows,
            records = self.items.len(),
            "hydration finished"
        );
        self.items
    }
}

fn map_slice(
    plan: &LevelPlan,
    slice: &mut dyn ManySlot,
    parent_key: &str,
    field: &str,
    ctx: &RowCtx<'_>,
    seen: &mut HashMap<String, usize>,
) -> SqlResult<bool> {
    let mut key = plan.group_key(ctx.row);
    if key.is_empty() {
        key = format!("|ROW:{}|", ctx.index);
    }
    let full_key = format!("{parent_key}|{field}:{key}");

    if let Some(&position) = seen.get(&full_key) {
        let Some(existing) = slice.element(position) else {
            return Err(SqlError::config(format!(
                "{}: element {position} vanished during hydration",
                plan.prefix
            )));
        };
        return map_record(plan, existing, ctx, &full_key, true, seen);
    }

    let position = slice.len();
    let updated = map_record(plan, slice.push_default(), ctx, &full_key, false, seen)?;
    if updated {
        seen.insert(full_key, position);
    } else {
        slice.pop();
    }
    Ok(updated)
}

/// Assign this row's cells to `record`; `merge` restricts the update to
/// collections below an already-populated record.
fn map_record(
    plan: &LevelPlan,
    record: &mut dyn Record,
    ctx: &RowCtx<'_>,
    key: &str,
    merge: bool,
    seen: &mut HashMap<String, usize>,
) -> SqlResult<bool> {
    let mut updated = false;

    for slot in &plan.scalars {
        if merge && !slot.collect {
            continue;
        }
        let value = &ctx.row[slot.column];
        if value.is_null() {
            continue;
        }
        record.assign_field(slot.field, value.clone()).map_err(|e| {
            SqlError::hydrate(
                ctx.index,
                ctx.columns[slot.column].name.clone(),
                format!("{}.{}", plan.prefix, slot.name),
                e.message(),
            )
        })?;
        updated = true;
    }

    for child in &plan.children {
        let type_name = record.record_desc().type_name;
        let Some(nested) = record.nested_field(child.field) else {
            return Err(SqlError::config(format!(
                "{type_name}.{} is declared nested but has no nested accessor",
                child.name
            )));
        };
        let child_updated = match nested {
            Nested::One(inner) => map_record(&child.plan, inner, ctx, key, merge, seen)?,
            Nested::Optional(slot) => {
                if slot.is_some() {
                    map_record(&child.plan, slot.get_or_default(), ctx, key, merge, seen)?
                } else {
                    let assigned =
                        map_record(&child.plan, slot.get_or_default(), ctx, key, false, seen)?;
                    if !assigned {
                        slot.clear();
                    }
                    assigned
                }
            }
            Nested::Many(items) => map_slice(&child.plan, items, key, child.name, ctx, seen)?,
        };
        updated |= child_updated;
    }

    Ok(updated)
}
