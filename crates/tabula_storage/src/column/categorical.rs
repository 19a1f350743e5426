//! Categorical columns: integer codes backed by a category dictionary.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use tabula_foundation::{Error, Result, RowId, Value, ValueKind};

use super::{Column, IntColumn};
use crate::iter::{RowIterator, Stamped};
use crate::notify::{ColumnEvent, Listener, ListenerId};

/// Bidirectional map between category names and dense `i32` codes.
#[derive(Clone, Debug, Default)]
pub struct CategoryDictionary {
    categories: Vec<Arc<str>>,
    codes: HashMap<Arc<str>, i32>,
}

impl CategoryDictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `name`, assigning the next code if it is new.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error once `i32::MAX` categories exist.
    pub fn intern(&mut self, name: &str) -> Result<i32> {
        if let Some(&code) = self.codes.get(name) {
            return Ok(code);
        }
        let code = i32::try_from(self.categories.len())
            .map_err(|_| Error::invalid_argument("too many categories"))?;
        let name: Arc<str> = name.into();
        self.categories.push(Arc::clone(&name));
        self.codes.insert(name, code);
        Ok(code)
    }

    /// Code of an existing category.
    #[must_use]
    pub fn code(&self, name: &str) -> Option<i32> {
        self.codes.get(name).copied()
    }

    /// Name of the category with `code`.
    #[must_use]
    pub fn category(&self, code: i32) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.categories.get(index))
            .map(AsRef::as_ref)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns true if no category exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in code order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(AsRef::as_ref)
    }

    /// Renumbers categories alphabetically. Returns `remap[old] = new`.
    fn sort(&mut self) -> Vec<i32> {
        let mut order: Vec<usize> = (0..self.categories.len()).collect();
        order.sort_by(|&a, &b| self.categories[a].cmp(&self.categories[b]));

        let mut remap = vec![0; order.len()];
        let mut sorted = Vec::with_capacity(order.len());
        for (&old, new) in order.iter().zip(0..) {
            remap[old] = new;
            sorted.push(Arc::clone(&self.categories[old]));
        }
        self.codes = sorted
            .iter()
            .zip(0..)
            .map(|(name, code)| (Arc::clone(name), code))
            .collect();
        self.categories = sorted;
        remap
    }
}

/// A column of category names stored as `i32` codes.
///
/// Rows order by code unless the column is built with
/// [`ordered_by_name`](Self::ordered_by_name).
#[derive(Debug)]
pub struct CategoricalColumn {
    codes: IntColumn,
    dictionary: CategoryDictionary,
    by_name: bool,
}

impl CategoricalColumn {
    /// Creates an empty column.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            codes: IntColumn::new(name),
            dictionary: CategoryDictionary::new(),
            by_name: false,
        }
    }

    /// Creates an empty column with categories pre-registered in order.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if there are too many categories.
    pub fn with_categories<'a>(
        name: impl Into<Arc<str>>,
        categories: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut column = Self::new(name);
        for category in categories {
            column.dictionary.intern(category)?;
        }
        Ok(column)
    }

    /// Orders rows by category name instead of code.
    #[must_use]
    pub fn ordered_by_name(mut self) -> Self {
        self.by_name = true;
        self
    }

    /// The category dictionary.
    #[must_use]
    pub fn dictionary(&self) -> &CategoryDictionary {
        &self.dictionary
    }

    /// Stores `category` at `row`, extending the column. Returns its code.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if the dictionary is full.
    pub fn set_category(&mut self, row: RowId, category: &str) -> Result<i32> {
        let code = self.dictionary.intern(category)?;
        self.codes.set_extend(row, code);
        Ok(code)
    }

    /// Category name at `row`, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    pub fn get_category(&self, row: RowId) -> Result<Option<&str>> {
        Ok(self
            .codes
            .get(row)?
            .and_then(|&code| self.dictionary.category(code)))
    }

    /// Category code at `row`, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    pub fn get_code(&self, row: RowId) -> Result<Option<i32>> {
        Ok(self.codes.get(row)?.copied())
    }

    /// Renumbers categories alphabetically and rewrites every defined row,
    /// publishing a single change event.
    pub fn sort_categories(&mut self) {
        let remap = self.dictionary.sort();
        self.codes.disable_notify();
        for row in 0..self.codes.size() {
            let Ok(Some(&old)) = self.codes.get(row) else {
                continue;
            };
            if let Some(&new) = usize::try_from(old).ok().and_then(|i| remap.get(i)) {
                if new != old {
                    self.codes.overwrite(row, new);
                }
            }
        }
        self.codes.enable_notify();
    }
}

impl Column for CategoricalColumn {
    fn name(&self) -> &str {
        self.codes.name()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Category
    }

    fn size(&self) -> usize {
        self.codes.size()
    }

    fn set_size(&mut self, size: usize) {
        self.codes.set_size(size);
    }

    fn clear(&mut self) {
        self.codes.clear();
    }

    fn is_value_undefined(&self, row: RowId) -> bool {
        self.codes.is_value_undefined(row)
    }

    fn set_value_undefined(&mut self, row: RowId, undefined: bool) -> Result<()> {
        self.codes.set_value_undefined(row, undefined)
    }

    fn value(&self, row: RowId) -> Result<Option<Value>> {
        Ok(self.get_category(row)?.map(Value::from))
    }

    fn set_value(&mut self, row: RowId, value: &Value) -> Result<()> {
        match value {
            Value::Text(name) => self.set_category(row, name).map(|_| ()),
            Value::Int(code) => {
                if self.dictionary.category(*code).is_none() {
                    return Err(Error::invalid_argument(format!(
                        "unknown category code {code} in column {}",
                        self.name()
                    )));
                }
                self.codes.set_extend(row, *code);
                Ok(())
            }
            other => Err(Error::type_mismatch(ValueKind::Category, other.kind())),
        }
    }

    fn get_f64(&self, row: RowId) -> Result<Option<f64>> {
        Ok(self.get_code(row)?.map(f64::from))
    }

    fn format_value(&self, row: RowId) -> Result<Option<String>> {
        Ok(self.get_category(row)?.map(str::to_string))
    }

    fn parse_value(&mut self, row: RowId, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return self.codes.parse_value(row, text);
        }
        self.set_category(row, text).map(|_| ())
    }

    fn compare_rows(&self, a: RowId, b: RowId) -> Ordering {
        if !self.by_name {
            return self.codes.compare_rows(a, b);
        }
        let na = self.get_category(a).ok().flatten();
        let nb = self.get_category(b).ok().flatten();
        match (na, nb) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn iter(&self) -> RowIterator {
        self.codes.iter()
    }

    fn iter_rev(&self) -> RowIterator {
        self.codes.iter_rev()
    }

    fn disable_notify(&mut self) {
        self.codes.disable_notify();
    }

    fn enable_notify(&mut self) {
        self.codes.enable_notify();
    }

    fn add_change_listener(&mut self, listener: &Rc<dyn Listener<ColumnEvent>>) -> ListenerId {
        self.codes.add_change_listener(listener)
    }

    fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.codes.remove_change_listener(id)
    }

    fn mod_count(&self) -> u64 {
        self.codes.mod_count()
    }

    fn forget_row(&mut self, row: RowId) {
        self.codes.forget_row(row);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Stamped for CategoricalColumn {
    fn modification_stamp(&self) -> u64 {
        self.codes.modification_stamp()
    }
}
