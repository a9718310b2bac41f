//! Table-level injection: independent fault assignments per column.
//!
//! A [`TableInjector`] maps column names to injector handles. Handles
//! are reference-counted, so two columns may alias one injector; those
//! columns then receive bit-identical fault parameters and, for random
//! draws, the same sampled values. The table layer never chooses which
//! fault to apply: the caller fires faults on the handles, and the
//! table folds the resulting sequences back into a copy of the
//! original table.
//!
//! The tabular container itself stays abstract behind the [`Table`]
//! trait: named-column access, stable column order, column replacement.
//! [`MemoryTable`] is a minimal ordered implementation for tests and
//! demos.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{FaultError, Result};
use crate::injector::Injector;

/// Shared handle to an injector. Clone the handle to alias one
/// injector across several columns.
///
/// Aliased handles share one `current` sequence and one RNG, so their
/// `inject` calls must happen one at a time (which `RefCell` enforces).
pub type InjectorHandle = Rc<RefCell<Injector>>;

/// Wrap an injector into a shareable handle.
pub fn share(injector: Injector) -> InjectorHandle {
    Rc::new(RefCell::new(injector))
}

/// Abstract tabular container with named columns in stable order.
pub trait Table {
    /// Column names in the table's stable iteration order.
    fn column_names(&self) -> Vec<String>;

    /// The values of a column, or `None` if absent.
    fn column(&self, name: &str) -> Option<&[f64]>;

    /// Replace a column's values (or insert the column if absent).
    fn set_column(&mut self, name: &str, values: Vec<f64>);
}

/// Applies per-column fault assignments to a table.
///
/// # Example
///
/// ```
/// use faultforge::faults::Fault;
/// use faultforge::injector::{Injector, InjectorConfig};
/// use faultforge::table::{share, MemoryTable, Table, TableInjector};
///
/// let table = MemoryTable::new()
///     .with_column("temp", vec![20.0, 21.0, 22.0, 21.0])
///     .with_column("pressure", vec![1.0, 1.1, 1.2, 1.1]);
///
/// let temp = share(Injector::new(table.column("temp").unwrap(), InjectorConfig::default()).unwrap());
/// temp.borrow_mut().inject(&Fault::StuckValue { value: Some(0.0) }).unwrap();
///
/// let injector = TableInjector::new([("temp".to_string(), temp)]);
/// let faulted = injector.materialize(&table).unwrap();
///
/// assert_eq!(faulted.column("temp").unwrap(), &[0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(faulted.column("pressure"), table.column("pressure"));
/// ```
pub struct TableInjector {
    /// Assignment order is kept for deterministic iteration.
    assignments: Vec<(String, InjectorHandle)>,
}

impl TableInjector {
    /// Build from `(column, handle)` pairs. A later assignment to the
    /// same column replaces the earlier one.
    pub fn new(assignments: impl IntoIterator<Item = (String, InjectorHandle)>) -> Self {
        let mut this = Self {
            assignments: Vec::new(),
        };
        for (column, handle) in assignments {
            this.assign(column, handle);
        }
        this
    }

    /// Assign (or reassign) a column to an injector handle.
    pub fn assign(&mut self, column: impl Into<String>, handle: InjectorHandle) {
        let column = column.into();
        if let Some(slot) = self.assignments.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = handle;
        } else {
            self.assignments.push((column, handle));
        }
    }

    /// The handle assigned to `column`, if any.
    pub fn injector(&self, column: &str) -> Option<InjectorHandle> {
        self.assignments
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, h)| Rc::clone(h))
    }

    /// Number of assigned columns.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no columns are assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Snapshot each assigned column's current (faulted) sequence.
    pub fn inject(&self) -> HashMap<String, Vec<f64>> {
        self.assignments
            .iter()
            .map(|(column, handle)| (column.clone(), handle.borrow().current().to_vec()))
            .collect()
    }

    /// Fold each assigned injector's current sequence into a copy of
    /// `original`, preserving column order and leaving unassigned
    /// columns verbatim.
    ///
    /// Fails with [`FaultError::UnknownColumn`] if an assignment
    /// references a column the table lacks; the input table is never
    /// mutated.
    pub fn materialize<T: Table + Clone>(&self, original: &T) -> Result<T> {
        let mut faulted = original.clone();
        for (column, handle) in &self.assignments {
            if faulted.column(column).is_none() {
                return Err(FaultError::UnknownColumn(column.clone()));
            }
            faulted.set_column(column, handle.borrow().current().to_vec());
        }
        debug!("materialized table with {} faulted columns", self.assignments.len());
        Ok(faulted)
    }

    /// Restore every distinct assigned injector to its original
    /// sequence. Aliased handles are restored once.
    pub fn restore_all(&self) {
        let mut seen: Vec<*const RefCell<Injector>> = Vec::new();
        for (_, handle) in &self.assignments {
            let ptr = Rc::as_ptr(handle);
            if seen.contains(&ptr) {
                continue;
            }
            seen.push(ptr);
            handle.borrow_mut().restore();
        }
    }
}

/// Minimal ordered in-memory table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    columns: Vec<(String, Vec<f64>)>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, keeping insertion order.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.set_column(&name.into(), values);
        self
    }
}

impl Table for MemoryTable {
    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(c, _)| c == name)
            .map(|(_, values)| values.as_slice())
    }

    fn set_column(&mut self, name: &str, values: Vec<f64>) {
        if let Some(slot) = self.columns.iter_mut().find(|(c, _)| c == name) {
            slot.1 = values;
        } else {
            self.columns.push((name.to_string(), values));
        }
    }
}
