//! Menu items, operation binding and the menu container.
//!
//! An item binds a short code and a description to an operation. The
//! operation is either stored directly in the item as a closure, or named
//! and looked up in the menu's [`OperationTable`] each time the item is
//! selected. Named binding lets the table be changed after items are built:
//! a missing name is reported as [`FaultKind::NotFound`] and a revoked one as
//! [`FaultKind::Inaccessible`], per invocation.
//!
//! [`FaultKind::NotFound`]: crate::FaultKind::NotFound
//! [`FaultKind::Inaccessible`]: crate::FaultKind::Inaccessible

use std::collections::HashMap;
use std::fmt;
use crate::fault::Fault;
use crate::unwind;

/// A zero-argument operation producing `T`.
pub type Operation<'a, T> = Box<dyn FnMut() -> Result<T, Fault> + 'a>;

/// Values an operation closure may return.
///
/// Lets plain `()`-returning closures, `Result<T, Fault>` and
/// `anyhow::Result<T>` all be registered as operations.
pub trait IntoOperationResult<T> {
    /// Convert into the result type the dispatcher works with.
    fn into_operation_result(self) -> Result<T, Fault>;
}

impl IntoOperationResult<()> for () {
    fn into_operation_result(self) -> Result<(), Fault> {
        Ok(())
    }
}

impl<T> IntoOperationResult<T> for Result<T, Fault> {
    fn into_operation_result(self) -> Result<T, Fault> {
        self
    }
}

impl<T> IntoOperationResult<T> for Result<T, anyhow::Error> {
    fn into_operation_result(self) -> Result<T, Fault> {
        self.map_err(Fault::from_anyhow)
    }
}

fn boxed<'a, T, R, F>(mut f: F) -> Operation<'a, T>
where
    F: FnMut() -> R + 'a,
    R: IntoOperationResult<T>,
{
    Box::new(move || f().into_operation_result())
}

/// How an item reaches its operation.
enum Target<'a, T> {
    /// The operation is stored in the item.
    Direct(Operation<'a, T>),
    /// The operation is looked up by name when the item is selected.
    Named(String),
}

impl<T> fmt::Debug for Target<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Direct(_) => f.write_str("Direct(..)"),
            Target::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

/// One line of a menu.
///
/// Codes are trimmed and upper-cased on construction. Items compare equal
/// when their codes do. The codes `R` and `X` (and `ERR` while an error is
/// pending) are interpreted by the dispatcher before any item is consulted,
/// so items using them are unreachable.
pub struct MenuItem<'a, T = ()> {
    code: String,
    description: String,
    target: Target<'a, T>,
}

impl<'a, T> MenuItem<'a, T> {
    /// Create an item bound directly to an operation.
    pub fn new<R, F>(code: impl AsRef<str>, description: impl Into<String>, operation: F) -> Self
    where
        F: FnMut() -> R + 'a,
        R: IntoOperationResult<T>,
    {
        Self {
            code: normalize_code(code.as_ref()),
            description: description.into(),
            target: Target::Direct(boxed(operation)),
        }
    }

    /// Create an item bound to an operation name, resolved on selection.
    pub fn named(
        code: impl AsRef<str>,
        description: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            code: normalize_code(code.as_ref()),
            description: description.into(),
            target: Target::Named(operation.into()),
        }
    }

    /// The normalized selection code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> PartialEq for MenuItem<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl<T> Eq for MenuItem<'_, T> {}

impl<T> fmt::Debug for MenuItem<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("code", &self.code)
            .field("description", &self.description)
            .field("target", &self.target)
            .finish()
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

struct Entry<'a, T> {
    operation: Operation<'a, T>,
    accessible: bool,
}

/// Named operations for late-bound items.
pub struct OperationTable<'a, T = ()> {
    entries: HashMap<String, Entry<'a, T>>,
}

impl<T> Default for OperationTable<'_, T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<'a, T> OperationTable<'a, T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an operation under `name`.
    ///
    /// A replaced operation starts out accessible.
    pub fn register<R, F>(&mut self, name: impl Into<String>, operation: F)
    where
        F: FnMut() -> R + 'a,
        R: IntoOperationResult<T>,
    {
        self.entries.insert(
            name.into(),
            Entry {
                operation: boxed(operation),
                accessible: true,
            },
        );
    }

    /// Remove an operation entirely. Returns whether it existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Make an operation inaccessible without removing it.
    ///
    /// Returns whether the operation exists.
    pub fn revoke(&mut self, name: &str) -> bool {
        self.set_accessible(name, false)
    }

    /// Make a revoked operation accessible again.
    pub fn restore(&mut self, name: &str) -> bool {
        self.set_accessible(name, true)
    }

    fn set_accessible(&mut self, name: &str, accessible: bool) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.accessible = accessible;
                true
            }
            None => false,
        }
    }

    fn resolve(&mut self, name: &str) -> Result<&mut Operation<'a, T>, Fault> {
        match self.entries.get_mut(name) {
            None => Err(Fault::not_found(name)),
            Some(entry) if !entry.accessible => Err(Fault::inaccessible(name)),
            Some(entry) => Ok(&mut entry.operation),
        }
    }
}

impl<T> fmt::Debug for OperationTable<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("OperationTable")
            .field("operations", &names)
            .finish()
    }
}

/// The items of one menu plus the table its named items resolve against.
///
/// # Example
///
/// ```
/// use menuloop_dispatch::{Menu, MenuItem};
///
/// let mut saved = false;
/// let menu: Menu = Menu::new()
///     .item(MenuItem::new("l", "List contacts", || println!("(none)")))
///     .item(MenuItem::named("s", "Save", "save"))
///     .operation("save", || saved = true);
/// assert_eq!(menu.len(), 2);
/// ```
pub struct Menu<'a, T = ()> {
    items: Vec<MenuItem<'a, T>>,
    operations: OperationTable<'a, T>,
}

impl<T> Default for Menu<'_, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            operations: OperationTable::default(),
        }
    }
}

impl<'a, T> Menu<'a, T> {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item.
    pub fn item(mut self, item: MenuItem<'a, T>) -> Self {
        self.items.push(item);
        self
    }

    /// Register a named operation.
    pub fn operation<R, F>(mut self, name: impl Into<String>, operation: F) -> Self
    where
        F: FnMut() -> R + 'a,
        R: IntoOperationResult<T>,
    {
        self.operations.register(name, operation);
        self
    }

    /// The items, in display order.
    pub fn items(&self) -> &[MenuItem<'a, T>] {
        &self.items
    }

    /// The named operation table.
    pub fn operations(&self) -> &OperationTable<'a, T> {
        &self.operations
    }

    /// Mutable access to the named operation table.
    pub fn operations_mut(&mut self) -> &mut OperationTable<'a, T> {
        &mut self.operations
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the first item whose code equals `code`.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.items.iter().position(|item| item.code == code)
    }

    /// Invoke the operation of the item at `index`.
    ///
    /// Panics inside the operation are caught, with their location, and
    /// returned as runtime faults.
    pub(crate) fn invoke(&mut self, index: usize) -> Result<T, Fault> {
        let operation = match &mut self.items[index].target {
            Target::Direct(operation) => operation,
            Target::Named(name) => self.operations.resolve(name)?,
        };
        unwind::catch(|| operation())?
    }
}

impl<T> fmt::Debug for Menu<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("items", &self.items)
            .field("operations", &self.operations)
            .finish()
    }
}
