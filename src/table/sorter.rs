use super::{sort_rows, SortMode, SortableTable};
use crate::prefs::{PreferenceStore, SORT_MODE_KEY};

/// Applies the sort mode to a table and remembers the user's choice.
pub struct TableSorter<T, P> {
    table: T,
    prefs: P,
}

impl<T: SortableTable, P: PreferenceStore> TableSorter<T, P> {
    pub fn new(table: T, prefs: P) -> Self {
        Self { table, prefs }
    }

    /// Mode used when none is given: the stored preference, else filename.
    pub fn effective_mode(&self) -> SortMode {
        self.prefs
            .get(SORT_MODE_KEY)
            .map(|v| SortMode::from_preference(&v))
            .unwrap_or_default()
    }

    /// Sort the table. Does not write the preference, so the initial
    /// application on page load leaves storage untouched.
    pub fn apply(&mut self, mode: Option<SortMode>) -> Result<SortMode, T::Error> {
        let mode = mode.unwrap_or_else(|| self.effective_mode());
        self.table.show_mode(mode);

        let mut rows = self.table.rows();
        sort_rows(&mut rows, mode);
        self.table.reattach(&rows)?;

        tracing::debug!(mode = %mode, rows = rows.len(), "table sorted");
        Ok(mode)
    }

    /// Handle a change of the sort selector. An empty value means filename.
    /// The raw value is stored as given; a failed write only costs the
    /// setting, not the sort.
    pub fn choose(&mut self, raw: &str) -> Result<SortMode, T::Error> {
        let value = if raw.is_empty() { SortMode::Filename.as_str() } else { raw };
        if let Err(e) = self.prefs.set(SORT_MODE_KEY, value) {
            tracing::warn!(error = %e, "could not persist sort mode");
        }
        self.apply(Some(SortMode::from_preference(value)))
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }
}
