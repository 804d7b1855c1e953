//! Row-based editing of the unconditional file swap table.
//!
//! Rows are addressed by their position in [`ModMeta::file_swaps`]. The row
//! one past the end is the blank row used to append a new swap.
//!
//! [`ModMeta::file_swaps`]: crate::models::ModMeta::file_swaps

use super::editor::{EditOutcome, EditRejection, EditResult, GroupEditor};
use crate::models::GamePath;

fn swap_edited() -> EditOutcome {
    EditOutcome {
        meta_changed: true,
        mappings_changed: true,
        ..EditOutcome::default()
    }
}

impl GroupEditor<'_> {
    /// Edit the source (left) path of swap row `row`.
    ///
    /// The old key is removed and, unless the new key is empty, the row's
    /// target is stored under the new key at the same position. An existing
    /// entry with the new key is overwritten.
    pub fn edit_swap_source(&mut self, row: usize, input: &str) -> EditResult {
        let new_key = GamePath::new(input)?;
        let swaps = &mut self.meta.file_swaps;
        let (key, value) = match swaps.get_index(row) {
            Some((key, value)) => (key.clone(), value.clone()),
            None if row == swaps.len() => (GamePath::empty(), GamePath::empty()),
            None => return Err(EditRejection::SwapRowOutOfRange(row)),
        };

        if new_key == key {
            return Ok(EditOutcome::unchanged());
        }

        // Only a real row has an old key to drop; the blank row just appends
        let existing_row = row < swaps.len();
        if existing_row {
            swaps.shift_remove_index(row);
        }
        if !new_key.is_empty() {
            if existing_row && !swaps.contains_key(&new_key) {
                swaps.shift_insert(row, new_key.clone(), value);
            } else {
                swaps.insert(new_key.clone(), value);
            }
        }

        tracing::info!("File swap source changed: '{}' -> '{}'", key, new_key);
        Ok(swap_edited())
    }

    /// Edit the target (right) path of swap row `row`
    pub fn edit_swap_target(&mut self, row: usize, input: &str) -> EditResult {
        let new_value = GamePath::new(input)?;
        let Some((key, value)) = self.meta.file_swaps.get_index_mut(row) else {
            return Err(EditRejection::SwapRowOutOfRange(row));
        };

        if *value == new_value {
            return Ok(EditOutcome::unchanged());
        }

        tracing::info!("File swap {} now targets '{}'", key, new_value);
        *value = new_value;
        Ok(swap_edited())
    }
}
