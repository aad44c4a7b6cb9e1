//! Election storage trait.

use evote_types::{Election, ElectionId};

use crate::StoreError;

pub trait ElectionStore {
    fn get_election(&self, id: ElectionId) -> Result<Election, StoreError>;
    fn put_election(&self, election: &Election) -> Result<(), StoreError>;
    fn iter_elections(&self) -> Result<Vec<Election>, StoreError>;

    /// Elections whose activation flag is set, ordered by end time ascending
    /// (ties broken by id).
    fn active_elections(&self) -> Result<Vec<Election>, StoreError> {
        let mut active: Vec<Election> = self
            .iter_elections()?
            .into_iter()
            .filter(|e| e.is_active)
            .collect();
        active.sort_by_key(|e| (e.ends_at, e.id));
        Ok(active)
    }
}
