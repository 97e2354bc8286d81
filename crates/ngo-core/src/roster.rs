//! [`SectionService`] — section CRUD and roster synchronisation.
//!
//! A section and its roster are written together. `create` and `update` hand
//! the complete student id list to the store, which applies it in the same
//! transaction as the section row: either the section and its whole roster
//! are committed, or nothing is. Updates are full replacement, so an empty
//! list clears the roster.

use std::sync::Arc;

use crate::{
  Error, Result,
  error::Entity,
  section::{NewSection, Section, SectionView},
  store::RecordStore,
};

const DUPLICATE_STUDENT: &str = "a student is listed more than once in the roster";
const UNKNOWN_REFERENCE: &str =
  "section references an unknown course, volunteer or student";

pub struct SectionService<S> {
  store: Arc<S>,
}

impl<S> SectionService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }
}

impl<S> Clone for SectionService<S> {
  fn clone(&self) -> Self { Self::new(self.store.clone()) }
}

impl<S: RecordStore> SectionService<S> {
  /// All sections, newest first, each with its roster.
  pub async fn list(&self) -> Result<Vec<SectionView>> {
    self.store.list_sections().await.map_err(Error::store)
  }

  pub async fn get(&self, id: i64) -> Result<SectionView> {
    self
      .store
      .get_section(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::not_found(Entity::Section, id))
  }

  /// Create a section with its roster. The returned row does not inline the
  /// roster; read it back with [`Self::get`].
  pub async fn create(&self, input: NewSection) -> Result<Section> {
    input.validate()?;
    self
      .store
      .insert_section(input)
      .await
      .map_err(|e| Error::from_store(e, DUPLICATE_STUDENT, UNKNOWN_REFERENCE))
  }

  /// Replace the section's fields and its entire roster.
  pub async fn update(&self, id: i64, input: NewSection) -> Result<Section> {
    input.validate()?;
    self
      .store
      .update_section(id, input)
      .await
      .map_err(|e| Error::from_store(e, DUPLICATE_STUDENT, UNKNOWN_REFERENCE))?
      .ok_or(Error::not_found(Entity::Section, id))
  }

  pub async fn delete(&self, id: i64) -> Result<()> {
    let deleted = self.store.delete_section(id).await.map_err(Error::store)?;
    if deleted { Ok(()) } else { Err(Error::not_found(Entity::Section, id)) }
  }
}
