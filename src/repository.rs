//! Document repository seam.
//!
//! The change feed and document store live outside this crate; the engine
//! only needs two operations, so they sit behind a trait the dispatcher
//! implements against its real store. `MemoryRepository` backs the test
//! suites and embedders without a store.

use std::sync::Mutex;

use crate::error::RepositoryError;
use crate::models::RegistrationDoc;

/// The two store operations the reconciliation engine consumes.
pub trait DocumentRepository: Send + Sync {
    /// Registrations for a patient under the configured registration form.
    fn get_registrations(
        &self,
        patient_id: &str,
        form: &str,
    ) -> Result<Vec<RegistrationDoc>, RepositoryError>;

    /// Persist a mutated registration. Last writer wins; the engine performs
    /// no retry.
    fn save_registration(&self, registration: &RegistrationDoc) -> Result<(), RepositoryError>;
}

/// In-memory repository: a `Mutex`-guarded vector of registrations.
///
/// Saves replace the stored document by id and are counted, so tests can
/// assert the no-op-write rule (nothing cleared, nothing persisted).
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    registrations: Vec<RegistrationDoc>,
    saved_ids: Vec<String>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registrations(registrations: Vec<RegistrationDoc>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                registrations,
                saved_ids: Vec::new(),
            }),
        }
    }

    pub fn insert(&self, registration: RegistrationDoc) {
        self.inner.lock().unwrap().registrations.push(registration);
    }

    /// The registration as currently stored, if present.
    pub fn registration(&self, id: &str) -> Option<RegistrationDoc> {
        self.inner
            .lock()
            .unwrap()
            .registrations
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// How many saves have been performed.
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().saved_ids.len()
    }

    /// Ids of saved registrations, in save order.
    pub fn saved_ids(&self) -> Vec<String> {
        self.inner.lock().unwrap().saved_ids.clone()
    }
}

impl DocumentRepository for MemoryRepository {
    fn get_registrations(
        &self,
        patient_id: &str,
        form: &str,
    ) -> Result<Vec<RegistrationDoc>, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .registrations
            .iter()
            .filter(|r| r.patient_id == patient_id && r.form == form)
            .cloned()
            .collect())
    }

    fn save_registration(&self, registration: &RegistrationDoc) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stored) = inner
            .registrations
            .iter_mut()
            .find(|r| r.id == registration.id)
        {
            *stored = registration.clone();
        } else {
            inner.registrations.push(registration.clone());
        }
        inner.saved_ids.push(registration.id.clone());
        Ok(())
    }
}
