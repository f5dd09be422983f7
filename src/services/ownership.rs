use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Validate
///
/// Field-level checks a creation payload must pass before anything is written.
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

/// Patch
///
/// A partial update for records of type `R`. Absent fields and blank strings keep the stored
/// value.
pub trait Patch<R> {
    /// True when applying the patch would change nothing.
    fn is_empty(&self) -> bool;
    fn apply_to(self, record: &mut R);
}

/// Returns the new value of an optional text field. Empty and whitespace-only values count as
/// absent, the same rule `require_non_empty` applies on creation.
pub fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// Fails with `ValidationFailed` naming the first empty field.
pub fn require_non_empty(fields: &[(&str, &str)]) -> AppResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(AppError::ValidationFailed(format!("{name} is required"))),
        None => Ok(()),
    }
}

/// OwnedStore
///
/// Persistence and presentation for one kind of owned resource. `OwnedService` implements the
/// ownership rules once on top of this.
#[async_trait]
pub trait OwnedStore: Send + Sync {
    type Record: Clone + Send + Sync;
    type Draft: Validate + Send;
    type Changes: Patch<Self::Record> + Send;
    type View: Send;

    /// Message used when an id has no live record.
    const NOT_FOUND: &'static str;
    /// Lowercase resource name for log lines.
    const KIND: &'static str;

    fn id_of(record: &Self::Record) -> i64;
    fn owner_of(record: &Self::Record) -> i64;

    async fn insert(&self, owner_id: i64, draft: Self::Draft) -> AppResult<Self::Record>;
    async fn find(&self, id: i64) -> AppResult<Option<Self::Record>>;
    async fn find_owned(&self, owner_id: i64, id: i64) -> AppResult<Option<Self::Record>>;
    async fn list_owned(&self, owner_id: i64) -> AppResult<Vec<Self::Record>>;
    async fn list_all(&self) -> AppResult<Vec<Self::Record>>;
    async fn save(&self, record: &Self::Record) -> AppResult<Self::Record>;
    async fn soft_delete(&self, id: i64) -> AppResult<bool>;

    /// Joins the related rows a response needs (owner profile, referenced photo).
    async fn present(&self, record: Self::Record) -> AppResult<Self::View>;
}

/// ensure_owner
///
/// The ownership gate: a caller may only mutate records it owns.
pub fn ensure_owner(caller_id: i64, owner_id: i64) -> AppResult<()> {
    if caller_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Failure of a lookup scoped to the caller, for every resource kind.
pub const ID_NOT_OWNED: &str = "Failed to get data, id is invalid";

/// Updated
///
/// Outcome of `OwnedService::update`: the record's true owner, and the updated view when the
/// caller was that owner.
#[derive(Debug)]
pub struct Updated<V> {
    pub owner_id: i64,
    view: Option<V>,
}

impl<V> Updated<V> {
    /// Yields the updated view, or `Forbidden` when `caller_id` does not own the record.
    pub fn into_owned_by(self, caller_id: i64) -> AppResult<V> {
        ensure_owner(caller_id, self.owner_id)?;
        self.view.ok_or(AppError::Forbidden)
    }
}

/// OwnedService
///
/// Ownership-scoped CRUD over any `OwnedStore`. Reads of single records are pre-filtered by
/// owner; `update` and `delete` look the record up by id alone and report its true owner so
/// the caller can tell `Forbidden` apart from `NotFound`.
#[derive(Clone)]
pub struct OwnedService<S> {
    store: S,
}

impl<S: OwnedStore> OwnedService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller_id: i64, draft: S::Draft) -> AppResult<S::View> {
        draft.validate()?;
        let record = self.store.insert(caller_id, draft).await?;
        tracing::info!(
            kind = S::KIND,
            id = S::id_of(&record),
            owner = caller_id,
            "created"
        );
        self.store.present(record).await
    }

    /// Every live record owned by `caller_id`. An empty list is a success.
    pub async fn list_mine(&self, caller_id: i64) -> AppResult<Vec<S::View>> {
        let records = self.store.list_owned(caller_id).await?;
        self.present_all(records).await
    }

    /// Every live record whose owner is also live.
    pub async fn list_all(&self) -> AppResult<Vec<S::View>> {
        let records = self.store.list_all().await?;
        self.present_all(records).await
    }

    pub async fn get_one(&self, caller_id: i64, id: i64) -> AppResult<S::View> {
        let record = self
            .store
            .find_owned(caller_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(ID_NOT_OWNED.to_string()))?;
        self.store.present(record).await
    }

    /// update
    ///
    /// Applies `patch` to record `id` and reports the record's owner alongside the result.
    /// Ownership is compared before anything is written or joined: on a mismatch nothing is
    /// persisted and no view is built. An empty patch is a no-op.
    pub async fn update(
        &self,
        caller_id: i64,
        id: i64,
        patch: S::Changes,
    ) -> AppResult<Updated<S::View>> {
        let mut record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(S::NOT_FOUND.to_string()))?;
        let owner_id = S::owner_of(&record);

        if owner_id != caller_id {
            tracing::warn!(
                kind = S::KIND,
                id,
                owner = owner_id,
                caller = caller_id,
                "update refused: caller is not the owner"
            );
            return Ok(Updated {
                owner_id,
                view: None,
            });
        }

        if !patch.is_empty() {
            patch.apply_to(&mut record);
            record = self.store.save(&record).await?;
            tracing::info!(kind = S::KIND, id, owner = owner_id, "updated");
        }

        Ok(Updated {
            owner_id,
            view: Some(self.store.present(record).await?),
        })
    }

    /// delete
    ///
    /// Soft-deletes record `id` only when the caller owns it. Returns the record's owner either
    /// way so a mismatch can be reported.
    pub async fn delete(&self, caller_id: i64, id: i64) -> AppResult<i64> {
        let record = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(S::NOT_FOUND.to_string()))?;
        let owner_id = S::owner_of(&record);

        if S::id_of(&record) == id && owner_id == caller_id {
            self.store.soft_delete(id).await?;
            tracing::info!(kind = S::KIND, id, owner = owner_id, "soft-deleted");
        } else {
            tracing::warn!(
                kind = S::KIND,
                id,
                owner = owner_id,
                caller = caller_id,
                "delete refused: caller is not the owner"
            );
        }

        Ok(owner_id)
    }

    async fn present_all(&self, records: Vec<S::Record>) -> AppResult<Vec<S::View>> {
        let mut views = Vec::with_capacity(records.len());
        for record in records {
            views.push(self.store.present(record).await?);
        }
        Ok(views)
    }
}
