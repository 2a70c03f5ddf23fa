use async_trait::async_trait;

use crate::{
    db::error::DbResult,
    models::{CreateForm, Form},
};

#[async_trait]
pub trait FormRepo: Send + Sync {
    /// Create a form. Fails with `FormExists` if the id is taken.
    async fn create(&self, input: CreateForm) -> DbResult<Form>;

    /// Get a form by id regardless of its retention settings.
    async fn get(&self, id: &str) -> DbResult<Option<Form>>;

    /// Look up a form that a purge may run against.
    ///
    /// Without a mode override only forms whose stored purge mode is not
    /// `none` match. Without a days override only forms whose stored
    /// retention is greater than zero match. A form that exists but fails
    /// these filters is reported as `None`, same as a missing one.
    async fn find_eligible(
        &self,
        id: &str,
        has_mode_override: bool,
        has_days_override: bool,
    ) -> DbResult<Option<Form>>;
}
