//! Generic list/detail/mutation state for one resource.

use std::future::Future;

use quay_domain::{Loadable, Page};
use tracing::debug;

use super::Identified;
use crate::error::ApiResult;

/// Cached list page, selected item and last mutation for one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSlice<T> {
    /// The current list page.
    pub items: Loadable<Page<T>>,
    /// The item opened in a detail view.
    pub selected: Loadable<T>,
    /// Outcome of the last create, update or delete.
    pub mutation: Loadable<()>,
}

impl<T> Default for ResourceSlice<T> {
    fn default() -> Self {
        Self {
            items: Loadable::Idle,
            selected: Loadable::Idle,
            mutation: Loadable::Idle,
        }
    }
}

impl<T: Identified + Clone> ResourceSlice<T> {
    /// Creates an idle slice.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a list page into `items`.
    ///
    /// # Errors
    /// Returns the action's error after recording it in `items`.
    pub async fn load_list<F>(&mut self, action: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<Page<T>>>,
    {
        self.items.start();
        match action.await {
            Ok(page) => {
                debug!(rows = page.items.len(), total = page.total, "list loaded");
                self.items = Loadable::Success(page);
                Ok(())
            }
            Err(e) => {
                self.items = Loadable::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Loads one item into `selected`.
    ///
    /// # Errors
    /// Returns the action's error after recording it in `selected`.
    pub async fn load_one<F>(&mut self, action: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<T>>,
    {
        self.selected.start();
        match action.await {
            Ok(item) => {
                self.selected = Loadable::Success(item);
                Ok(())
            }
            Err(e) => {
                self.selected = Loadable::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Runs a mutation, tracking it in `mutation`.
    ///
    /// # Errors
    /// Returns the action's error after recording it in `mutation`.
    pub async fn mutate<R, F>(&mut self, action: F) -> ApiResult<R>
    where
        F: Future<Output = ApiResult<R>>,
    {
        self.mutation.start();
        match action.await {
            Ok(value) => {
                self.mutation = Loadable::Success(());
                Ok(value)
            }
            Err(e) => {
                self.mutation = Loadable::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Runs a create or update and patches the cache with the result.
    ///
    /// # Errors
    /// As [`ResourceSlice::mutate`]; the cache is untouched on failure.
    pub async fn save<F>(&mut self, action: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let item = self.mutate(action).await?;
        self.upsert(item.clone());
        Ok(item)
    }

    /// Runs a delete and drops the item from the cache.
    ///
    /// # Errors
    /// As [`ResourceSlice::mutate`]; the cache is untouched on failure.
    pub async fn delete<F>(&mut self, id: &str, action: F) -> ApiResult<()>
    where
        F: Future<Output = ApiResult<()>>,
    {
        self.mutate(action).await?;
        self.remove(id);
        Ok(())
    }

    /// Replaces the cached item with the same id, or prepends a new one.
    pub fn upsert(&mut self, item: T) {
        if let Some(page) = self.items.data_mut() {
            if let Some(existing) = page.items.iter_mut().find(|i| i.id() == item.id()) {
                *existing = item.clone();
            } else {
                page.items.insert(0, item.clone());
                page.total += 1;
            }
        }
        if self.selected.data().is_some_and(|s| s.id() == item.id()) {
            self.selected = Loadable::Success(item);
        }
    }

    /// Drops the item with `id` from the cache.
    pub fn remove(&mut self, id: &str) {
        if let Some(page) = self.items.data_mut() {
            let before = page.items.len();
            page.items.retain(|i| i.id() != id);
            if page.items.len() < before {
                page.total = page.total.saturating_sub(1);
            }
        }
        if self.selected.data().is_some_and(|s| s.id() == id) {
            self.selected = Loadable::Idle;
        }
    }

    /// Cached item by id, from the list or the detail view.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&T> {
        self.selected
            .data()
            .filter(|s| s.id() == id)
            .or_else(|| self.items.data()?.items.iter().find(|i| i.id() == id))
    }

    /// Back to idle, e.g. after logout.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
